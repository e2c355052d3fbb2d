use serde::{Deserialize, Serialize};

use crate::color::lerp;
use crate::paint::{fill_disc, fill_radial};
use crate::surface::{BlendMode, RenderSurface};

/// Size and opacity factors for light points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointStyle {
    /// Core diameter (px) per unit intensity. Range: 1.0..32.0
    pub size_per_intensity: f32,
    /// Smallest core diameter (px); keeps dim points from collapsing. Range: 0.5..4.0
    pub min_size: f32,
    /// Glow radius as a multiple of the core diameter. Range: 1.0..6.0
    pub glow_ratio: f32,
    /// Opacity per unit intensity, capped at 1. Range: 0.5..4.0
    pub alpha_per_intensity: f32,
    /// Extra opacity of the core relative to the glow. Range: 1.0..3.0
    pub core_alpha_boost: f32,
    /// Glow opacity at half radius, relative to the center. Range: 0.0..1.0
    pub glow_mid_alpha: f32,
    /// Shadow diameter (px) per unit intensity in the layered view. Range: 1.0..32.0
    pub layered_size_per_intensity: f32,
    /// Shadow size lost per depth level. Range: 0.0..0.5
    pub layered_depth_shrink: f32,
    /// Shadow opacity per unit intensity in the layered view. Range: 0.5..4.0
    pub layered_alpha_per_intensity: f32,
    /// Shadow opacity lost per depth level. Range: 0.0..0.5
    pub layered_depth_fade: f32,
    /// Shadow offset (px) per depth level, down and right. Range: 0.0..8.0
    pub shadow_offset: f32,
    /// Shadow opacity relative to the lit point. Range: 0.0..1.0
    pub shadow_alpha: f32,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            size_per_intensity: 8.0,
            min_size: 1.0,
            glow_ratio: 3.0,
            alpha_per_intensity: 2.0,
            core_alpha_boost: 1.5,
            glow_mid_alpha: 0.3,
            layered_size_per_intensity: 6.0,
            layered_depth_shrink: 0.2,
            layered_depth_fade: 0.3,
            layered_alpha_per_intensity: 1.5,
            shadow_offset: 2.0,
            shadow_alpha: 0.3,
        }
    }
}

/// Draws one light sample as a soft glow with a bright core.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightPointRasterizer {
    style: PointStyle,
    blend: BlendMode,
}

impl LightPointRasterizer {
    pub fn new(style: PointStyle, blend: BlendMode) -> Self {
        Self { style, blend }
    }

    /// Core diameter for an intensity, floored at `min_size`.
    pub fn core_size(&self, intensity: f32) -> f32 {
        (intensity * self.style.size_per_intensity).max(self.style.min_size)
    }

    /// Point opacity for an intensity, in [0, 1].
    pub fn point_alpha(&self, intensity: f32) -> f32 {
        (intensity * self.style.alpha_per_intensity).clamp(0.0, 1.0)
    }

    /// Composite glow and core at `(x, y)`.
    ///
    /// `global_alpha` scales everything drawn (the per-copy opacity). Zero
    /// intensity yields zero opacity, so nothing is touched.
    pub fn draw<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        x: f32,
        y: f32,
        intensity: f32,
        rgb: [f32; 3],
        global_alpha: f32,
    ) {
        let global = global_alpha.clamp(0.0, 1.0);
        let alpha = self.point_alpha(intensity);
        if alpha <= 0.0 || global <= 0.0 {
            return;
        }
        let size = self.core_size(intensity);
        let glow_alpha = alpha * global;
        let mid = self.style.glow_mid_alpha;

        fill_radial(
            surface,
            x,
            y,
            size * self.style.glow_ratio,
            rgb,
            |t| {
                let falloff = if t < 0.5 {
                    lerp(1.0, mid, t / 0.5)
                } else {
                    lerp(mid, 0.0, (t - 0.5) / 0.5)
                };
                glow_alpha * falloff
            },
            self.blend,
        );

        let core_alpha = (alpha * self.style.core_alpha_boost).min(1.0) * global;
        fill_disc(surface, x, y, size * 0.5, rgb, core_alpha, self.blend);
    }

    /// Layered-view variant: a darkened shadow offset by `depth`, then the lit
    /// point on top.
    pub fn draw_layered<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        x: f32,
        y: f32,
        intensity: f32,
        rgb: [f32; 3],
        depth: u32,
        global_alpha: f32,
    ) {
        let d = depth as f32;
        let s = &self.style;
        let size = (intensity * s.layered_size_per_intensity * (1.0 - d * s.layered_depth_shrink)).max(s.min_size);
        let alpha = (intensity * s.layered_alpha_per_intensity * (1.0 - d * s.layered_depth_fade)).clamp(0.0, 1.0);
        let offset = d * s.shadow_offset;
        let shadow_alpha = alpha * s.shadow_alpha * global_alpha.clamp(0.0, 1.0);

        fill_disc(surface, x + offset, y + offset, size, [0.0, 0.0, 0.0], shadow_alpha, self.blend);
        self.draw(surface, x, y, intensity, rgb, global_alpha);
    }
}
