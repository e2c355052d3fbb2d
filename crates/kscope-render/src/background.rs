//! Backgrounds: per-mode clears, the polar grid and the idle pattern.

use std::f32::consts::{FRAC_PI_6, TAU};

use glam::Vec2;
use kscope_core::ViewMode;

use crate::color::{hex, hsla, rgba8, with_alpha};
use crate::overlay::{TextAnchor, TextPainter};
use crate::paint::{fill_gradient_disc, stroke_arc, stroke_circle, stroke_line};
use crate::settings::RenderSettings;
use crate::surface::{BlendMode, RenderSurface};

/// Mirrors drawn by the idle pattern.
pub const IDLE_MIRRORS: u32 = 3;
/// Arcs drawn along each idle mirror.
pub const IDLE_ARCS_PER_MIRROR: u32 = 5;
/// Caption shown under the idle pattern.
pub const IDLE_CAPTION: &str = "Run a simulation to generate a pattern";

const IDLE_MARGIN: f32 = 20.0;
const CAPTION_SIZE: f32 = 16.0;
const CAPTION_GAP: f32 = 30.0;

/// Clear the whole surface to the opaque background of `mode`.
pub fn clear<S: RenderSurface + ?Sized>(surface: &mut S, mode: ViewMode, settings: &RenderSettings) {
    let rgb = match mode {
        ViewMode::Flat => settings.flat_background,
        ViewMode::Layered => settings.layered_background,
    };
    surface.fill(with_alpha(rgb, 1.0));
}

fn center_of<S: RenderSurface + ?Sized>(surface: &S) -> Vec2 {
    Vec2::new(surface.width() as f32 * 0.5, surface.height() as f32 * 0.5)
}

fn half_extent<S: RenderSurface + ?Sized>(surface: &S) -> f32 {
    surface.width().min(surface.height()) as f32 * 0.5
}

/// Concentric rings below `min(w, h) / 2` and evenly spaced spokes reaching
/// the same radius.
pub fn draw_grid<S: RenderSurface + ?Sized>(surface: &mut S, settings: &RenderSettings) {
    let c = center_of(surface);
    let max_radius = half_extent(surface);
    let color = settings.grid_color;

    if settings.grid_ring_spacing > 0.0 {
        let mut r = settings.grid_ring_spacing;
        while r < max_radius {
            stroke_circle(surface, c.x, c.y, r, 1.0, color, BlendMode::Over);
            r += settings.grid_ring_spacing;
        }
    }

    for i in 0..settings.grid_spokes {
        let dir = Vec2::from_angle(i as f32 * TAU / settings.grid_spokes as f32);
        let end = c + dir * max_radius;
        stroke_line(surface, c.x, c.y, end.x, end.y, 1.0, color, BlendMode::Over);
    }
}

/// The decorative pattern shown while no simulation result is loaded.
///
/// Fully deterministic for a given surface size and settings; the caption is
/// drawn only when a text painter is supplied.
pub fn draw_default_pattern<S: RenderSurface + ?Sized>(
    surface: &mut S,
    settings: &RenderSettings,
    text: Option<&mut TextPainter>,
) {
    surface.fill(with_alpha(settings.idle_background, 1.0));

    let c = center_of(surface);
    let radius = (half_extent(surface) - IDLE_MARGIN).max(1.0);

    let stops = [
        (0.0, rgba8(52, 152, 219, 0.1)),
        (0.5, rgba8(155, 89, 182, 0.05)),
        (1.0, rgba8(26, 26, 46, 0.8)),
    ];
    fill_gradient_disc(surface, c.x, c.y, radius, &stops, BlendMode::Over);

    let line_color = with_alpha(hex(0x3498db), 1.0);
    for mirror in 0..IDLE_MIRRORS {
        let angle = mirror as f32 * TAU / IDLE_MIRRORS as f32;
        let tip = c + Vec2::from_angle(angle) * (radius * 0.8);
        stroke_line(surface, c.x, c.y, tip.x, tip.y, 2.0, line_color, BlendMode::Over);

        for i in 0..IDLE_ARCS_PER_MIRROR {
            let arc_radius = radius * (0.2 + i as f32 * 0.1);
            let hue = ((mirror * 120 + i * 20) % 360) as f32;
            let color = hsla(hue, 0.7, 0.6, 0.3);
            stroke_arc(
                surface,
                c.x,
                c.y,
                arc_radius,
                angle - FRAC_PI_6,
                angle + FRAC_PI_6,
                1.0,
                color,
                BlendMode::Over,
            );
        }
    }

    if let Some(painter) = text {
        let caption = with_alpha(hex(0x95a5a6), 1.0);
        painter.draw_text(
            surface,
            IDLE_CAPTION,
            c.x,
            c.y + radius + CAPTION_GAP,
            Some(CAPTION_SIZE),
            caption,
            TextAnchor::Center,
        );
    }
}
