use glam::Vec2;
use kscope_core::{CopyAttenuation, LayerAttenuation, LightSample, SymmetryOrder};

/// Attenuation in effect for one pass: a rotational copy inside a depth bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassAttenuation {
    pub copy: CopyAttenuation,
    pub layer: LayerAttenuation,
    /// Depth bucket index, 0 in the flat view.
    pub layer_index: usize,
}

impl PassAttenuation {
    /// Pass with no depth bucket (flat view).
    pub fn flat(copy: CopyAttenuation) -> Self {
        Self { copy, layer: LayerAttenuation::IDENTITY, layer_index: 0 }
    }

    pub fn layered(copy: CopyAttenuation, layer: LayerAttenuation, layer_index: usize) -> Self {
        Self { copy, layer, layer_index }
    }
}

/// Screen-space placement of one symmetric copy of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedSample {
    pub x: f32,
    pub y: f32,
    pub intensity: f32,
    pub alpha: f32,
    /// Combined depth (bucket + copy) used for the shadow cue.
    pub depth: u32,
    /// Rotation applied, in radians.
    pub angle: f32,
}

/// Maps normalized sample positions to rotated screen positions.
///
/// Copy `k` of `N` is rotated by `k * 2π / N` about the pattern center,
/// scaled by `scale * layer.scale * copy.scale` and translated to `center`.
/// This is a pure transform; there is no clamping and no failure mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetryProjector {
    order: SymmetryOrder,
    center: Vec2,
    scale: f32,
}

impl SymmetryProjector {
    pub fn new(order: SymmetryOrder, center: Vec2, scale: f32) -> Self {
        Self { order, center, scale }
    }

    /// Projector centered on a `width` x `height` surface with aspect-fit
    /// scale `min(width, height) / divisor`.
    pub fn for_surface(order: SymmetryOrder, width: u32, height: u32, divisor: f32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self::new(order, Vec2::new(w * 0.5, h * 0.5), w.min(h) / divisor.max(f32::EPSILON))
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn project(&self, sample: &LightSample, copy_index: u32, pass: &PassAttenuation) -> ProjectedSample {
        let angle = self.order.angle(copy_index);
        let rotated = Vec2::from_angle(angle).rotate(Vec2::new(sample.x, sample.y));
        let scale = self.scale * pass.layer.scale * pass.copy.scale;
        let pos = self.center + rotated * scale;

        ProjectedSample {
            x: pos.x,
            y: pos.y,
            intensity: sample.intensity * pass.layer.alpha * pass.copy.intensity,
            alpha: pass.copy.alpha,
            depth: pass.layer_index as u32 + pass.copy.depth,
            angle,
        }
    }
}
