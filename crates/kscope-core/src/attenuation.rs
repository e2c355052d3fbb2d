use crate::view_mode::ViewMode;

/// Dimming applied to one rotational copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopyAttenuation {
    /// Opacity applied to everything drawn for this copy.
    pub alpha: f32,
    /// Multiplier on sample intensity.
    pub intensity: f32,
    /// Multiplier on the projection scale.
    pub scale: f32,
    /// Extra depth the copy is pushed back by (drives shadow offset and size).
    pub depth: u32,
}

impl CopyAttenuation {
    pub const IDENTITY: CopyAttenuation = CopyAttenuation {
        alpha: 1.0,
        intensity: 1.0,
        scale: 1.0,
        depth: 0,
    };
}

/// Dimming applied to one depth bucket in the layered view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerAttenuation {
    /// Multiplier on sample intensity.
    pub alpha: f32,
    /// Multiplier on the projection scale.
    pub scale: f32,
}

impl LayerAttenuation {
    pub const IDENTITY: LayerAttenuation = LayerAttenuation { alpha: 1.0, scale: 1.0 };
}

/// Strategy mapping copy and depth indices to opacity/scale multipliers.
///
/// The renderer consults this for every pass so that tuning values stay out
/// of the drawing code and tests can swap in their own policy.
pub trait AttenuationPolicy: Send + Sync {
    /// Attenuation of rotational copy `copy_index` under `mode`.
    fn copy(&self, mode: ViewMode, copy_index: u32) -> CopyAttenuation;

    /// Attenuation of depth bucket `depth` (layered view only).
    fn layer(&self, depth: usize) -> LayerAttenuation;

    /// Policy name for logging.
    fn name(&self) -> &str;
}

/// The hand-tuned values of the classic kaleidoscope view.
///
/// Flat: reflected copies at 0.7 opacity and 0.8 intensity.
/// Layered: copy `k` sits at depth `k / 2`; opacity `0.5 - 0.1d`, intensity
/// `0.8 - 0.2d`, scale `1 - 0.1d`. Buckets fade by `0.2` and shrink by `0.1`
/// per level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicAttenuation;

impl ClassicAttenuation {
    pub const FLAT_COPY_ALPHA: f32 = 0.7;
    pub const FLAT_COPY_INTENSITY: f32 = 0.8;
}

impl AttenuationPolicy for ClassicAttenuation {
    fn copy(&self, mode: ViewMode, copy_index: u32) -> CopyAttenuation {
        if copy_index == 0 {
            return CopyAttenuation::IDENTITY;
        }
        match mode {
            ViewMode::Flat => CopyAttenuation {
                alpha: Self::FLAT_COPY_ALPHA,
                intensity: Self::FLAT_COPY_INTENSITY,
                scale: 1.0,
                depth: 0,
            },
            ViewMode::Layered => {
                let depth = copy_index / 2;
                let d = depth as f32;
                CopyAttenuation {
                    alpha: (0.5 - d * 0.1).max(0.0),
                    intensity: (0.8 - d * 0.2).max(0.0),
                    scale: (1.0 - d * 0.1).max(0.0),
                    depth,
                }
            }
        }
    }

    fn layer(&self, depth: usize) -> LayerAttenuation {
        let d = depth as f32;
        LayerAttenuation {
            alpha: (1.0 - d * 0.2).max(0.0),
            scale: (1.0 - d * 0.1).max(0.0),
        }
    }

    fn name(&self) -> &str {
        "classic"
    }
}
