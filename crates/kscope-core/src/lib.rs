pub mod sample;
pub mod pattern;
pub mod view_mode;
pub mod depth;
pub mod attenuation;
pub mod stats;
pub mod spectrum;
pub mod message;

pub use sample::LightSample;
pub use pattern::{load_pattern, PatternBounds, PatternData};
pub use view_mode::{SymmetryOrder, ViewMode, DEFAULT_MIRROR_COUNT};
pub use depth::{DepthStratifier, DEPTH_LAYERS};
pub use attenuation::{AttenuationPolicy, ClassicAttenuation, CopyAttenuation, LayerAttenuation};
pub use stats::PatternStats;
pub use spectrum::wavelength_to_rgb;
pub use message::{decode_message, PatternMessage, PerformanceMetrics};
