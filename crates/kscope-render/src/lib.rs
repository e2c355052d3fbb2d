pub mod color;
pub mod surface;
pub mod paint;
pub mod projector;
pub mod rasterizer;
pub mod background;
pub mod overlay;
pub mod settings;
pub mod snapshot;
pub mod animation;
pub mod clock;
pub mod feed;
pub mod renderer;

pub use surface::{BlendMode, RenderSurface, Rgba, RgbaSurface, MAX_SURFACE_PIXELS};
pub use projector::{PassAttenuation, ProjectedSample, SymmetryProjector};
pub use rasterizer::{LightPointRasterizer, PointStyle};
pub use overlay::{TextAnchor, TextPainter};
pub use settings::{load_settings, save_settings, RenderSettings};
pub use snapshot::{surface_checksum, CapturedFrame, ExportFormat, ExportOptions, MAX_EXPORT_SCALE};
pub use animation::AnimationLoop;
pub use clock::{FrameClock, FrameTick};
pub use feed::{pattern_channel, FeedState, PatternFeed, PatternSink};
pub use renderer::{PassInfo, PatternRenderer, RenderOutcome, RenderReport};
