use kscope_core::{SymmetryOrder, DEFAULT_MIRROR_COUNT};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use crate::color::{hex, rgba8};
use crate::rasterizer::PointStyle;
use crate::surface::{BlendMode, Rgba};

/// Visual parameters for the pattern renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Background of the flat view. Range: 0.0..1.0 each
    pub flat_background: [f32; 3],
    /// Background of the layered view. Range: 0.0..1.0 each
    pub layered_background: [f32; 3],
    /// Background of the default decorative pattern. Range: 0.0..1.0 each
    pub idle_background: [f32; 3],
    /// Grid ring and spoke color (flat view). Range: 0.0..1.0 each
    pub grid_color: Rgba,
    /// Distance between grid rings in pixels. Range: 10.0..200.0
    pub grid_ring_spacing: f32,
    /// Number of radial grid spokes. Range: 0..64
    pub grid_spokes: u32,
    /// Flat view scale is `min(width, height) / flat_scale_divisor`. Range: 1.0..16.0
    pub flat_scale_divisor: f32,
    /// Layered view scale is `min(width, height) / layered_scale_divisor`. Range: 1.0..16.0
    pub layered_scale_divisor: f32,
    /// Light point size and opacity factors.
    pub point: PointStyle,
    /// Mirror count used when the pattern does not carry one. Range: 1..24
    pub mirror_count: u32,
    /// Fixed symmetry order for every mode, overriding the mirror count.
    pub symmetry_order: Option<SymmetryOrder>,
    /// Draw the statistics panel after each pattern render.
    pub show_stats: bool,
    /// Draw text (statistics, caption). Needs system fonts.
    pub show_text: bool,
    /// Overlay font size in pixels. Range: 8.0..32.0
    pub font_size: f32,
    /// Compositing of light points.
    pub blend: BlendMode,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            flat_background: hex(0x0f0f23),
            layered_background: hex(0x0a0a1a),
            idle_background: hex(0x1a1a2e),
            grid_color: rgba8(52, 73, 94, 0.3),
            grid_ring_spacing: 50.0,
            grid_spokes: 12,
            flat_scale_divisor: 4.0,
            layered_scale_divisor: 6.0,
            point: PointStyle::default(),
            mirror_count: DEFAULT_MIRROR_COUNT,
            symmetry_order: None,
            show_stats: true,
            show_text: true,
            font_size: 12.0,
            blend: BlendMode::Over,
        }
    }
}

impl RenderSettings {
    /// Settings without any text drawing; output then does not depend on
    /// which fonts the host has installed.
    pub fn without_text() -> Self {
        Self { show_text: false, ..Self::default() }
    }
}

/// Save settings to disk as JSON.
pub fn save_settings(path: &Path, settings: &RenderSettings) -> io::Result<()> {
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)
}

/// Load settings from disk. Missing fields take their default values.
pub fn load_settings(path: &Path) -> io::Result<RenderSettings> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
