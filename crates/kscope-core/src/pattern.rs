use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::sample::LightSample;

/// Axis-aligned extent of a pattern in normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl PatternBounds {
    /// Bounds of the finite sample positions. All zeros when there are none.
    pub fn of(points: &[LightSample]) -> Self {
        let mut finite = points.iter().filter(|p| p.x.is_finite() && p.y.is_finite());
        let Some(first) = finite.next() else {
            return Self::default();
        };
        finite.fold(
            Self { min_x: first.x, max_x: first.x, min_y: first.y, max_y: first.y },
            |b, p| Self {
                min_x: b.min_x.min(p.x),
                max_x: b.max_x.max(p.x),
                min_y: b.min_y.min(p.y),
                max_y: b.max_y.max(p.y),
            },
        )
    }
}

/// One frame of simulation output: an ordered list of samples.
///
/// Order carries no meaning for the image but is preserved so that replays
/// are deterministic. An empty pattern is valid and renders the default
/// decorative pattern.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "WirePattern")]
pub struct PatternData {
    pub points: Vec<LightSample>,
    pub bounds: PatternBounds,
    /// Mirror count of the kaleidoscope that produced this pattern, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror_count: Option<u32>,
}

impl PatternData {
    pub fn new(points: Vec<LightSample>) -> Self {
        let bounds = PatternBounds::of(&points);
        Self { points, bounds, mirror_count: None }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach the mirror count of the originating simulation.
    pub fn with_mirror_count(mut self, mirror_count: u32) -> Self {
        self.mirror_count = Some(mirror_count);
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Samples the renderer is allowed to draw, in original order.
    pub fn renderable(&self) -> impl Iterator<Item = &LightSample> {
        self.points.iter().filter(|p| p.is_renderable())
    }

    /// Parse a pattern from its JSON form (`{"points": [...], "bounds": {...}}`).
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid pattern JSON: {e}"))
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("failed to serialize pattern: {e}"))
    }
}

impl FromIterator<LightSample> for PatternData {
    fn from_iter<I: IntoIterator<Item = LightSample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Load a pattern (or any message carrying one) from a JSON file.
pub fn load_pattern(path: &Path) -> Result<PatternData, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let pattern = crate::message::decode_message(&json)?.pattern;
    log::debug!("Loaded {} samples from {}", pattern.len(), path.display());
    Ok(pattern)
}

#[derive(Deserialize)]
struct WirePattern {
    #[serde(default)]
    points: Vec<LightSample>,
    #[serde(default)]
    bounds: Option<PatternBounds>,
    #[serde(default)]
    mirror_count: Option<u32>,
}

impl From<WirePattern> for PatternData {
    fn from(wire: WirePattern) -> Self {
        let bounds = wire.bounds.unwrap_or_else(|| PatternBounds::of(&wire.points));
        Self { points: wire.points, bounds, mirror_count: wire.mirror_count }
    }
}
