//! Decoding of the JSON messages the simulation side produces.
//!
//! A pattern can arrive bare, wrapped in a realtime push notification
//! (`{"pattern_data": ..., "performance": ...}`) or inside a one-shot
//! simulation response (`{"success": true, "simulation_result": {...}}`).
//! All three decode to the same [`PatternMessage`], so the renderer never
//! needs to know how a pattern was delivered.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pattern::PatternData;

/// Timing and volume figures reported alongside a simulation result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceMetrics {
    pub ray_count: u64,
    /// Seconds.
    pub computation_time: f64,
    pub initial_rays: u64,
    pub avg_bounces: f64,
    pub total_intensity: f64,
}

/// A decoded pattern plus whatever metadata travelled with it.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMessage {
    pub pattern: PatternData,
    pub performance: Option<PerformanceMetrics>,
}

#[derive(Deserialize)]
struct Envelope {
    pattern_data: PatternData,
    #[serde(default)]
    performance: Option<PerformanceMetrics>,
}

/// Decode any supported message shape into a pattern.
///
/// Error responses (`{"success": false, "error": "..."}` or a bare
/// `{"error": "..."}`) are returned as `Err` carrying the remote message.
pub fn decode_message(json: &str) -> Result<PatternMessage, String> {
    let value: Value = serde_json::from_str(json).map_err(|e| format!("invalid message JSON: {e}"))?;
    decode_value(value)
}

fn decode_value(value: Value) -> Result<PatternMessage, String> {
    let Value::Object(map) = &value else {
        return Err("message must be a JSON object".to_string());
    };

    if map.get("success").and_then(Value::as_bool) == Some(false) || map.contains_key("error") {
        let reason = map
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        log::warn!("Simulation reported failure: {reason}");
        return Err(format!("simulation failed: {reason}"));
    }

    if let Some(result) = map.get("simulation_result") {
        return decode_value(result.clone());
    }

    if map.contains_key("pattern_data") {
        let envelope: Envelope =
            serde_json::from_value(value).map_err(|e| format!("invalid pattern message: {e}"))?;
        return Ok(PatternMessage {
            pattern: envelope.pattern_data,
            performance: envelope.performance,
        });
    }

    let pattern: PatternData =
        serde_json::from_value(value).map_err(|e| format!("invalid pattern: {e}"))?;
    Ok(PatternMessage { pattern, performance: None })
}
