use serde::{Deserialize, Serialize};

use crate::spectrum::wavelength_to_rgb;

/// One illuminated point handed over by the ray simulation.
///
/// `x`/`y` are normalized planar coordinates with the optical center at the
/// origin; the unit circle is roughly the visible field. `intensity` is
/// conventionally in [0, 1] but values above 1 are tolerated. `rgb` is linear
/// color in [0, 1], precomputed upstream. `wavelength` (nm) is only used for
/// statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireSample")]
pub struct LightSample {
    pub x: f32,
    pub y: f32,
    pub intensity: f32,
    pub rgb: [f32; 3],
    pub wavelength: f32,
}

const EPSILON: f32 = 0.0001;

/// Wavelength assumed when a wire sample omits it (green, middle of the band).
pub const DEFAULT_WAVELENGTH: f32 = 550.0;

impl Default for LightSample {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, [1.0, 1.0, 1.0], DEFAULT_WAVELENGTH)
    }
}

impl LightSample {
    pub fn new(x: f32, y: f32, intensity: f32, rgb: [f32; 3], wavelength: f32) -> Self {
        Self { x, y, intensity, rgb, wavelength }
    }

    /// White sample at a position.
    pub fn at(x: f32, y: f32, intensity: f32) -> Self {
        Self { x, y, intensity, ..Self::default() }
    }

    /// Sample whose color is derived from its wavelength.
    pub fn spectral(x: f32, y: f32, intensity: f32, wavelength: f32) -> Self {
        Self::new(x, y, intensity, wavelength_to_rgb(wavelength), wavelength)
    }

    /// Copy with a different color (non-mutating).
    pub fn with_rgb(&self, rgb: [f32; 3]) -> Self {
        Self { rgb, ..*self }
    }

    /// Whether the renderer may draw this sample.
    ///
    /// Non-finite coordinates and negative or non-finite intensities are
    /// rejected; colors are clamped later and never disqualify a sample.
    pub fn is_renderable(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.intensity.is_finite()
            && self.intensity >= 0.0
    }

    /// Color with every channel clamped to [0, 1]. NaN maps to 0.
    pub fn clamped_rgb(&self) -> [f32; 3] {
        self.rgb.map(clamp_unit)
    }

    /// Approximate equality using epsilon comparison
    pub fn approx_eq(&self, other: &LightSample) -> bool {
        (self.x - other.x).abs() < EPSILON
            && (self.y - other.y).abs() < EPSILON
            && (self.intensity - other.intensity).abs() < EPSILON
            && (self.wavelength - other.wavelength).abs() < EPSILON
            && self
                .rgb
                .iter()
                .zip(other.rgb.iter())
                .all(|(a, b)| (a - b).abs() < EPSILON)
    }
}

/// Clamp a channel to [0, 1], mapping NaN to 0.
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Sample as the simulation serializes it. Color and wavelength are optional
/// on the wire; a missing color is rebuilt from the wavelength.
#[derive(Deserialize)]
struct WireSample {
    x: f32,
    y: f32,
    #[serde(default = "default_intensity")]
    intensity: f32,
    #[serde(default)]
    rgb: Option<[f32; 3]>,
    #[serde(default = "default_wavelength")]
    wavelength: f32,
}

fn default_intensity() -> f32 {
    1.0
}

fn default_wavelength() -> f32 {
    DEFAULT_WAVELENGTH
}

impl From<WireSample> for LightSample {
    fn from(wire: WireSample) -> Self {
        let rgb = wire.rgb.unwrap_or_else(|| wavelength_to_rgb(wire.wavelength));
        Self::new(wire.x, wire.y, wire.intensity, rgb, wire.wavelength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_white_unit_intensity() {
        let s = LightSample::default();
        assert_eq!(s.intensity, 1.0);
        assert_eq!(s.rgb, [1.0, 1.0, 1.0]);
        assert_eq!(s.wavelength, DEFAULT_WAVELENGTH);
    }

    #[test]
    fn test_renderable_rejects_bad_samples() {
        assert!(LightSample::at(0.2, -0.4, 0.5).is_renderable());
        assert!(LightSample::at(0.0, 0.0, 0.0).is_renderable());
        assert!(LightSample::at(0.0, 0.0, 3.5).is_renderable());
        assert!(!LightSample::at(f32::NAN, 0.0, 0.5).is_renderable());
        assert!(!LightSample::at(0.0, f32::INFINITY, 0.5).is_renderable());
        assert!(!LightSample::at(0.0, 0.0, -0.1).is_renderable());
        assert!(!LightSample::at(0.0, 0.0, f32::NAN).is_renderable());
    }

    #[test]
    fn test_clamped_rgb() {
        let s = LightSample::default().with_rgb([1.5, -0.2, f32::NAN]);
        assert_eq!(s.clamped_rgb(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_wire_sample_without_rgb_uses_wavelength() {
        let s: LightSample = serde_json::from_str(r#"{"x":0.1,"y":0.2,"intensity":0.4,"wavelength":700}"#).unwrap();
        assert!(s.approx_eq(&LightSample::spectral(0.1, 0.2, 0.4, 700.0)));
        assert_eq!(s.rgb[0], 1.0);
    }

    #[test]
    fn test_wire_sample_defaults() {
        let s: LightSample = serde_json::from_str(r#"{"x":0.0,"y":0.0,"rgb":[0.1,0.2,0.3]}"#).unwrap();
        assert_eq!(s.intensity, 1.0);
        assert_eq!(s.wavelength, DEFAULT_WAVELENGTH);
        assert_eq!(s.rgb, [0.1, 0.2, 0.3]);
    }
}
