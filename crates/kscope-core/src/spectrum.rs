//! Visible-spectrum color ramp used when the simulation sends a wavelength
//! without a precomputed color.

/// Shortest wavelength (nm) mapped to a visible color.
pub const VISIBLE_MIN: f32 = 380.0;
/// Longest wavelength (nm) mapped to a visible color.
pub const VISIBLE_MAX: f32 = 750.0;

/// Convert a wavelength in nanometers to linear RGB in [0, 1].
///
/// Piecewise linear ramp through violet, blue, cyan, green, yellow and red,
/// dimmed towards the ultraviolet (< 420 nm) and infrared (> 700 nm) ends.
/// Anything outside 380..=750 nm (or NaN) is black.
pub fn wavelength_to_rgb(wavelength: f32) -> [f32; 3] {
    let w = wavelength;
    if !(VISIBLE_MIN..=VISIBLE_MAX).contains(&w) {
        return [0.0, 0.0, 0.0];
    }

    let (r, g, b) = if w < 440.0 {
        (-(w - 440.0) / (440.0 - 380.0), 0.0, 1.0)
    } else if w < 490.0 {
        (0.0, (w - 440.0) / (490.0 - 440.0), 1.0)
    } else if w < 510.0 {
        (0.0, 1.0, -(w - 510.0) / (510.0 - 490.0))
    } else if w < 580.0 {
        ((w - 510.0) / (580.0 - 510.0), 1.0, 0.0)
    } else if w < 645.0 {
        (1.0, -(w - 645.0) / (645.0 - 580.0), 0.0)
    } else {
        (1.0, 0.0, 0.0)
    };

    let factor = if w < 420.0 {
        0.3 + 0.7 * (w - 380.0) / (420.0 - 380.0)
    } else if w > 700.0 {
        0.3 + 0.7 * (750.0 - w) / (750.0 - 700.0)
    } else {
        1.0
    };

    [r * factor, g * factor, b * factor]
}
