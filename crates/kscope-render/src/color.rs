//! Color helpers shared by the background, overlay and rasterizer.

use crate::surface::Rgba;

/// Opaque color from a `0xRRGGBB` literal.
pub fn hex(rgb: u32) -> [f32; 3] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    ]
}

/// Color from 8-bit channels and a float alpha, like CSS `rgba()`.
pub fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Rgba {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}

/// Attach an alpha to an RGB triple.
pub fn with_alpha(rgb: [f32; 3], a: f32) -> Rgba {
    [rgb[0], rgb[1], rgb[2], a]
}

/// CSS-style `hsla()`: hue in degrees, saturation/lightness/alpha in [0, 1].
pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Rgba {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, alpha]
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn lerp_rgba(a: Rgba, b: Rgba, t: f32) -> Rgba {
    [
        lerp(a[0], b[0], t),
        lerp(a[1], b[1], t),
        lerp(a[2], b[2], t),
        lerp(a[3], b[3], t),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgba, b: Rgba) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-3)
    }

    #[test]
    fn test_hex() {
        assert_eq!(hex(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(hex(0x000000), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_hsla_primaries() {
        assert!(close(hsla(0.0, 1.0, 0.5, 1.0), [1.0, 0.0, 0.0, 1.0]));
        assert!(close(hsla(120.0, 1.0, 0.5, 0.3), [0.0, 1.0, 0.0, 0.3]));
        assert!(close(hsla(240.0, 1.0, 0.5, 1.0), [0.0, 0.0, 1.0, 1.0]));
        assert!(close(hsla(360.0, 1.0, 0.5, 1.0), [1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_lerp_rgba() {
        let mid = lerp_rgba([0.0, 0.0, 0.0, 0.0], [1.0, 0.5, 0.0, 1.0], 0.5);
        assert!(close(mid, [0.5, 0.25, 0.0, 0.5]));
    }
}
