use kscope_core::sample::clamp_unit;
use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA, every channel in [0, 1].
pub type Rgba = [f32; 4];

/// How a source color is composited onto the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Porter-Duff source-over with clamped alpha.
    #[default]
    Over,
    /// Additive ("lighter"): overlapping light sums and saturates at white.
    Additive,
}

/// An addressable 2D raster supplied by the host.
///
/// The renderer draws through this trait only; it never creates or resizes
/// the surface itself. Coordinates are pixel indices with the origin at the
/// top-left corner.
pub trait RenderSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn pixel(&self, x: u32, y: u32) -> Rgba;
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba);

    /// Overwrite every pixel with `color`.
    fn fill(&mut self, color: Rgba) {
        for y in 0..self.height() {
            for x in 0..self.width() {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Composite `rgb` at opacity `alpha` onto pixel `(x, y)`.
    ///
    /// Channels are clamped to [0, 1] first. Out-of-bounds pixels and
    /// non-positive alpha are ignored.
    fn blend(&mut self, x: i32, y: i32, rgb: [f32; 3], alpha: f32, mode: BlendMode) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        let a = clamp_unit(alpha);
        if a <= 0.0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let dst = self.pixel(x, y);
        let src = rgb.map(clamp_unit);
        self.set_pixel(x, y, composite(dst, src, a, mode));
    }

    /// Pixel content as RGBA8, row-major, clamped to the display range.
    fn to_rgba8(&self) -> Vec<u8> {
        let len = (self.width() as usize).saturating_mul(self.height() as usize);
        let mut out = Vec::with_capacity(len.saturating_mul(4));
        for y in 0..self.height() {
            for x in 0..self.width() {
                out.extend(self.pixel(x, y).map(to_u8));
            }
        }
        out
    }
}

/// Composite a straight-alpha source over a straight-alpha destination.
pub fn composite(dst: Rgba, src: [f32; 3], a: f32, mode: BlendMode) -> Rgba {
    let da = dst[3];
    match mode {
        BlendMode::Over => {
            let out_a = a + da * (1.0 - a);
            if out_a <= 0.0 {
                return [0.0; 4];
            }
            let mix = |s: f32, d: f32| (s * a + d * da * (1.0 - a)) / out_a;
            [mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), out_a]
        }
        BlendMode::Additive => {
            let out_a = (a + da).min(1.0);
            if out_a <= 0.0 {
                return [0.0; 4];
            }
            let add = |s: f32, d: f32| ((s * a + d * da).min(1.0) / out_a).min(1.0);
            [add(src[0], dst[0]), add(src[1], dst[1]), add(src[2], dst[2]), out_a]
        }
    }
}

fn to_u8(v: f32) -> u8 {
    (clamp_unit(v) * 255.0).round() as u8
}

/// Largest pixel count an in-memory surface or export may hold (8192 x 8192).
pub const MAX_SURFACE_PIXELS: usize = 1 << 26;

/// `width * height` as `usize`, rejecting products above [`MAX_SURFACE_PIXELS`].
pub fn checked_pixel_count(width: u32, height: u32) -> Result<usize, String> {
    (width as usize)
        .checked_mul(height as usize)
        .filter(|&n| n <= MAX_SURFACE_PIXELS)
        .ok_or_else(|| format!("surface size {width}x{height} exceeds {MAX_SURFACE_PIXELS} pixels"))
}

/// In-memory float RGBA surface.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbaSurface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl RgbaSurface {
    /// Create a transparent surface. Both dimensions must be non-zero and
    /// the pixel count at most [`MAX_SURFACE_PIXELS`].
    pub fn new(width: u32, height: u32) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("invalid surface size {width}x{height}"));
        }
        let len = checked_pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![[0.0; 4]; len],
        })
    }

    /// Host-side resize. Content is discarded; the renderer redraws on
    /// `on_resize`.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), String> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl RenderSurface for RgbaSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels[self.index(x, y)]
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }
}

/// Hosts that already hold an 8-bit `image` buffer can render into it directly.
impl RenderSurface for image::RgbaImage {
    fn width(&self) -> u32 {
        image::RgbaImage::width(self)
    }

    fn height(&self) -> u32 {
        image::RgbaImage::height(self)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.get_pixel(x, y).0.map(|c| c as f32 / 255.0)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        self.put_pixel(x, y, image::Rgba(color.map(to_u8)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        assert!(RgbaSurface::new(0, 10).is_err());
        assert!(RgbaSurface::new(10, 0).is_err());
    }

    #[test]
    fn test_oversized_surface_rejected() {
        assert!(RgbaSurface::new(70_000, 70_000).is_err());
        assert!(RgbaSurface::new(u32::MAX, u32::MAX).is_err());
        assert!(RgbaSurface::new(8192, 8193).is_err());
        assert_eq!(checked_pixel_count(8192, 8192), Ok(MAX_SURFACE_PIXELS));

        let mut s = RgbaSurface::new(3, 2).unwrap();
        assert!(s.resize(100_000, 100_000).is_err());
        assert_eq!((s.width(), s.height()), (3, 2));
    }

    #[test]
    fn test_over_on_opaque_background() {
        let mut s = RgbaSurface::new(2, 2).unwrap();
        s.fill([0.0, 0.0, 0.0, 1.0]);
        s.blend(0, 0, [1.0, 1.0, 1.0], 0.5, BlendMode::Over);
        let p = s.pixel(0, 0);
        assert!((p[0] - 0.5).abs() < 1e-6);
        assert_eq!(p[3], 1.0);
    }

    #[test]
    fn test_overlapping_over_brightens() {
        let mut s = RgbaSurface::new(1, 1).unwrap();
        s.fill([0.0, 0.0, 0.0, 1.0]);
        s.blend(0, 0, [1.0, 0.0, 0.0], 0.5, BlendMode::Over);
        let once = s.pixel(0, 0)[0];
        s.blend(0, 0, [1.0, 0.0, 0.0], 0.5, BlendMode::Over);
        assert!(s.pixel(0, 0)[0] > once);
    }

    #[test]
    fn test_additive_saturates() {
        let mut s = RgbaSurface::new(1, 1).unwrap();
        s.fill([0.6, 0.0, 0.0, 1.0]);
        s.blend(0, 0, [1.0, 0.0, 0.0], 1.0, BlendMode::Additive);
        assert_eq!(s.pixel(0, 0)[0], 1.0);
    }

    #[test]
    fn test_out_of_bounds_and_zero_alpha_ignored() {
        let mut s = RgbaSurface::new(2, 2).unwrap();
        s.blend(-1, 0, [1.0; 3], 1.0, BlendMode::Over);
        s.blend(2, 1, [1.0; 3], 1.0, BlendMode::Over);
        s.blend(0, 0, [1.0; 3], 0.0, BlendMode::Over);
        assert!(s.pixels().iter().all(|p| *p == [0.0; 4]));
    }

    #[test]
    fn test_channels_clamped() {
        let mut s = RgbaSurface::new(1, 1).unwrap();
        s.fill([0.0, 0.0, 0.0, 1.0]);
        s.blend(0, 0, [4.0, -1.0, f32::NAN], 1.0, BlendMode::Over);
        assert_eq!(s.pixel(0, 0), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_rgba8_export() {
        let mut s = RgbaSurface::new(1, 1).unwrap();
        s.fill([1.0, 0.5, 0.0, 1.0]);
        assert_eq!(s.to_rgba8(), vec![255, 128, 0, 255]);
    }

    #[test]
    fn test_image_buffer_surface() {
        let mut img = image::RgbaImage::new(3, 3);
        RenderSurface::fill(&mut img, [0.0, 0.0, 0.0, 1.0]);
        img.blend(1, 1, [1.0, 1.0, 1.0], 1.0, BlendMode::Over);
        assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }
}
