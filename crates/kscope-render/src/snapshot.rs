use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::surface::{checked_pixel_count, RenderSurface};

/// Largest resolution multiplier accepted for exports.
pub const MAX_EXPORT_SCALE: u32 = 4;

/// Container format of an exported image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    /// Opaque; alpha is dropped.
    Jpeg,
}

impl ExportFormat {
    /// Parse `"png"`, `"jpg"` or `"jpeg"` (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            _ => None,
        }
    }

    /// Format implied by a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|ext| ext.to_str()).and_then(Self::from_name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
        }
    }
}

/// Format and resolution multiplier of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Output is `scale` times the surface size. Range: 1..=4
    pub scale: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { format: ExportFormat::Png, scale: 1 }
    }
}

impl ExportOptions {
    pub fn new(format: ExportFormat, scale: u32) -> Result<Self, String> {
        if !(1..=MAX_EXPORT_SCALE).contains(&scale) {
            return Err(format!("export scale must be 1..={MAX_EXPORT_SCALE}, got {scale}"));
        }
        Ok(Self { format, scale })
    }
}

/// A single captured frame of pixel data (RGBA8, row-major).
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedFrame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CapturedFrame {
    /// Read back the current content of a surface.
    pub fn capture<S: RenderSurface + ?Sized>(surface: &S) -> Self {
        Self {
            pixels: surface.to_rgba8(),
            width: surface.width(),
            height: surface.height(),
        }
    }

    fn to_image(&self) -> Result<RgbaImage, String> {
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or_else(|| {
            format!(
                "frame buffer of {} bytes does not match {}x{}",
                self.pixels.len(),
                self.width,
                self.height
            )
        })
    }

    /// Upscale by an integer factor with bilinear filtering.
    pub fn scaled(&self, factor: u32) -> Result<CapturedFrame, String> {
        if !(1..=MAX_EXPORT_SCALE).contains(&factor) {
            return Err(format!("export scale must be 1..={MAX_EXPORT_SCALE}, got {factor}"));
        }
        let too_large = || format!("{}x{} frame scaled by {factor} is too large", self.width, self.height);
        let width = self.width.checked_mul(factor).ok_or_else(too_large)?;
        let height = self.height.checked_mul(factor).ok_or_else(too_large)?;
        checked_pixel_count(width, height)?;

        let img = self.to_image()?;
        let resized = imageops::resize(&img, width, height, FilterType::Triangle);
        Ok(Self { pixels: resized.into_raw(), width, height })
    }

    /// Encode with the given format and resolution multiplier.
    pub fn encode(&self, options: &ExportOptions) -> Result<Vec<u8>, String> {
        let scaled;
        let frame = if options.scale == 1 {
            self
        } else {
            scaled = self.scaled(options.scale)?;
            &scaled
        };
        let img = frame.to_image()?;
        let mut out = Cursor::new(Vec::new());
        let written = match options.format {
            ExportFormat::Png => img.write_to(&mut out, ImageFormat::Png),
            ExportFormat::Jpeg => DynamicImage::ImageRgba8(img).to_rgb8().write_to(&mut out, ImageFormat::Jpeg),
        };
        written.map_err(|e| format!("failed to encode {}: {e}", options.format.name()))?;
        Ok(out.into_inner())
    }

    /// Encode as PNG bytes at the captured size.
    pub fn encode_png(&self) -> Result<Vec<u8>, String> {
        self.encode(&ExportOptions::default())
    }

    /// Encode and write to `path`.
    pub fn save(&self, path: &Path, options: &ExportOptions) -> Result<(), String> {
        let bytes = self.encode(options)?;
        std::fs::write(path, bytes).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
        log::info!(
            "Saved {} snapshot {}x{} (x{}) to {}",
            options.format.name(),
            self.width,
            self.height,
            options.scale,
            path.display()
        );
        Ok(())
    }

    pub fn checksum(&self) -> u64 {
        fnv1a(&self.pixels)
    }
}

/// FNV-1a hash of the surface's RGBA8 content. Two rasters with equal
/// checksums are, for test purposes, identical.
pub fn surface_checksum<S: RenderSurface + ?Sized>(surface: &S) -> u64 {
    fnv1a(&surface.to_rgba8())
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET, |hash, &b| (hash ^ b as u64).wrapping_mul(PRIME))
}
