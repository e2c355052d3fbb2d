//! Statistics panel and text drawing.
//!
//! Glyphs are shaped and rasterized with `cosmic-text`; the alpha mask of each
//! glyph is blended onto the surface in the requested color.

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent};
use kscope_core::PatternStats;

use crate::color::{hex, rgba8, with_alpha};
use crate::paint::fill_rect;
use crate::settings::RenderSettings;
use crate::surface::{BlendMode, RenderSurface, Rgba};

/// Panel rectangle `(x, y, w, h)` in pixels.
pub const PANEL_RECT: (f32, f32, f32, f32) = (10.0, 10.0, 200.0, 80.0);
/// Left edge of the statistics text.
pub const TEXT_LEFT: f32 = 15.0;
/// Baselines of the four statistics lines.
pub const TEXT_BASELINES: [f32; 4] = [25.0, 40.0, 55.0, 70.0];

/// Horizontal placement of a text line relative to its anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Left,
    Center,
}

/// Shapes and rasterizes text with system fonts.
pub struct TextPainter {
    font_system: FontSystem,
    cache: SwashCache,
    font_size: f32,
}

impl TextPainter {
    /// Load system fonts. Returns `None` when the host has no font at all.
    pub fn new(font_size: f32) -> Option<Self> {
        let font_system = FontSystem::new();
        if font_system.db().faces().next().is_none() {
            log::warn!("No system fonts found, text overlay disabled");
            return None;
        }
        Some(Self {
            font_system,
            cache: SwashCache::new(),
            font_size: font_size.max(1.0),
        })
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        self.font_size = font_size.max(1.0);
    }

    /// Draw `text` with its first baseline at `baseline`, using `size` pixels
    /// (or the painter's own size when `None`).
    pub fn draw_text<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        text: &str,
        x: f32,
        baseline: f32,
        size: Option<f32>,
        color: Rgba,
        anchor: TextAnchor,
    ) {
        if text.is_empty() {
            return;
        }
        let font_size = size.unwrap_or(self.font_size).max(1.0);
        let metrics = Metrics::new(font_size, font_size * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        let attrs = Attrs::new().family(Family::SansSerif);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let width = buffer.layout_runs().map(|run| run.line_w).fold(0.0, f32::max);
        let left = match anchor {
            TextAnchor::Left => x,
            TextAnchor::Center => x - width * 0.5,
        };
        let first_line = buffer.layout_runs().next().map(|run| run.line_y).unwrap_or(0.0);
        let rgb = [color[0], color[1], color[2]];

        for run in buffer.layout_runs() {
            let line_baseline = baseline + (run.line_y - first_line);
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((left, line_baseline), 1.0);
                let Some(image) = self.cache.get_image(&mut self.font_system, physical.cache_key) else {
                    continue;
                };
                let w = image.placement.width as usize;
                let h = image.placement.height as usize;
                let bpp = match image.content {
                    SwashContent::Mask => 1,
                    SwashContent::Color => 4,
                    SwashContent::SubpixelMask => 3,
                };
                if w == 0 || h == 0 || image.data.len() < w * h * bpp {
                    continue;
                }

                let gx = physical.x + image.placement.left;
                let gy = physical.y - image.placement.top;
                for row in 0..h {
                    for col in 0..w {
                        let i = row * w + col;
                        let coverage = match image.content {
                            SwashContent::Mask => image.data[i],
                            SwashContent::Color => image.data[i * 4 + 3],
                            SwashContent::SubpixelMask => {
                                let p = &image.data[i * 3..i * 3 + 3];
                                ((p[0] as u16 + p[1] as u16 + p[2] as u16) / 3) as u8
                            }
                        };
                        if coverage == 0 {
                            continue;
                        }
                        let alpha = color[3] * coverage as f32 / 255.0;
                        surface.blend(gx + col as i32, gy + row as i32, rgb, alpha, BlendMode::Over);
                    }
                }
            }
        }
    }
}

/// Draw the translucent statistics panel and, when a painter is available,
/// its four text lines.
pub fn draw_stats_panel<S: RenderSurface + ?Sized>(
    surface: &mut S,
    stats: &PatternStats,
    text: Option<&mut TextPainter>,
    settings: &RenderSettings,
) {
    let (x, y, w, h) = PANEL_RECT;
    fill_rect(surface, x, y, w, h, rgba8(0, 0, 0, 0.7), BlendMode::Over);

    let Some(painter) = text else {
        return;
    };
    let color = with_alpha(hex(0xecf0f1), 1.0);
    let lines = stats.overlay_lines();
    for (line, baseline) in lines.iter().zip(TEXT_BASELINES) {
        painter.draw_text(surface, line, TEXT_LEFT, baseline, Some(settings.font_size), color, TextAnchor::Left);
    }
}
