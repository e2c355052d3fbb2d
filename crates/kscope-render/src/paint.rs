//! Anti-aliased fill and stroke primitives on a [`RenderSurface`].
//!
//! Coverage is computed per pixel from the distance between the pixel center
//! and the shape edge, giving a one-pixel soft edge.

use std::f32::consts::TAU;

use crate::color::lerp_rgba;
use crate::surface::{BlendMode, RenderSurface, Rgba};

/// Pixel range touched by a shape spanning `[lo, hi]`, clipped to `[0, limit)`.
fn span(lo: f32, hi: f32, limit: u32) -> std::ops::Range<i32> {
    let start = lo.floor().max(0.0) as i32;
    let end = (hi.ceil() + 1.0).min(limit as f32).max(0.0) as i32;
    start..end
}

fn edge_coverage(inside_distance: f32) -> f32 {
    (inside_distance + 0.5).clamp(0.0, 1.0)
}

/// Fill an axis-aligned rectangle (pixel centers inside the rect).
pub fn fill_rect<S: RenderSurface + ?Sized>(
    surface: &mut S,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    color: Rgba,
    mode: BlendMode,
) {
    for py in span(y, y + h, surface.height()) {
        for px in span(x, x + w, surface.width()) {
            let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
            if cx >= x && cx < x + w && cy >= y && cy < y + h {
                surface.blend(px, py, [color[0], color[1], color[2]], color[3], mode);
            }
        }
    }
}

/// Fill a disc whose opacity follows `profile(t)`, where `t` is the
/// normalized distance from the center (0 at the center, 1 at the rim).
pub fn fill_radial<S, F>(
    surface: &mut S,
    cx: f32,
    cy: f32,
    radius: f32,
    rgb: [f32; 3],
    profile: F,
    mode: BlendMode,
) where
    S: RenderSurface + ?Sized,
    F: Fn(f32) -> f32,
{
    if !(radius > 0.0) || !cx.is_finite() || !cy.is_finite() {
        return;
    }
    for py in span(cy - radius, cy + radius, surface.height()) {
        for px in span(cx - radius, cx + radius, surface.width()) {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            let coverage = edge_coverage(radius - d);
            if coverage <= 0.0 {
                continue;
            }
            let t = (d / radius).min(1.0);
            surface.blend(px, py, rgb, profile(t) * coverage, mode);
        }
    }
}

/// Fill a solid disc.
pub fn fill_disc<S: RenderSurface + ?Sized>(
    surface: &mut S,
    cx: f32,
    cy: f32,
    radius: f32,
    rgb: [f32; 3],
    alpha: f32,
    mode: BlendMode,
) {
    fill_radial(surface, cx, cy, radius, rgb, |_| alpha, mode);
}

/// Fill a disc with a radial gradient. `stops` are `(offset, color)` pairs in
/// ascending offset order, offsets in [0, 1].
pub fn fill_gradient_disc<S: RenderSurface + ?Sized>(
    surface: &mut S,
    cx: f32,
    cy: f32,
    radius: f32,
    stops: &[(f32, Rgba)],
    mode: BlendMode,
) {
    if stops.is_empty() || !(radius > 0.0) {
        return;
    }
    for py in span(cy - radius, cy + radius, surface.height()) {
        for px in span(cx - radius, cx + radius, surface.width()) {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            let coverage = edge_coverage(radius - d);
            if coverage <= 0.0 {
                continue;
            }
            let c = gradient_at(stops, (d / radius).min(1.0));
            surface.blend(px, py, [c[0], c[1], c[2]], c[3] * coverage, mode);
        }
    }
}

fn gradient_at(stops: &[(f32, Rgba)], t: f32) -> Rgba {
    let first = stops[0];
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.0 {
            let width = b.0 - a.0;
            let local = if width > 0.0 { (t - a.0) / width } else { 1.0 };
            return lerp_rgba(a.1, b.1, local);
        }
    }
    stops[stops.len() - 1].1
}

/// Stroke a straight segment of the given width.
pub fn stroke_line<S: RenderSurface + ?Sized>(
    surface: &mut S,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    width: f32,
    color: Rgba,
    mode: BlendMode,
) {
    let half = width * 0.5;
    let (dx, dy) = (x1 - x0, y1 - y0);
    let len_sq = dx * dx + dy * dy;
    let rgb = [color[0], color[1], color[2]];

    for py in span(y0.min(y1) - half, y0.max(y1) + half, surface.height()) {
        for px in span(x0.min(x1) - half, x0.max(x1) + half, surface.width()) {
            let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
            let t = if len_sq > 0.0 {
                (((cx - x0) * dx + (cy - y0) * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (nx, ny) = (x0 + t * dx - cx, y0 + t * dy - cy);
            let d = (nx * nx + ny * ny).sqrt();
            let coverage = edge_coverage(half - d);
            if coverage > 0.0 {
                surface.blend(px, py, rgb, color[3] * coverage, mode);
            }
        }
    }
}

/// Stroke a circular arc from `start` to `end` (radians, clockwise in screen
/// space since y points down).
pub fn stroke_arc<S: RenderSurface + ?Sized>(
    surface: &mut S,
    cx: f32,
    cy: f32,
    radius: f32,
    start: f32,
    end: f32,
    width: f32,
    color: Rgba,
    mode: BlendMode,
) {
    if !(radius > 0.0) {
        return;
    }
    let half = width * 0.5;
    let sweep = end - start;
    let full = sweep.abs() >= TAU;
    let rgb = [color[0], color[1], color[2]];
    let reach = radius + half;

    for py in span(cy - reach, cy + reach, surface.height()) {
        for px in span(cx - reach, cx + reach, surface.width()) {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            let coverage = edge_coverage(half - (d - radius).abs());
            if coverage <= 0.0 {
                continue;
            }
            if !full {
                let rel = (dy.atan2(dx) - start).rem_euclid(TAU);
                if rel > sweep {
                    continue;
                }
            }
            surface.blend(px, py, rgb, color[3] * coverage, mode);
        }
    }
}

/// Stroke a full circle.
pub fn stroke_circle<S: RenderSurface + ?Sized>(
    surface: &mut S,
    cx: f32,
    cy: f32,
    radius: f32,
    width: f32,
    color: Rgba,
    mode: BlendMode,
) {
    stroke_arc(surface, cx, cy, radius, 0.0, TAU, width, color, mode);
}
