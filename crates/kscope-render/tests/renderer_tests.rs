use std::f32::consts::TAU;

use kscope_core::{
    AttenuationPolicy, CopyAttenuation, LayerAttenuation, LightSample, PatternData, SymmetryOrder,
    ViewMode,
};
use kscope_render::{
    pattern_channel, surface_checksum, ExportFormat, ExportOptions, PatternRenderer, RenderOutcome,
    RenderSettings, RenderSurface, RgbaSurface,
};

// ── Helpers ──────────────────────────────────────────────────────

/// Text off (host fonts vary) and no stats panel over the pattern center.
fn quiet_settings() -> RenderSettings {
    RenderSettings { show_stats: false, ..RenderSettings::without_text() }
}

fn renderer_with(w: u32, h: u32, settings: RenderSettings) -> PatternRenderer<RgbaSurface> {
    PatternRenderer::new(RgbaSurface::new(w, h).unwrap(), settings).unwrap()
}

fn renderer(w: u32, h: u32) -> PatternRenderer<RgbaSurface> {
    renderer_with(w, h, quiet_settings())
}

fn ring_pattern(n: usize) -> PatternData {
    (0..n)
        .map(|i| {
            let a = i as f32 * TAU / n as f32;
            LightSample::spectral(0.6 * a.cos(), 0.6 * a.sin(), 0.3 + 0.7 * (i % 3) as f32 / 2.0, 450.0 + i as f32 * 10.0)
        })
        .collect()
}

fn distinct_pixels(surface: &RgbaSurface) -> usize {
    let mut seen: Vec<[u8; 4]> = surface
        .to_rgba8()
        .chunks_exact(4)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

/// Only the unrotated copy is visible.
struct PrimaryOnly;

impl AttenuationPolicy for PrimaryOnly {
    fn copy(&self, _mode: ViewMode, copy_index: u32) -> CopyAttenuation {
        if copy_index == 0 {
            CopyAttenuation::IDENTITY
        } else {
            CopyAttenuation { alpha: 0.0, ..CopyAttenuation::IDENTITY }
        }
    }

    fn layer(&self, _depth: usize) -> LayerAttenuation {
        LayerAttenuation::IDENTITY
    }

    fn name(&self) -> &str {
        "primary-only"
    }
}

// ── 1. Passes and symmetry ───────────────────────────────────────

#[test]
fn flat_render_runs_one_pass_per_copy() {
    let mut r = renderer(96, 96);
    let report = r.render(&ring_pattern(6), ViewMode::Flat);

    assert_eq!(report.outcome, RenderOutcome::Pattern);
    assert_eq!(report.symmetry.get(), 3);
    assert_eq!(report.passes.len(), 3);
    for (k, pass) in report.passes.iter().enumerate() {
        assert_eq!(pass.copy_index, k as u32);
        assert!((pass.angle - k as f32 * TAU / 3.0).abs() < 1e-5);
        assert_eq!(pass.layer, None);
    }
    assert_eq!(report.draw_calls, 6 * 3);
}

#[test]
fn pattern_mirror_count_drives_symmetry() {
    let mut r = renderer(64, 64);
    let pattern = ring_pattern(4).with_mirror_count(5);
    assert_eq!(r.render(&pattern, ViewMode::Flat).symmetry.get(), 5);
    assert_eq!(r.render(&pattern, ViewMode::Layered).symmetry.get(), 10);
    assert_eq!(r.symmetry_for(ViewMode::Layered).get(), 10);
}

#[test]
fn settings_override_wins_over_pattern() {
    let settings = RenderSettings { symmetry_order: Some(SymmetryOrder::new(7).unwrap()), ..quiet_settings() };
    let mut r = renderer_with(64, 64, settings);
    let report = r.render(&ring_pattern(4).with_mirror_count(5), ViewMode::Layered);
    assert_eq!(report.symmetry.get(), 7);
}

// ── 2. Determinism ───────────────────────────────────────────────

#[test]
fn same_input_renders_bit_identical() {
    let pattern = ring_pattern(12);
    for mode in ViewMode::ALL {
        let mut r = renderer(80, 60);
        r.render(&pattern, mode);
        let first = r.surface().clone();
        r.render(&pattern, mode);
        assert_eq!(&first, r.surface(), "{mode} render is not repeatable");

        let mut other = renderer(80, 60);
        other.render(&pattern, mode);
        assert_eq!(surface_checksum(&first), surface_checksum(other.surface()));
    }
}

#[test]
fn caller_pattern_is_kept_unchanged() {
    let pattern = ring_pattern(5);
    let before = pattern.clone();
    let mut r = renderer(64, 64);
    r.render(&pattern, ViewMode::Layered);
    assert_eq!(pattern, before);
    assert_eq!(r.current_pattern(), Some(&before));
}

// ── 3. Default pattern ───────────────────────────────────────────

#[test]
fn empty_pattern_renders_idle_pattern() {
    let mut r = renderer(120, 90);
    let idle = surface_checksum(r.surface());
    assert!(distinct_pixels(r.surface()) > 1, "idle pattern must not be blank");

    r.render(&ring_pattern(8), ViewMode::Flat);
    assert_ne!(surface_checksum(r.surface()), idle);

    let report = r.render(&PatternData::empty(), ViewMode::Flat);
    assert_eq!(report.outcome, RenderOutcome::DefaultPattern);
    assert!(report.passes.is_empty());
    assert_eq!(surface_checksum(r.surface()), idle);
    assert!(r.current_pattern().is_none());
}

#[test]
fn clear_returns_to_idle() {
    let mut r = renderer(64, 64);
    let idle = surface_checksum(r.surface());
    r.render(&ring_pattern(3), ViewMode::Layered);
    let report = r.clear();
    assert_eq!(report.outcome, RenderOutcome::DefaultPattern);
    assert_eq!(surface_checksum(r.surface()), idle);
}

#[test]
fn zero_sized_surface_is_rejected() {
    struct Empty;
    impl RenderSurface for Empty {
        fn width(&self) -> u32 {
            0
        }
        fn height(&self) -> u32 {
            10
        }
        fn pixel(&self, _x: u32, _y: u32) -> [f32; 4] {
            [0.0; 4]
        }
        fn set_pixel(&mut self, _x: u32, _y: u32, _color: [f32; 4]) {}
    }
    assert!(PatternRenderer::new(Empty, quiet_settings()).is_err());
}

// ── 4. Animation ─────────────────────────────────────────────────

#[test]
fn animation_has_a_single_loop() {
    let mut r = renderer(48, 48);
    r.render(&ring_pattern(3), ViewMode::Flat);
    let base = r.render_count();

    assert!(!r.is_animating());
    assert!(r.start_animation());
    assert!(r.is_animating());
    assert_eq!(r.render_count(), base + 1, "start renders immediately");
    assert!(!r.start_animation());
    assert_eq!(r.render_count(), base + 1);

    assert!(r.on_frame_tick());
    assert_eq!(r.render_count(), base + 2);

    assert!(r.stop_animation());
    assert!(!r.is_animating());
    assert!(!r.stop_animation());
    assert!(!r.on_frame_tick());
    assert_eq!(r.render_count(), base + 2);
}

// ── 5. View mode and resize ──────────────────────────────────────

#[test]
fn view_mode_switch_rerenders_once() {
    let mut r = renderer(80, 80);
    r.render(&ring_pattern(6), ViewMode::Flat);
    let flat = surface_checksum(r.surface());
    let count = r.render_count();

    let report = r.set_view_mode(ViewMode::Layered).unwrap();
    assert_eq!(r.render_count(), count + 1);
    assert_eq!(report.symmetry.get(), 6);
    assert_eq!(report.mode, ViewMode::Layered);
    assert_eq!(r.view_mode(), ViewMode::Layered);
    assert_ne!(surface_checksum(r.surface()), flat);
}

#[test]
fn view_mode_switch_while_idle_only_stores_mode() {
    let mut r = renderer(48, 48);
    let count = r.render_count();
    assert!(r.set_view_mode(ViewMode::Layered).is_none());
    assert_eq!(r.render_count(), count);
    assert_eq!(r.view_mode(), ViewMode::Layered);
}

#[test]
fn resize_redraws_at_new_center() {
    let mut r = renderer(40, 40);
    let center = PatternData::new(vec![LightSample::at(0.0, 0.0, 1.0)]);
    r.render(&center, ViewMode::Flat);

    r.surface_mut().resize(100, 50).unwrap();
    let report = r.on_resize();
    assert_eq!(report.outcome, RenderOutcome::Pattern);
    assert_eq!((r.surface().width(), r.surface().height()), (100, 50));

    let background = r.surface().pixel(0, 0);
    assert_ne!(r.surface().pixel(50, 25), background, "point must follow the new center");
}

#[test]
fn new_settings_redraw_loaded_pattern() {
    let mut r = renderer(80, 80);
    r.render(&ring_pattern(6), ViewMode::Flat);
    let before = surface_checksum(r.surface());
    let count = r.render_count();

    let settings = RenderSettings { symmetry_order: Some(SymmetryOrder::new(5).unwrap()), ..quiet_settings() };
    let report = r.set_settings(settings.clone());
    assert_eq!(r.render_count(), count + 1);
    assert_eq!(report.symmetry.get(), 5);
    assert_eq!(r.settings(), &settings);
    let after = surface_checksum(r.surface());
    assert_ne!(after, before);

    let surface = r.into_surface();
    assert_eq!((surface.width(), surface.height()), (80, 80));
    assert_eq!(surface_checksum(&surface), after);
}

// ── 6. Malformed input ───────────────────────────────────────────

#[test]
fn malformed_samples_are_skipped() {
    let mut r = renderer(64, 64);
    let pattern = PatternData::new(vec![
        LightSample::at(0.1, 0.1, 0.5),
        LightSample::at(f32::NAN, 0.0, 0.5),
        LightSample::at(0.2, 0.0, -1.0),
    ]);
    let report = r.render(&pattern, ViewMode::Flat);
    assert_eq!(report.drawn, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.draw_calls, 3);
    assert_eq!(report.stats.map(|s| s.point_count), Some(1));
}

// ── 7. Attenuation ───────────────────────────────────────────────

#[test]
fn custom_attenuation_hides_reflected_copies() {
    let settings = RenderSettings {
        symmetry_order: Some(SymmetryOrder::new(4).unwrap()),
        grid_spokes: 0,
        grid_ring_spacing: 0.0,
        ..quiet_settings()
    };
    let pattern = PatternData::new(vec![LightSample::at(0.9, 0.0, 1.0)]);

    // Scale 50 on a 200x200 surface: primary at (145, 100), copy 1 at (100, 145).
    let mut classic = renderer_with(200, 200, settings.clone());
    classic.render(&pattern, ViewMode::Flat);
    let background = classic.surface().pixel(0, 0);
    assert_ne!(classic.surface().pixel(100, 145), background);

    let mut primary = renderer_with(200, 200, settings).with_attenuation(Box::new(PrimaryOnly));
    let report = primary.render(&pattern, ViewMode::Flat);
    assert_eq!(report.passes.len(), 4);
    assert_eq!(primary.surface().pixel(100, 145), background);
    assert_ne!(primary.surface().pixel(145, 100), background);
}

// ── 8. Export and feed ───────────────────────────────────────────

#[test]
fn snapshot_is_a_decodable_png() {
    let mut r = renderer(32, 24);
    r.render(&ring_pattern(4), ViewMode::Layered);
    let png = r.export_snapshot().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (32, 24));
    assert_eq!(decoded.into_raw(), r.surface().to_rgba8());
}

#[test]
fn jpeg_snapshot_at_double_resolution() {
    let mut r = renderer(32, 24);
    r.render(&ring_pattern(4), ViewMode::Flat);
    let options = ExportOptions::new(ExportFormat::Jpeg, 2).unwrap();
    let jpeg = r.export_snapshot_with(&options).unwrap();

    let decoded = image::load_from_memory_with_format(&jpeg, image::ImageFormat::Jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
}

#[test]
fn stats_panel_is_drawn_without_fonts() {
    let mut with_panel = renderer_with(240, 120, RenderSettings::without_text());
    let mut without = renderer(240, 120);
    let pattern = PatternData::new(vec![LightSample::at(0.0, 0.0, 1.0)]);
    with_panel.render(&pattern, ViewMode::Flat);
    without.render(&pattern, ViewMode::Flat);
    assert_ne!(with_panel.surface().pixel(12, 12), without.surface().pixel(12, 12));
}

#[test]
fn feed_delivers_latest_pattern_to_renderer() {
    let (sink, feed) = pattern_channel(4);
    sink.send(ring_pattern(2));
    sink.send_message(r#"{"success": true, "simulation_result": {"pattern_data": {"points": [
        {"x": 0.1, "y": 0.0, "intensity": 0.9, "wavelength": 500},
        {"x": -0.1, "y": 0.2, "intensity": 0.4, "wavelength": 600},
        {"x": 0.0, "y": -0.3, "intensity": 0.7, "wavelength": 450}
    ]}}}"#)
        .unwrap();

    let latest = feed.latest().unwrap();
    let mut r = renderer(64, 64);
    let report = r.render(&latest, ViewMode::Flat);
    assert_eq!(report.drawn, 3);
    assert_eq!(report.stats.unwrap().wavelength_range(), "450-600");
}
