//! The pattern renderer: turns a [`PatternData`] into a kaleidoscope image on
//! a host-owned [`RenderSurface`].
//!
//! Rendering is a full redraw every time. The renderer keeps its own shared
//! snapshot of the last pattern so that view-mode switches, resizes and
//! animation ticks can redraw without the caller resupplying it.

use std::sync::Arc;

use kscope_core::{
    AttenuationPolicy, ClassicAttenuation, DepthStratifier, PatternData, PatternStats, SymmetryOrder,
    ViewMode,
};

use crate::animation::AnimationLoop;
use crate::background::{clear, draw_default_pattern, draw_grid};
use crate::overlay::{draw_stats_panel, TextPainter};
use crate::projector::{PassAttenuation, SymmetryProjector};
use crate::rasterizer::LightPointRasterizer;
use crate::settings::RenderSettings;
use crate::snapshot::{CapturedFrame, ExportOptions};
use crate::surface::RenderSurface;

/// What a render call ended up drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Pattern,
    /// The input had no samples; the decorative idle pattern was drawn.
    DefaultPattern,
}

/// One rotational pass over a set of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassInfo {
    pub copy_index: u32,
    /// Rotation of this copy in radians.
    pub angle: f32,
    /// Depth bucket, `None` in the flat view.
    pub layer: Option<usize>,
}

/// Summary of a single render call, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub outcome: RenderOutcome,
    pub mode: ViewMode,
    pub symmetry: SymmetryOrder,
    pub passes: Vec<PassInfo>,
    /// Renderable samples in the pattern.
    pub drawn: usize,
    /// Samples skipped for non-finite coordinates or invalid intensity.
    pub skipped: usize,
    /// Light points composited (samples times copies).
    pub draw_calls: usize,
    pub stats: Option<PatternStats>,
}

impl RenderReport {
    fn idle(mode: ViewMode, symmetry: SymmetryOrder) -> Self {
        Self {
            outcome: RenderOutcome::DefaultPattern,
            mode,
            symmetry,
            passes: Vec::new(),
            drawn: 0,
            skipped: 0,
            draw_calls: 0,
            stats: None,
        }
    }
}

enum RenderState {
    Idle,
    Rendered(Arc<PatternData>),
}

/// Kaleidoscope renderer bound to one surface.
pub struct PatternRenderer<S: RenderSurface> {
    surface: S,
    settings: RenderSettings,
    attenuation: Box<dyn AttenuationPolicy>,
    rasterizer: LightPointRasterizer,
    stratifier: DepthStratifier,
    text: Option<TextPainter>,
    text_loaded: bool,
    state: RenderState,
    view_mode: ViewMode,
    animation: AnimationLoop,
    render_count: u64,
}

impl<S: RenderSurface> PatternRenderer<S> {
    /// Bind to `surface` and draw the idle pattern.
    ///
    /// Fails when the surface has no pixels.
    pub fn new(surface: S, settings: RenderSettings) -> Result<Self, String> {
        if surface.width() == 0 || surface.height() == 0 {
            return Err(format!(
                "render surface must be non-empty, got {}x{}",
                surface.width(),
                surface.height()
            ));
        }
        let mut renderer = Self {
            surface,
            rasterizer: LightPointRasterizer::new(settings.point, settings.blend),
            settings,
            attenuation: Box::new(ClassicAttenuation),
            stratifier: DepthStratifier::new(),
            text: None,
            text_loaded: false,
            state: RenderState::Idle,
            view_mode: ViewMode::default(),
            animation: AnimationLoop::new(),
            render_count: 0,
        };
        renderer.draw_idle();
        Ok(renderer)
    }

    /// Replace the attenuation policy. Takes effect on the next render.
    pub fn with_attenuation(mut self, policy: Box<dyn AttenuationPolicy>) -> Self {
        log::debug!("Attenuation policy: {}", policy.name());
        self.attenuation = policy;
        self
    }

    /// Render `pattern` in `mode`. The renderer keeps its own copy of the
    /// pattern for later redraws; the caller's data is only read.
    pub fn render(&mut self, pattern: &PatternData, mode: ViewMode) -> RenderReport {
        self.view_mode = mode;
        if pattern.is_empty() {
            self.state = RenderState::Idle;
            return self.draw_idle();
        }
        let pattern = Arc::new(pattern.clone());
        self.state = RenderState::Rendered(Arc::clone(&pattern));
        self.draw_pattern(&pattern)
    }

    /// Switch view mode. With a pattern loaded it is re-rendered once in the
    /// new mode; otherwise the mode is only stored.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> Option<RenderReport> {
        self.view_mode = mode;
        match &self.state {
            RenderState::Idle => None,
            RenderState::Rendered(pattern) => {
                let pattern = Arc::clone(pattern);
                Some(self.draw_pattern(&pattern))
            }
        }
    }

    /// Redraw after the host resized the surface.
    pub fn on_resize(&mut self) -> RenderReport {
        log::debug!("Surface resized to {}x{}", self.surface.width(), self.surface.height());
        self.redraw()
    }

    /// Activate the animation loop and render the current pattern right away.
    /// Returns `false` (and does nothing) when already active.
    pub fn start_animation(&mut self) -> bool {
        if !self.animation.start() {
            return false;
        }
        log::info!("Animation started");
        if matches!(self.state, RenderState::Rendered(_)) {
            self.redraw();
        }
        true
    }

    /// Deactivate the animation loop. Returns `false` when it was not active.
    pub fn stop_animation(&mut self) -> bool {
        if !self.animation.stop() {
            return false;
        }
        log::info!("Animation stopped after {} ticks", self.animation.ticks());
        true
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_active()
    }

    /// One display refresh. Returns `true` when a frame was rendered.
    pub fn on_frame_tick(&mut self) -> bool {
        if !self.animation.begin_tick() {
            return false;
        }
        match &self.state {
            RenderState::Idle => false,
            RenderState::Rendered(pattern) => {
                let pattern = Arc::clone(pattern);
                self.draw_pattern(&pattern);
                true
            }
        }
    }

    /// PNG bytes of the current surface content.
    pub fn export_snapshot(&self) -> Result<Vec<u8>, String> {
        CapturedFrame::capture(&self.surface).encode_png()
    }

    /// Current surface content encoded with `options`.
    pub fn export_snapshot_with(&self, options: &ExportOptions) -> Result<Vec<u8>, String> {
        CapturedFrame::capture(&self.surface).encode(options)
    }

    /// Drop the loaded pattern and show the idle pattern.
    pub fn clear(&mut self) -> RenderReport {
        self.state = RenderState::Idle;
        self.draw_idle()
    }

    /// Replace settings and redraw with them.
    pub fn set_settings(&mut self, settings: RenderSettings) -> RenderReport {
        self.rasterizer = LightPointRasterizer::new(settings.point, settings.blend);
        if let Some(text) = self.text.as_mut() {
            text.set_font_size(settings.font_size);
        }
        self.settings = settings;
        self.redraw()
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Host access for resizing or direct drawing between render calls.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn current_pattern(&self) -> Option<&PatternData> {
        match &self.state {
            RenderState::Idle => None,
            RenderState::Rendered(pattern) => Some(pattern.as_ref()),
        }
    }

    /// Full redraws performed so far, including idle-pattern draws.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Symmetry order `mode` would use for the current pattern.
    pub fn symmetry_for(&self, mode: ViewMode) -> SymmetryOrder {
        resolve_symmetry(&self.settings, self.current_pattern(), mode)
    }

    fn redraw(&mut self) -> RenderReport {
        match &self.state {
            RenderState::Idle => self.draw_idle(),
            RenderState::Rendered(pattern) => {
                let pattern = Arc::clone(pattern);
                self.draw_pattern(&pattern)
            }
        }
    }

    fn load_text(&mut self) {
        if self.settings.show_text && !self.text_loaded {
            self.text = TextPainter::new(self.settings.font_size);
            self.text_loaded = true;
        }
    }

    fn draw_idle(&mut self) -> RenderReport {
        self.load_text();
        let text = if self.settings.show_text { self.text.as_mut() } else { None };
        draw_default_pattern(&mut self.surface, &self.settings, text);
        self.render_count += 1;
        log::debug!("Rendered default pattern");
        RenderReport::idle(self.view_mode, self.symmetry_for(self.view_mode))
    }

    fn draw_pattern(&mut self, pattern: &PatternData) -> RenderReport {
        let mode = self.view_mode;
        let symmetry = resolve_symmetry(&self.settings, Some(pattern), mode);
        let divisor = match mode {
            ViewMode::Flat => self.settings.flat_scale_divisor,
            ViewMode::Layered => self.settings.layered_scale_divisor,
        };
        let projector =
            SymmetryProjector::for_surface(symmetry, self.surface.width(), self.surface.height(), divisor);
        let rasterizer = self.rasterizer;

        let drawn = pattern.renderable().count();
        let skipped = pattern.len() - drawn;
        if skipped > 0 {
            log::warn!("Skipped {skipped} malformed samples of {}", pattern.len());
        }

        clear(&mut self.surface, mode, &self.settings);

        let mut passes = Vec::new();
        let mut draw_calls = 0usize;
        match mode {
            ViewMode::Flat => {
                draw_grid(&mut self.surface, &self.settings);
                for k in symmetry.copies() {
                    let pass = PassAttenuation::flat(self.attenuation.copy(mode, k));
                    for sample in pattern.renderable() {
                        let p = projector.project(sample, k, &pass);
                        rasterizer.draw(&mut self.surface, p.x, p.y, p.intensity, sample.clamped_rgb(), p.alpha);
                        draw_calls += 1;
                    }
                    passes.push(PassInfo { copy_index: k, angle: symmetry.angle(k), layer: None });
                }
            }
            ViewMode::Layered => {
                let buckets = self.stratifier.stratify(pattern.renderable());
                for (depth, bucket) in buckets.iter().enumerate().rev() {
                    if bucket.is_empty() {
                        continue;
                    }
                    let layer = self.attenuation.layer(depth);
                    for k in symmetry.copies() {
                        let pass = PassAttenuation::layered(self.attenuation.copy(mode, k), layer, depth);
                        for sample in bucket {
                            let p = projector.project(sample, k, &pass);
                            rasterizer.draw_layered(
                                &mut self.surface,
                                p.x,
                                p.y,
                                p.intensity,
                                sample.clamped_rgb(),
                                p.depth,
                                p.alpha,
                            );
                            draw_calls += 1;
                        }
                        passes.push(PassInfo { copy_index: k, angle: symmetry.angle(k), layer: Some(depth) });
                    }
                }
            }
        }

        let stats = PatternStats::compute(pattern, symmetry);
        if self.settings.show_stats {
            self.load_text();
            let text = if self.settings.show_text { self.text.as_mut() } else { None };
            draw_stats_panel(&mut self.surface, &stats, text, &self.settings);
        }

        self.render_count += 1;
        log::debug!(
            "Rendered {} view, {} symmetry: {drawn} drawn, {skipped} skipped, {draw_calls} points",
            mode,
            symmetry,
        );

        RenderReport {
            outcome: RenderOutcome::Pattern,
            mode,
            symmetry,
            passes,
            drawn,
            skipped,
            draw_calls,
            stats: Some(stats),
        }
    }
}

/// Settings override, then the pattern's mirror count, then the configured
/// mirror count, mapped through the view mode.
fn resolve_symmetry(settings: &RenderSettings, pattern: Option<&PatternData>, mode: ViewMode) -> SymmetryOrder {
    if let Some(order) = settings.symmetry_order {
        return order;
    }
    let mirrors = pattern.and_then(|p| p.mirror_count).unwrap_or(settings.mirror_count);
    mode.symmetry_for_mirrors(mirrors)
}
