use crate::pattern::PatternData;
use crate::view_mode::SymmetryOrder;

/// Summary values shown in the statistics overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternStats {
    pub point_count: usize,
    /// Arithmetic mean of sample intensity, 0 when there are no samples.
    pub mean_intensity: f32,
    /// Smallest and largest wavelength (nm), `None` when there are no samples.
    pub wavelength_span: Option<(f32, f32)>,
    pub symmetry: SymmetryOrder,
}

impl PatternStats {
    /// Compute statistics over the renderable samples of a pattern.
    pub fn compute(pattern: &PatternData, symmetry: SymmetryOrder) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0f64;
        let mut span: Option<(f32, f32)> = None;

        for sample in pattern.renderable() {
            count += 1;
            sum += sample.intensity as f64;
            if sample.wavelength.is_finite() {
                let w = sample.wavelength;
                span = Some(match span {
                    Some((lo, hi)) => (lo.min(w), hi.max(w)),
                    None => (w, w),
                });
            }
        }

        let mean_intensity = if count == 0 { 0.0 } else { (sum / count as f64) as f32 };

        Self {
            point_count: count,
            mean_intensity,
            wavelength_span: span,
            symmetry,
        }
    }

    /// Wavelength range as a closed interval, e.g. "450-650", or "N/A".
    pub fn wavelength_range(&self) -> String {
        match self.wavelength_span {
            Some((lo, hi)) => format!("{}-{}", lo.round(), hi.round()),
            None => "N/A".to_string(),
        }
    }

    /// Symmetry description, e.g. "3-fold".
    pub fn symmetry_label(&self) -> String {
        self.symmetry.label()
    }

    /// Overlay text lines, top to bottom.
    pub fn overlay_lines(&self) -> [String; 4] {
        let range = match self.wavelength_span {
            Some(_) => format!("{}nm", self.wavelength_range()),
            None => self.wavelength_range(),
        };
        [
            format!("Points: {}", self.point_count),
            format!("Mean intensity: {:.3}", self.mean_intensity),
            format!("Wavelength: {range}"),
            format!("Symmetry: {}", self.symmetry_label()),
        ]
    }
}
