use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::fmt;

/// Mirror count assumed when neither the settings nor the pattern name one.
pub const DEFAULT_MIRROR_COUNT: u32 = 3;

/// Projection used to draw a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Classic 2D kaleidoscope.
    #[default]
    #[serde(rename = "2d", alias = "flat")]
    Flat,
    /// Pseudo-3D view with intensity-inferred depth buckets.
    #[serde(rename = "3d", alias = "layered")]
    Layered,
}

impl ViewMode {
    pub const ALL: [ViewMode; 2] = [ViewMode::Flat, ViewMode::Layered];

    /// Parse a mode name as used on the command line and in settings files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "2d" | "flat" => Some(ViewMode::Flat),
            "3d" | "layered" => Some(ViewMode::Layered),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Flat => "2d",
            ViewMode::Layered => "3d",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            ViewMode::Flat => ViewMode::Layered,
            ViewMode::Layered => ViewMode::Flat,
        }
    }

    /// Symmetry order this mode draws for a kaleidoscope with `mirrors` mirrors.
    ///
    /// The layered view doubles the copies so the pseudo-3D image reads richer.
    pub fn symmetry_for_mirrors(&self, mirrors: u32) -> SymmetryOrder {
        let mirrors = mirrors.max(1);
        match self {
            ViewMode::Flat => SymmetryOrder(mirrors),
            ViewMode::Layered => SymmetryOrder(mirrors.saturating_mul(2)),
        }
    }

    /// Symmetry order with the default mirror count: 3 for flat, 6 for layered.
    pub fn default_symmetry(&self) -> SymmetryOrder {
        self.symmetry_for_mirrors(DEFAULT_MIRROR_COUNT)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of rotational copies composited into the image. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SymmetryOrder(u32);

impl SymmetryOrder {
    pub const IDENTITY: SymmetryOrder = SymmetryOrder(1);

    pub fn new(order: u32) -> Result<Self, String> {
        if order == 0 {
            Err("symmetry order must be at least 1".to_string())
        } else {
            Ok(Self(order))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Rotation angle (radians) of copy `k`: `k * 2π / N`.
    pub fn angle(&self, copy_index: u32) -> f32 {
        copy_index as f32 * TAU / self.0 as f32
    }

    /// Copy indices `0..N`; index 0 is the undimmed identity pass.
    pub fn copies(&self) -> std::ops::Range<u32> {
        0..self.0
    }

    /// Human label, e.g. "3-fold".
    pub fn label(&self) -> String {
        format!("{}-fold", self.0)
    }
}

impl TryFrom<u32> for SymmetryOrder {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SymmetryOrder> for u32 {
    fn from(order: SymmetryOrder) -> u32 {
        order.0
    }
}

impl fmt::Display for SymmetryOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-fold", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_symmetry_per_mode() {
        assert_eq!(ViewMode::Flat.default_symmetry().get(), 3);
        assert_eq!(ViewMode::Layered.default_symmetry().get(), 6);
    }

    #[test]
    fn test_symmetry_from_mirrors() {
        assert_eq!(ViewMode::Flat.symmetry_for_mirrors(4).get(), 4);
        assert_eq!(ViewMode::Layered.symmetry_for_mirrors(4).get(), 8);
        assert_eq!(ViewMode::Flat.symmetry_for_mirrors(0).get(), 1);
    }

    #[test]
    fn test_zero_order_rejected() {
        assert!(SymmetryOrder::new(0).is_err());
        assert!(serde_json::from_str::<SymmetryOrder>("0").is_err());
        assert_eq!(serde_json::from_str::<SymmetryOrder>("5").unwrap().get(), 5);
    }

    #[test]
    fn test_angles() {
        let order = SymmetryOrder::new(3).unwrap();
        assert_eq!(order.angle(0), 0.0);
        assert!((order.angle(1) - TAU / 3.0).abs() < 1e-6);
        assert!((order.angle(2) - 2.0 * TAU / 3.0).abs() < 1e-6);
        assert_eq!(order.copies().count(), 3);
    }

    #[test]
    fn test_label() {
        assert_eq!(SymmetryOrder::new(3).unwrap().label(), "3-fold");
        assert_eq!(SymmetryOrder::IDENTITY.to_string(), "1-fold");
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(ViewMode::from_name("3D"), Some(ViewMode::Layered));
        assert_eq!(ViewMode::from_name("flat"), Some(ViewMode::Flat));
        assert_eq!(ViewMode::from_name("4d"), None);
        assert_eq!(ViewMode::Flat.toggle(), ViewMode::Layered);
        assert_eq!(serde_json::to_string(&ViewMode::Layered).unwrap(), "\"3d\"");
        assert_eq!(serde_json::from_str::<ViewMode>("\"layered\"").unwrap(), ViewMode::Layered);
    }
}
