use crate::sample::LightSample;

/// Number of depth buckets in the layered view.
pub const DEPTH_LAYERS: usize = 4;

/// Partitions samples into depth buckets for the layered view.
///
/// The simulation carries no z coordinate at this stage, so brightness stands
/// in for distance: bright samples are nearest (bucket 0), dim samples are
/// farthest (bucket 3).
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthStratifier;

impl DepthStratifier {
    pub fn new() -> Self {
        Self
    }

    /// Bucket index for an intensity: `clamp(floor((1 - i) * 3), 0, 3)`.
    ///
    /// Non-finite intensities land in the farthest bucket.
    pub fn depth_index(intensity: f32) -> usize {
        let raw = ((1.0 - intensity) * 3.0).floor();
        if raw.is_nan() || raw >= (DEPTH_LAYERS - 1) as f32 {
            DEPTH_LAYERS - 1
        } else if raw <= 0.0 {
            0
        } else {
            raw as usize
        }
    }

    /// Split samples into `DEPTH_LAYERS` buckets, keeping input order inside
    /// each bucket. Every sample lands in exactly one bucket.
    pub fn stratify<'a, I>(&self, samples: I) -> [Vec<LightSample>; DEPTH_LAYERS]
    where
        I: IntoIterator<Item = &'a LightSample>,
    {
        let mut layers: [Vec<LightSample>; DEPTH_LAYERS] = Default::default();
        for sample in samples {
            layers[Self::depth_index(sample.intensity)].push(*sample);
        }
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_index_mapping() {
        assert_eq!(DepthStratifier::depth_index(1.0), 0);
        assert_eq!(DepthStratifier::depth_index(0.9), 0);
        assert_eq!(DepthStratifier::depth_index(0.6), 1);
        assert_eq!(DepthStratifier::depth_index(0.5), 1);
        assert_eq!(DepthStratifier::depth_index(0.3), 2);
        assert_eq!(DepthStratifier::depth_index(0.0), 3);
    }

    #[test]
    fn test_depth_index_clamps() {
        assert_eq!(DepthStratifier::depth_index(5.0), 0);
        assert_eq!(DepthStratifier::depth_index(-2.0), 3);
        assert_eq!(DepthStratifier::depth_index(f32::NAN), 3);
        assert_eq!(DepthStratifier::depth_index(f32::INFINITY), 0);
    }

    #[test]
    fn test_empty_input_gives_four_empty_buckets() {
        let layers = DepthStratifier::new().stratify(&[]);
        assert_eq!(layers.len(), DEPTH_LAYERS);
        assert!(layers.iter().all(|l| l.is_empty()));
    }

    #[test]
    fn test_order_preserved_within_bucket() {
        let samples = vec![
            LightSample::at(0.1, 0.0, 0.95),
            LightSample::at(0.2, 0.0, 0.1),
            LightSample::at(0.3, 0.0, 0.99),
        ];
        let layers = DepthStratifier::new().stratify(&samples);
        let xs: Vec<f32> = layers[0].iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![0.1, 0.3]);
        assert_eq!(layers[3].len(), 1);
    }
}
