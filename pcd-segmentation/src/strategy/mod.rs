use pcd_core::pointcloud::point::Point;
use rand::RngCore;

use crate::cluster::Cluster;

pub mod density;
pub mod forced_split;
pub mod gap;
pub mod range_gap;

pub use density::DensityStrategy;
pub use forced_split::ForcedSplitStrategy;
pub use gap::GapStrategy;
pub use range_gap::RangeGapStrategy;

/// Per-call state shared by the strategies of one segmentation run.
pub struct SegmentContext<'a> {
    /// Number of buildings reported upstream, if any.
    pub expected_count: Option<usize>,
    pub rng: &'a mut dyn RngCore,
    /// Set once a density pass has run and found no clusters.
    pub density_failed: bool,
}

impl<'a> SegmentContext<'a> {
    pub fn new(expected_count: Option<usize>, rng: &'a mut dyn RngCore) -> Self {
        Self {
            expected_count,
            rng,
            density_failed: false,
        }
    }

    /// The expected count when it asks for more than one building.
    pub fn split_hint(&self) -> Option<usize> {
        self.expected_count.filter(|&n| n > 1)
    }
}

/// One way of splitting a point set into buildings.
///
/// Returning `None` hands the input to the next strategy in the chain.
pub trait SegmentationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn segment(&self, points: &[Point], ctx: &mut SegmentContext) -> Option<Vec<Cluster>>;
}

/// Splits x-sorted points at the given cut indices. A cut `i` starts a new
/// segment at `sorted[i]`.
pub(crate) fn split_at_cuts(sorted: &[Point], cuts: &[usize]) -> Vec<Vec<Point>> {
    let mut segments = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for &cut in cuts {
        segments.push(sorted[start..cut].to_vec());
        start = cut;
    }
    segments.push(sorted[start..].to_vec());
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_split_hint() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(SegmentContext::new(Some(3), &mut rng).split_hint(), Some(3));
        assert_eq!(SegmentContext::new(Some(1), &mut rng).split_hint(), None);
        assert_eq!(SegmentContext::new(None, &mut rng).split_hint(), None);
    }

    #[test]
    fn test_split_at_cuts() {
        let points: Vec<Point> = (0..6).map(|i| Point::new(i as f64, 0.0, 0.0)).collect();
        let segments = split_at_cuts(&points, &[2, 5]);
        let lengths: Vec<usize> = segments.iter().map(Vec::len).collect();
        assert_eq!(lengths, vec![2, 3, 1]);
        assert_eq!(segments[1][0].x, 2.0);
    }
}
