use pcd_core::{config::SegmentationTuning, pointcloud::point::Point};

use super::{split_at_cuts, SegmentContext, SegmentationStrategy};
use crate::cluster::{sorted_by_x, Cluster};

/// Retry after an empty density pass: split along x at every gap wider than
/// a fraction of the x range.
#[derive(Debug, Clone)]
pub struct RangeGapStrategy {
    pub min_pts: usize,
    pub min_input: usize,
    pub gap_ratio: f64,
}

impl RangeGapStrategy {
    pub fn new(min_pts: usize, tuning: &SegmentationTuning) -> Self {
        Self {
            min_pts,
            min_input: tuning.fallback_min_points,
            gap_ratio: tuning.fallback_gap_ratio,
        }
    }
}

impl SegmentationStrategy for RangeGapStrategy {
    fn name(&self) -> &'static str {
        "range_gap"
    }

    fn segment(&self, points: &[Point], ctx: &mut SegmentContext) -> Option<Vec<Cluster>> {
        if !ctx.density_failed || points.len() <= self.min_input {
            return None;
        }

        let sorted = sorted_by_x(points);
        let range = sorted.last()?.x - sorted.first()?.x;
        let threshold = range * self.gap_ratio;
        let cuts: Vec<usize> = (1..sorted.len())
            .filter(|&i| sorted[i].x - sorted[i - 1].x > threshold)
            .collect();
        if cuts.is_empty() {
            return None;
        }

        let clusters: Vec<Cluster> = split_at_cuts(&sorted, &cuts)
            .into_iter()
            .filter(|segment| segment.len() >= self.min_pts)
            .map(Cluster::new)
            .collect();

        log::info!(
            "density clustering found nothing, range gaps give {} buildings",
            clusters.len()
        );
        (!clusters.is_empty()).then_some(clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn row(from: f64, n: usize, step: f64) -> Vec<Point> {
        (0..n).map(|i| Point::new(from + i as f64 * step, 0.0, 0.0)).collect()
    }

    fn strategy() -> RangeGapStrategy {
        RangeGapStrategy::new(10, &SegmentationTuning::default())
    }

    #[test]
    fn test_splits_after_density_failure() {
        let mut points = row(0.0, 60, 0.001);
        points.extend(row(0.5, 60, 0.001));
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SegmentContext::new(None, &mut rng);

        assert!(strategy().segment(&points, &mut ctx).is_none());

        ctx.density_failed = true;
        let clusters = strategy().segment(&points, &mut ctx).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 60);
    }

    #[test]
    fn test_small_inputs_are_skipped() {
        let mut points = row(0.0, 40, 0.001);
        points.extend(row(0.5, 40, 0.001));
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SegmentContext::new(None, &mut rng);
        ctx.density_failed = true;

        assert!(strategy().segment(&points, &mut ctx).is_none());
    }

    #[test]
    fn test_segment_of_exactly_min_pts_is_kept() {
        let mut points = row(0.0, 100, 0.001);
        points.extend(row(0.5, 10, 0.001));
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SegmentContext::new(None, &mut rng);
        ctx.density_failed = true;

        let clusters = strategy().segment(&points, &mut ctx).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[1].len(), 10);
    }
}
