use pcd_core::{config::SegmentationTuning, pointcloud::point::Point};

use super::{SegmentContext, SegmentationStrategy};
use crate::{cluster::Cluster, dbscan::dbscan, eps::estimate_epsilon};

/// DBSCAN with a radius estimated from the data.
#[derive(Debug, Clone)]
pub struct DensityStrategy {
    pub min_pts: usize,
    pub tuning: SegmentationTuning,
}

impl DensityStrategy {
    pub fn new(min_pts: usize, tuning: &SegmentationTuning) -> Self {
        Self {
            min_pts,
            tuning: tuning.clone(),
        }
    }

    /// Estimated radius scaled down for clustering. A multi-building hint
    /// shrinks it further so that adjacent buildings separate.
    pub fn epsilon(&self, points: &[Point], ctx: &mut SegmentContext) -> f64 {
        let estimate = estimate_epsilon(points, &self.tuning, &mut *ctx.rng);
        let mut eps = estimate * self.tuning.eps_scale;
        if ctx.split_hint().is_some() {
            eps *= self.tuning.eps_hint_scale;
        }
        eps
    }
}

impl SegmentationStrategy for DensityStrategy {
    fn name(&self) -> &'static str {
        "density"
    }

    fn segment(&self, points: &[Point], ctx: &mut SegmentContext) -> Option<Vec<Cluster>> {
        let eps = self.epsilon(points, ctx);
        let clusters = dbscan(points, eps, self.min_pts);
        log::debug!("density: eps {:.4}, {} clusters", eps, clusters.len());

        if clusters.is_empty() {
            ctx.density_failed = true;
            None
        } else {
            Some(clusters)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn grid(cx: f64, side: usize, spacing: f64) -> Vec<Point> {
        (0..side)
            .flat_map(|i| (0..side).map(move |j| Point::new(cx + i as f64 * spacing, j as f64 * spacing, 0.0)))
            .collect()
    }

    #[test]
    fn test_epsilon_scaling() {
        // Spacing 0.2 puts every k-distance above the upper clamp.
        let points = grid(0.0, 6, 0.2);
        let strategy = DensityStrategy::new(10, &SegmentationTuning::default());
        let mut rng = StdRng::seed_from_u64(5);

        let mut ctx = SegmentContext::new(None, &mut rng);
        assert!((strategy.epsilon(&points, &mut ctx) - 0.075).abs() < 1e-12);

        let mut ctx = SegmentContext::new(Some(3), &mut rng);
        assert!((strategy.epsilon(&points, &mut ctx) - 0.0225).abs() < 1e-12);
    }

    #[test]
    fn test_dense_blobs_are_clustered() {
        let mut points = grid(0.0, 8, 0.01);
        points.extend(grid(0.6, 8, 0.01));
        let strategy = DensityStrategy::new(10, &SegmentationTuning::default());
        let mut rng = StdRng::seed_from_u64(5);
        let mut ctx = SegmentContext::new(None, &mut rng);

        let clusters = strategy.segment(&points, &mut ctx).unwrap();

        assert_eq!(clusters.len(), 2);
        assert!(!ctx.density_failed);
    }

    #[test]
    fn test_sparse_points_mark_failure() {
        let points = grid(0.0, 6, 0.2);
        let strategy = DensityStrategy::new(10, &SegmentationTuning::default());
        let mut rng = StdRng::seed_from_u64(5);
        let mut ctx = SegmentContext::new(None, &mut rng);

        assert!(strategy.segment(&points, &mut ctx).is_none());
        assert!(ctx.density_failed);
    }
}
