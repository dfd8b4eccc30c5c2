use pcd_core::{config::Config, pointcloud::point::Point};
use rand::RngCore;

use crate::{
    cluster::Cluster,
    strategy::{
        DensityStrategy, ForcedSplitStrategy, GapStrategy, RangeGapStrategy, SegmentContext,
        SegmentationStrategy,
    },
};

/// Ordered chain of strategies. The first one to return clusters wins; when
/// all of them pass, the input is kept as a single building.
pub struct Segmenter {
    min_pts: usize,
    strategies: Vec<Box<dyn SegmentationStrategy>>,
}

impl Segmenter {
    pub fn new(min_pts: usize, strategies: Vec<Box<dyn SegmentationStrategy>>) -> Self {
        Self {
            min_pts,
            strategies,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let tuning = &config.segmentation;
        Self::new(
            config.min_cluster_pts,
            vec![
                Box::new(ForcedSplitStrategy),
                Box::new(GapStrategy::new(tuning)),
                Box::new(DensityStrategy::new(config.min_cluster_pts, tuning)),
                Box::new(RangeGapStrategy::new(config.min_cluster_pts, tuning)),
            ],
        )
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn segment(
        &self,
        points: &[Point],
        expected_count: Option<usize>,
        rng: &mut dyn RngCore,
    ) -> Vec<Cluster> {
        if points.is_empty() {
            return Vec::new();
        }
        if points.len() < self.min_pts {
            log::debug!(
                "{} points is below the cluster minimum, keeping one building",
                points.len()
            );
            return vec![Cluster::new(points.to_vec())];
        }

        let mut ctx = SegmentContext::new(expected_count, rng);
        for strategy in &self.strategies {
            if let Some(clusters) = strategy.segment(points, &mut ctx) {
                log::info!(
                    "Segmented {} points into {} buildings ({})",
                    points.len(),
                    clusters.len(),
                    strategy.name()
                );
                return clusters;
            }
        }

        log::warn!("No strategy split the input, treating it as a single building");
        vec![Cluster::new(points.to_vec())]
    }
}

/// Segments normalized points with the strategy chain configured by `config`.
pub fn segment_buildings<R: RngCore>(
    points: &[Point],
    expected_count: Option<usize>,
    config: &Config,
    rng: &mut R,
) -> Vec<Cluster> {
    Segmenter::from_config(config).segment(points, expected_count, rng)
}
