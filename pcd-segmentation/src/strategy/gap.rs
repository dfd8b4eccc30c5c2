use itertools::Itertools;
use pcd_core::{config::SegmentationTuning, pointcloud::point::Point};

use super::{split_at_cuts, SegmentContext, SegmentationStrategy};
use crate::cluster::{sorted_by_x, Cluster};

/// Splits along x where consecutive points are much further apart than
/// average.
#[derive(Debug, Clone)]
pub struct GapStrategy {
    pub gap_factor: f64,
    pub max_gaps: usize,
    pub min_points: usize,
    pub min_segment: usize,
}

impl GapStrategy {
    pub fn new(tuning: &SegmentationTuning) -> Self {
        Self {
            gap_factor: tuning.gap_factor,
            max_gaps: tuning.max_gaps,
            min_points: tuning.gap_min_points,
            min_segment: tuning.gap_min_segment,
        }
    }

    /// Cut indices into the x-sorted points, in ascending order.
    fn find_cuts(&self, sorted: &[Point]) -> Vec<usize> {
        let gaps: Vec<f64> = sorted
            .iter()
            .tuple_windows()
            .map(|(a, b)| b.x - a.x)
            .collect();
        if gaps.is_empty() {
            return Vec::new();
        }
        let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
        let threshold = mean * self.gap_factor;

        // gaps[i - 1] separates sorted[i - 1] and sorted[i]; the first two
        // points never start a new segment.
        (2..sorted.len())
            .map(|i| (i, gaps[i - 1]))
            .filter(|(_, gap)| *gap > threshold)
            .sorted_by(|a, b| b.1.total_cmp(&a.1))
            .take(self.max_gaps)
            .map(|(i, _)| i)
            .sorted()
            .collect()
    }
}

impl Default for GapStrategy {
    fn default() -> Self {
        Self::new(&SegmentationTuning::default())
    }
}

impl SegmentationStrategy for GapStrategy {
    fn name(&self) -> &'static str {
        "gap"
    }

    fn segment(&self, points: &[Point], _ctx: &mut SegmentContext) -> Option<Vec<Cluster>> {
        if points.len() < self.min_points {
            return None;
        }

        let sorted = sorted_by_x(points);
        let cuts = self.find_cuts(&sorted);
        if cuts.is_empty() {
            return None;
        }

        let clusters: Vec<Cluster> = split_at_cuts(&sorted, &cuts)
            .into_iter()
            .filter(|segment| segment.len() >= self.min_segment)
            .map(Cluster::new)
            .collect();

        log::debug!(
            "gap detection: {} cuts, {} segments kept",
            cuts.len(),
            clusters.len()
        );
        (clusters.len() >= 2).then_some(clusters)
    }
}
