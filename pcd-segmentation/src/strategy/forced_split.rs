use pcd_core::pointcloud::point::Point;

use super::{SegmentContext, SegmentationStrategy};
use crate::cluster::{sorted_by_x, Cluster};

/// Cuts the x-sorted input into as many equal slices as buildings were
/// reported. Only active when more than one building is expected.
#[derive(Debug, Clone, Default)]
pub struct ForcedSplitStrategy;

impl SegmentationStrategy for ForcedSplitStrategy {
    fn name(&self) -> &'static str {
        "forced_split"
    }

    fn segment(&self, points: &[Point], ctx: &mut SegmentContext) -> Option<Vec<Cluster>> {
        let count = ctx.split_hint()?;
        let clusters = forced_split(points, count);
        log::debug!(
            "forced split: {} points into {} slices",
            points.len(),
            clusters.len()
        );
        (!clusters.is_empty()).then_some(clusters)
    }
}

/// `floor(n / count)` points per slice, the last slice taking the remainder.
/// With fewer points than slices the whole input is one cluster.
pub fn forced_split(points: &[Point], count: usize) -> Vec<Cluster> {
    if points.is_empty() || count == 0 {
        return Vec::new();
    }

    let sorted = sorted_by_x(points);
    let n = sorted.len();
    if n < count {
        return vec![Cluster::new(sorted)];
    }

    let per_slice = n / count;
    (0..count)
        .map(|i| {
            let start = i * per_slice;
            let end = if i + 1 == count { n } else { start + per_slice };
            Cluster::new(sorted[start..end].to_vec())
        })
        .collect()
}
