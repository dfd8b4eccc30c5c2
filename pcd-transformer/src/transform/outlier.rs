use pcd_core::{
    config::OutlierRemoval,
    pointcloud::point::{Point, PointCloud},
};
use rayon::prelude::*;

/// Drops isolated points. Without settings, or when the filter would remove
/// more than `max_removed_ratio` of the cloud, the input is returned as is.
pub struct OutlierTransform {
    settings: Option<OutlierRemoval>,
}

impl OutlierTransform {
    pub fn new(settings: Option<OutlierRemoval>) -> Self {
        Self { settings }
    }

    pub fn passthrough() -> Self {
        Self { settings: None }
    }
}

impl Default for OutlierTransform {
    fn default() -> Self {
        Self::passthrough()
    }
}

impl super::Transform for OutlierTransform {
    fn name(&self) -> &'static str {
        "outlier_removal"
    }

    fn transform(&self, point_cloud: PointCloud) -> Vec<PointCloud> {
        let Some(settings) = &self.settings else {
            return vec![point_cloud];
        };
        if point_cloud.is_empty() {
            return vec![point_cloud];
        }

        let kept = radius_filter(&point_cloud.points, settings);
        let removed = point_cloud.len() - kept.len();
        let budget = (point_cloud.len() as f64 * settings.max_removed_ratio).floor() as usize;

        if removed > budget {
            log::warn!(
                "outlier filter would remove {} of {} points (budget {}), keeping all",
                removed,
                point_cloud.len(),
                budget
            );
            return vec![point_cloud];
        }

        log::debug!("outlier filter removed {} points", removed);
        vec![PointCloud::new(kept)]
    }
}

fn radius_filter(points: &[Point], settings: &OutlierRemoval) -> Vec<Point> {
    let radius_sq = settings.radius * settings.radius;

    points
        .par_iter()
        .enumerate()
        .filter(|(i, p)| {
            let neighbors = points
                .iter()
                .enumerate()
                .filter(|(j, q)| i != j && p.squared_distance(q) <= radius_sq)
                .take(settings.min_neighbors)
                .count();
            neighbors >= settings.min_neighbors
        })
        .map(|(_, p)| *p)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;

    fn line_with_outlier(n: usize) -> Vec<Point> {
        let mut points: Vec<Point> = (0..n).map(|i| Point::new(i as f64 * 0.01, 0.0, 0.0)).collect();
        points.push(Point::new(10.0, 10.0, 10.0));
        points
    }

    #[test]
    fn test_default_is_identity() {
        let points = line_with_outlier(20);
        let result = OutlierTransform::default().transform(PointCloud::new(points.clone()));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].points, points);
    }

    #[test]
    fn test_removes_isolated_point_within_budget() {
        let settings = OutlierRemoval {
            radius: 0.05,
            min_neighbors: 2,
            max_removed_ratio: 0.1,
        };
        let result = OutlierTransform::new(Some(settings)).transform(PointCloud::new(line_with_outlier(40)));
        assert_eq!(result[0].len(), 40);
        assert!(result[0].points.iter().all(|p| p.x < 1.0));
    }

    #[test]
    fn test_never_exceeds_budget() {
        let settings = OutlierRemoval {
            radius: 0.05,
            min_neighbors: 2,
            max_removed_ratio: 0.0,
        };
        let points = line_with_outlier(40);
        let result = OutlierTransform::new(Some(settings)).transform(PointCloud::new(points.clone()));
        assert_eq!(result[0].points, points);
    }
}
