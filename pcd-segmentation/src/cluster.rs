use itertools::Itertools;
use pcd_core::pointcloud::{bounds::BoundingBox, point::Point};

/// Points hypothesized to belong to one building.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cluster {
    pub points: Vec<Point>,
}

impl Cluster {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl From<Vec<Point>> for Cluster {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// Copy of `points` in ascending x order. Stable, so ties keep input order.
pub fn sorted_by_x(points: &[Point]) -> Vec<Point> {
    points
        .iter()
        .copied()
        .sorted_by(|a, b| a.x.total_cmp(&b.x))
        .collect()
}

/// Total number of points across `clusters`.
pub fn total_points(clusters: &[Cluster]) -> usize {
    clusters.iter().map(Cluster::len).sum()
}
