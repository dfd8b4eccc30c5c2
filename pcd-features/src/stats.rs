use pcd_core::pointcloud::{
    bounds::{centroid, BoundingBox},
    point::Point,
};

use crate::types::{SpatialStatistics, StructuralFeatures, StructureType};

pub fn spatial_statistics(points: &[Point]) -> SpatialStatistics {
    let bbox = BoundingBox::from_points(points);
    SpatialStatistics {
        bounding_box: Some(bbox),
        center: Some(centroid(points)),
        volume: Some(bbox.volume()),
        density: Some(points.len() as f64 / bbox.guarded_volume()),
    }
}

/// Point density over the guarded bounding volume, scaled into `[0, 1]`.
pub fn spatial_complexity(points: &[Point]) -> f64 {
    let bbox = BoundingBox::from_points(points);
    let density = points.len() as f64 / bbox.guarded_volume();
    (density / 100.0).min(1.0)
}

/// Column and beam detection are not implemented; every building reports a
/// plain frame.
pub fn structural_features(_points: &[Point]) -> StructuralFeatures {
    StructuralFeatures {
        has_columns: Some(false),
        has_beams: Some(false),
        structure_type: Some(StructureType::Frame),
    }
}
