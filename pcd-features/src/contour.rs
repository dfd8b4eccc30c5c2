use pcd_core::pointcloud::bounds::{centroid, BoundingBox};
use pcd_segmentation::Cluster;

use crate::types::{BuildingContour, BuildingType};

pub fn extract_building_contours(clusters: &[Cluster]) -> Vec<BuildingContour> {
    clusters.iter().map(extract_contour).collect()
}

pub fn extract_contour(cluster: &Cluster) -> BuildingContour {
    let bbox = cluster.bounding_box();
    BuildingContour {
        point_count: cluster.len(),
        bounding_box: bbox,
        center: centroid(&cluster.points),
        volume: bbox.volume(),
        building_type: classify_building(&bbox),
    }
}

/// Tall and slender is a tower, elongated in plan is linear, anything else
/// is a block.
pub fn classify_building(bbox: &BoundingBox) -> BuildingType {
    let height_ratio = ratio(bbox.height, bbox.width.max(bbox.depth));
    let aspect_ratio = ratio(bbox.width, bbox.depth);

    if height_ratio.is_some_and(|r| r > 2.0) {
        BuildingType::Tower
    } else if aspect_ratio.is_some_and(|r| !(0.3..=3.0).contains(&r)) {
        BuildingType::Linear
    } else {
        BuildingType::Block
    }
}

// A zero denominator reads as an unbounded ratio when the numerator is
// positive and as no ratio at all when both are zero.
fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else if numerator > 0.0 {
        Some(f64::INFINITY)
    } else {
        None
    }
}
