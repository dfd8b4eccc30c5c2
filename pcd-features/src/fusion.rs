//! Assembly of the per-stage results into one feature record, and the
//! confidence score across input modalities.

use pcd_core::{config::Config, pointcloud::point::Point, scene::SceneInput};
use pcd_segmentation::Cluster;

use crate::{
    contour::extract_building_contours,
    facade::{detect_window_grid, extract_facade_features, FacadeAnalyzer},
    floors::extract_floor_patterns,
    stats::{spatial_complexity, spatial_statistics, structural_features},
    types::{Dimensions, PointCloudFeatures},
};

const OCR_WEIGHT: f64 = 0.1;
const DETECTION_WEIGHT: f64 = 0.1;
const VISION_WEIGHT: f64 = 0.2;
const POINT_CLOUD_WEIGHT: f64 = 0.6;
/// Stands in for a modality that reported no confidence.
const MISSING_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModalityConfidences {
    pub ocr: Option<f64>,
    pub object_detection: Option<f64>,
    pub vision_language: Option<f64>,
}

impl ModalityConfidences {
    pub fn from_scene(scene: &SceneInput) -> Self {
        Self {
            ocr: scene.ocr.confidence,
            object_detection: scene.detection.confidence,
            vision_language: scene.vision.as_ref().and_then(|v| v.confidence),
        }
    }
}

/// Saturates at 1000 points.
pub fn point_cloud_confidence(point_count: usize) -> f64 {
    (point_count as f64 / 1000.0).min(1.0)
}

pub fn overall_confidence(modalities: &ModalityConfidences, point_count: usize) -> f64 {
    OCR_WEIGHT * modalities.ocr.unwrap_or(MISSING_CONFIDENCE)
        + DETECTION_WEIGHT * modalities.object_detection.unwrap_or(MISSING_CONFIDENCE)
        + VISION_WEIGHT * modalities.vision_language.unwrap_or(MISSING_CONFIDENCE)
        + POINT_CLOUD_WEIGHT * point_cloud_confidence(point_count)
}

/// Runs every structural extractor over the processed points and clusters.
///
/// `point_count` is the size of the input before preprocessing.
pub fn fuse_features(
    point_count: usize,
    processed: &[Point],
    clusters: &[Cluster],
    config: &Config,
    analyzer: &dyn FacadeAnalyzer,
) -> PointCloudFeatures {
    let building_contours = extract_building_contours(clusters);
    let floor_patterns = extract_floor_patterns(processed, config.layer_height);
    let facade_features = extract_facade_features(processed, analyzer);
    let spatial_stats = spatial_statistics(processed);
    let estimated_dimensions = spatial_stats
        .bounding_box
        .as_ref()
        .map(Dimensions::from)
        .unwrap_or_default();

    log::info!(
        "Extracted {} contours, {} floor patterns, façade {:?}",
        building_contours.len(),
        floor_patterns.len(),
        facade_features.facade_type
    );

    PointCloudFeatures {
        point_count,
        estimated_floors: floor_patterns.len(),
        building_contours,
        floor_patterns,
        facade_features,
        spatial_stats,
        structural_features: structural_features(processed),
        window_grid: detect_window_grid(processed, analyzer),
        spatial_complexity: spatial_complexity(processed),
        estimated_dimensions,
    }
}
