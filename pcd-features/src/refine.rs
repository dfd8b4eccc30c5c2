//! Reconciles a building-level inference with the measured features.

use std::collections::BTreeSet;

use pcd_core::scene::SceneInput;
use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, FacadeType, Material, PointCloudFeatures, WindowGrid};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceResult {
    pub floors: usize,
    pub building_type: String,
    pub confidence: f64,
}

impl InferenceResult {
    /// The inference used when no language model is consulted: measured
    /// floors (3 when none were found) and the scene type reported by the
    /// vision stage.
    pub fn from_features(scene: &SceneInput, features: &PointCloudFeatures) -> Self {
        Self {
            floors: if features.estimated_floors > 0 {
                features.estimated_floors
            } else {
                3
            },
            building_type: scene
                .vision
                .as_ref()
                .and_then(|v| v.scene_type.clone())
                .unwrap_or_else(|| "office".to_string()),
            confidence: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorSummary {
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub grid: WindowGrid,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacadeSummary {
    #[serde(rename = "type")]
    pub facade_type: FacadeType,
    pub materials: BTreeSet<Material>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinedResult {
    pub building_type: String,
    pub confidence: f64,
    pub dimensions: Dimensions,
    pub floors: FloorSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows: Option<WindowSummary>,
    pub facade: FacadeSummary,
}

/// Rounds to the nearest integer; `NaN` and infinities become 0.
pub fn safe_round(value: f64) -> f64 {
    if value.is_finite() {
        value.round()
    } else {
        0.0
    }
}

/// Measured dimensions, floors, windows and façade take precedence over the
/// inferred ones.
pub fn refine_result(inference: &InferenceResult, features: &PointCloudFeatures) -> RefinedResult {
    let estimate = &features.estimated_dimensions;
    let dimensions = Dimensions::new(
        safe_round(estimate.width),
        safe_round(estimate.depth),
        safe_round(estimate.height),
    );

    let floor_count = features.floor_patterns.len();
    let floors = if floor_count > 0 {
        FloorSummary {
            count: floor_count,
            height: Some(dimensions.height / floor_count as f64),
        }
    } else {
        FloorSummary {
            count: inference.floors,
            height: None,
        }
    };

    let windows = (features.window_grid.rows > 0).then(|| WindowSummary {
        grid: features.window_grid,
        total: features.window_grid.total(),
    });

    RefinedResult {
        building_type: inference.building_type.clone(),
        confidence: inference.confidence,
        dimensions,
        floors,
        windows,
        facade: FacadeSummary {
            facade_type: features.facade_features.facade_type,
            materials: features.facade_features.materials.clone().unwrap_or_default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fallback::default_features, types::FloorPattern, types::FloorPatternKind};

    #[test]
    fn test_safe_round() {
        assert_eq!(safe_round(2.5), 3.0);
        assert_eq!(safe_round(0.4), 0.0);
        assert_eq!(safe_round(f64::NAN), 0.0);
        assert_eq!(safe_round(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_refine_default_record() {
        let features = default_features();
        let inference = InferenceResult::from_features(&SceneInput::default(), &features);
        assert_eq!(inference.floors, 5);
        assert_eq!(inference.building_type, "office");

        let refined = refine_result(&inference, &features);

        assert_eq!(refined.dimensions, Dimensions::new(30000.0, 20000.0, 16500.0));
        assert_eq!(refined.floors, FloorSummary { count: 5, height: None });
        assert!(refined.windows.is_none());
        assert_eq!(refined.facade.facade_type, FacadeType::Unknown);
        assert!(refined.facade.materials.is_empty());
    }

    #[test]
    fn test_measured_values_win() {
        let mut features = default_features();
        features.estimated_dimensions = Dimensions::new(0.6, f64::NAN, 0.9);
        features.floor_patterns = vec![FloorPattern {
            level: 0,
            height: 1.65,
            point_count: 10,
            density: 1.0,
            pattern: FloorPatternKind::Solid,
        }];
        features.window_grid = WindowGrid {
            rows: 5,
            cols: 8,
            ..Default::default()
        };
        let inference = InferenceResult {
            floors: 12,
            building_type: "residential".to_string(),
            confidence: 0.9,
        };

        let refined = refine_result(&inference, &features);

        assert_eq!(refined.dimensions, Dimensions::new(1.0, 0.0, 1.0));
        assert_eq!(refined.floors, FloorSummary { count: 1, height: Some(1.0) });
        assert_eq!(refined.windows.map(|w| w.total), Some(40));
        assert_eq!(refined.building_type, "residential");
    }
}
