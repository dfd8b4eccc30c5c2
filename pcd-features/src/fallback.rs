use crate::types::{
    Dimensions, FacadeFeatures, PointCloudFeatures, SpatialStatistics, StructuralFeatures,
    WindowGrid,
};

/// Record returned when a scene yields no points at all.
pub fn default_features() -> PointCloudFeatures {
    PointCloudFeatures {
        point_count: 0,
        building_contours: Vec::new(),
        floor_patterns: Vec::new(),
        facade_features: FacadeFeatures::unknown(),
        spatial_stats: SpatialStatistics::default(),
        structural_features: StructuralFeatures::default(),
        window_grid: WindowGrid::empty(),
        spatial_complexity: 0.0,
        estimated_dimensions: Dimensions::new(30000.0, 20000.0, 16500.0),
        estimated_floors: 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let value = serde_json::to_value(default_features()).unwrap();
        assert_eq!(
            value,
            json!({
                "pointCount": 0,
                "buildingContours": [],
                "floorPatterns": [],
                "facadeFeatures": {"type": "unknown"},
                "spatialStats": {},
                "structuralFeatures": {},
                "windowGrid": {"rows": 0, "cols": 0},
                "spatialComplexity": 0.0,
                "estimatedDimensions": {"width": 30000.0, "depth": 20000.0, "height": 16500.0},
                "estimatedFloors": 5
            })
        );
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(default_features(), default_features());
    }
}
