//! Inputs handed over by the upstream recognition stages.
//!
//! Field names follow the upstream JSON payload (`ocr`, `yolo`, `qwenvl`,
//! `depth`), with neutral aliases accepted as well.

use serde::{Deserialize, Serialize};

use crate::pointcloud::point::PointCloud;

/// Row-major depth raster. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepthMap {
    pub rows: Vec<Vec<f64>>,
}

impl DepthMap {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    pub fn filled(width: usize, height: usize, depth: f64) -> Self {
        Self {
            rows: vec![vec![depth; width]; height],
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the first row, as the raster is assumed rectangular.
    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeHint {
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub d: f64,
    #[serde(default)]
    pub h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeRole {
    Main,
    Annex,
    Connector,
}

/// A building volume reported by the vision-language stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<VolumeRole>,
    /// `[x_min, y_min, x_max, y_max]` in image pixels.
    #[serde(default, alias = "bboxPx")]
    pub bbox_px: Option<[f64; 4]>,
    /// Relative size, the largest volume being 1.0.
    #[serde(default, alias = "sizeHint")]
    pub size_hint: Option<SizeHint>,
    #[serde(default, alias = "floors")]
    pub levels: Option<u32>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingHint {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub floors: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisionContext {
    #[serde(default, alias = "buildingCount")]
    pub building_count: Option<usize>,
    #[serde(default)]
    pub buildings: Option<Vec<BuildingHint>>,
    #[serde(default)]
    pub volumes: Option<Vec<Volume>>,
    #[serde(default, alias = "sceneType")]
    pub scene_type: Option<String>,
    #[serde(default, alias = "viewType")]
    pub view_type: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl VisionContext {
    pub fn with_building_count(count: usize) -> Self {
        Self {
            building_count: Some(count),
            ..Default::default()
        }
    }

    /// Expected number of buildings, resolved in order from the explicit
    /// count, the building list and the volume list. Zero counts as absent.
    pub fn expected_building_count(&self) -> Option<usize> {
        [
            self.building_count,
            self.buildings.as_ref().map(Vec::len),
            self.volumes.as_ref().map(Vec::len),
        ]
        .into_iter()
        .flatten()
        .find(|&count| count > 0)
    }

    pub fn volumes(&self) -> &[Volume] {
        self.volumes.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DepthResult {
    #[serde(default, alias = "depthMap")]
    pub depth_map: Option<DepthMap>,
    #[serde(default, alias = "pointCloud")]
    pub point_cloud: Option<PointCloud>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Everything one extraction call consumes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SceneInput {
    #[serde(default)]
    pub ocr: OcrResult,
    #[serde(default, alias = "yolo")]
    pub detection: DetectionResult,
    #[serde(default, alias = "qwenvl")]
    pub vision: Option<VisionContext>,
    #[serde(default)]
    pub depth: DepthResult,
}

impl SceneInput {
    pub fn new(
        point_cloud: Option<PointCloud>,
        depth_map: Option<DepthMap>,
        vision: Option<VisionContext>,
    ) -> Self {
        Self {
            vision,
            depth: DepthResult {
                depth_map,
                point_cloud,
                confidence: None,
            },
            ..Default::default()
        }
    }

    pub fn from_point_cloud(point_cloud: PointCloud) -> Self {
        Self::new(Some(point_cloud), None, None)
    }

    pub fn point_cloud(&self) -> Option<&PointCloud> {
        self.depth.point_cloud.as_ref()
    }

    pub fn depth_map(&self) -> Option<&DepthMap> {
        self.depth.depth_map.as_ref()
    }

    pub fn expected_building_count(&self) -> Option<usize> {
        self.vision
            .as_ref()
            .and_then(VisionContext::expected_building_count)
    }
}
