//! Output records. Field names are camelCase on the wire.

use std::collections::BTreeSet;

use pcd_core::pointcloud::bounds::{BoundingBox, Point3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    Tower,
    Linear,
    Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingContour {
    pub point_count: usize,
    pub bounding_box: BoundingBox,
    pub center: Point3,
    pub volume: f64,
    #[serde(rename = "type")]
    pub building_type: BuildingType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorPatternKind {
    Solid,
    Regular,
    Sparse,
    Empty,
}

impl FloorPatternKind {
    pub fn from_density(density: f64) -> Self {
        if density > 0.8 {
            Self::Solid
        } else if density > 0.5 {
            Self::Regular
        } else if density > 0.2 {
            Self::Sparse
        } else {
            Self::Empty
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPattern {
    pub level: usize,
    /// Middle of the band.
    pub height: f64,
    pub point_count: usize,
    pub density: f64,
    pub pattern: FloorPatternKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpacing {
    pub horizontal: f64,
    pub vertical: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowGrid {
    pub rows: usize,
    pub cols: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_size: Option<CellSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<GridSpacing>,
}

impl WindowGrid {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.rows * self.cols
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacadeType {
    GlassCurtain,
    Decorative,
    Modern,
    Standard,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Glass,
    Concrete,
    Metal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacadeFeatures {
    #[serde(rename = "type")]
    pub facade_type: FacadeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_grid: Option<WindowGrid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symmetry: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<BTreeSet<Material>>,
}

impl FacadeFeatures {
    pub fn unknown() -> Self {
        Self {
            facade_type: FacadeType::Unknown,
            window_grid: None,
            symmetry: None,
            complexity: None,
            materials: None,
        }
    }
}

/// Summary statistics of a point set. Every field is absent in the
/// degenerate record, which then serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Point3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    Frame,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_columns: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_beams: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_type: Option<StructureType>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, depth: f64, height: f64) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }
}

impl From<&BoundingBox> for Dimensions {
    fn from(bbox: &BoundingBox) -> Self {
        Self::new(bbox.width, bbox.depth, bbox.height)
    }
}

/// Everything extracted from one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointCloudFeatures {
    /// Raw point count before preprocessing.
    pub point_count: usize,
    pub building_contours: Vec<BuildingContour>,
    pub floor_patterns: Vec<FloorPattern>,
    pub facade_features: FacadeFeatures,
    pub spatial_stats: SpatialStatistics,
    pub structural_features: StructuralFeatures,
    pub window_grid: WindowGrid,
    pub spatial_complexity: f64,
    pub estimated_dimensions: Dimensions,
    pub estimated_floors: usize,
}
