use serde::{Deserialize, Serialize};

use super::bounds::BoundingBox;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Normal {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Normal {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

// Points coming from depth maps or JSON payloads frequently omit z and the
// optional attributes, so every field but x/y falls back to a default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<Normal>,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            intensity: None,
            normal: None,
        }
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn with_normal(mut self, normal: Normal) -> Self {
        self.normal = Some(normal);
        self
    }

    /// True when x, y and z are all finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn squared_distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.squared_distance(other).sqrt()
    }

    /// Vertical component of the surface normal, 0 when the point carries none.
    pub fn normal_z(&self) -> f64 {
        self.normal.map(|n| n.z).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub point_count: usize,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "PointList")]
pub struct PointCloud {
    pub points: Vec<Point>,
    pub metadata: Metadata,
}

#[derive(Deserialize)]
struct PointList {
    #[serde(default)]
    points: Vec<Point>,
}

impl From<PointList> for PointCloud {
    fn from(list: PointList) -> Self {
        PointCloud::new(list.points)
    }
}

impl PointCloud {
    pub fn new(points: Vec<Point>) -> Self {
        let metadata = Metadata {
            point_count: points.len(),
            bounding_box: BoundingBox::from_points(&points),
        };

        PointCloud { points, metadata }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.metadata.bounding_box
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}
