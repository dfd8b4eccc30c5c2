use serde::{Deserialize, Serialize};

use super::point::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned bounds of a point set.
///
/// An empty set produces an all-zero box, so extents are never negative and
/// never `NaN` or infinite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3,
    pub max: Point3,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Points with a non-finite coordinate are ignored; when none is left
    /// the box is all zero.
    pub fn from_points(points: &[Point]) -> Self {
        let mut finite = points.iter().filter(|p| p.is_finite()).peekable();
        if finite.peek().is_none() {
            return Self::default();
        }

        let mut min = [f64::MAX, f64::MAX, f64::MAX];
        let mut max = [f64::MIN, f64::MIN, f64::MIN];

        for point in finite {
            min[0] = min[0].min(point.x);
            min[1] = min[1].min(point.y);
            min[2] = min[2].min(point.z);
            max[0] = max[0].max(point.x);
            max[1] = max[1].max(point.y);
            max[2] = max[2].max(point.z);
        }

        BoundingBox {
            min: Point3::new(min[0], min[1], min[2]),
            max: Point3::new(max[0], max[1], max[2]),
            width: max[0] - min[0],
            depth: max[1] - min[1],
            height: max[2] - min[2],
        }
    }

    pub fn volume(&self) -> f64 {
        self.width * self.depth * self.height
    }

    /// Volume with every zero extent replaced by 1.
    pub fn guarded_volume(&self) -> f64 {
        extent_or_one(self.width) * extent_or_one(self.depth) * extent_or_one(self.height)
    }

    /// Footprint area with every zero extent replaced by 1.
    pub fn guarded_footprint(&self) -> f64 {
        extent_or_one(self.width) * extent_or_one(self.depth)
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// Replaces a degenerate extent with 1 so it can be used as a divisor.
pub fn extent_or_one(extent: f64) -> f64 {
    if extent > 0.0 && extent.is_finite() {
        extent
    } else {
        1.0
    }
}

/// Arithmetic mean of the finite points, origin when there are none.
pub fn centroid(points: &[Point]) -> Point3 {
    let (sx, sy, sz, n) = points
        .iter()
        .filter(|p| p.is_finite())
        .fold((0.0, 0.0, 0.0, 0usize), |acc, p| {
            (acc.0 + p.x, acc.1 + p.y, acc.2 + p.z, acc.3 + 1)
        });
    if n == 0 {
        return Point3::default();
    }
    let n = n as f64;

    Point3::new(sx / n, sy / n, sz / n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_points_give_zero_box() {
        let bbox = BoundingBox::from_points(&[]);
        assert_eq!(bbox, BoundingBox::default());
        assert_eq!(bbox.guarded_volume(), 1.0);
        assert!(bbox.width.is_finite());
    }

    #[test]
    fn test_every_point_inside_bounds() {
        let points = vec![
            Point::new(-1.0, 2.0, 3.0),
            Point::new(4.0, -5.0, 0.5),
            Point::new(0.0, 0.0, -2.0),
        ];
        let bbox = BoundingBox::from_points(&points);

        assert!(points.iter().all(|p| bbox.contains(p)));
        assert_eq!(bbox.width, 5.0);
        assert_eq!(bbox.depth, 7.0);
        assert_eq!(bbox.height, 5.0);
        assert!(bbox.width >= 0.0 && bbox.depth >= 0.0 && bbox.height >= 0.0);
    }

    #[test]
    fn test_single_point_is_degenerate_but_finite() {
        let bbox = BoundingBox::from_points(&[Point::new(1.0, 1.0, 1.0)]);
        assert_eq!(bbox.volume(), 0.0);
        assert_eq!(bbox.guarded_footprint(), 1.0);
    }

    #[test]
    fn test_non_finite_points_are_ignored() {
        let points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 2.0, f64::NAN),
            Point::new(f64::INFINITY, 5.0, 5.0),
            Point::new(2.0, 1.0, 3.0),
        ];
        let bbox = BoundingBox::from_points(&points);
        assert_eq!(bbox.width, 2.0);
        assert_eq!(bbox.depth, 1.0);
        assert_eq!(bbox.height, 3.0);

        let bbox = BoundingBox::from_points(&[Point::new(1.0, 2.0, f64::NAN)]);
        assert_eq!(bbox, BoundingBox::default());
        assert!(bbox.height.is_finite());
    }

    #[test]
    fn test_centroid() {
        let points = vec![Point::new(0.0, 0.0, 0.0), Point::new(2.0, 4.0, 6.0)];
        assert_eq!(centroid(&points), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(centroid(&[]), Point3::default());
        assert_eq!(
            centroid(&[Point::new(4.0, 4.0, 4.0), Point::new(f64::NAN, 0.0, 0.0)]),
            Point3::new(4.0, 4.0, 4.0)
        );
    }
}
