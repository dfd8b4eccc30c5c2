use pcd_core::pointcloud::{
    bounds::extent_or_one,
    point::{Point, PointCloud},
};

/// Maps every axis linearly onto `[0, 1]`. A zero extent is treated as 1,
/// which leaves that axis at 0 instead of dividing by zero.
pub struct NormalizeTransform;

impl NormalizeTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NormalizeTransform {
    fn default() -> Self {
        Self
    }
}

impl super::Transform for NormalizeTransform {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn transform(&self, point_cloud: PointCloud) -> Vec<PointCloud> {
        if point_cloud.is_empty() {
            return vec![point_cloud];
        }

        let bbox = *point_cloud.bounding_box();
        let width = extent_or_one(bbox.width);
        let depth = extent_or_one(bbox.depth);
        let height = extent_or_one(bbox.height);

        let normalized = point_cloud
            .points
            .iter()
            .map(|p| Point {
                x: (p.x - bbox.min.x) / width,
                y: (p.y - bbox.min.y) / depth,
                z: (p.z - bbox.min.z) / height,
                ..*p
            })
            .collect();

        vec![PointCloud::new(normalized)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use approx::assert_abs_diff_eq;
    use pcd_core::pointcloud::point::Normal;

    fn normalize(points: Vec<Point>) -> Vec<Point> {
        NormalizeTransform::new()
            .transform(PointCloud::new(points))
            .remove(0)
            .into_points()
    }

    #[test]
    fn test_maps_into_unit_cube() {
        let points = normalize(vec![
            Point::new(10.0, -5.0, 100.0),
            Point::new(20.0, 5.0, 300.0),
            Point::new(15.0, 0.0, 200.0),
        ]);

        assert_eq!(points[0], Point::new(0.0, 0.0, 0.0));
        assert_eq!(points[1], Point::new(1.0, 1.0, 1.0));
        assert_abs_diff_eq!(points[2].x, 0.5);
        assert_abs_diff_eq!(points[2].y, 0.5);
        assert_abs_diff_eq!(points[2].z, 0.5);
    }

    #[test]
    fn test_is_idempotent() {
        let once = normalize(vec![
            Point::new(0.3, 7.0, -1.0),
            Point::new(2.9, 1.5, 4.0),
            Point::new(1.1, 3.3, 0.0),
            Point::new(0.0, 0.0, 2.5),
        ]);
        let twice = normalize(once.clone());

        for (a, b) in once.iter().zip(&twice) {
            assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-12);
            assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-12);
            assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_extent_is_guarded() {
        let points = normalize(vec![Point::new(5.0, 5.0, 5.0), Point::new(5.0, 6.0, 5.0)]);
        assert!(points.iter().all(|p| p.x == 0.0 && p.z == 0.0));
        assert_eq!(points[1].y, 1.0);
    }

    #[test]
    fn test_passes_other_fields_through() {
        let point = Point::new(1.0, 2.0, 3.0)
            .with_intensity(0.4)
            .with_normal(Normal::new(1.0, 0.0, 0.0));
        let points = normalize(vec![point, Point::new(2.0, 3.0, 4.0)]);
        assert_eq!(points[0].intensity, Some(0.4));
        assert_eq!(points[0].normal, Some(Normal::new(1.0, 0.0, 0.0)));
    }
}
