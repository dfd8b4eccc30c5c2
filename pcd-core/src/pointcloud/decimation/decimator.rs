use std::collections::HashSet;

use crate::pointcloud::point::Point;

pub trait PointCloudDecimator {
    fn decimate(&self, points: &[Point]) -> Vec<Point>;
}

/// Keeps the first point encountered in every occupied voxel.
///
/// Output order follows input order, so the result is deterministic for a
/// given point order.
pub struct VoxelDecimator {
    pub voxel_size: f64,
}

impl PointCloudDecimator for VoxelDecimator {
    fn decimate(&self, points: &[Point]) -> Vec<Point> {
        let voxel_size = self.voxel_size;
        if !(voxel_size > 0.0 && voxel_size.is_finite()) {
            return points.to_vec();
        }

        let mut occupied: HashSet<(i64, i64, i64)> = HashSet::with_capacity(points.len());
        let mut decimated_points = Vec::new();

        for point in points {
            let index = self.get_voxel_index(point, voxel_size);
            if occupied.insert(index) {
                decimated_points.push(*point);
            }
        }

        log::debug!(
            "voxel decimation: {} points -> {} cells",
            points.len(),
            decimated_points.len()
        );

        decimated_points
    }
}

impl VoxelDecimator {
    pub fn new(voxel_size: f64) -> Self {
        Self { voxel_size }
    }

    fn get_voxel_index(&self, point: &Point, voxel_size: f64) -> (i64, i64, i64) {
        let x_idx = (point.x / voxel_size).floor() as i64;
        let y_idx = (point.y / voxel_size).floor() as i64;
        let z_idx = (point.z / voxel_size).floor() as i64;
        (x_idx, y_idx, z_idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_point_per_voxel() {
        let points = vec![
            Point::new(0.01, 0.01, 0.0).with_intensity(1.0),
            Point::new(0.02, 0.03, 0.0).with_intensity(2.0),
            Point::new(0.07, 0.01, 0.0).with_intensity(3.0),
            Point::new(0.04, 0.04, 0.04).with_intensity(4.0),
        ];

        let decimated = VoxelDecimator::new(0.05).decimate(&points);

        assert_eq!(decimated.len(), 2);
        assert_eq!(decimated[0].intensity, Some(1.0));
        assert_eq!(decimated[1].intensity, Some(3.0));
    }

    #[test]
    fn test_grid_collapse() {
        let mut points = Vec::new();
        for i in 0..10 {
            for j in 0..10 {
                points.push(Point::new(i as f64 * 0.01, j as f64 * 0.01, 0.0));
            }
        }

        assert_eq!(VoxelDecimator::new(0.2).decimate(&points).len(), 1);
        assert_eq!(VoxelDecimator::new(0.05).decimate(&points).len(), 4);
    }

    #[test]
    fn test_negative_coordinates_use_floor() {
        let points = vec![Point::new(-0.01, 0.0, 0.0), Point::new(0.01, 0.0, 0.0)];
        assert_eq!(VoxelDecimator::new(0.05).decimate(&points).len(), 2);
    }

    #[test]
    fn test_invalid_voxel_size_is_passthrough() {
        let points = vec![Point::new(0.0, 0.0, 0.0), Point::new(0.0, 0.0, 0.0)];
        assert_eq!(VoxelDecimator::new(0.0).decimate(&points).len(), 2);
    }
}
