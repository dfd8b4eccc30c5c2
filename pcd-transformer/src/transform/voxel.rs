use pcd_core::pointcloud::{
    decimation::decimator::{PointCloudDecimator, VoxelDecimator},
    point::PointCloud,
};

/// Voxel downsampling, applied only to clouds larger than `max_points`.
pub struct VoxelDownsampleTransform {
    max_points: usize,
    decimator: VoxelDecimator,
}

impl VoxelDownsampleTransform {
    pub fn new(max_points: usize, voxel_size: f64) -> Self {
        Self {
            max_points,
            decimator: VoxelDecimator { voxel_size },
        }
    }
}

impl super::Transform for VoxelDownsampleTransform {
    fn name(&self) -> &'static str {
        "voxel_downsample"
    }

    fn transform(&self, point_cloud: PointCloud) -> Vec<PointCloud> {
        if point_cloud.len() <= self.max_points {
            return vec![point_cloud];
        }

        let decimated = self.decimator.decimate(&point_cloud.points);
        log::info!(
            "downsampled {} points to {} (voxel size {})",
            point_cloud.len(),
            decimated.len(),
            self.decimator.voxel_size
        );
        vec![PointCloud::new(decimated)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use pcd_core::pointcloud::point::Point;

    fn dense_patch() -> Vec<Point> {
        (0..20)
            .flat_map(|i| (0..20).map(move |j| Point::new(i as f64 * 0.01, j as f64 * 0.01, 0.0)))
            .collect()
    }

    #[test]
    fn test_below_cap_is_untouched() {
        let points = dense_patch();
        let result = VoxelDownsampleTransform::new(400, 0.05).transform(PointCloud::new(points.clone()));
        assert_eq!(result[0].points, points);
    }

    #[test]
    fn test_above_cap_is_decimated() {
        let result = VoxelDownsampleTransform::new(399, 0.05).transform(PointCloud::new(dense_patch()));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].len(), 16);
        assert_eq!(result[0].points[0], Point::new(0.0, 0.0, 0.0));
    }
}
