use pcd_core::pointcloud::point::PointCloud;

pub mod normalize;
pub mod outlier;
pub mod voxel;

pub use normalize::NormalizeTransform;
pub use outlier::OutlierTransform;
pub use voxel::VoxelDownsampleTransform;

pub trait Transform {
    fn name(&self) -> &'static str;

    fn transform(&self, point_cloud: PointCloud) -> Vec<PointCloud>;
}

pub struct CompositeTransform {
    transforms: Vec<Box<dyn Transform>>,
}

impl CompositeTransform {
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        Self { transforms }
    }
}

impl Transform for CompositeTransform {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn transform(&self, point_cloud: PointCloud) -> Vec<PointCloud> {
        let mut intermediate = vec![point_cloud];

        for transform in &self.transforms {
            let mut next_stage = Vec::new();
            for pc in intermediate {
                let transformed = transform.transform(pc);
                next_stage.extend(transformed);
            }
            log::debug!(
                "{}: {} points",
                transform.name(),
                next_stage.iter().map(PointCloud::len).sum::<usize>()
            );
            intermediate = next_stage;
        }

        intermediate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcd_core::pointcloud::point::Point;

    struct Halve;

    impl Transform for Halve {
        fn name(&self) -> &'static str {
            "halve"
        }

        fn transform(&self, point_cloud: PointCloud) -> Vec<PointCloud> {
            let mut points = point_cloud.into_points();
            let right = points.split_off(points.len() / 2);
            vec![PointCloud::new(points), PointCloud::new(right)]
        }
    }

    #[test]
    fn test_composite_chains_and_flattens() {
        let points = (0..8).map(|i| Point::new(i as f64, 0.0, 0.0)).collect();
        let composite = CompositeTransform::new(vec![Box::new(Halve), Box::new(Halve)]);

        let result = composite.transform(PointCloud::new(points));

        assert_eq!(result.len(), 4);
        assert!(result.iter().all(|pc| pc.len() == 2));
        assert_eq!(result[3].points[1].x, 7.0);
    }
}
