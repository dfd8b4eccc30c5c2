use pcd_core::{
    config::Config,
    pointcloud::point::{Point, PointCloud},
};

use crate::{
    builder::{PreprocessTransformBuilder, TransformBuilder},
    transform::Transform,
};

pub trait Transformer {
    fn execute(&self, point_cloud: PointCloud) -> Vec<PointCloud>;
}

pub struct PointCloudTransformer {
    transform: Box<dyn Transform>,
}

impl PointCloudTransformer {
    pub fn new(transform: Box<dyn Transform>) -> Self {
        Self { transform }
    }

    pub fn from_builder(builder: &dyn TransformBuilder) -> Self {
        Self::new(builder.build())
    }
}

impl Transformer for PointCloudTransformer {
    fn execute(&self, point_cloud: PointCloud) -> Vec<PointCloud> {
        self.transform.transform(point_cloud)
    }
}

/// Runs the preprocessing chain configured by `config` and returns the
/// normalized points.
pub fn preprocess(points: Vec<Point>, config: &Config) -> Vec<Point> {
    let input_len = points.len();
    let transformer = PointCloudTransformer::from_builder(&PreprocessTransformBuilder::new(config));

    let points: Vec<Point> = transformer
        .execute(PointCloud::new(points))
        .into_iter()
        .flat_map(PointCloud::into_points)
        .collect();

    log::debug!("preprocessing: {} -> {} points", input_len, points.len());
    points
}
