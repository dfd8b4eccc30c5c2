use pcd_core::config::Config;

use crate::transform::{
    CompositeTransform, NormalizeTransform, OutlierTransform, Transform,
    VoxelDownsampleTransform,
};

pub trait TransformBuilder {
    fn build(&self) -> Box<dyn Transform>;
}

/// Outlier removal, voxel downsampling and normalization, in that order.
pub struct PreprocessTransformBuilder {
    config: Config,
}

impl PreprocessTransformBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl TransformBuilder for PreprocessTransformBuilder {
    fn build(&self) -> Box<dyn Transform> {
        let outlier = Box::new(OutlierTransform::new(self.config.outlier_removal.clone()));
        let voxel = Box::new(VoxelDownsampleTransform::new(
            self.config.max_points,
            self.config.voxel_size,
        ));
        let normalize = Box::new(NormalizeTransform::new());

        Box::new(CompositeTransform::new(vec![outlier, voxel, normalize]))
    }
}
