use pcd_core::{config::Config, error::CoreError, scene::SceneInput};
use pcd_segmentation::Segmenter;
use pcd_transformer::preprocess;
use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::{
    facade::{analyzer_for, FacadeAnalyzer},
    fallback::default_features,
    fusion::fuse_features,
    source::{resolve_points, VolumePointGenerator, VolumeShellGenerator},
    types::PointCloudFeatures,
};

/// Runs the whole extraction for one scene: source resolution,
/// preprocessing, segmentation and feature fusion.
///
/// Holds no state between calls; one extractor can serve many scenes, also
/// from several threads.
pub struct FeatureExtractor {
    config: Config,
    segmenter: Segmenter,
    generator: Box<dyn VolumePointGenerator>,
    analyzer: Box<dyn FacadeAnalyzer>,
}

impl FeatureExtractor {
    pub fn new(config: Config) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            segmenter: Segmenter::from_config(&config),
            analyzer: analyzer_for(config.facade_analysis),
            generator: Box::new(VolumeShellGenerator::default()),
            config,
        })
    }

    pub fn with_generator(mut self, generator: Box<dyn VolumePointGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_analyzer(mut self, analyzer: Box<dyn FacadeAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Seeded from `Config::seed` when set, otherwise from the OS.
    pub fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn extract(&self, scene: &SceneInput) -> PointCloudFeatures {
        let mut rng = self.rng();
        self.extract_with_rng(scene, &mut rng)
    }

    pub fn extract_with_rng(&self, scene: &SceneInput, rng: &mut dyn RngCore) -> PointCloudFeatures {
        let points = resolve_points(
            scene.point_cloud(),
            scene.depth_map(),
            scene.vision.as_ref(),
            self.generator.as_ref(),
        );
        if points.is_empty() {
            log::warn!("No points available, returning default features");
            return default_features();
        }

        let point_count = points.len();
        let expected = scene.expected_building_count();
        if let Some(count) = expected {
            log::info!("Vision stage reports {} buildings", count);
        }

        let processed = preprocess(points, &self.config);
        let clusters = self.segmenter.segment(&processed, expected, rng);

        fuse_features(
            point_count,
            &processed,
            &clusters,
            &self.config,
            self.analyzer.as_ref(),
        )
    }
}
