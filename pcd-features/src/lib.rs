//! Structural features of buildings from point clouds, depth maps or
//! reported building volumes.

pub mod contour;
pub mod encoding;
pub mod extractor;
pub mod facade;
pub mod fallback;
pub mod floors;
pub mod fusion;
pub mod pipeline;
pub mod refine;
pub mod source;
pub mod stats;
pub mod types;

pub use extractor::FeatureExtractor;
pub use pipeline::{run_pipeline, PipelineResult};
pub use types::PointCloudFeatures;

use pcd_core::{config::Config, error::CoreError, scene::SceneInput};
use rand::RngCore;

/// Extracts features from one scene with a fresh extractor for `config`.
pub fn segment_and_extract(
    input: &SceneInput,
    config: &Config,
) -> Result<PointCloudFeatures, CoreError> {
    Ok(FeatureExtractor::new(config.clone())?.extract(input))
}

pub fn segment_and_extract_with_rng<R: RngCore>(
    input: &SceneInput,
    config: &Config,
    rng: &mut R,
) -> Result<PointCloudFeatures, CoreError> {
    Ok(FeatureExtractor::new(config.clone())?.extract_with_rng(input, rng))
}
