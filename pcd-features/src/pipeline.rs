//! End-to-end run over one scene without the remote encoder or language
//! model: extraction, encoder input, local encoding and refinement.

use pcd_core::scene::SceneInput;
use serde::{Deserialize, Serialize};

use crate::{
    encoding::{local_encode, prepare_transformer_input, EncodedFeatures, TransformerInput},
    extractor::FeatureExtractor,
    fusion::{overall_confidence, ModalityConfidences},
    refine::{refine_result, InferenceResult, RefinedResult},
    types::PointCloudFeatures,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineFeatures {
    pub point_cloud: PointCloudFeatures,
    pub transformer_input: TransformerInput,
    pub transformer: EncodedFeatures,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub parameters: RefinedResult,
    pub confidence: f64,
    pub features: PipelineFeatures,
}

pub fn run_pipeline(extractor: &FeatureExtractor, scene: &SceneInput) -> PipelineResult {
    let features = extractor.extract(scene);
    assemble(scene, features)
}

pub fn assemble(scene: &SceneInput, features: PointCloudFeatures) -> PipelineResult {
    let transformer_input = prepare_transformer_input(scene, &features);
    let encoded = local_encode(&transformer_input);
    let inference = InferenceResult::from_features(scene, &features);
    let parameters = refine_result(&inference, &features);

    PipelineResult {
        confidence: overall_confidence(
            &ModalityConfidences::from_scene(scene),
            features.point_count,
        ),
        parameters,
        features: PipelineFeatures {
            point_cloud: features,
            transformer_input,
            transformer: encoded,
        },
    }
}
