//! Input record for the downstream encoder and the local detail encoding
//! used when that encoder is not reachable.

use pcd_core::scene::{DetectedObject, SceneInput};
use serde::{Deserialize, Serialize};

use crate::{
    fusion::{overall_confidence, ModalityConfidences},
    types::{Dimensions, FacadeType, PointCloudFeatures, WindowGrid},
};

const KEYWORD_SUFFIXES: [char; 2] = ['层', '楼'];
const KEYWORD_TERMS: [&str; 3] = ["办公", "住宅", "商业"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFeatures {
    pub content: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionFeatures {
    pub objects: Vec<DetectedObject>,
    pub scene: Option<String>,
    pub view_type: Option<String>,
    pub building_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialSummary {
    pub point_count: usize,
    pub dimensions: Dimensions,
    pub floors: usize,
    pub contours: usize,
    pub complexity: f64,
    pub window_grid: WindowGrid,
    pub facade_type: FacadeType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMetadata {
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerInput {
    pub text: TextFeatures,
    pub vision: VisionFeatures,
    pub spatial: SpatialSummary,
    pub metadata: InputMetadata,
}

pub fn prepare_transformer_input(scene: &SceneInput, features: &PointCloudFeatures) -> TransformerInput {
    let content = scene.ocr.text.clone().unwrap_or_default();
    let vision = scene.vision.as_ref();

    let floors = [features.estimated_floors, features.building_contours.len()]
        .into_iter()
        .find(|&n| n > 0)
        .unwrap_or(1);

    TransformerInput {
        text: TextFeatures {
            keywords: extract_keywords(&content),
            content,
        },
        vision: VisionFeatures {
            objects: scene.detection.objects.clone(),
            scene: vision.and_then(|v| v.scene_type.clone()),
            view_type: vision.and_then(|v| v.view_type.clone()),
            building_count: vision
                .and_then(|v| v.buildings.as_ref())
                .map(Vec::len)
                .filter(|&n| n > 0)
                .unwrap_or(1),
        },
        spatial: SpatialSummary {
            point_count: features.point_count,
            dimensions: features.estimated_dimensions,
            floors,
            contours: features.building_contours.len(),
            complexity: features.spatial_complexity,
            window_grid: features.window_grid,
            facade_type: features.facade_features.facade_type,
        },
        metadata: InputMetadata {
            confidence: overall_confidence(
                &ModalityConfidences::from_scene(scene),
                features.point_count,
            ),
        },
    }
}

/// Floor counts such as `12层` or `3楼` followed by building-use terms, each
/// in order of appearance.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut keywords = Vec::new();

    for suffix in KEYWORD_SUFFIXES {
        let mut digits = String::new();
        for c in text.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            if c == suffix && !digits.is_empty() {
                keywords.push(format!("{digits}{suffix}"));
            }
            digits.clear();
        }
    }

    for term in KEYWORD_TERMS {
        keywords.extend(text.matches(term).map(str::to_string));
    }

    keywords
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowLayout {
    Continuous,
    Discrete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowPattern {
    pub regularity: f64,
    pub density: f64,
    pub vertical_rhythm: f64,
    pub pattern: WindowLayout,
}

/// Depths in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowDepth {
    pub estimated_depth: f64,
    pub overhang_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorDetails {
    pub ground_floor_scale: f64,
    pub has_setback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumetricFeatures {
    pub entrance_depth: f64,
    pub balcony_protrusion: f64,
    pub complexity: f64,
    pub has_recesses: bool,
    pub has_protrusions: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingDetails {
    pub window_pattern: WindowPattern,
    pub shadow_depth: ShadowDepth,
    pub floor_details: FloorDetails,
    pub volumetric: VolumetricFeatures,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedFeatures {
    pub vector: Vec<f64>,
    pub dimension: usize,
    pub details: EncodingDetails,
    pub key_features: Vec<String>,
}

/// Encodes façade and massing details into a fixed 10-element vector.
pub fn local_encode(input: &TransformerInput) -> EncodedFeatures {
    let window_pattern = window_pattern(&input.spatial);
    let shadow_depth = shadow_depth(&input.vision.objects);
    let floor_details = floor_details(&input.spatial);
    let volumetric = volumetric_features(&input.spatial);

    let vector = vec![
        window_pattern.regularity,
        window_pattern.density,
        window_pattern.vertical_rhythm,
        shadow_depth.estimated_depth / 5000.0,
        shadow_depth.overhang_ratio,
        floor_details.ground_floor_scale,
        if floor_details.has_setback { 1.0 } else { 0.0 },
        volumetric.entrance_depth / 3000.0,
        volumetric.balcony_protrusion / 2000.0,
        volumetric.complexity,
    ];

    let key_features = vec![
        format!("Window regularity: {:.0}%", window_pattern.regularity * 100.0),
        format!("Shadow depth: {}mm", shadow_depth.estimated_depth),
        format!(
            "Floor variation: {}",
            if floor_details.has_setback { "setback" } else { "standard" }
        ),
        format!("Entrance depth: {}mm", volumetric.entrance_depth),
        format!(
            "Façade complexity: {}",
            if volumetric.complexity > 0.7 { "high" } else { "medium" }
        ),
    ];

    log::debug!("local encoding: {:?}", vector);

    EncodedFeatures {
        dimension: vector.len(),
        vector,
        details: EncodingDetails {
            window_pattern,
            shadow_depth,
            floor_details,
            volumetric,
        },
        key_features,
    }
}

fn window_pattern(spatial: &SpatialSummary) -> WindowPattern {
    let grid = &spatial.window_grid;
    WindowPattern {
        regularity: if grid.rows > 0 { 0.9 } else { 0.3 },
        density: grid.total() as f64 / 50.0,
        vertical_rhythm: if grid.rows > 3 { 0.8 } else { 0.4 },
        pattern: if spatial.facade_type == FacadeType::GlassCurtain {
            WindowLayout::Continuous
        } else {
            WindowLayout::Discrete
        },
    }
}

/// Shadows are assumed when a detection mentions one or is itself unsure.
fn shadow_depth(objects: &[DetectedObject]) -> ShadowDepth {
    let has_shadow = objects.iter().any(|o| {
        o.label.as_deref().is_some_and(|l| l.contains("shadow"))
            || o.confidence.is_some_and(|c| c < 0.5)
    });

    if has_shadow {
        ShadowDepth {
            estimated_depth: 2500.0,
            overhang_ratio: 0.3,
        }
    } else {
        ShadowDepth {
            estimated_depth: 500.0,
            overhang_ratio: 0.1,
        }
    }
}

fn floor_details(spatial: &SpatialSummary) -> FloorDetails {
    let floors = if spatial.floors > 0 { spatial.floors } else { 3 };
    let height = if spatial.dimensions.height > 0.0 {
        spatial.dimensions.height
    } else {
        10000.0
    };
    let average = height / floors as f64;

    FloorDetails {
        ground_floor_scale: if average > 3500.0 { 1.5 } else { 1.0 },
        has_setback: floors > 5,
    }
}

fn volumetric_features(spatial: &SpatialSummary) -> VolumetricFeatures {
    let complexity = if spatial.complexity > 0.0 {
        spatial.complexity
    } else {
        0.5
    };

    VolumetricFeatures {
        entrance_depth: if complexity > 0.6 { 2000.0 } else { 500.0 },
        balcony_protrusion: if complexity > 0.5 { 1500.0 } else { 0.0 },
        complexity,
        has_recesses: complexity > 0.6,
        has_protrusions: complexity > 0.5,
    }
}
