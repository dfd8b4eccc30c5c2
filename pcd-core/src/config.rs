//! Extraction parameters.
//!
//! A [`Config`] is built once (defaults, a JSON file, CLI flags) and passed by
//! reference into every stage. Nothing in the pipeline mutates it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Voxel downsampling only runs above this many points.
    pub max_points: usize,
    pub voxel_size: f64,
    /// Minimum cluster size (DBSCAN `minPts`).
    pub min_cluster_pts: usize,
    /// Height of one floor band used for stratification.
    pub layer_height: f64,
    pub segmentation: SegmentationTuning,
    /// Outlier filtering is a passthrough unless this is set.
    pub outlier_removal: Option<OutlierRemoval>,
    pub facade_analysis: FacadeAnalysis,
    /// Seed for epsilon sampling. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_points: 10_000,
            voxel_size: 0.05,
            min_cluster_pts: 10,
            layer_height: 3.3,
            segmentation: SegmentationTuning::default(),
            outlier_removal: None,
            facade_analysis: FacadeAnalysis::default(),
            seed: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_points == 0 {
            return Err(CoreError::invalid("max_points", "must be greater than zero"));
        }
        check_positive("voxel_size", self.voxel_size)?;
        if self.min_cluster_pts == 0 {
            return Err(CoreError::invalid(
                "min_cluster_pts",
                "must be greater than zero",
            ));
        }
        check_positive("layer_height", self.layer_height)?;
        self.segmentation.validate()?;
        if let Some(outlier) = &self.outlier_removal {
            outlier.validate()?;
        }
        Ok(())
    }
}

/// Empirical constants of the segmentation chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationTuning {
    /// A gap wider than `gap_factor` times the mean gap marks a boundary.
    pub gap_factor: f64,
    pub max_gaps: usize,
    pub gap_min_points: usize,
    pub gap_min_segment: usize,
    pub eps_sample_size: usize,
    pub eps_k: usize,
    /// Fractional window of the k-distance curve scanned for the elbow.
    pub elbow_window: (f64, f64),
    pub eps_min: f64,
    pub eps_max: f64,
    pub eps_default: f64,
    pub eps_scale: f64,
    /// Extra scale applied when a building-count hint is present.
    pub eps_hint_scale: f64,
    /// The range-gap fallback only runs on inputs larger than this.
    pub fallback_min_points: usize,
    /// Range-gap fallback threshold as a fraction of the x range.
    pub fallback_gap_ratio: f64,
}

impl Default for SegmentationTuning {
    fn default() -> Self {
        Self {
            gap_factor: 3.0,
            max_gaps: 3,
            gap_min_points: 20,
            gap_min_segment: 5,
            eps_sample_size: 100,
            eps_k: 4,
            elbow_window: (0.6, 0.9),
            eps_min: 0.05,
            eps_max: 0.15,
            eps_default: 0.10,
            eps_scale: 0.5,
            eps_hint_scale: 0.3,
            fallback_min_points: 100,
            fallback_gap_ratio: 0.05,
        }
    }
}

impl SegmentationTuning {
    pub fn validate(&self) -> Result<(), CoreError> {
        check_positive("segmentation.gap_factor", self.gap_factor)?;
        if self.eps_k == 0 {
            return Err(CoreError::invalid(
                "segmentation.eps_k",
                "must be greater than zero",
            ));
        }
        let (lo, hi) = self.elbow_window;
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
            return Err(CoreError::invalid(
                "segmentation.elbow_window",
                format!("must satisfy 0 <= start <= end <= 1, got ({lo}, {hi})"),
            ));
        }
        check_positive("segmentation.eps_min", self.eps_min)?;
        check_positive("segmentation.eps_max", self.eps_max)?;
        if self.eps_min > self.eps_max {
            return Err(CoreError::invalid(
                "segmentation.eps_min",
                format!("exceeds eps_max ({} > {})", self.eps_min, self.eps_max),
            ));
        }
        check_positive("segmentation.eps_default", self.eps_default)?;
        check_positive("segmentation.eps_scale", self.eps_scale)?;
        check_positive("segmentation.eps_hint_scale", self.eps_hint_scale)?;
        check_positive("segmentation.fallback_gap_ratio", self.fallback_gap_ratio)?;
        Ok(())
    }
}

/// Radius filter applied before downsampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierRemoval {
    pub radius: f64,
    pub min_neighbors: usize,
    /// Upper bound on the fraction of points the filter may drop.
    pub max_removed_ratio: f64,
}

impl Default for OutlierRemoval {
    fn default() -> Self {
        Self {
            radius: 0.1,
            min_neighbors: 2,
            max_removed_ratio: 0.05,
        }
    }
}

impl OutlierRemoval {
    pub fn validate(&self) -> Result<(), CoreError> {
        check_positive("outlier_removal.radius", self.radius)?;
        if !(0.0..=1.0).contains(&self.max_removed_ratio) {
            return Err(CoreError::invalid(
                "outlier_removal.max_removed_ratio",
                format!("must be within [0, 1], got {}", self.max_removed_ratio),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacadeAnalysis {
    /// Fixed grid/symmetry/complexity values.
    #[default]
    Placeholder,
    /// Periodicity analysis of façade point projections.
    Projection,
}

fn check_positive(field: &'static str, value: f64) -> Result<(), CoreError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::invalid(
            field,
            format!("must be a positive finite number, got {value}"),
        ))
    }
}
