//! Façade analysis over near-vertical surfaces.

use std::collections::BTreeSet;

use pcd_core::{config::FacadeAnalysis, pointcloud::point::Point};

use crate::types::{FacadeFeatures, FacadeType, Material, WindowGrid};

pub mod placeholder;
pub mod projection;

pub use placeholder::PlaceholderFacadeAnalyzer;
pub use projection::ProjectionFacadeAnalyzer;

/// Points whose normal is further than this from horizontal are not façade.
const VERTICAL_NORMAL_LIMIT: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct FacadePatterns {
    pub grid: Option<WindowGrid>,
    pub symmetry: f64,
    pub complexity: f64,
}

/// Finds window grids and regularity in a set of façade points.
pub trait FacadeAnalyzer: Send + Sync {
    fn analyze(&self, points: &[Point]) -> FacadePatterns;
}

pub fn analyzer_for(kind: FacadeAnalysis) -> Box<dyn FacadeAnalyzer> {
    match kind {
        FacadeAnalysis::Placeholder => Box::new(PlaceholderFacadeAnalyzer),
        FacadeAnalysis::Projection => Box::new(ProjectionFacadeAnalyzer::default()),
    }
}

/// Points lying on near-vertical surfaces. A point without a normal counts
/// as vertical.
pub fn facade_points(points: &[Point]) -> Vec<Point> {
    points
        .iter()
        .filter(|p| p.normal_z().abs() < VERTICAL_NORMAL_LIMIT)
        .copied()
        .collect()
}

pub fn classify_facade(patterns: &FacadePatterns) -> FacadeType {
    if patterns.grid.is_some_and(|grid| grid.rows > 5) {
        FacadeType::GlassCurtain
    } else if patterns.complexity > 0.7 {
        FacadeType::Decorative
    } else if patterns.symmetry > 0.8 {
        FacadeType::Modern
    } else {
        FacadeType::Standard
    }
}

pub fn infer_materials(patterns: &FacadePatterns) -> BTreeSet<Material> {
    let mut materials = BTreeSet::new();
    if patterns.grid.is_some() {
        materials.insert(Material::Glass);
    }
    if patterns.complexity < 0.3 {
        materials.insert(Material::Concrete);
    }
    if patterns.symmetry > 0.7 {
        materials.insert(Material::Metal);
    }
    materials
}

pub fn extract_facade_features(points: &[Point], analyzer: &dyn FacadeAnalyzer) -> FacadeFeatures {
    let facade = facade_points(points);
    let patterns = analyzer.analyze(&facade);
    log::debug!(
        "façade: {} of {} points vertical, grid {:?}",
        facade.len(),
        points.len(),
        patterns.grid.map(|g| (g.rows, g.cols))
    );

    FacadeFeatures {
        facade_type: classify_facade(&patterns),
        window_grid: patterns.grid,
        symmetry: Some(patterns.symmetry),
        complexity: Some(patterns.complexity),
        materials: Some(infer_materials(&patterns)),
    }
}

/// The analyzer's grid over all points, or an empty 0x0 grid.
pub fn detect_window_grid(points: &[Point], analyzer: &dyn FacadeAnalyzer) -> WindowGrid {
    analyzer.analyze(points).grid.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcd_core::pointcloud::point::Normal;

    fn patterns(rows: Option<usize>, symmetry: f64, complexity: f64) -> FacadePatterns {
        FacadePatterns {
            grid: rows.map(|rows| WindowGrid {
                rows,
                cols: 2,
                ..Default::default()
            }),
            symmetry,
            complexity,
        }
    }

    #[test]
    fn test_facade_type_rules() {
        assert_eq!(classify_facade(&patterns(Some(6), 0.0, 0.0)), FacadeType::GlassCurtain);
        assert_eq!(classify_facade(&patterns(Some(5), 0.0, 0.8)), FacadeType::Decorative);
        assert_eq!(classify_facade(&patterns(None, 0.9, 0.5)), FacadeType::Modern);
        assert_eq!(classify_facade(&patterns(None, 0.8, 0.7)), FacadeType::Standard);
    }

    #[test]
    fn test_materials() {
        let all = infer_materials(&patterns(Some(1), 0.9, 0.1));
        assert_eq!(
            all.into_iter().collect::<Vec<_>>(),
            vec![Material::Glass, Material::Concrete, Material::Metal]
        );
        assert!(infer_materials(&patterns(None, 0.7, 0.3)).is_empty());
    }

    #[test]
    fn test_facade_points_filter() {
        let points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(0.0, 0.0, 0.0).with_normal(Normal::new(1.0, 0.0, 0.0)),
            Point::new(0.0, 0.0, 0.0).with_normal(Normal::new(0.0, 0.0, -1.0)),
            Point::new(0.0, 0.0, 0.0).with_normal(Normal::new(0.0, 0.7, 0.3)),
        ];
        assert_eq!(facade_points(&points).len(), 2);
    }

    #[test]
    fn test_placeholder_features() {
        let features = extract_facade_features(&[], &PlaceholderFacadeAnalyzer);

        assert_eq!(features.facade_type, FacadeType::Standard);
        assert_eq!(features.window_grid.map(|g| g.total()), Some(40));
        let materials = features.materials.unwrap();
        assert!(materials.contains(&Material::Glass));
        assert!(materials.contains(&Material::Metal));
        assert!(!materials.contains(&Material::Concrete));
    }

    #[test]
    fn test_missing_grid_is_empty() {
        let grid = detect_window_grid(&[], &ProjectionFacadeAnalyzer::default());
        assert_eq!(grid, WindowGrid::empty());
    }
}
