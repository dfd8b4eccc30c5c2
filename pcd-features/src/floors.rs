//! Horizontal banding of a point set into floors.

use pcd_core::pointcloud::{bounds::BoundingBox, point::Point};

use crate::types::{FloorPattern, FloorPatternKind};

#[derive(Debug, Clone, PartialEq)]
pub struct FloorLayer {
    pub points: Vec<Point>,
    pub average_height: f64,
    /// Points per unit of footprint area.
    pub density: f64,
}

impl FloorLayer {
    pub fn pattern(&self) -> FloorPatternKind {
        FloorPatternKind::from_density(self.density)
    }
}

/// Splits `points` into bands `[min.z + i*h, min.z + (i+1)*h)` for
/// `i < ceil(height / h)` and returns the non-empty ones, lowest first.
pub fn stratify_by_height(points: &[Point], layer_height: f64) -> Vec<FloorLayer> {
    if points.is_empty() || !(layer_height > 0.0) {
        return Vec::new();
    }

    let bbox = BoundingBox::from_points(points);
    let footprint = bbox.guarded_footprint();
    let layer_count = (bbox.height / layer_height).ceil() as usize;

    (0..layer_count)
        .filter_map(|i| {
            let min_z = bbox.min.z + i as f64 * layer_height;
            let max_z = min_z + layer_height;
            let layer_points: Vec<Point> = points
                .iter()
                .filter(|p| p.z >= min_z && p.z < max_z)
                .copied()
                .collect();

            (!layer_points.is_empty()).then(|| FloorLayer {
                density: layer_points.len() as f64 / footprint,
                average_height: (min_z + max_z) / 2.0,
                points: layer_points,
            })
        })
        .collect()
}

pub fn extract_floor_patterns(points: &[Point], layer_height: f64) -> Vec<FloorPattern> {
    stratify_by_height(points, layer_height)
        .iter()
        .enumerate()
        .map(|(level, layer)| FloorPattern {
            level,
            height: layer.average_height,
            point_count: layer.points.len(),
            density: layer.density,
            pattern: layer.pattern(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn column(zs: &[f64]) -> Vec<Point> {
        zs.iter().map(|&z| Point::new(0.0, 0.0, z)).collect()
    }

    #[test]
    fn test_bands_are_half_open() {
        // Height 6.6 gives two bands; the top point sits on the upper bound
        // of the second band and is left out.
        let layers = stratify_by_height(&column(&[0.0, 1.0, 3.3, 6.6]), 3.3);

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].points.len(), 2);
        assert_eq!(layers[1].points.len(), 1);
        assert_relative_eq!(layers[0].average_height, 1.65);
    }

    #[test]
    fn test_empty_bands_are_skipped() {
        let patterns = extract_floor_patterns(&column(&[0.0, 0.5, 10.0]), 3.3);

        // Bands 0..=3 exist; only the first and last hold points.
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].level, 0);
        assert_eq!(patterns[1].level, 1);
        assert_eq!(patterns[1].point_count, 1);
    }

    #[test]
    fn test_density_uses_guarded_footprint() {
        let points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 0.5),
            Point::new(1.0, 0.0, 1.0),
        ];
        let patterns = extract_floor_patterns(&points, 3.3);

        assert_eq!(patterns.len(), 1);
        // Depth is zero, so the footprint is 2 x 1.
        assert_relative_eq!(patterns[0].density, 1.5);
        assert_eq!(patterns[0].pattern, FloorPatternKind::Solid);
    }

    #[test]
    fn test_flat_cloud_has_no_layers() {
        assert!(stratify_by_height(&column(&[1.0, 1.0]), 3.3).is_empty());
        assert!(stratify_by_height(&[], 3.3).is_empty());
    }
}
