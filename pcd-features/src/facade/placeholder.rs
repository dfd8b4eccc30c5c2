use pcd_core::pointcloud::point::Point;

use super::{FacadeAnalyzer, FacadePatterns};
use crate::types::{CellSize, GridSpacing, WindowGrid};

/// Reports the same façade for every input: a 5 x 8 grid of 3000 mm cells
/// with 500 mm spacing, symmetry 0.8 and complexity 0.5.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderFacadeAnalyzer;

impl FacadeAnalyzer for PlaceholderFacadeAnalyzer {
    fn analyze(&self, _points: &[Point]) -> FacadePatterns {
        FacadePatterns {
            grid: Some(WindowGrid {
                rows: 5,
                cols: 8,
                window_size: Some(CellSize {
                    width: 3000.0,
                    height: 3000.0,
                }),
                spacing: Some(GridSpacing {
                    horizontal: 500.0,
                    vertical: 500.0,
                }),
            }),
            symmetry: 0.8,
            complexity: 0.5,
        }
    }
}
