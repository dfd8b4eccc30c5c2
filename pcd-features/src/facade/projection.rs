//! Window periodicity from façade point projections.
//!
//! Points are binned along the dominant horizontal axis and along z. Windows
//! show up as runs of under-populated bins between populated ones: runs on
//! the horizontal histogram are window columns, runs on the vertical one are
//! window rows.

use itertools::Itertools;
use pcd_core::pointcloud::{bounds::BoundingBox, point::Point};

use super::{FacadeAnalyzer, FacadePatterns};
use crate::types::{CellSize, GridSpacing, WindowGrid};

#[derive(Debug, Clone)]
pub struct ProjectionFacadeAnalyzer {
    pub bins: usize,
    /// Below this many points nothing is reported.
    pub min_points: usize,
    /// A bin is open when it holds less than this fraction of the reference
    /// (upper quartile) bin count.
    pub open_ratio: f64,
}

impl Default for ProjectionFacadeAnalyzer {
    fn default() -> Self {
        Self {
            bins: 24,
            min_points: 50,
            open_ratio: 0.85,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    open: bool,
    len: usize,
}

struct Profile {
    histogram: Vec<usize>,
    runs: Vec<Run>,
    bin_width: f64,
}

impl Profile {
    fn openings(&self) -> usize {
        self.runs.iter().filter(|r| r.open).count()
    }

    fn mean_open_len(&self) -> f64 {
        mean(self.runs.iter().filter(|r| r.open).map(|r| r.len as f64)) * self.bin_width
    }

    /// Mean length of the solid runs that separate two openings.
    fn mean_gap_len(&self) -> f64 {
        let inner = self
            .runs
            .iter()
            .tuple_windows()
            .filter(|(before, run, after)| before.open && !run.open && after.open)
            .map(|(_, run, _)| run.len as f64);
        mean(inner) * self.bin_width
    }
}

impl ProjectionFacadeAnalyzer {
    fn profile(&self, values: impl Iterator<Item = f64>, min: f64, extent: f64) -> Profile {
        let mut histogram = vec![0usize; self.bins];
        for v in values {
            let index = if extent > 0.0 {
                ((v - min) * self.bins as f64 / extent).floor() as usize
            } else {
                0
            };
            histogram[index.min(self.bins - 1)] += 1;
        }

        let runs = self.runs(&histogram);
        Profile {
            histogram,
            runs,
            bin_width: if extent > 0.0 {
                extent / self.bins as f64
            } else {
                0.0
            },
        }
    }

    /// Runs of open and solid bins, without the open runs at either end.
    fn runs(&self, histogram: &[usize]) -> Vec<Run> {
        let mut sorted = histogram.to_vec();
        sorted.sort_unstable();
        let reference = sorted[(sorted.len() * 3 / 4).min(sorted.len() - 1)] as f64;
        let threshold = reference * self.open_ratio;

        let mut runs: Vec<Run> = histogram
            .iter()
            .map(|&count| (count as f64) < threshold)
            .dedup_with_count()
            .map(|(len, open)| Run { open, len })
            .collect();

        while runs.last().is_some_and(|r| r.open) {
            runs.pop();
        }
        let leading = runs.iter().take_while(|r| r.open).count();
        runs.drain(..leading);
        runs
    }
}

impl FacadeAnalyzer for ProjectionFacadeAnalyzer {
    fn analyze(&self, points: &[Point]) -> FacadePatterns {
        if points.len() < self.min_points || self.bins == 0 {
            return FacadePatterns {
                grid: None,
                symmetry: 0.0,
                complexity: 0.0,
            };
        }

        let bbox = BoundingBox::from_points(points);
        let horizontal = if bbox.width >= bbox.depth {
            self.profile(points.iter().map(|p| p.x), bbox.min.x, bbox.width)
        } else {
            self.profile(points.iter().map(|p| p.y), bbox.min.y, bbox.depth)
        };
        let vertical = self.profile(points.iter().map(|p| p.z), bbox.min.z, bbox.height);

        let cols = horizontal.openings();
        let rows = vertical.openings();
        let grid = (rows > 0 && cols > 0).then(|| WindowGrid {
            rows,
            cols,
            window_size: Some(CellSize {
                width: horizontal.mean_open_len(),
                height: vertical.mean_open_len(),
            }),
            spacing: Some(GridSpacing {
                horizontal: horizontal.mean_gap_len(),
                vertical: vertical.mean_gap_len(),
            }),
        });

        let run_lengths: Vec<f64> = horizontal
            .runs
            .iter()
            .chain(&vertical.runs)
            .map(|r| r.len as f64)
            .collect();

        FacadePatterns {
            grid,
            symmetry: mirror_symmetry(&horizontal.histogram),
            complexity: variation(&run_lengths).min(1.0),
        }
    }
}

/// `1 - sum|h[i] - h[n-1-i]| / sum(h[i] + h[n-1-i])`; 0 for an empty
/// histogram.
fn mirror_symmetry(histogram: &[usize]) -> f64 {
    let (difference, total) = histogram
        .iter()
        .zip(histogram.iter().rev())
        .fold((0.0, 0.0), |(d, t), (&a, &b)| {
            (d + (a as f64 - b as f64).abs(), t + (a + b) as f64)
        });
    if total > 0.0 {
        1.0 - difference / total
    } else {
        0.0
    }
}

/// Coefficient of variation; 0 for fewer than two values.
fn variation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values.iter().copied());
    if m <= 0.0 {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt() / m
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
