//! Where the points come from.
//!
//! A scene may carry a measured point cloud, a list of building volumes
//! reported by the vision stage, or a depth raster. They are tried in that
//! order; a scene with none of them yields no points.

use itertools::Itertools;
use pcd_core::{
    pointcloud::point::{Normal, Point, PointCloud},
    scene::{DepthMap, VisionContext, Volume},
};

/// Sampling stride of [`rasterize_depth_map`] along both axes.
pub const DEPTH_STRIDE: usize = 5;
/// Depth to z scale of [`rasterize_depth_map`].
pub const DEPTH_SCALE: f64 = 100.0;

/// Synthesizes points for building volumes reported without geometry.
pub trait VolumePointGenerator: Send + Sync {
    fn generate(&self, volumes: &[Volume]) -> Vec<Point>;
}

pub fn resolve_points(
    point_cloud: Option<&PointCloud>,
    depth_map: Option<&DepthMap>,
    vision: Option<&VisionContext>,
    generator: &dyn VolumePointGenerator,
) -> Vec<Point> {
    if let Some(cloud) = point_cloud.filter(|pc| !pc.is_empty()) {
        log::debug!("Using {} measured points", cloud.len());
        return finite_points(&cloud.points);
    }

    if let Some(volumes) = vision.map(VisionContext::volumes).filter(|v| !v.is_empty()) {
        let points = finite_points(&generator.generate(volumes));
        log::info!(
            "Generated {} points from {} building volumes",
            points.len(),
            volumes.len()
        );
        return points;
    }

    if let Some(map) = depth_map {
        let points = rasterize_depth_map(map);
        log::info!(
            "Rasterized {}x{} depth map into {} points",
            map.width(),
            map.height(),
            points.len()
        );
        return points;
    }

    Vec::new()
}

fn finite_points(points: &[Point]) -> Vec<Point> {
    let finite: Vec<Point> = points.iter().copied().filter(Point::is_finite).collect();
    let dropped = points.len() - finite.len();
    if dropped > 0 {
        log::warn!("Dropped {} points with non-finite coordinates", dropped);
    }
    finite
}

/// Samples every fifth cell of every fifth row. Cells without a positive
/// depth are skipped, as are cells missing from short rows.
pub fn rasterize_depth_map(map: &DepthMap) -> Vec<Point> {
    let width = map.width();
    let mut points = Vec::new();

    for row in (0..map.height()).step_by(DEPTH_STRIDE) {
        for col in (0..width).step_by(DEPTH_STRIDE) {
            let Some(depth) = map.get(row, col) else {
                continue;
            };
            if depth > 0.0 && depth.is_finite() {
                points.push(
                    Point::new(col as f64, row as f64, depth * DEPTH_SCALE).with_intensity(depth),
                );
            }
        }
    }

    points
}

/// Samples the walls and roof of one box per volume on a regular grid.
///
/// Boxes stand side by side along x, ordered by the left edge of their image
/// bounding box when one is given, separated by `gap`.
#[derive(Debug, Clone)]
pub struct VolumeShellGenerator {
    /// Footprint of a volume whose size hint is 1.0.
    pub base_width: f64,
    pub base_depth: f64,
    pub base_height: f64,
    pub storey_height: f64,
    pub step: f64,
    pub gap: f64,
}

impl Default for VolumeShellGenerator {
    fn default() -> Self {
        Self {
            base_width: 30.0,
            base_depth: 20.0,
            base_height: 16.5,
            storey_height: 3.3,
            step: 1.0,
            gap: 10.0,
        }
    }
}

impl VolumeShellGenerator {
    fn extents(&self, volume: &Volume) -> (f64, f64, f64) {
        let hint = volume.size_hint.unwrap_or_default();
        let scale = |factor: f64, base: f64| {
            if factor > 0.0 && factor.is_finite() {
                factor * base
            } else {
                base
            }
        };

        let width = scale(hint.w, self.base_width);
        let depth = scale(hint.d, self.base_depth);
        let height = match volume.levels {
            Some(levels) if levels > 0 => levels as f64 * self.storey_height,
            _ => scale(hint.h, self.base_height),
        };
        (width, depth, height)
    }

    fn shell(&self, origin_x: f64, width: f64, depth: f64, height: f64) -> Vec<Point> {
        let xs = samples(width, self.step);
        let ys = samples(depth, self.step);
        let zs = samples(height, self.step);
        let mut points = Vec::new();

        for &z in &zs {
            for &x in &xs {
                points.push(Point::new(origin_x + x, 0.0, z).with_normal(Normal::new(0.0, -1.0, 0.0)));
                points.push(Point::new(origin_x + x, depth, z).with_normal(Normal::new(0.0, 1.0, 0.0)));
            }
            // Corners already belong to the front and back walls.
            for &y in ys.iter().skip(1).take(ys.len().saturating_sub(2)) {
                points.push(Point::new(origin_x, y, z).with_normal(Normal::new(-1.0, 0.0, 0.0)));
                points.push(Point::new(origin_x + width, y, z).with_normal(Normal::new(1.0, 0.0, 0.0)));
            }
        }

        for &x in &xs {
            for &y in &ys {
                points.push(Point::new(origin_x + x, y, height).with_normal(Normal::new(0.0, 0.0, 1.0)));
            }
        }

        points
    }
}

impl VolumePointGenerator for VolumeShellGenerator {
    fn generate(&self, volumes: &[Volume]) -> Vec<Point> {
        let ordered = volumes
            .iter()
            .enumerate()
            .sorted_by(|(ia, a), (ib, b)| match (a.bbox_px, b.bbox_px) {
                (Some(pa), Some(pb)) => pa[0].total_cmp(&pb[0]),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => ia.cmp(ib),
            })
            .map(|(_, v)| v);

        let mut origin_x = 0.0;
        let mut points = Vec::new();
        for volume in ordered {
            let (width, depth, height) = self.extents(volume);
            points.extend(self.shell(origin_x, width, depth, height));
            origin_x += width + self.gap;
        }
        points
    }
}

/// `0, step, 2*step, ...` up to and including `extent`.
fn samples(extent: f64, step: f64) -> Vec<f64> {
    let count = (extent / step).ceil().max(1.0) as usize;
    (0..=count)
        .map(|i| (i as f64 * step).min(extent))
        .dedup()
        .collect()
}
