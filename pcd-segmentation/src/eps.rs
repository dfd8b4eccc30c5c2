//! Neighborhood radius estimation from the k-distance curve.

use itertools::Itertools;
use pcd_core::{config::SegmentationTuning, pointcloud::point::Point};
use rand::{seq::index, Rng};

/// Estimates a DBSCAN radius for `points` in normalized space.
///
/// Up to `eps_sample_size` distinct points are drawn from `rng`. For each one
/// the distance to its k-th nearest sampled neighbor is taken, the distances
/// are sorted, and the largest jump inside `elbow_window` of that curve marks
/// the elbow. The distance at the elbow, clamped to `[eps_min, eps_max]`, is
/// the estimate.
pub fn estimate_epsilon<R: Rng + ?Sized>(
    points: &[Point],
    tuning: &SegmentationTuning,
    rng: &mut R,
) -> f64 {
    let sample_size = tuning.eps_sample_size.min(points.len());
    let sampled: Vec<&Point> = if sample_size == 0 {
        Vec::new()
    } else {
        index::sample(rng, points.len(), sample_size)
            .into_iter()
            .map(|i| &points[i])
            .collect()
    };

    let curve = k_distance_curve(&sampled, tuning.eps_k);
    let differences = first_differences(&curve);
    let elbow = elbow_index(&differences, tuning.elbow_window);

    // A missing or zero distance at the elbow means the sample said nothing
    // useful about density.
    let candidate = curve
        .get(elbow)
        .copied()
        .filter(|d| *d > 0.0)
        .unwrap_or(tuning.eps_default);

    let eps = candidate.clamp(tuning.eps_min, tuning.eps_max);
    log::debug!(
        "eps estimation: {} samples, elbow at {}, candidate {:.4}, eps {:.4}",
        sampled.len(),
        elbow,
        candidate,
        eps
    );
    eps
}

/// Sorted distances from each point to its k-th nearest other point. Points
/// with fewer than k others contribute nothing.
pub fn k_distance_curve(points: &[&Point], k: usize) -> Vec<f64> {
    if k == 0 {
        return Vec::new();
    }

    points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let distances: Vec<f64> = points
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, q)| p.distance(q))
                .sorted_by(f64::total_cmp)
                .collect();
            distances.get(k - 1).copied()
        })
        .sorted_by(f64::total_cmp)
        .collect()
}

pub fn first_differences(curve: &[f64]) -> Vec<f64> {
    curve.iter().tuple_windows().map(|(a, b)| b - a).collect()
}

/// Index of the strictly largest positive difference whose position lies in
/// `[floor(start * m), end * m)`, or 0 when there is none.
pub fn elbow_index(differences: &[f64], window: (f64, f64)) -> usize {
    let m = differences.len() as f64;
    let start = (m * window.0).floor() as usize;

    let mut best_idx = 0;
    let mut best = 0.0;
    let mut i = start;
    while i < differences.len() && (i as f64) < m * window.1 {
        if differences[i] > best {
            best = differences[i];
            best_idx = i;
        }
        i += 1;
    }
    best_idx
}
