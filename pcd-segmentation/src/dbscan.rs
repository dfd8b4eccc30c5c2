//! Density-based clustering over brute-force neighborhoods.

use pcd_core::pointcloud::point::Point;

use crate::cluster::Cluster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Unvisited,
    Noise,
    Cluster(usize),
}

/// Labels every point as noise or a member of a density-connected cluster.
///
/// Neighborhoods include the point itself and use a strict `distance < eps`.
/// A noise point reached from a core point becomes a border point of that
/// cluster.
pub fn dbscan_labels(points: &[Point], eps: f64, min_pts: usize) -> Vec<Label> {
    let n = points.len();
    let mut labels = vec![Label::Unvisited; n];
    let mut cluster_id = 0;

    for i in 0..n {
        if labels[i] != Label::Unvisited {
            continue;
        }

        let neighbors = region_query(points, i, eps);
        if neighbors.len() < min_pts {
            labels[i] = Label::Noise;
            continue;
        }

        labels[i] = Label::Cluster(cluster_id);
        let mut seeds = neighbors;
        let mut head = 0;

        while head < seeds.len() {
            let q = seeds[head];
            head += 1;

            match labels[q] {
                Label::Noise => labels[q] = Label::Cluster(cluster_id),
                Label::Unvisited => {
                    labels[q] = Label::Cluster(cluster_id);
                    let q_neighbors = region_query(points, q, eps);
                    if q_neighbors.len() >= min_pts {
                        seeds.extend(
                            q_neighbors
                                .into_iter()
                                .filter(|&j| labels[j] == Label::Unvisited),
                        );
                    }
                }
                Label::Cluster(_) => {}
            }
        }

        cluster_id += 1;
    }

    labels
}

/// Runs [`dbscan_labels`] and returns the clusters with at least `min_pts`
/// members, in discovery order. Noise is dropped.
pub fn dbscan(points: &[Point], eps: f64, min_pts: usize) -> Vec<Cluster> {
    let labels = dbscan_labels(points, eps, min_pts);
    let cluster_count = labels
        .iter()
        .filter_map(|label| match label {
            Label::Cluster(id) => Some(id + 1),
            _ => None,
        })
        .max()
        .unwrap_or(0);

    let mut clusters = vec![Vec::new(); cluster_count];
    for (point, label) in points.iter().zip(&labels) {
        if let Label::Cluster(id) = label {
            clusters[*id].push(*point);
        }
    }

    let noise = labels.iter().filter(|l| **l == Label::Noise).count();
    log::debug!(
        "dbscan: eps {:.4}, {} raw clusters, {} noise points",
        eps,
        cluster_count,
        noise
    );

    clusters
        .into_iter()
        .filter(|c| c.len() >= min_pts)
        .map(Cluster::new)
        .collect()
}

fn region_query(points: &[Point], index: usize, eps: f64) -> Vec<usize> {
    let center = &points[index];
    let eps_sq = eps * eps;
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| center.squared_distance(p) < eps_sq)
        .map(|(j, _)| j)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(cx: f64, cy: f64, side: usize, spacing: f64) -> Vec<Point> {
        (0..side)
            .flat_map(|i| {
                (0..side).map(move |j| {
                    Point::new(cx + i as f64 * spacing, cy + j as f64 * spacing, 0.0)
                })
            })
            .collect()
    }

    #[test]
    fn test_two_separated_blobs() {
        let mut points = blob(0.0, 0.0, 5, 0.01);
        points.extend(blob(0.5, 0.5, 5, 0.01));

        let clusters = dbscan(&points, 0.03, 5);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 25);
        assert_eq!(clusters[1].len(), 25);
        assert!(clusters[0].points.iter().all(|p| p.x < 0.1));
    }

    #[test]
    fn test_isolated_points_are_noise() {
        let mut points = blob(0.0, 0.0, 4, 0.01);
        points.push(Point::new(0.9, 0.9, 0.9));

        let labels = dbscan_labels(&points, 0.03, 4);

        assert_eq!(labels[16], Label::Noise);
        assert!(labels[..16].iter().all(|l| *l == Label::Cluster(0)));
    }

    #[test]
    fn test_noise_becomes_border_point() {
        // The first point is visited before any core point exists and is
        // labelled noise; it is later reached from the dense row.
        let mut points = vec![Point::new(-0.025, 0.0, 0.0)];
        points.extend((0..6).map(|i| Point::new(i as f64 * 0.01, 0.0, 0.0)));

        let labels = dbscan_labels(&points, 0.03, 4);

        assert_eq!(labels[0], Label::Cluster(0));
        assert!(labels.iter().all(|l| *l == Label::Cluster(0)));
    }

    #[test]
    fn test_small_clusters_are_dropped() {
        let mut points = blob(0.0, 0.0, 5, 0.01);
        points.extend(blob(0.5, 0.5, 2, 0.01));

        let clusters = dbscan(&points, 0.03, 5);

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 25);
    }

    #[test]
    fn test_no_duplicates() {
        let points = blob(0.0, 0.0, 10, 0.01);
        let clusters = dbscan(&points, 0.05, 3);
        let total: usize = clusters.iter().map(Cluster::len).sum();
        assert_eq!(total, points.len());
    }
}
