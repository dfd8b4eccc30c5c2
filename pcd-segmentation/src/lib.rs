pub mod cluster;
pub mod dbscan;
pub mod eps;
pub mod segmenter;
pub mod strategy;

pub use cluster::Cluster;
pub use segmenter::{segment_buildings, Segmenter};
pub use strategy::{SegmentContext, SegmentationStrategy};
