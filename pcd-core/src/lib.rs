pub mod config;
pub mod error;
pub mod pointcloud;
pub mod scene;

pub use config::{Config, FacadeAnalysis, OutlierRemoval, SegmentationTuning};
pub use error::CoreError;
pub use pointcloud::bounds::{BoundingBox, Point3};
pub use pointcloud::point::{Normal, Point, PointCloud};
pub use scene::{DepthMap, SceneInput, VisionContext, Volume};
