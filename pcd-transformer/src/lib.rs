pub mod builder;
pub mod runner;
pub mod transform;

pub use builder::{PreprocessTransformBuilder, TransformBuilder};
pub use runner::{preprocess, PointCloudTransformer, Transformer};
pub use transform::{CompositeTransform, Transform};
