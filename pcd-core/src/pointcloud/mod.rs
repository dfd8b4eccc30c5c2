pub mod bounds;
pub mod decimation;
pub mod point;
