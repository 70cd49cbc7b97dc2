pub mod dataset;
pub mod separation;
