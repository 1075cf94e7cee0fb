//! Demo/reference consumer of `ltephy-chest`

pub mod config;
pub mod synth;

pub use config::EstimatorConfig;
