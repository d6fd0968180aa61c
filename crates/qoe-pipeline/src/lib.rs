//! Minimal, deterministic QoE training pipeline.
//!
//! Loads one window dataset, labels rows from latency or survey score,
//! samples and stratifies with a fixed seed, trains one registry model and
//! reports accuracy and macro-F1.

mod config;
mod dataset;
mod error;
mod runner;
mod sampling;

pub use config::{LabelSource, PipelineConfig};
pub use dataset::{prepare, PreparedData};
pub use error::PipelineError;
pub use runner::{run, PipelineSummary};
pub use sampling::{sample_indices, stratified_split, TrainTestSplit};
