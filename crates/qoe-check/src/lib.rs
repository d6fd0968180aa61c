//! Environment and dataset validation for the QoE reproduction workflow.
//!
//! Each check returns a [`CheckRecord`]; [`run_all_validations`] runs them
//! in a fixed order with fault isolation and collects a
//! [`ValidationReport`] that callers render as text or JSON.

mod config;
mod datasets;
mod environment;
mod error;
mod models;
mod report;
mod runner;
mod structure;

pub use config::ValidationConfig;
pub use datasets::validate_datasets;
pub use environment::{default_requirements, validate_environment, Requirement};
pub use error::CheckError;
pub use models::quick_model_test;
pub use report::{CheckRecord, Detail, Mark, Status, ValidationReport};
pub use runner::{run_all_validations, run_checks, NamedCheck};
pub use structure::check_data_structure;
