//! Runtime component availability.

use std::fmt;
use std::path::Path;

use qoe_io::FlowTableReader;
use qoe_models::{ModelKind, ModelRegistry};
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use crate::report::{CheckRecord, Detail};

pub(crate) const CHECK_NAME: &str = "Environment";

/// A component the pipeline needs at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// CSV parsing of flow tables.
    CsvReader,
    /// The rayon worker pool used for forest training.
    ThreadPool,
    /// A model backend in the registry.
    Model(ModelKind),
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::CsvReader => f.write_str("csv reader"),
            Requirement::ThreadPool => f.write_str("thread pool"),
            Requirement::Model(kind) => write!(f, "model {kind}"),
        }
    }
}

/// CSV reader, thread pool and every model kind.
#[must_use]
pub fn default_requirements() -> Vec<Requirement> {
    let mut requirements = vec![Requirement::CsvReader, Requirement::ThreadPool];
    requirements.extend(ModelKind::ALL.map(Requirement::Model));
    requirements
}

fn probe_csv() -> Result<String, String> {
    let table = FlowTableReader::new(Path::new("<probe>"))
        .read_from("ping,exp_id\n12.5,a\n".as_bytes())
        .map_err(|e| e.to_string())?;
    match table.numeric_column("ping") {
        Ok(values) if values == [Some(12.5)] => Ok("available".into()),
        Ok(_) => Err("parsed unexpected values".into()),
        Err(e) => Err(e.to_string()),
    }
}

fn probe_pool() -> Result<String, String> {
    let sum: u64 = (1..=100u64).into_par_iter().sum();
    if sum == 5050 {
        Ok(format!("available ({} threads)", rayon::current_num_threads()))
    } else {
        Err("parallel reduction returned a wrong result".into())
    }
}

fn probe_model(registry: &ModelRegistry, kind: ModelKind) -> Result<String, String> {
    if !kind.is_compiled() {
        return Err("not compiled in".into());
    }
    registry
        .build(kind)
        .map(|model| format!("available ({})", model.type_name()))
        .map_err(|e| e.to_string())
}

/// Shell hint naming the missing components.
fn install_hint(missing: &[Requirement]) -> String {
    let mut features: Vec<&str> = missing
        .iter()
        .filter_map(|r| match r {
            Requirement::Model(kind) if !kind.is_compiled() => kind.cargo_feature(),
            _ => None,
        })
        .collect();
    features.dedup();
    let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
    if features.is_empty() {
        format!("Missing components: {}", names.join(", "))
    } else {
        format!(
            "Missing components: {}. Rebuild with: cargo build --features {}",
            names.join(", "),
            features.join(",")
        )
    }
}

/// Resolve every requirement against `registry`.
///
/// Passes iff every requirement resolves. On failure the last detail is
/// an install hint naming what is missing.
#[instrument(skip_all, fields(n_requirements = requirements.len()))]
pub fn validate_environment(requirements: &[Requirement], registry: &ModelRegistry) -> CheckRecord {
    let mut record = CheckRecord::new(CHECK_NAME);
    let mut missing = Vec::new();

    for &requirement in requirements {
        let outcome = match requirement {
            Requirement::CsvReader => probe_csv(),
            Requirement::ThreadPool => probe_pool(),
            Requirement::Model(kind) => probe_model(registry, kind),
        };
        match outcome {
            Ok(msg) => {
                debug!(%requirement, "resolved");
                record.push(Detail::pass(format!("{requirement}: {msg}")));
            }
            Err(msg) => {
                warn!(%requirement, reason = %msg, "requirement missing");
                record.push(Detail::fail(format!("{requirement}: Missing ({msg})")));
                missing.push(requirement);
            }
        }
    }

    if !missing.is_empty() {
        record.push(Detail::info(install_hint(&missing)));
    }
    record
}
