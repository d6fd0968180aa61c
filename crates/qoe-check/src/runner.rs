//! Ordered, fault-isolated execution of checks.

use std::any::Any;
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};

use qoe_models::ModelRegistry;
use tracing::{info, instrument, warn};

use crate::report::{CheckRecord, ValidationReport};
use crate::{
    check_data_structure, datasets, environment, models, quick_model_test, structure,
    validate_datasets, validate_environment, CheckError, ValidationConfig,
};

/// A check to run under fault isolation.
pub struct NamedCheck<'a> {
    name: &'static str,
    run: Box<dyn FnOnce() -> Result<CheckRecord, CheckError> + 'a>,
}

impl<'a> NamedCheck<'a> {
    /// Wrap `run` under the record title `name`.
    pub fn new(
        name: &'static str,
        run: impl FnOnce() -> Result<CheckRecord, CheckError> + 'a,
    ) -> Self {
        Self {
            name,
            run: Box::new(run),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// `outer: inner: innermost`.
fn error_chain(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn isolated(check: NamedCheck<'_>) -> CheckRecord {
    let NamedCheck { name, run } = check;
    let outcome = panic::catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| {
        Err(CheckError::Panicked {
            message: panic_message(payload.as_ref()),
        })
    });
    match outcome {
        Ok(record) => {
            if record.passed() {
                info!(check = name, "check passed");
            } else {
                warn!(check = name, "check failed");
            }
            record
        }
        Err(e) => {
            let reason = error_chain(&e);
            warn!(check = name, error = %reason, "check aborted");
            CheckRecord::failed(name, format!("{name} check failed: {reason}"))
        }
    }
}

/// Run `checks` in order. A check that errors or panics becomes a failed
/// record and the remaining checks still run.
pub fn run_checks(checks: Vec<NamedCheck<'_>>) -> ValidationReport {
    ValidationReport::new(checks.into_iter().map(isolated).collect())
}

/// Environment, Datasets, Data Structure and Model Creation, in that order.
#[instrument(skip_all, fields(data_dir = %config.data_dir().display()))]
pub fn run_all_validations(config: &ValidationConfig) -> ValidationReport {
    let catalog = config.catalog();
    let structure_file = config.structure_file();
    let report = run_checks(vec![
        NamedCheck::new(environment::CHECK_NAME, || {
            let registry = ModelRegistry::new(config.n_classes())?.with_seed(config.seed());
            Ok(validate_environment(config.requirements(), &registry))
        }),
        NamedCheck::new(datasets::CHECK_NAME, || Ok(validate_datasets(&catalog))),
        NamedCheck::new(structure::CHECK_NAME, || check_data_structure(&structure_file)),
        NamedCheck::new(models::CHECK_NAME, || {
            Ok(quick_model_test(config.n_classes(), config.seed()))
        }),
    ]);
    info!(all_passed = report.all_passed, "validation finished");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use qoe_io::IoError;
    use std::path::PathBuf;

    #[test]
    fn panicking_check_does_not_stop_the_rest() {
        let report = run_checks(vec![
            NamedCheck::new("First", || panic!("exploded")),
            NamedCheck::new("Second", || Ok(CheckRecord::new("Second"))),
        ]);
        assert_eq!(report.checks.len(), 2);
        assert!(!report.checks[0].passed());
        assert_eq!(report.checks[0].details[0].message, "First check failed: check panicked: exploded");
        assert!(report.checks[1].passed());
        assert!(!report.all_passed);
    }

    #[test]
    fn erroring_check_reports_source_chain() {
        let report = run_checks(vec![NamedCheck::new("Io", || {
            Err(CheckError::Io(IoError::MissingColumn {
                path: PathBuf::from("w.csv"),
                column: "ping".into(),
            }))
        })]);
        let message = &report.checks[0].details[0].message;
        assert!(message.starts_with("Io check failed: dataset error: column \"ping\""), "{message}");
    }

    #[test]
    fn formatted_panic_payload() {
        let report = run_checks(vec![NamedCheck::new("Fmt", || panic!("bad value {}", 7))]);
        assert!(report.checks[0].details[0].message.ends_with("bad value 7"));
    }
}
