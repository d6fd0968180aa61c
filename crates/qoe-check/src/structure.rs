//! Column layout and label distribution of one dataset file.

use std::path::Path;

use qoe_io::schema::{FEATURE_COLUMNS, LATENCY_COLUMN, REQUIRED_COLUMNS, SURVEY_COLUMN};
use qoe_io::{FlowTable, FlowTableReader};
use qoe_label::{rank_latency, rank_survey, ClassTally, LabelError, QoeClass};
use tracing::{info, instrument, warn};

use crate::report::{CheckRecord, Detail};
use crate::CheckError;

pub(crate) const CHECK_NAME: &str = "Data Structure";

/// Tally a column through a ranking rule; returns the tally and the number
/// of cells that could not be ranked.
fn distribution(
    table: &FlowTable,
    column: &str,
    rank: impl Fn(f64) -> Result<QoeClass, LabelError>,
) -> Result<(ClassTally, usize), CheckError> {
    let (values, n_unparsed) = table.numeric_column_lenient(column)?;
    let mut tally = ClassTally::default();
    let mut n_unranked = n_unparsed;
    for value in values {
        match value.map(&rank) {
            Some(Ok(class)) => tally.record(class),
            Some(Err(_)) => n_unranked += 1,
            // Unparsed cells are already counted.
            None => {}
        }
    }
    let n_missing = table.n_rows() - tally.total() - n_unranked;
    Ok((tally, n_unranked + n_missing))
}

fn push_distribution(record: &mut CheckRecord, title: &str, tally: &ClassTally, n_unranked: usize) {
    record.push(Detail::info(format!("{title}: {tally}")));
    if n_unranked > 0 {
        record.push(Detail::info(format!("{title}: {n_unranked} rows could not be ranked")));
    }
}

/// Validate the columns of `path` and report label distributions.
///
/// Fails when the file is missing or a required column is absent.
/// Missing feature columns and unrankable values are reported only.
///
/// # Errors
///
/// Returns [`CheckError::Io`] if the file exists but cannot be parsed.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn check_data_structure(path: &Path) -> Result<CheckRecord, CheckError> {
    let mut record = CheckRecord::new(CHECK_NAME);
    if !path.exists() {
        warn!("dataset not found");
        record.push(Detail::fail(format!("Dataset not found - {}", path.display())));
        return Ok(record);
    }

    let table = FlowTableReader::new(path).read()?;
    let (rows, cols) = table.shape();
    record.push(Detail::info(format!("Dataset shape: ({rows}, {cols})")));

    let missing_required = table.missing_columns(&REQUIRED_COLUMNS);
    if !missing_required.is_empty() {
        warn!(?missing_required, "required columns absent");
        record.push(Detail::fail(format!(
            "Missing required columns: {}",
            missing_required.join(", ")
        )));
        return Ok(record);
    }

    let missing_features = table.missing_columns(&FEATURE_COLUMNS);
    let n_available = FEATURE_COLUMNS.len() - missing_features.len();
    let summary = format!("Available features: {n_available}/{} expected", FEATURE_COLUMNS.len());
    if missing_features.is_empty() {
        record.push(Detail::pass(summary));
    } else {
        record.push(Detail::info(summary));
        record.push(Detail::info(format!("Missing features: {}", missing_features.join(", "))));
    }

    let (latency, n_bad_latency) = distribution(&table, LATENCY_COLUMN, rank_latency)?;
    push_distribution(&mut record, "Ping-based QoE", &latency, n_bad_latency);
    let (survey, n_bad_survey) = distribution(&table, SURVEY_COLUMN, rank_survey)?;
    push_distribution(&mut record, "Survey-based QoE (3-class)", &survey, n_bad_survey);

    info!(rows, cols, n_available, "data structure checked");
    Ok(record)
}
