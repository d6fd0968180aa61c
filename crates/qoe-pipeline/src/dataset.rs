//! Labeling and feature selection over a loaded flow table.

use qoe_io::FlowTable;
use qoe_label::{ClassTally, QoeClass};
use tracing::{info, instrument, warn};

use crate::{PipelineConfig, PipelineError};

/// Complete rows ready for sampling: every feature present, label known.
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// Row-major feature matrix.
    pub features: Vec<Vec<f64>>,
    /// Labels aligned with `features`.
    pub labels: Vec<QoeClass>,
    /// Label distribution over every labeled row, before dropping
    /// incomplete feature rows.
    pub label_distribution: ClassTally,
    /// Rows whose label source cell was empty.
    pub n_unlabeled: usize,
}

impl PreparedData {
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.features.len()
    }
}

/// Derive labels and keep the rows where every feature is present.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`PipelineError::Io`] | A label or feature column is absent or non-numeric |
/// | [`PipelineError::Label`] | A label source value is outside its domain |
/// | [`PipelineError::NoCompleteRows`] | Nothing survives the filtering |
#[instrument(skip_all, fields(n_rows = table.n_rows(), source = %config.label_source()))]
pub fn prepare(
    table: &FlowTable,
    config: &PipelineConfig,
    feature_names: &[&str],
) -> Result<PreparedData, PipelineError> {
    let raw_labels = table.numeric_column(config.label_source().column())?;
    let labels: Vec<Option<QoeClass>> = raw_labels
        .iter()
        .enumerate()
        .map(|(row_index, value)| {
            value
                .map(|v| config.rank(v))
                .transpose()
                .map_err(|source| PipelineError::Label { row_index, source })
        })
        .collect::<Result<_, _>>()?;

    let label_distribution = ClassTally::from_classes(labels.iter().flatten().copied());
    let n_unlabeled = labels.iter().filter(|l| l.is_none()).count();
    if n_unlabeled > 0 {
        warn!(n_unlabeled, "dropping rows without a label value");
    }
    info!(distribution = %label_distribution, "labels derived");

    let matrix = table.feature_matrix(feature_names)?;
    let (features, labels): (Vec<Vec<f64>>, Vec<QoeClass>) = matrix
        .into_iter()
        .zip(labels)
        .filter_map(|(row, label)| {
            let row: Option<Vec<f64>> = row.into_iter().collect();
            Some((row?, label?))
        })
        .unzip();

    let n_incomplete = table.n_rows() - n_unlabeled - features.len();
    if n_incomplete > 0 {
        warn!(n_incomplete, "dropping rows with missing features");
    }
    if features.is_empty() {
        return Err(PipelineError::NoCompleteRows);
    }
    info!(n_complete = features.len(), n_features = feature_names.len(), "features selected");

    Ok(PreparedData {
        features,
        labels,
        label_distribution,
        n_unlabeled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LabelSource;
    use qoe_io::{FlowTableReader, IoError};
    use std::path::Path;

    fn table(body: &str) -> FlowTable {
        FlowTableReader::new(Path::new("mem.csv"))
            .read_from(body.as_bytes())
            .unwrap()
    }

    #[test]
    fn labels_follow_latency_and_rows_with_gaps_drop() {
        let t = table("ping,self_rate_qoe_score,a,b\n10,5,1,2\n70,1,,2\n150,3,3,4\n,2,5,6\n");
        let data = prepare(&t, &PipelineConfig::new(), &["a", "b"]).unwrap();
        assert_eq!(data.features, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(data.labels, vec![QoeClass::Good, QoeClass::Poor]);
        assert_eq!(data.label_distribution.to_string(), "{1: 1, 2: 1, 3: 1}");
        assert_eq!(data.n_unlabeled, 1);
    }

    #[test]
    fn survey_labels() {
        let t = table("ping,self_rate_qoe_score,a\n10,1,1\n70,3,2\n150,4,3\n");
        let config = PipelineConfig::new().with_label_source(LabelSource::Survey);
        let data = prepare(&t, &config, &["a"]).unwrap();
        assert_eq!(data.labels, vec![QoeClass::Poor, QoeClass::Fair, QoeClass::Good]);
    }

    #[test]
    fn negative_latency_is_an_error() {
        let t = table("ping,a\n10,1\n-3,2\n");
        let err = prepare(&t, &PipelineConfig::new(), &["a"]).unwrap_err();
        assert!(matches!(err, PipelineError::Label { row_index: 1, .. }));
    }

    #[test]
    fn missing_feature_column_is_an_error() {
        let t = table("ping,a\n10,1\n");
        let err = prepare(&t, &PipelineConfig::new(), &["a", "b"]).unwrap_err();
        assert!(matches!(err, PipelineError::Io(IoError::MissingColumn { .. })));
    }

    #[test]
    fn nothing_complete() {
        let t = table("ping,a\n10,\n20,\n");
        assert!(matches!(
            prepare(&t, &PipelineConfig::new(), &["a"]),
            Err(PipelineError::NoCompleteRows)
        ));
    }
}
