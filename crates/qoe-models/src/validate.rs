//! Shared input checks for training and prediction.

use crate::ModelError;

/// Validate a training set and return its feature width.
pub(crate) fn check_training_data(
    features: &[Vec<f64>],
    labels: &[usize],
    n_classes: usize,
) -> Result<usize, ModelError> {
    let Some(first) = features.first() else {
        return Err(ModelError::EmptyDataset);
    };
    let n_features = first.len();
    if n_features == 0 {
        return Err(ModelError::ZeroFeatures);
    }
    if labels.len() != features.len() {
        return Err(ModelError::LabelCountMismatch {
            n_samples: features.len(),
            n_labels: labels.len(),
        });
    }
    check_rows(features, n_features)?;
    if let Some((sample_index, &label)) = labels.iter().enumerate().find(|(_, l)| **l >= n_classes)
    {
        return Err(ModelError::LabelOutOfRange {
            label,
            n_classes,
            sample_index,
        });
    }
    Ok(n_features)
}

/// Validate prediction rows against the training width.
pub(crate) fn check_prediction_data(
    features: &[Vec<f64>],
    n_features: usize,
) -> Result<(), ModelError> {
    if let Some(row) = features.iter().find(|row| row.len() != n_features) {
        return Err(ModelError::PredictionFeatureMismatch {
            expected: n_features,
            got: row.len(),
        });
    }
    Ok(())
}

fn check_rows(features: &[Vec<f64>], n_features: usize) -> Result<(), ModelError> {
    for (sample_index, row) in features.iter().enumerate() {
        if row.len() != n_features {
            return Err(ModelError::FeatureCountMismatch {
                expected: n_features,
                got: row.len(),
                sample_index,
            });
        }
        if let Some(feature_index) = row.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteValue {
                sample_index,
                feature_index,
            });
        }
    }
    Ok(())
}

/// Transpose row-major features into columns.
pub(crate) fn to_columns(features: &[Vec<f64>], n_features: usize) -> Vec<Vec<f64>> {
    (0..n_features)
        .map(|j| features.iter().map(|row| row[j]).collect())
        .collect()
}

/// Index of the largest value; the first one wins ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_data() {
        let features = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        assert_eq!(check_training_data(&features, &[0, 1], 2).unwrap(), 2);
    }

    #[test]
    fn rejects_empty_and_zero_width() {
        assert!(matches!(
            check_training_data(&[], &[], 3),
            Err(ModelError::EmptyDataset)
        ));
        assert!(matches!(
            check_training_data(&[vec![]], &[0], 3),
            Err(ModelError::ZeroFeatures)
        ));
    }

    #[test]
    fn rejects_label_problems() {
        let features = vec![vec![1.0], vec![2.0]];
        assert!(matches!(
            check_training_data(&features, &[0], 2),
            Err(ModelError::LabelCountMismatch { n_samples: 2, n_labels: 1 })
        ));
        assert!(matches!(
            check_training_data(&features, &[0, 3], 3),
            Err(ModelError::LabelOutOfRange { label: 3, sample_index: 1, .. })
        ));
    }

    #[test]
    fn rejects_ragged_and_non_finite_rows() {
        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            check_training_data(&ragged, &[0, 1], 2),
            Err(ModelError::FeatureCountMismatch { sample_index: 1, .. })
        ));
        let nan = vec![vec![1.0, f64::NAN]];
        assert!(matches!(
            check_training_data(&nan, &[0], 2),
            Err(ModelError::NonFiniteValue { sample_index: 0, feature_index: 1 })
        ));
    }

    #[test]
    fn argmax_prefers_first_tie() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax(&[1.0]), 0);
    }
}
