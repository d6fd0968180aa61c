//! Confusion matrix, accuracy and per-class / macro F1.

use std::fmt;

use serde::Serialize;

use crate::ModelError;

/// Precision, recall and F1 for one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    /// Zero-based class index.
    pub class: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of true samples of this class.
    pub support: usize,
}

/// `counts[truth][prediction]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Tabulate predictions against truth.
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |---|---|
    /// | no samples | [`ModelError::EmptyDataset`] |
    /// | lengths differ | [`ModelError::LabelCountMismatch`] |
    /// | a label `>= n_classes` | [`ModelError::LabelOutOfRange`] |
    pub fn from_labels(
        truth: &[usize],
        predicted: &[usize],
        n_classes: usize,
    ) -> Result<Self, ModelError> {
        if truth.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        if truth.len() != predicted.len() {
            return Err(ModelError::LabelCountMismatch {
                n_samples: truth.len(),
                n_labels: predicted.len(),
            });
        }
        let mut counts = vec![vec![0; n_classes]; n_classes];
        for (i, (&t, &p)) in truth.iter().zip(predicted).enumerate() {
            for label in [t, p] {
                if label >= n_classes {
                    return Err(ModelError::LabelOutOfRange {
                        label,
                        n_classes,
                        sample_index: i,
                    });
                }
            }
            counts[t][p] += 1;
        }
        Ok(Self { counts })
    }

    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Fraction of samples on the diagonal.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let correct: usize = (0..self.n_classes()).map(|c| self.counts[c][c]).sum();
        correct as f64 / self.total() as f64
    }

    fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum()
    }

    fn predicted(&self, class: usize) -> usize {
        self.counts.iter().map(|row| row[class]).sum()
    }

    /// Metrics for every class; undefined ratios are reported as 0.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        (0..self.n_classes())
            .map(|class| {
                let tp = self.counts[class][class] as f64;
                let support = self.support(class);
                let predicted = self.predicted(class);
                let precision = ratio(tp, predicted as f64);
                let recall = ratio(tp, support as f64);
                ClassMetrics {
                    class,
                    precision,
                    recall,
                    f1: ratio(2.0 * precision * recall, precision + recall),
                    support,
                }
            })
            .collect()
    }

    /// Unweighted mean F1 over classes seen in truth or predictions.
    #[must_use]
    pub fn macro_f1(&self) -> f64 {
        let present: Vec<f64> = self
            .class_metrics()
            .into_iter()
            .filter(|m| m.support > 0 || self.predicted(m.class) > 0)
            .map(|m| m.f1)
            .collect();
        ratio(present.iter().sum(), present.len() as f64)
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.counts {
            let cells: Vec<String> = row.iter().map(|c| format!("{c:>5}")).collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions() {
        let cm = ConfusionMatrix::from_labels(&[0, 1, 2, 1], &[0, 1, 2, 1], 3).unwrap();
        assert_eq!(cm.accuracy(), 1.0);
        assert_eq!(cm.macro_f1(), 1.0);
    }

    #[test]
    fn mixed_predictions() {
        // truth 0,0,1,1 / pred 0,1,1,1
        let cm = ConfusionMatrix::from_labels(&[0, 0, 1, 1], &[0, 1, 1, 1], 2).unwrap();
        assert_eq!(cm.as_rows(), &[vec![1, 1], vec![0, 2]]);
        assert_eq!(cm.accuracy(), 0.75);
        let m = cm.class_metrics();
        assert_eq!(m[0].precision, 1.0);
        assert_eq!(m[0].recall, 0.5);
        assert!((m[0].f1 - 2.0 / 3.0).abs() < 1e-12);
        assert!((m[1].f1 - 0.8).abs() < 1e-12);
        assert!((cm.macro_f1() - (2.0 / 3.0 + 0.8) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn absent_class_excluded_from_macro_f1() {
        let cm = ConfusionMatrix::from_labels(&[0, 1], &[0, 1], 3).unwrap();
        assert_eq!(cm.macro_f1(), 1.0);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            ConfusionMatrix::from_labels(&[], &[], 3),
            Err(ModelError::EmptyDataset)
        ));
        assert!(matches!(
            ConfusionMatrix::from_labels(&[0], &[0, 1], 3),
            Err(ModelError::LabelCountMismatch { .. })
        ));
        assert!(matches!(
            ConfusionMatrix::from_labels(&[0, 3], &[0, 0], 3),
            Err(ModelError::LabelOutOfRange { label: 3, sample_index: 1, .. })
        ));
    }
}
