//! k-nearest-neighbors classification on z-scored features.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::classifier::{Classifier, ModelKind};
use crate::validate::{check_prediction_data, check_training_data};
use crate::ModelError;

/// Configuration for [`KNearest`].
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `k`       | 5       |
#[derive(Debug, Clone)]
pub struct KNearestConfig {
    k: usize,
}

impl KNearestConfig {
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidNeighborCount`] if `k` is zero.
    pub fn new(k: usize) -> Result<Self, ModelError> {
        if k == 0 {
            return Err(ModelError::InvalidNeighborCount { k });
        }
        Ok(Self { k })
    }

    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }
}

impl Default for KNearestConfig {
    fn default() -> Self {
        Self { k: 5 }
    }
}

/// Per-feature mean and spread learned at fit time.
#[derive(Debug, Clone)]
struct Scaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl Scaler {
    fn fit(features: &[Vec<f64>], n_features: usize) -> Self {
        let n = features.len() as f64;
        let mut mean = vec![0.0; n_features];
        for row in features {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut std = vec![0.0; n_features];
        for row in features {
            for ((s, v), m) in std.iter_mut().zip(row).zip(&mean) {
                *s += (v - m).powi(2);
            }
        }
        // Constant columns keep unit scale.
        for s in &mut std {
            *s = (*s / n).sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }
        Self { mean, std }
    }

    fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.mean)
            .zip(&self.std)
            .map(|((v, m), s)| (v - m) / s)
            .collect()
    }
}

/// Majority vote over the `k` closest training rows.
///
/// Distance ties are broken by training order; vote ties go to the
/// lowest class index. If `k` exceeds the training set size, all rows vote.
#[derive(Debug, Clone)]
pub struct KNearest {
    config: KNearestConfig,
    n_classes: usize,
    scaler: Option<Scaler>,
    points: Vec<Vec<f64>>,
    labels: Vec<usize>,
}

impl KNearest {
    #[must_use]
    pub fn new(config: KNearestConfig, n_classes: usize) -> Self {
        Self {
            config,
            n_classes,
            scaler: None,
            points: Vec::new(),
            labels: Vec::new(),
        }
    }

    fn vote(&self, query: &[f64]) -> usize {
        let mut dist: Vec<(f64, usize)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let d = p.iter().zip(query).map(|(a, b)| (a - b).powi(2)).sum::<f64>();
                (d, i)
            })
            .collect();
        let k = self.config.k.min(dist.len());
        dist.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut votes = vec![0usize; self.n_classes];
        for &(_, i) in &dist[..k] {
            votes[self.labels[i]] += 1;
        }
        let mut best = 0;
        for (class, &count) in votes.iter().enumerate() {
            if count > votes[best] {
                best = class;
            }
        }
        best
    }
}

impl Classifier for KNearest {
    fn kind(&self) -> ModelKind {
        ModelKind::KNearest
    }

    fn type_name(&self) -> &'static str {
        "KNeighborsClassifier"
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn is_fitted(&self) -> bool {
        self.scaler.is_some()
    }

    #[instrument(skip_all, fields(k = self.config.k, n_samples = features.len()))]
    fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), ModelError> {
        if self.config.k == 0 {
            return Err(ModelError::InvalidNeighborCount { k: 0 });
        }
        let n_features = check_training_data(features, labels, self.n_classes)?;
        let scaler = Scaler::fit(features, n_features);
        self.points = features.iter().map(|row| scaler.transform(row)).collect();
        self.labels = labels.to_vec();
        self.scaler = Some(scaler);
        debug!(n_points = self.points.len(), "neighbors indexed");
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, ModelError> {
        let Some(scaler) = &self.scaler else {
            return Err(ModelError::NotFitted {
                model: self.type_name(),
            });
        };
        check_prediction_data(features, scaler.mean.len())?;
        Ok(features
            .par_iter()
            .map(|row| self.vote(&scaler.transform(row)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_point_wins_with_k_one() {
        let features = vec![vec![0.0, 0.0], vec![10.0, 10.0], vec![0.0, 10.0]];
        let labels = vec![0, 1, 2];
        let mut model = KNearest::new(KNearestConfig::new(1).unwrap(), 3);
        model.fit(&features, &labels).unwrap();
        let pred = model
            .predict(&[vec![1.0, 1.0], vec![9.0, 9.5], vec![0.5, 9.0]])
            .unwrap();
        assert_eq!(pred, vec![0, 1, 2]);
    }

    #[test]
    fn vote_tie_goes_to_lowest_class() {
        let features = vec![vec![-1.0], vec![1.0]];
        let labels = vec![2, 1];
        let mut model = KNearest::new(KNearestConfig::new(2).unwrap(), 3);
        model.fit(&features, &labels).unwrap();
        assert_eq!(model.predict(&[vec![0.0]]).unwrap(), vec![1]);
    }

    #[test]
    fn k_larger_than_training_set_uses_all_rows() {
        let features = vec![vec![0.0], vec![1.0], vec![2.0]];
        let labels = vec![1, 1, 0];
        let mut model = KNearest::new(KNearestConfig::default(), 2);
        model.fit(&features, &labels).unwrap();
        assert_eq!(model.predict(&[vec![2.0]]).unwrap(), vec![1]);
    }

    #[test]
    fn constant_column_does_not_produce_nan() {
        let features = vec![vec![3.0, 0.0], vec![3.0, 1.0]];
        let mut model = KNearest::new(KNearestConfig::new(1).unwrap(), 2);
        model.fit(&features, &[0, 1]).unwrap();
        assert_eq!(model.predict(&[vec![3.0, 0.9]]).unwrap(), vec![1]);
    }

    #[test]
    fn zero_k_rejected() {
        assert!(matches!(
            KNearestConfig::new(0),
            Err(ModelError::InvalidNeighborCount { k: 0 })
        ));
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = KNearest::new(KNearestConfig::default(), 3);
        assert!(matches!(
            model.predict(&[vec![0.0]]),
            Err(ModelError::NotFitted { .. })
        ));
    }
}
