//! The classifier abstraction and model identifiers.

use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Identifier of a model family produced by the registry.
///
/// Ordering is the order in which the registry lists its models.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub enum ModelKind {
    /// Single CART decision tree.
    #[serde(rename = "DT")]
    DecisionTree,
    /// Bootstrap-aggregated forest of CART trees.
    #[serde(rename = "RF")]
    RandomForest,
    /// Forest of randomized-threshold trees without bootstrap.
    #[serde(rename = "ET")]
    ExtraTrees,
    /// Multiclass softmax gradient boosting of regression trees.
    #[serde(rename = "GB")]
    GradientBoosting,
    /// k-nearest neighbors on standardized features.
    #[serde(rename = "KNN")]
    KNearest,
}

impl ModelKind {
    /// Every kind, in registry order.
    pub const ALL: [ModelKind; 5] = [
        ModelKind::DecisionTree,
        ModelKind::RandomForest,
        ModelKind::ExtraTrees,
        ModelKind::GradientBoosting,
        ModelKind::KNearest,
    ];

    /// Short name used in reports and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ModelKind::DecisionTree => "DT",
            ModelKind::RandomForest => "RF",
            ModelKind::ExtraTrees => "ET",
            ModelKind::GradientBoosting => "GB",
            ModelKind::KNearest => "KNN",
        }
    }

    /// Cargo feature that gates this model, if any.
    #[must_use]
    pub fn cargo_feature(self) -> Option<&'static str> {
        match self {
            ModelKind::GradientBoosting => Some("boosting"),
            ModelKind::KNearest => Some("neighbors"),
            _ => None,
        }
    }

    /// Whether this model was compiled into the current build.
    #[must_use]
    pub fn is_compiled(self) -> bool {
        match self {
            ModelKind::GradientBoosting => cfg!(feature = "boosting"),
            ModelKind::KNearest => cfg!(feature = "neighbors"),
            _ => true,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownModelName { name: s.to_string() })
    }
}

/// A multiclass classifier over dense `f64` feature rows.
///
/// Labels are zero-based class indices below [`Classifier::n_classes`].
/// Instances are created untrained; `fit` may be called again to retrain.
pub trait Classifier: fmt::Debug + Send + Sync {
    /// The family this model belongs to.
    fn kind(&self) -> ModelKind;

    /// Concrete type name, e.g. `"RandomForestClassifier"`.
    fn type_name(&self) -> &'static str;

    /// Number of classes the model was built for.
    fn n_classes(&self) -> usize;

    /// Whether `fit` has completed successfully.
    fn is_fitted(&self) -> bool;

    /// Train on row-major `features` and aligned `labels`.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] describing invalid input or configuration.
    fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), ModelError>;

    /// Predict a class index for each row.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFitted`] before training and
    /// [`ModelError::PredictionFeatureMismatch`] for rows of the wrong width.
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.name().parse::<ModelKind>().unwrap(), kind);
        }
        assert_eq!("rf".parse::<ModelKind>().unwrap(), ModelKind::RandomForest);
    }

    #[test]
    fn unknown_name_rejected() {
        assert!(matches!(
            "SVM".parse::<ModelKind>(),
            Err(ModelError::UnknownModelName { .. })
        ));
    }

    #[test]
    fn core_models_always_compiled() {
        assert!(ModelKind::DecisionTree.is_compiled());
        assert!(ModelKind::RandomForest.is_compiled());
        assert!(ModelKind::ExtraTrees.is_compiled());
        assert_eq!(ModelKind::RandomForest.cargo_feature(), None);
        assert_eq!(ModelKind::KNearest.cargo_feature(), Some("neighbors"));
    }
}
