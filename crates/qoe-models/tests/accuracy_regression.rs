//! Holdout accuracy floors for every registered classifier on a
//! deterministic synthetic dataset.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use qoe_models::{
    Classifier, ConfusionMatrix, DecisionTree, DecisionTreeConfig, ModelKind, ModelRegistry,
    RandomForest, RandomForestConfig,
};

/// 300 samples, 10 features, 3 classes assigned round-robin.
///
/// Features 0-2 carry `class * 3.0` plus noise in [0, 0.5]; the rest are noise.
fn make_classification() -> (Vec<Vec<f64>>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut features = Vec::with_capacity(300);
    let mut labels = Vec::with_capacity(300);
    for i in 0..300 {
        let class = i % 3;
        labels.push(class);
        features.push(
            (0..10)
                .map(|f| {
                    let base = if f < 3 { class as f64 * 3.0 } else { 0.0 };
                    base + rng.r#gen::<f64>() * 0.5
                })
                .collect(),
        );
    }
    (features, labels)
}

/// Train on the first 240 rows, score on the last 60.
fn holdout_accuracy(model: &mut dyn Classifier) -> f64 {
    let (features, labels) = make_classification();
    let (train_x, test_x) = features.split_at(240);
    let (train_y, test_y) = labels.split_at(240);
    model.fit(train_x, train_y).unwrap();
    let predicted = model.predict(test_x).unwrap();
    ConfusionMatrix::from_labels(test_y, &predicted, 3)
        .unwrap()
        .accuracy()
}

#[test]
fn random_forest_accuracy_above_threshold() {
    let config = RandomForestConfig::new(50).unwrap().with_seed(42);
    let acc = holdout_accuracy(&mut RandomForest::new(config, 3));
    assert!(acc > 0.9, "random forest accuracy {acc} <= 0.9");
}

#[test]
fn extra_trees_accuracy_above_threshold() {
    let config = RandomForestConfig::new(50).unwrap().with_seed(42);
    let acc = holdout_accuracy(&mut RandomForest::extra_trees(config, 3));
    assert!(acc > 0.9, "extra trees accuracy {acc} <= 0.9");
}

#[test]
fn decision_tree_accuracy_above_threshold() {
    let acc = holdout_accuracy(&mut DecisionTree::new(DecisionTreeConfig::new(), 3));
    assert!(acc > 0.9, "decision tree accuracy {acc} <= 0.9");
}

#[cfg(feature = "boosting")]
#[test]
fn gradient_boosting_accuracy_above_threshold() {
    let config = qoe_models::GradientBoostingConfig::new(30).unwrap();
    let acc = holdout_accuracy(&mut qoe_models::GradientBoosting::new(config, 3));
    assert!(acc > 0.9, "gradient boosting accuracy {acc} <= 0.9");
}

#[cfg(feature = "neighbors")]
#[test]
fn k_nearest_accuracy_above_threshold() {
    let acc = holdout_accuracy(&mut qoe_models::KNearest::new(
        qoe_models::KNearestConfig::default(),
        3,
    ));
    assert!(acc > 0.7, "k-nearest accuracy {acc} <= 0.7");
}

#[test]
fn registry_models_all_learn() {
    let registry = ModelRegistry::new(3).unwrap();
    for kind in registry.kinds() {
        let mut model = registry.build(kind).unwrap();
        let acc = holdout_accuracy(model.as_mut());
        let floor = if kind == ModelKind::KNearest { 0.7 } else { 0.9 };
        assert!(acc > floor, "{kind} accuracy {acc} <= {floor}");
    }
}

#[test]
fn forest_is_reproducible_across_fits() {
    let config = RandomForestConfig::new(20).unwrap().with_seed(7);
    let (features, labels) = make_classification();
    let mut a = RandomForest::new(config.clone(), 3);
    let mut b = RandomForest::new(config, 3);
    a.fit(&features, &labels).unwrap();
    b.fit(&features, &labels).unwrap();
    assert_eq!(
        a.predict_proba(&features).unwrap(),
        b.predict_proba(&features).unwrap()
    );
}
