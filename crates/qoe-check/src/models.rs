//! Model construction and fit/predict smoke test.

use qoe_models::{ModelEntry, ModelError, ModelRegistry};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::report::{CheckRecord, Detail};

pub(crate) const CHECK_NAME: &str = "Model Creation";

const SAMPLES_PER_CLASS: usize = 12;

/// Well-separated blobs, four features, `SAMPLES_PER_CLASS` rows per class.
fn smoke_data(n_classes: usize) -> (Vec<Vec<f64>>, Vec<usize>) {
    let mut features = Vec::with_capacity(n_classes * SAMPLES_PER_CLASS);
    let mut labels = Vec::with_capacity(n_classes * SAMPLES_PER_CLASS);
    for class in 0..n_classes {
        for i in 0..SAMPLES_PER_CLASS {
            let jitter = (i % 4) as f64 * 0.1;
            let centre = class as f64 * 10.0;
            features.push(vec![centre + jitter, centre - jitter, jitter, centre * 0.5]);
            labels.push(class);
        }
    }
    (features, labels)
}

fn smoke_test(entry: ModelEntry, features: &[Vec<f64>], labels: &[usize]) -> Result<(), ModelError> {
    let ModelEntry { kind, mut model } = entry;
    model.fit(features, labels)?;
    let predicted = model.predict(features)?;
    if predicted.len() != labels.len() {
        return Err(ModelError::LabelCountMismatch {
            n_samples: labels.len(),
            n_labels: predicted.len(),
        });
    }
    info!(%kind, "smoke test passed");
    Ok(())
}

/// Build every registered model for `n_classes`, list them, and fit each
/// on a tiny synthetic dataset. Never returns an error: any failure
/// becomes a failing line.
#[instrument]
pub fn quick_model_test(n_classes: usize, seed: u64) -> CheckRecord {
    let mut record = CheckRecord::new(CHECK_NAME);
    let registry = match ModelRegistry::new(n_classes) {
        Ok(registry) => registry.with_seed(seed),
        Err(e) => {
            warn!(error = %e, "model creation failed");
            record.push(Detail::fail(format!("Model creation failed: {e}")));
            return record;
        }
    };

    let entries = registry.build_all();
    record.push(Detail::pass(format!("Created {} models successfully:", entries.len())));
    for entry in &entries {
        record.push(Detail::info(format!("  {}: {}", entry.kind, entry.model.type_name())));
    }

    let (features, labels) = smoke_data(n_classes);
    let outcomes: Vec<_> = entries
        .into_par_iter()
        .map(|entry| (entry.kind, smoke_test(entry, &features, &labels)))
        .collect();
    for (kind, outcome) in outcomes {
        match outcome {
            Ok(()) => record.push(Detail::pass(format!("{kind}: fit/predict ok"))),
            Err(e) => {
                warn!(%kind, error = %e, "smoke test failed");
                record.push(Detail::fail(format!("{kind}: fit/predict failed: {e}")));
            }
        }
    }
    record
}
