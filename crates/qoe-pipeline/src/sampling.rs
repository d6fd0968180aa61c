//! Seeded row sampling and stratified train/test splitting.

use std::collections::BTreeMap;

use qoe_label::QoeClass;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::PipelineError;

/// Pick `min(k, n)` distinct row indices out of `0..n`.
pub fn sample_indices<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> Vec<usize> {
    rand::seq::index::sample(rng, n, k.min(n)).into_vec()
}

/// Index partition produced by [`stratified_split`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    /// Training rows.
    pub train: Vec<usize>,
    /// Held-out rows.
    pub test: Vec<usize>,
}

/// Per-class test quotas: proportional floors, then the leftover rows go
/// to the largest fractional remainders. Every class keeps at least one
/// training row.
fn allocate(counts: &BTreeMap<QoeClass, Vec<usize>>, n: usize, n_test: usize) -> BTreeMap<QoeClass, usize> {
    let mut quotas: BTreeMap<QoeClass, usize> = BTreeMap::new();
    let mut remainders: Vec<(f64, usize, QoeClass)> = Vec::with_capacity(counts.len());
    for (&class, members) in counts {
        let exact = members.len() as f64 * n_test as f64 / n as f64;
        let floor = (exact.floor() as usize).min(members.len() - 1);
        quotas.insert(class, floor);
        remainders.push((exact - exact.floor(), members.len(), class));
    }
    // Largest remainder first, then larger class, then lower class.
    remainders.sort_by(|a, b| b.0.total_cmp(&a.0).then(b.1.cmp(&a.1)).then(a.2.cmp(&b.2)));

    let mut left = n_test - quotas.values().sum::<usize>();
    while left > 0 {
        let mut placed = false;
        for &(_, size, class) in &remainders {
            if left == 0 {
                break;
            }
            if let Some(q) = quotas.get_mut(&class)
                && *q + 1 < size
            {
                *q += 1;
                left -= 1;
                placed = true;
            }
        }
        if !placed {
            break;
        }
    }
    quotas
}

/// Split row indices so each class keeps its proportion in the test set.
///
/// The test partition holds `ceil(test_fraction * n)` rows.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`PipelineError::InvalidTestFraction`] | `test_fraction` not in (0, 1) |
/// | [`PipelineError::InsufficientClassMembers`] | A class has fewer than 2 rows |
/// | [`PipelineError::InvalidSplit`] | A partition would hold fewer rows than there are classes |
pub fn stratified_split<R: Rng + ?Sized>(
    labels: &[QoeClass],
    test_fraction: f64,
    rng: &mut R,
) -> Result<TrainTestSplit, PipelineError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::InvalidTestFraction { test_fraction });
    }
    let n = labels.len();
    let mut by_class: BTreeMap<QoeClass, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }
    if let Some((&class, members)) = by_class.iter().find(|(_, m)| m.len() < 2) {
        return Err(PipelineError::InsufficientClassMembers {
            class,
            count: members.len(),
        });
    }

    // Nudge below the integer so 0.2 * 1000 does not round up to 201.
    let n_test = ((test_fraction * n as f64) - 1e-9).ceil() as usize;
    let n_classes = by_class.len();
    if n_test < n_classes || n - n_test < n_classes {
        return Err(PipelineError::InvalidSplit {
            n_samples: n,
            n_test,
            n_classes,
        });
    }

    let quotas = allocate(&by_class, n, n_test);
    let mut train = Vec::with_capacity(n - n_test);
    let mut test = Vec::with_capacity(n_test);
    for (class, mut members) in by_class {
        members.shuffle(rng);
        let take = quotas.get(&class).copied().unwrap_or(0);
        debug!(%class, n_test = take, n_train = members.len() - take, "class allocated");
        test.extend_from_slice(&members[..take]);
        train.extend_from_slice(&members[take..]);
    }
    train.shuffle(rng);
    test.shuffle(rng);
    Ok(TrainTestSplit { train, test })
}
