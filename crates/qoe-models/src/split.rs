//! Split criteria and split search for classification trees.

use rand::Rng;

/// Criterion for measuring node impurity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SplitCriterion {
    /// Gini impurity: `1 - Σ p_i²`.
    Gini,
    /// Entropy: `-Σ p_i ln p_i`.
    Entropy,
}

impl SplitCriterion {
    /// Impurity of a node given its class counts; 0 for an empty node.
    #[must_use]
    pub fn impurity(&self, counts: &[usize], total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let n = total as f64;
        match self {
            SplitCriterion::Gini => {
                1.0 - counts
                    .iter()
                    .map(|&c| (c as f64 / n).powi(2))
                    .sum::<f64>()
            }
            SplitCriterion::Entropy => -counts
                .iter()
                .filter(|&&c| c > 0)
                .map(|&c| {
                    let p = c as f64 / n;
                    p * p.ln()
                })
                .sum::<f64>(),
        }
    }
}

/// How candidate thresholds are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SplitMethod {
    /// Scan every midpoint between consecutive distinct values (CART).
    Best,
    /// Draw one uniform threshold per feature between its min and max (extra-trees).
    Random,
}

/// Outcome of a successful split search.
#[derive(Debug, Clone)]
pub(crate) struct Split {
    pub(crate) feature: usize,
    pub(crate) threshold: f64,
    pub(crate) left: Vec<usize>,
    pub(crate) right: Vec<usize>,
}

/// Per-node search parameters.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SplitSearch {
    pub(crate) criterion: SplitCriterion,
    pub(crate) method: SplitMethod,
    pub(crate) max_features: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) n_classes: usize,
}

impl SplitSearch {
    /// Find the split with the largest weighted impurity decrease among a
    /// random subset of `max_features` columns.
    ///
    /// `columns[feature][sample]` is column-major. Returns `None` when no
    /// candidate separates the samples while respecting `min_samples_leaf`.
    pub(crate) fn find(
        &self,
        columns: &[Vec<f64>],
        labels: &[usize],
        samples: &[usize],
        rng: &mut impl Rng,
    ) -> Option<Split> {
        let n = samples.len();
        if n < 2 * self.min_samples_leaf {
            return None;
        }

        let mut parent = vec![0usize; self.n_classes];
        for &s in samples {
            parent[labels[s]] += 1;
        }
        let parent_score = n as f64 * self.criterion.impurity(&parent, n);

        let n_features = columns.len();
        let take = self.max_features.min(n_features);
        let mut order: Vec<usize> = (0..n_features).collect();
        for i in 0..take {
            let j = rng.gen_range(i..n_features);
            order.swap(i, j);
        }

        let mut best: Option<(f64, usize, f64)> = None;
        for &feature in &order[..take] {
            let candidate = match self.method {
                SplitMethod::Best => self.best_threshold(&columns[feature], labels, samples, &parent),
                SplitMethod::Random => {
                    self.random_threshold(&columns[feature], labels, samples, rng)
                }
            };
            if let Some((child_score, threshold)) = candidate {
                let decrease = parent_score - child_score;
                if best.is_none_or(|(d, _, _)| decrease > d) {
                    best = Some((decrease, feature, threshold));
                }
            }
        }

        let (_, feature, threshold) = best?;
        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .copied()
            .partition(|&s| columns[feature][s] <= threshold);
        Some(Split {
            feature,
            threshold,
            left,
            right,
        })
    }

    /// Exhaustive scan; returns `(weighted child impurity, threshold)`.
    fn best_threshold(
        &self,
        column: &[f64],
        labels: &[usize],
        samples: &[usize],
        parent: &[usize],
    ) -> Option<(f64, f64)> {
        let n = samples.len();
        let mut sorted: Vec<(f64, usize)> = samples.iter().map(|&s| (column[s], labels[s])).collect();
        sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        let mut left = vec![0usize; self.n_classes];
        let mut right = parent.to_vec();
        let mut best: Option<(f64, f64)> = None;

        for i in 0..n - 1 {
            let (value, label) = sorted[i];
            left[label] += 1;
            right[label] -= 1;

            let next = sorted[i + 1].0;
            let n_left = i + 1;
            let n_right = n - n_left;
            if value == next || n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                continue;
            }

            let score = n_left as f64 * self.criterion.impurity(&left, n_left)
                + n_right as f64 * self.criterion.impurity(&right, n_right);
            if best.is_none_or(|(s, _)| score < s) {
                best = Some((score, (value + next) / 2.0));
            }
        }
        best
    }

    /// Single uniform draw between the node's min and max for this column.
    fn random_threshold(
        &self,
        column: &[f64],
        labels: &[usize],
        samples: &[usize],
        rng: &mut impl Rng,
    ) -> Option<(f64, f64)> {
        let (lo, hi) = samples.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
            (lo.min(column[s]), hi.max(column[s]))
        });
        if lo >= hi {
            return None;
        }
        let threshold = rng.gen_range(lo..hi);

        let mut left = vec![0usize; self.n_classes];
        let mut right = vec![0usize; self.n_classes];
        for &s in samples {
            if column[s] <= threshold {
                left[labels[s]] += 1;
            } else {
                right[labels[s]] += 1;
            }
        }
        let n_left: usize = left.iter().sum();
        let n_right: usize = right.iter().sum();
        if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
            return None;
        }
        let score = n_left as f64 * self.criterion.impurity(&left, n_left)
            + n_right as f64 * self.criterion.impurity(&right, n_right);
        Some((score, threshold))
    }
}
