//! Label distribution counts.

use std::collections::BTreeMap;
use std::fmt;

use crate::QoeClass;

/// Counts of labels per class code, ordered by code.
///
/// Classes with zero occurrences are omitted, mirroring a sorted
/// value-count of the label column.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ClassTally {
    counts: BTreeMap<u8, usize>,
}

impl ClassTally {
    /// Tally an iterator of classes.
    pub fn from_classes(classes: impl IntoIterator<Item = QoeClass>) -> Self {
        let mut tally = Self::default();
        for class in classes {
            tally.record(class);
        }
        tally
    }

    /// Add one occurrence of `class`.
    pub fn record(&mut self, class: QoeClass) {
        *self.counts.entry(class.code()).or_insert(0) += 1;
    }

    /// Return the count for `class` (0 when absent).
    #[must_use]
    pub fn count(&self, class: QoeClass) -> usize {
        self.counts.get(&class.code()).copied().unwrap_or(0)
    }

    /// Return the total number of tallied labels.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Return `(code, count)` pairs in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts.iter().map(|(&code, &count)| (code, count))
    }
}

impl fmt::Display for ClassTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (code, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{code}: {count}")?;
        }
        f.write_str("}")
    }
}
