//! The three-level ordinal QoE class.

use std::fmt;
use std::str::FromStr;

use crate::LabelError;

/// Ordinal quality-of-experience class.
///
/// Ordered `Poor < Fair < Good`, with integer codes 1, 2 and 3.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QoeClass {
    /// Code 1.
    Poor,
    /// Code 2.
    Fair,
    /// Code 3.
    Good,
}

impl QoeClass {
    /// All classes in ascending order.
    pub const ALL: [QoeClass; 3] = [QoeClass::Poor, QoeClass::Fair, QoeClass::Good];

    /// Number of classes.
    pub const COUNT: usize = 3;

    /// Return the integer code (1..=3).
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            QoeClass::Poor => 1,
            QoeClass::Fair => 2,
            QoeClass::Good => 3,
        }
    }

    /// Return the zero-based class index used by classifiers.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.code() - 1)
    }

    /// Look up a class by its integer code.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::UnknownClassCode`] for codes outside `1..=3`.
    pub fn from_code(code: u8) -> Result<Self, LabelError> {
        match code {
            1 => Ok(QoeClass::Poor),
            2 => Ok(QoeClass::Fair),
            3 => Ok(QoeClass::Good),
            code => Err(LabelError::UnknownClassCode { code }),
        }
    }

    /// Look up a class by its zero-based index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Return the lowercase class name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            QoeClass::Poor => "poor",
            QoeClass::Fair => "fair",
            QoeClass::Good => "good",
        }
    }
}

impl fmt::Display for QoeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QoeClass {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poor" => Ok(QoeClass::Poor),
            "fair" => Ok(QoeClass::Fair),
            "good" => Ok(QoeClass::Good),
            _ => Err(LabelError::UnknownClassName { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_one_based_and_ordered() {
        let codes: Vec<u8> = QoeClass::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes, vec![1, 2, 3]);
        assert!(QoeClass::Poor < QoeClass::Fair);
        assert!(QoeClass::Fair < QoeClass::Good);
    }

    #[test]
    fn code_round_trip() {
        for class in QoeClass::ALL {
            assert_eq!(QoeClass::from_code(class.code()).unwrap(), class);
            assert_eq!(QoeClass::from_index(class.index()), Some(class));
        }
    }

    #[test]
    fn unknown_code_rejected() {
        assert!(matches!(
            QoeClass::from_code(0),
            Err(LabelError::UnknownClassCode { code: 0 })
        ));
        assert!(QoeClass::from_code(4).is_err());
        assert_eq!(QoeClass::from_index(3), None);
    }

    #[test]
    fn parse_names_case_insensitive() {
        assert_eq!("Good".parse::<QoeClass>().unwrap(), QoeClass::Good);
        assert_eq!(" poor ".parse::<QoeClass>().unwrap(), QoeClass::Poor);
        assert!(matches!(
            "excellent".parse::<QoeClass>(),
            Err(LabelError::UnknownClassName { .. })
        ));
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(QoeClass::Fair.to_string(), "fair");
    }
}
