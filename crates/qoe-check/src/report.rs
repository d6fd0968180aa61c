//! Structured validation results and their console rendering.

use std::fmt;

use serde::Serialize;

const RULE_WIDTH: usize = 50;

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Every required condition held.
    Passed,
    /// At least one failing detail was recorded.
    Failed,
}

/// Leading mark of a detail line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    /// Rendered as `✓`.
    Pass,
    /// Rendered as `✗`.
    Fail,
}

/// One line of evidence within a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail {
    /// `None` for informational lines.
    pub mark: Option<Mark>,
    /// Text shown after the mark.
    pub message: String,
}

impl Detail {
    /// A `✓` line.
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            mark: Some(Mark::Pass),
            message: message.into(),
        }
    }

    /// A `✗` line.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            mark: Some(Mark::Fail),
            message: message.into(),
        }
    }

    /// An unmarked, indented line.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            mark: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mark {
            Some(Mark::Pass) => write!(f, "✓ {}", self.message),
            Some(Mark::Fail) => write!(f, "✗ {}", self.message),
            None => write!(f, "  {}", self.message),
        }
    }
}

/// Result of one named check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRecord {
    /// Check title, e.g. `Datasets`.
    pub name: String,
    /// Overall outcome.
    pub status: Status,
    /// Evidence lines in the order they were found.
    pub details: Vec<Detail>,
}

impl CheckRecord {
    /// A passing record with no details yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Status::Passed,
            details: Vec::new(),
        }
    }

    /// A failed record carrying a single failure line.
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut record = Self::new(name);
        record.push(Detail::fail(message));
        record
    }

    /// Append a detail; a failing detail fails the record.
    pub fn push(&mut self, detail: Detail) {
        if detail.mark == Some(Mark::Fail) {
            self.status = Status::Failed;
        }
        self.details.push(detail);
    }

    /// Append a failing detail without changing the status.
    pub fn note_failure(&mut self, message: impl Into<String>) {
        self.details.push(Detail::fail(message));
    }

    /// Whether the check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == Status::Passed
    }
}

/// Every check record in run order plus the AND of their outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Records in run order.
    pub checks: Vec<CheckRecord>,
    /// `true` iff every record passed.
    pub all_passed: bool,
}

impl ValidationReport {
    /// Aggregate `checks`.
    pub fn new(checks: Vec<CheckRecord>) -> Self {
        let all_passed = checks.iter().all(CheckRecord::passed);
        Self { checks, all_passed }
    }

    /// Look up a record by check name.
    #[must_use]
    pub fn check(&self, name: &str) -> Option<&CheckRecord> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Final one-line verdict.
    #[must_use]
    pub fn banner(&self) -> &'static str {
        if self.all_passed {
            "✓ ALL CHECKS PASSED - Ready for paper reproduction!"
        } else {
            "✗ Some checks failed - Please fix issues before running the pipeline"
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "PAPER REPRODUCTION VALIDATION")?;
        writeln!(f, "{rule}")?;
        for check in &self.checks {
            writeln!(f, "\n{}:", check.name)?;
            for detail in &check.details {
                writeln!(f, "{detail}")?;
            }
        }
        writeln!(f, "\n{rule}")?;
        writeln!(f, "{}", self.banner())?;
        write!(f, "{rule}")
    }
}

/// `1234567` → `"1,234,567"`.
pub(crate) fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
