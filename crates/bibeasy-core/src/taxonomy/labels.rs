//! Authorized publication labels.
//!
//! The lab website groups publications by topical labels drawn from a
//! controlled list maintained outside this repository. The list is
//! loaded from a plain-text file, one label per line, and every label
//! found in the sheet must belong to it.

use std::fmt;
use std::fmt::Write as _;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Record;

/// The controlled list of labels publications may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

/// One record that carries labels outside the authorized list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelViolation {
    pub id: String,
    pub invalid: Vec<String>,
}

/// Result of validating a set of records against a [`LabelSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelReport {
    pub violations: Vec<LabelViolation>,
}

impl LabelSet {
    /// Load the authorized labels from a plain-text file, one per line.
    /// Blank lines are skipped and surrounding whitespace is trimmed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_lines(&content))
    }

    /// Build a label set from newline-separated text.
    #[must_use]
    pub fn from_lines(content: &str) -> Self {
        let labels = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        Self { labels }
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label.trim())
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Check the labels of every record, collecting offenders.
    #[must_use]
    pub fn check(&self, records: &[Record]) -> LabelReport {
        let mut violations = Vec::new();
        for record in records {
            let invalid: Vec<String> = record
                .labels
                .iter()
                .filter(|l| !self.contains(l))
                .map(|l| l.trim().to_string())
                .collect();
            if !invalid.is_empty() {
                violations.push(LabelViolation {
                    id: record.id.to_string(),
                    invalid,
                });
            }
        }
        LabelReport { violations }
    }

    /// Validate records, turning any violation into an error.
    pub fn validate(&self, records: &[Record]) -> Result<()> {
        let report = self.check(records);
        if report.is_clean() {
            Ok(())
        } else {
            Err(Error::UnauthorizedLabels(report.to_string()))
        }
    }

    /// Render the authorized labels as the HTML button list consumed by
    /// the lab website.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::from("<!-- label_definitions.md -->\n\n");
        for label in &self.labels {
            let _ = writeln!(
                html,
                "<button class=\"label\" data-label=\"{label}\">{label}</button>"
            );
        }
        html
    }
}

impl LabelReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for LabelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for violation in &self.violations {
            writeln!(f, "{}: {}", violation.id, violation.invalid.join(", "))?;
        }
        Ok(())
    }
}
