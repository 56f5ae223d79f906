//! Student/HQP roster used to highlight trainee authors.
//!
//! Funding agencies ask that trainees be marked in publication lists,
//! which we do with a trailing asterisk on the author name. The roster
//! ships with a built-in default and can be extended from a TOML file
//! (`students = ["Doe A", ...]`) or ad hoc for testing.

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};

/// Default roster of student authors, as they appear in the sheet.
const DEFAULT_STUDENTS: &[&str] = &[
    "Alley S",
    "Alonso-Ortiz E",
    "Badji A",
    "Benhamou M",
    "Boudreau M",
    "Bourget M-H",
    "De Leener B",
    "Dupont S",
    "Dupont SM",
    "Duval T",
    "Eden D",
    "Enguix V",
    "Foias A",
    "Germain G",
    "Gros C",
    "Kerbrat A",
    "Lemay A",
    "Levy S",
    "Lopez Rios N",
    "Lubrano M",
    "Lubrano di Scandalea M",
    "Mangeat G",
    "Mingasson T",
    "Morozov D",
    "Nami H",
    "Paquin ME",
    "Paugam F",
    "Perdigon Romero F",
    "Perone C",
    "Perone CS",
    "Perraud B",
    "Rouhier L",
    "Saliani A",
    "Snoussi H",
    "Topfer R",
    "Ullman E",
    "Verma T",
    "Vincent O",
    "Wabartha M",
    "Zaimi A",
];

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    students: Vec<String>,
}

/// The set of author names that should be marked as students.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            names: DEFAULT_STUDENTS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Roster {
    /// Load a roster from a TOML file, replacing the built-in default.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: RosterFile = toml::from_str(&content).map_err(|e| {
            Error::InvalidData(format!(
                "failed to parse roster from {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self {
            names: file.students,
        })
    }

    /// Add a name to the roster (used for testing against small CCV datasets).
    pub fn append(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Mark roster members in a comma-separated author list with a
    /// trailing asterisk.
    ///
    /// Existing asterisks are stripped first so the operation is
    /// idempotent. Spacing is normalized to ", " between names.
    #[must_use]
    pub fn mark_authors(&self, authors: &str) -> String {
        let marked: Vec<String> = authors
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(|raw| {
                let name = raw.replace('*', "");
                if self.contains(&name) {
                    format!("{name}*")
                } else {
                    name
                }
            })
            .collect();
        marked.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_roster() -> Roster {
        let mut roster = Roster {
            names: vec!["Gros C".to_string(), "Levy S".to_string()],
        };
        roster.append("Duval T");
        roster
    }

    #[test]
    fn test_default_roster_nonempty() {
        let roster = Roster::default();
        assert!(roster.contains("Gros C"));
        assert!(!roster.contains("Cohen-Adad J"));
    }

    #[test]
    fn test_append_is_idempotent() {
        let mut roster = small_roster();
        let before = roster.len();
        roster.append("Duval T");
        assert_eq!(roster.len(), before);
    }

    #[test]
    fn test_mark_authors() {
        let roster = small_roster();
        let marked = roster.mark_authors("Gros C, Cohen-Adad J, Levy S");
        assert_eq!(marked, "Gros C*, Cohen-Adad J, Levy S*");
    }

    #[test]
    fn test_mark_authors_strips_existing_asterisks() {
        let roster = small_roster();
        let once = roster.mark_authors("Gros C*, Cohen-Adad J");
        let twice = roster.mark_authors(&once);
        assert_eq!(once, "Gros C*, Cohen-Adad J");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_mark_authors_empty() {
        let roster = small_roster();
        assert_eq!(roster.mark_authors(""), "");
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.toml");
        std::fs::write(&path, "students = [\"Doe A\", \"Roe B\"]\n").unwrap();
        let roster = Roster::load(&path).unwrap();
        assert!(roster.contains("Doe A"));
        assert!(!roster.contains("Gros C"));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "students = [[[").unwrap();
        assert!(Roster::load(&path).is_err());
    }
}
