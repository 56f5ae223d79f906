use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::{PubType, RefId};

/// One bibliographic entry, as maintained in the publications sheet.
///
/// Authors are kept as the comma-separated string entered in the sheet;
/// [`Record::author_list`] splits it into trimmed names when individual
/// authors matter (student highlighting, citation formatting).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RefId,
    pub pub_type: PubType,
    pub authors: String,
    pub title: String,

    /// Journal or conference name.
    pub venue: String,

    pub year: i32,

    /// "Volume:Pages" as entered in the sheet (e.g. "12:234-245").
    pub volume_pages: Option<String>,

    /// Conference location, for proceedings and talks.
    pub location: Option<String>,

    /// Journal impact factor, kept verbatim.
    pub impact: Option<String>,

    pub prize: Option<String>,
    pub url: Option<String>,

    /// Website categorization labels.
    pub labels: Vec<String>,

    /// Extra marker columns from the sheet (e.g. a grant column whose
    /// value "x" marks membership), keyed by column name.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Record {
    #[must_use]
    pub fn new(
        id: RefId,
        authors: impl Into<String>,
        title: impl Into<String>,
        venue: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            pub_type: id.pub_type,
            id,
            authors: authors.into(),
            title: title.into(),
            venue: venue.into(),
            year,
            volume_pages: None,
            location: None,
            impact: None,
            prize: None,
            url: None,
            labels: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Individual author names, trimmed.
    #[must_use]
    pub fn author_list(&self) -> Vec<&str> {
        self.authors
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .collect()
    }

    /// True when the given marker column is checked ("x") for this record.
    #[must_use]
    pub fn has_marker(&self, column: &str) -> bool {
        self.extra
            .get(column)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("x"))
    }
}
