//! Plain-text citation rendering.

use std::fmt;
use std::str::FromStr;

use bibeasy_core::model::Record;
use bibeasy_core::taxonomy::Roster;

use crate::error::ConvertError;

/// How a record is rendered as a citation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CitationStyle {
    /// `Authors. (Year). Title. Venue, details.`
    #[default]
    Apa,
    /// `[ID]\tAuthors. Title. Venue, details, Year.` as used in grant
    /// application CVs.
    Custom,
    /// Authorless style for talks: `Title. Venue, details, Year.`
    Talk,
}

impl CitationStyle {
    pub const ALL: [CitationStyle; 3] =
        [CitationStyle::Apa, CitationStyle::Custom, CitationStyle::Talk];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Apa => "apa",
            Self::Custom => "custom",
            Self::Talk => "talk",
        }
    }

    /// Render one record as a citation line.
    ///
    /// Authors on the roster are marked with a trailing asterisk.
    #[must_use]
    pub fn format_record(&self, record: &Record, roster: &Roster) -> String {
        let authors = roster.mark_authors(&record.authors);
        let mut out = String::new();

        match self {
            Self::Apa => {
                out.push_str(&authors);
                out.push_str(&format!(". ({})", record.year));
                out.push_str(&format!(". {}", record.title));
                out.push_str(&format!(". {}", record.venue));
                push_location(&mut out, record);
                push_impact(&mut out, record);
                push_volume(&mut out, record);
                push_prize(&mut out, record);
                push_url(&mut out, record);
            }
            Self::Custom => {
                out.push_str(&format!("[{}]\t", record.id));
                out.push_str(&authors);
                // Talks carry no authors; skip the separator then.
                if !authors.is_empty() {
                    out.push_str(". ");
                }
                out.push_str(&record.title);
                out.push_str(&format!(". {}", record.venue));
                push_location(&mut out, record);
                push_impact(&mut out, record);
                push_volume(&mut out, record);
                out.push_str(&format!(", {}", record.year));
                push_prize(&mut out, record);
            }
            Self::Talk => {
                out.push_str(&record.title);
                out.push_str(&format!(". {}", record.venue));
                push_location(&mut out, record);
                push_impact(&mut out, record);
                push_volume(&mut out, record);
                out.push_str(&format!(", {}", record.year));
                push_prize(&mut out, record);
                push_url(&mut out, record);
            }
        }
        out
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CitationStyle {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "apa" => Ok(Self::Apa),
            "custom" => Ok(Self::Custom),
            "talk" => Ok(Self::Talk),
            other => Err(ConvertError::NoInput(format!(
                "unknown citation style '{other}' (expected apa, custom or talk)"
            ))),
        }
    }
}

/// Render a batch of records, one line each.
#[must_use]
pub fn format_records(records: &[Record], style: CitationStyle, roster: &Roster) -> Vec<String> {
    records
        .iter()
        .map(|r| style.format_record(r, roster))
        .collect()
}

fn push_location(out: &mut String, record: &Record) {
    if let Some(location) = nonempty(&record.location) {
        out.push_str(&format!(", ({location})"));
    }
}

fn push_impact(out: &mut String, record: &Record) {
    if let Some(impact) = nonempty(&record.impact) {
        out.push_str(&format!(" (IF: {impact})"));
    }
}

fn push_volume(out: &mut String, record: &Record) {
    if let Some(volume) = nonempty(&record.volume_pages) {
        out.push_str(&format!(", {volume}"));
    }
}

fn push_prize(out: &mut String, record: &Record) {
    if let Some(prize) = nonempty(&record.prize) {
        out.push_str(&format!(". {prize}"));
    }
}

fn push_url(out: &mut String, record: &Record) {
    if let Some(url) = nonempty(&record.url) {
        out.push_str(&format!(". {url}"));
    }
}

fn nonempty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibeasy_core::model::{PubType, RefId};

    fn record() -> Record {
        let mut r = Record::new(
            RefId::new(PubType::Article, 4),
            "Gros C, Doe A",
            "Deep segmentation",
            "NeuroImage",
            2021,
        );
        r.location = Some("Montreal, Canada".to_string());
        r.impact = Some("5.9".to_string());
        r.volume_pages = Some("202:116056".to_string());
        r
    }

    fn roster() -> Roster {
        Roster::default()
    }

    #[test]
    fn test_apa_style() {
        let line = CitationStyle::Apa.format_record(&record(), &roster());
        assert_eq!(
            line,
            "Gros C*, Doe A. (2021). Deep segmentation. NeuroImage, \
             (Montreal, Canada) (IF: 5.9), 202:116056"
        );
    }

    #[test]
    fn test_custom_style() {
        let line = CitationStyle::Custom.format_record(&record(), &roster());
        assert!(line.starts_with("[J4]\tGros C*, Doe A. Deep segmentation. NeuroImage"));
        assert!(line.ends_with(", 2021"));
    }

    #[test]
    fn test_talk_style_has_no_authors() {
        let mut r = record();
        r.authors = String::new();
        r.prize = Some("Best talk award".to_string());
        let line = CitationStyle::Talk.format_record(&r, &roster());
        assert!(line.starts_with("Deep segmentation. NeuroImage"));
        assert!(line.ends_with(", 2021. Best talk award"));
    }

    #[test]
    fn test_custom_style_skips_empty_authors_separator() {
        let mut r = record();
        r.authors = String::new();
        let line = CitationStyle::Custom.format_record(&r, &roster());
        assert!(line.starts_with("[J4]\tDeep segmentation."));
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("APA".parse::<CitationStyle>().unwrap(), CitationStyle::Apa);
        assert_eq!("talk".parse::<CitationStyle>().unwrap(), CitationStyle::Talk);
        assert!("chicago".parse::<CitationStyle>().is_err());
    }
}
