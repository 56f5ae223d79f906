use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Publication types recognized by the toolkit.
///
/// Each type corresponds to one tab of the publications spreadsheet and,
/// for the first two, to one labelled section of the CCV "Publications"
/// index. The one-letter prefix is used to build [`RefId`]s cited in
/// free text (`J12`, `C8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PubType {
    Article,
    Proceedings,
    Talk,
    BookChapter,
}

impl PubType {
    /// All known publication types, in reference-prefix order.
    pub const ALL: [PubType; 4] = [
        PubType::Article,
        PubType::Proceedings,
        PubType::Talk,
        PubType::BookChapter,
    ];

    /// The types that appear in the CCV Publications section.
    pub const CCV: [PubType; 2] = [PubType::Article, PubType::Proceedings];

    /// One-letter prefix used in reference IDs.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            PubType::Article => 'J',
            PubType::Proceedings => 'C',
            PubType::Talk => 'T',
            PubType::BookChapter => 'B',
        }
    }

    /// Lowercase name as used for spreadsheet tabs and CLI flags.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PubType::Article => "article",
            PubType::Proceedings => "proceedings",
            PubType::Talk => "talk",
            PubType::BookChapter => "bookchapter",
        }
    }

    /// Label of the matching CCV publication section, when there is one.
    ///
    /// Talks and book chapters are not indexed in the CCV Publications
    /// section and return `None`.
    #[must_use]
    pub const fn ccv_section(self) -> Option<&'static str> {
        match self {
            PubType::Article => Some("Journal Articles"),
            PubType::Proceedings => Some("Conference Publications"),
            PubType::Talk | PubType::BookChapter => None,
        }
    }

    /// CCV field label holding the publication title for this type.
    #[must_use]
    pub const fn ccv_title_field(self) -> Option<&'static str> {
        match self {
            PubType::Article => Some("Article Title"),
            PubType::Proceedings => Some("Publication Title"),
            PubType::Talk | PubType::BookChapter => None,
        }
    }

    /// CCV field label holding the venue (journal or conference) for this type.
    #[must_use]
    pub const fn ccv_venue_field(self) -> Option<&'static str> {
        match self {
            PubType::Article => Some("Journal"),
            PubType::Proceedings => Some("Conference Name"),
            PubType::Talk | PubType::BookChapter => None,
        }
    }

    /// Resolve a CCV section label back to a publication type.
    #[must_use]
    pub fn from_ccv_section(label: &str) -> Option<Self> {
        Self::CCV
            .into_iter()
            .find(|t| t.ccv_section() == Some(label))
    }

    /// Resolve a reference-ID prefix back to a publication type.
    #[must_use]
    pub fn from_prefix(prefix: char) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.prefix() == prefix)
    }
}

impl fmt::Display for PubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PubType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownPubType(s.to_string()))
    }
}

/// A typed reference identifier: publication-type prefix plus ordinal.
///
/// These are the short indices used to cite entries in grant text and
/// to cross-reference the sheet against CCV exports: `J12` is the 12th
/// journal article, `C8` the 8th conference paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefId {
    pub pub_type: PubType,
    pub ordinal: u32,
}

impl RefId {
    #[must_use]
    pub const fn new(pub_type: PubType, ordinal: u32) -> Self {
        Self { pub_type, ordinal }
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pub_type.prefix(), self.ordinal)
    }
}

impl FromStr for RefId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let prefix = chars
            .next()
            .ok_or_else(|| Error::InvalidRefId(s.to_string()))?;
        let pub_type =
            PubType::from_prefix(prefix).ok_or_else(|| Error::InvalidRefId(s.to_string()))?;
        let rest = chars.as_str();
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidRefId(s.to_string()));
        }
        let ordinal: u32 = rest
            .parse()
            .map_err(|_| Error::InvalidRefId(s.to_string()))?;
        Ok(Self { pub_type, ordinal })
    }
}

impl Serialize for RefId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RefId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pubtype_prefix_roundtrip() {
        for t in PubType::ALL {
            assert_eq!(PubType::from_prefix(t.prefix()), Some(t));
        }
    }

    #[test]
    fn test_pubtype_from_str() {
        assert_eq!("article".parse::<PubType>().unwrap(), PubType::Article);
        assert_eq!("Proceedings".parse::<PubType>().unwrap(), PubType::Proceedings);
        assert!("poster".parse::<PubType>().is_err());
    }

    #[test]
    fn test_pubtype_ccv_sections() {
        assert_eq!(PubType::Article.ccv_section(), Some("Journal Articles"));
        assert_eq!(
            PubType::Proceedings.ccv_section(),
            Some("Conference Publications")
        );
        assert_eq!(PubType::Talk.ccv_section(), None);
        assert_eq!(
            PubType::from_ccv_section("Journal Articles"),
            Some(PubType::Article)
        );
        assert_eq!(PubType::from_ccv_section("Book Chapters"), None);
    }

    #[test]
    fn test_refid_display() {
        let id = RefId::new(PubType::Article, 12);
        assert_eq!(id.to_string(), "J12");
        let id = RefId::new(PubType::Proceedings, 8);
        assert_eq!(id.to_string(), "C8");
    }

    #[test]
    fn test_refid_parse() {
        let id: RefId = "J12".parse().unwrap();
        assert_eq!(id, RefId::new(PubType::Article, 12));
        let id: RefId = "T3".parse().unwrap();
        assert_eq!(id, RefId::new(PubType::Talk, 3));
    }

    #[test]
    fn test_refid_parse_rejects_garbage() {
        assert!("X12".parse::<RefId>().is_err());
        assert!("J".parse::<RefId>().is_err());
        assert!("J12a".parse::<RefId>().is_err());
        assert!("".parse::<RefId>().is_err());
    }

    #[test]
    fn test_refid_ordering_groups_by_type() {
        let mut ids = vec![
            RefId::new(PubType::Proceedings, 1),
            RefId::new(PubType::Article, 9),
            RefId::new(PubType::Article, 2),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                RefId::new(PubType::Article, 2),
                RefId::new(PubType::Article, 9),
                RefId::new(PubType::Proceedings, 1),
            ]
        );
    }
}
