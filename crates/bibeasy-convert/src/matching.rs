//! Matching sheet records against CCV publications.
//!
//! Records are paired by (type, title), falling back to the venue when
//! several CCV publications share a title. The result is a conversion
//! map from sheet IDs to CCV IDs plus a list of CCV publications that
//! have no sheet counterpart.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use bibeasy_core::model::{PubType, Record, RefId};

use crate::ccv::CcvRecord;

/// Fields compared on matched pairs to flag stale CCV data.
const MISMATCH_FIELDS: [&str; 2] = ["Authors", "Journal/Conference"];

/// Result of looking a sheet record up in the CCV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Exactly one CCV publication matched.
    Matched(RefId),
    /// No CCV publication carries this title.
    Missing,
    /// Several CCV publications matched and the venue did not settle it.
    Duplicate,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched(id) => write!(f, "{id}"),
            Self::Missing => write!(f, "missing"),
            Self::Duplicate => write!(f, "duplicate"),
        }
    }
}

impl Serialize for MatchOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One sheet record paired with its CCV lookup result.
#[derive(Debug, Clone, Serialize)]
pub struct MatchEntry {
    pub outcome: MatchOutcome,
    pub title: String,
    /// Fields whose sheet and CCV values disagree on a matched pair.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mismatched: Vec<&'static str>,
}

/// Per-type tallies.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MatchStats {
    pub found: usize,
    pub missing: usize,
    pub duplicate: usize,
    /// CCV publications of this type with no sheet counterpart.
    pub unmatched: usize,
}

/// Full outcome of a sheet-to-CCV comparison.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    /// Sheet ID to CCV lookup result.
    pub map: BTreeMap<RefId, MatchEntry>,
    /// CCV publications no sheet record matched, with their titles.
    pub unmatched_ccv: Vec<(RefId, String)>,
    pub stats: BTreeMap<PubType, MatchStats>,
}

impl MatchReport {
    /// The sheet-to-CCV ID map, keeping only cleanly matched pairs.
    #[must_use]
    pub fn id_map(&self) -> BTreeMap<RefId, RefId> {
        self.map
            .iter()
            .filter_map(|(sheet_id, entry)| match entry.outcome {
                MatchOutcome::Matched(ccv_id) => Some((*sheet_id, ccv_id)),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (sheet_id, entry) in &self.map {
            writeln!(f, "GSHEET {}\tCCV {}\t{}", sheet_id, entry.outcome, entry.title)?;
            if !entry.mismatched.is_empty() {
                writeln!(f, "  Mismatched fields: {}", entry.mismatched.join(", "))?;
            }
        }
        for (ccv_id, title) in &self.unmatched_ccv {
            writeln!(f, "GSHEET [missing]\tCCV {ccv_id}\t{title}")?;
        }
        for (pub_type, stats) in &self.stats {
            writeln!(
                f,
                "Results for type '{}': Found: {} | Not in CCV: {} | Duplicate: {} | Not in sheet: {}",
                pub_type, stats.found, stats.missing, stats.duplicate, stats.unmatched
            )?;
        }
        Ok(())
    }
}

/// Pair each sheet record of the requested types with a CCV publication.
///
/// With an empty `types` list, articles and proceedings are compared,
/// which is what a CCV export can contain.
#[must_use]
pub fn match_records(sheet: &[Record], ccv: &[CcvRecord], types: &[PubType]) -> MatchReport {
    let types: Vec<PubType> = if types.is_empty() {
        PubType::CCV.to_vec()
    } else {
        types.to_vec()
    };

    let mut report = MatchReport::default();

    for pub_type in types {
        log::info!("Publication type: '{pub_type}'");
        let stats = report.stats.entry(pub_type).or_default();
        let mut unmatched: Vec<&CcvRecord> =
            ccv.iter().filter(|c| c.pub_type == pub_type).collect();

        for record in sheet.iter().filter(|r| r.pub_type == pub_type) {
            let candidates: Vec<&CcvRecord> = unmatched
                .iter()
                .copied()
                .filter(|c| c.title == record.title)
                .collect();

            let found = match candidates.as_slice() {
                [one] => Some(*one),
                [] => None,
                several => several.iter().copied().find(|c| c.venue == record.venue),
            };

            let entry = match found {
                Some(ccv_record) => {
                    stats.found += 1;
                    unmatched.retain(|c| c.id != ccv_record.id);
                    let mismatched = mismatched_fields(record, ccv_record);
                    log::info!("GSHEET {}\tCCV {}\t{}", record.id, ccv_record.id, record.title);
                    if !mismatched.is_empty() {
                        log::warn!("  Mismatched fields: {}", mismatched.join(", "));
                    }
                    MatchEntry {
                        outcome: MatchOutcome::Matched(ccv_record.id),
                        title: record.title.clone(),
                        mismatched,
                    }
                }
                None => {
                    let outcome = if candidates.is_empty() {
                        stats.missing += 1;
                        MatchOutcome::Missing
                    } else {
                        stats.duplicate += 1;
                        MatchOutcome::Duplicate
                    };
                    log::warn!("GSHEET {}\tCCV {}\t{}", record.id, outcome, record.title);
                    MatchEntry {
                        outcome,
                        title: record.title.clone(),
                        mismatched: Vec::new(),
                    }
                }
            };
            report.map.insert(record.id, entry);
        }

        stats.unmatched = unmatched.len();
        for ccv_record in unmatched {
            log::warn!("GSHEET [missing]\tCCV {}\t{}", ccv_record.id, ccv_record.title);
            report
                .unmatched_ccv
                .push((ccv_record.id, ccv_record.title.clone()));
        }
    }

    report
}

/// Map IDs from one CCV export onto another, pairing publications by
/// (type, title) and falling back to the venue for duplicate titles.
///
/// Used when references cite an older CCV index and need renumbering
/// against a fresh export.
#[must_use]
pub fn ccv_id_map(src: &[CcvRecord], dest: &[CcvRecord]) -> BTreeMap<RefId, RefId> {
    let mut map = BTreeMap::new();
    for record in src {
        let candidates: Vec<&CcvRecord> = dest
            .iter()
            .filter(|c| c.pub_type == record.pub_type && c.title == record.title)
            .collect();
        let found = match candidates.as_slice() {
            [one] => Some(*one),
            [] => None,
            several => several.iter().copied().find(|c| c.venue == record.venue),
        };
        match found {
            Some(dest_record) => {
                map.insert(record.id, dest_record.id);
            }
            None => log::warn!("No match for {} '{}'", record.id, record.title),
        }
    }
    map
}

fn mismatched_fields(record: &Record, ccv: &CcvRecord) -> Vec<&'static str> {
    let mut out = Vec::new();
    if strip_marks(&record.authors) != strip_marks(&ccv.authors) {
        out.push(MISMATCH_FIELDS[0]);
    }
    if record.venue != ccv.venue {
        out.push(MISMATCH_FIELDS[1]);
    }
    out
}

/// Authors compare equal regardless of student asterisks.
fn strip_marks(authors: &str) -> String {
    authors.replace('*', "")
}
