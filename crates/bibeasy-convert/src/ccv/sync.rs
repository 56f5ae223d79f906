//! Rewriting CCV XML in place.
//!
//! Two rewrites are supported: copying sheet fields (authors, venue)
//! onto their matching CCV publications, and asterisking student names
//! in Authors/Editors fields. Both stream the document through,
//! touching only the targeted `value` texts and leaving everything else
//! byte-for-byte as exported.

use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;

use bibeasy_core::model::{PubType, Record};
use bibeasy_core::taxonomy::Roster;

use crate::ccv::read::{at_publication_depth, attr_label, in_publications, parse_ccv};
use crate::error::{ConvertError, ConvertResult};

/// Replacement values for one CCV publication.
#[derive(Debug, Clone)]
struct Patch {
    authors: String,
    venue: String,
}

/// Copy Authors and venue from sheet records into a CCV XML export.
///
/// Each CCV publication is matched by (type, title), disambiguating by
/// venue when several sheet entries share the title. Publications with
/// no sheet counterpart are left untouched.
///
/// # Errors
///
/// Returns an error when a CCV publication matches several sheet
/// entries that the venue does not disambiguate, or on malformed XML.
pub fn sync_ccv(xml: &str, records: &[Record]) -> ConvertResult<String> {
    let ccv_records = parse_ccv(xml)?;

    let mut patches: HashMap<(PubType, u32), Patch> = HashMap::new();
    for ccv in &ccv_records {
        let candidates: Vec<&Record> = records
            .iter()
            .filter(|r| r.pub_type == ccv.pub_type && r.title == ccv.title)
            .collect();

        let matched = match candidates.as_slice() {
            [] => {
                log::debug!("No sheet entry for CCV publication '{}'", ccv.title);
                continue;
            }
            [one] => *one,
            several => {
                let by_venue: Vec<&Record> = several
                    .iter()
                    .copied()
                    .filter(|r| r.venue == ccv.venue)
                    .collect();
                match by_venue.as_slice() {
                    [one] => *one,
                    _ => {
                        return Err(ConvertError::AmbiguousMatch {
                            title: ccv.title.clone(),
                        })
                    }
                }
            }
        };

        log::info!("Updating '{}'", ccv.title);
        log::info!("  Authors: {} => {}", ccv.authors, matched.authors);
        log::info!("  Venue: {} => {}", ccv.venue, matched.venue);
        patches.insert(
            (ccv.pub_type, ccv.id.ordinal),
            Patch {
                authors: matched.authors.clone(),
                venue: matched.venue.clone(),
            },
        );
    }

    transform_values(xml, |ctx, _old| {
        let (pub_type, ordinal) = ctx.publication?;
        let patch = patches.get(&(pub_type, ordinal))?;
        let field = ctx.field?;
        if field == "Authors" {
            return Some(patch.authors.clone());
        }
        if Some(field) == pub_type.ccv_venue_field() {
            return Some(patch.venue.clone());
        }
        None
    })
}

/// Asterisk roster members in every Authors/Editors field of a CCV XML.
///
/// Existing asterisks are stripped first, so re-running on an already
/// marked export is a no-op.
pub fn mark_students(xml: &str, roster: &Roster) -> ConvertResult<String> {
    transform_values(xml, |ctx, old| {
        match ctx.field {
            Some("Authors" | "Editors") => Some(roster.mark_authors(old)),
            _ => None,
        }
    })
}

/// Context handed to the value-rewriting closure.
#[derive(Debug, Clone, Copy)]
struct ValueCtx<'a> {
    /// (type, ordinal) of the enclosing publication section, when inside
    /// one at publication depth.
    publication: Option<(PubType, u32)>,
    /// `label` of the enclosing field element.
    field: Option<&'a str>,
}

/// Stream the document, offering every `field/value` text to `f`.
/// `None` keeps the original text.
fn transform_values<F>(xml: &str, mut f: F) -> ConvertResult<String>
where
    F: FnMut(&ValueCtx<'_>, &str) -> Option<String>,
{
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());

    // The CCV site accepts re-imports with a declaration, so we always
    // emit one and drop whatever the source had.
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut sections: Vec<String> = Vec::new();
    let mut counters: HashMap<PubType, u32> = HashMap::new();
    let mut current: Option<(PubType, u32, usize)> = None;
    let mut field: Option<String> = None;
    let mut in_value = false;

    loop {
        let ev = reader.read_event()?;
        match &ev {
            Event::Eof => break,
            Event::Decl(_) => continue,
            Event::Start(e) => match e.local_name().as_ref() {
                b"section" => {
                    let label = attr_label(e).unwrap_or_default();
                    if current.is_none() && in_publications(&sections) {
                        if let Some(pub_type) = PubType::from_ccv_section(&label) {
                            let ordinal = counters.entry(pub_type).or_insert(0);
                            *ordinal += 1;
                            current = Some((pub_type, *ordinal, sections.len() + 1));
                        }
                    }
                    sections.push(label);
                }
                b"field" => field = attr_label(e),
                b"value" => in_value = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"section" => {
                    sections.pop();
                    if let Some((_, _, depth)) = current {
                        if sections.len() < depth {
                            current = None;
                        }
                    }
                }
                b"field" => field = None,
                b"value" => in_value = false,
                _ => {}
            },
            Event::Text(t) => {
                if in_value && field.is_some() {
                    let publication = current
                        .filter(|_| at_publication_depth(current, sections.len()))
                        .map(|(pub_type, ordinal, _)| (pub_type, ordinal));
                    let ctx = ValueCtx {
                        publication,
                        field: field.as_deref(),
                    };
                    let old = t.unescape()?;
                    if let Some(new) = f(&ctx, old.trim()) {
                        writer.write_event(Event::Text(BytesText::new(&new)))?;
                        continue;
                    }
                }
            }
            _ => {}
        }
        writer.write_event(ev)?;
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| ConvertError::CcvStructure(format!("rewritten XML is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ccv::read::tests::SAMPLE_CCV;
    use bibeasy_core::model::RefId;

    fn sheet_record(title: &str, authors: &str, venue: &str) -> Record {
        Record::new(
            RefId::new(PubType::Article, 1),
            authors,
            title,
            venue,
            2020,
        )
    }

    #[test]
    fn test_sync_updates_matched_publication() {
        let records = vec![sheet_record(
            "Deep segmentation",
            "Smith J, Gros C, New A",
            "NeuroImage Clinical",
        )];
        let out = sync_ccv(SAMPLE_CCV, &records).unwrap();

        assert!(out.contains("Smith J, Gros C, New A"));
        assert!(out.contains("NeuroImage Clinical"));
        // The unmatched second article is untouched.
        assert!(out.contains("Qsm mapping"));
        assert!(out.contains("<value type=\"String\">MRM</value>"));
    }

    #[test]
    fn test_sync_leaves_structure_intact() {
        let out = sync_ccv(SAMPLE_CCV, &[]).unwrap();
        let reparsed = parse_ccv(&out).unwrap();
        assert_eq!(reparsed, parse_ccv(SAMPLE_CCV).unwrap());
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    }

    #[test]
    fn test_sync_ambiguous_match_is_error() {
        let mut one = sheet_record("Deep segmentation", "A", "X");
        let mut two = sheet_record("Deep segmentation", "B", "Y");
        one.id = RefId::new(PubType::Article, 1);
        two.id = RefId::new(PubType::Article, 2);
        let result = sync_ccv(SAMPLE_CCV, &[one, two]);
        assert!(matches!(
            result,
            Err(ConvertError::AmbiguousMatch { title }) if title == "Deep segmentation"
        ));
    }

    #[test]
    fn test_sync_duplicate_titles_disambiguated_by_venue() {
        let mut wrong = sheet_record("Deep segmentation", "Wrong", "Elsewhere");
        wrong.id = RefId::new(PubType::Article, 7);
        let right = sheet_record("Deep segmentation", "Right", "NeuroImage");
        let out = sync_ccv(SAMPLE_CCV, &[wrong, right]).unwrap();
        assert!(out.contains(">Right<"));
        assert!(!out.contains(">Wrong<"));
    }

    #[test]
    fn test_mark_students_asterisks_roster_members() {
        let mut roster = Roster::default();
        roster.append("Smith J");
        let out = mark_students(SAMPLE_CCV, &roster).unwrap();

        assert!(out.contains("Smith J*, Gros C*"));
        assert!(out.contains("Duval T*, Smith J*"));
        // Non-roster names are untouched.
        assert!(out.contains(">Doe A<"));
    }

    #[test]
    fn test_mark_students_is_idempotent() {
        let roster = Roster::default();
        let once = mark_students(SAMPLE_CCV, &roster).unwrap();
        let twice = mark_students(&once, &roster).unwrap();
        assert_eq!(once, twice);
    }
}
