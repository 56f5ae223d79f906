//! Reading publication records out of a CCV XML export.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use bibeasy_core::model::{PubType, RefId};

use crate::error::{ConvertError, ConvertResult};

/// One publication as indexed in a CCV export.
///
/// CCV entries carry no sheet-style year or labels; the reference ID is
/// assigned by counting publications of each type in document order,
/// which is the convention used when citing CCV indexes (J1, J2, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcvRecord {
    pub id: RefId,
    pub pub_type: PubType,
    pub authors: String,
    pub title: String,
    pub venue: String,
}

/// Parse the publications out of CCV XML text.
///
/// Publication sections with unhandled labels (book chapters, theses,
/// ...) are skipped, as are all non-publication sections.
pub fn parse_ccv(xml: &str) -> ConvertResult<Vec<CcvRecord>> {
    let mut reader = Reader::from_str(xml);

    // Labels of the currently open <section> elements, outermost first.
    let mut sections: Vec<String> = Vec::new();
    let mut counters: HashMap<PubType, u32> = HashMap::new();

    // (type, ordinal, depth) of the publication section being read.
    let mut current: Option<(PubType, u32, usize)> = None;
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut field: Option<String> = None;
    let mut in_value = false;

    let mut records = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(ref e) => match e.local_name().as_ref() {
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
                b"field" => {
                    if at_publication_depth(current, sections.len()) {
                        field = attr_label(e);
                    }
                }
                b"value" => {
                    in_value = field.is_some();
                }
                _ => {}
            },
            Event::Text(ref t) => {
                if in_value {
                    if let Some(name) = &field {
                        let text = t.unescape()?;
                        fields
                            .entry(name.clone())
                            .or_default()
                            .push_str(text.trim());
                    }
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"section" => {
                    sections.pop();
                    if let Some((pub_type, ordinal, depth)) = current {
                        if sections.len() < depth {
                            records.push(finish_record(
                                pub_type,
                                ordinal,
                                std::mem::take(&mut fields),
                            )?);
                            current = None;
                        }
                    }
                }
                b"field" => field = None,
                b"value" => in_value = false,
                _ => {}
            },
            _ => {}
        }
    }

    log::debug!("Parsed {} publications from CCV XML", records.len());
    Ok(records)
}

/// Read and parse a CCV XML file.
pub fn read_ccv_file(path: &Path) -> ConvertResult<Vec<CcvRecord>> {
    let xml = std::fs::read_to_string(path)?;
    parse_ccv(&xml)
}

fn finish_record(
    pub_type: PubType,
    ordinal: u32,
    mut fields: HashMap<String, String>,
) -> ConvertResult<CcvRecord> {
    let title_field = pub_type.ccv_title_field().unwrap_or("Title");
    let venue_field = pub_type.ccv_venue_field().unwrap_or("Venue");

    let title = fields.remove(title_field).ok_or_else(|| {
        ConvertError::CcvStructure(format!(
            "publication {}{} has no '{}' field",
            pub_type.prefix(),
            ordinal,
            title_field
        ))
    })?;

    let authors = fields.remove("Authors").unwrap_or_else(|| {
        log::warn!("Publication '{}' has no Authors field", title);
        String::new()
    });
    let venue = fields.remove(venue_field).unwrap_or_else(|| {
        log::warn!("Publication '{}' has no {} field", title, venue_field);
        String::new()
    });

    Ok(CcvRecord {
        id: RefId::new(pub_type, ordinal),
        pub_type,
        authors,
        title,
        venue,
    })
}

/// True when the open sections end with Contributions > Publications.
pub(crate) fn in_publications(sections: &[String]) -> bool {
    matches!(
        sections,
        [.., a, b] if a == "Contributions" && b == "Publications"
    )
}

pub(crate) fn at_publication_depth(current: Option<(PubType, u32, usize)>, depth: usize) -> bool {
    current.is_some_and(|(_, _, pub_depth)| depth == pub_depth)
}

/// Value of the `label` attribute of a section or field element.
pub(crate) fn attr_label(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"label")
        .and_then(|a| a.unescape_value().ok().map(Cow::into_owned))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE_CCV: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<generic-cv:generic-cv xmlns:generic-cv="http://www.cihr-irsc.gc.ca/generic-cv/1.0.0" lang="en">
  <section id="a1" label="Contributions">
    <section id="a2" label="Publications">
      <section id="p1" label="Journal Articles">
        <field id="f1" label="Article Title"><value type="String">Deep segmentation</value></field>
        <field id="f2" label="Journal"><value type="String">NeuroImage</value></field>
        <field id="f3" label="Authors"><value type="String">Smith J, Gros C</value></field>
      </section>
      <section id="p2" label="Journal Articles">
        <field id="f4" label="Article Title"><value type="String">Qsm mapping</value></field>
        <field id="f5" label="Journal"><value type="String">MRM</value></field>
        <field id="f6" label="Authors"><value type="String">Doe A</value></field>
      </section>
      <section id="p3" label="Conference Publications">
        <field id="f7" label="Publication Title"><value type="String">Fast fitting</value></field>
        <field id="f8" label="Conference Name"><value type="String">ISMRM</value></field>
        <field id="f9" label="Authors"><value type="String">Duval T, Smith J</value></field>
      </section>
      <section id="p4" label="Book Chapters">
        <field id="f10" label="Chapter Title"><value type="String">Ignored</value></field>
      </section>
    </section>
  </section>
</generic-cv:generic-cv>
"#;

    #[test]
    fn test_parse_ccv_counts_per_type() {
        let records = parse_ccv(SAMPLE_CCV).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id.to_string(), "J1");
        assert_eq!(records[1].id.to_string(), "J2");
        assert_eq!(records[2].id.to_string(), "C1");
    }

    #[test]
    fn test_parse_ccv_fields() {
        let records = parse_ccv(SAMPLE_CCV).unwrap();
        assert_eq!(records[0].title, "Deep segmentation");
        assert_eq!(records[0].venue, "NeuroImage");
        assert_eq!(records[0].authors, "Smith J, Gros C");
        assert_eq!(records[2].title, "Fast fitting");
        assert_eq!(records[2].venue, "ISMRM");
    }

    #[test]
    fn test_parse_ccv_skips_unhandled_types() {
        let records = parse_ccv(SAMPLE_CCV).unwrap();
        assert!(records.iter().all(|r| r.title != "Ignored"));
    }

    #[test]
    fn test_parse_ccv_ignores_other_sections() {
        let xml = r#"<?xml version="1.0"?>
<generic-cv:generic-cv xmlns:generic-cv="http://www.cihr-irsc.gc.ca/generic-cv/1.0.0">
  <section label="Education">
    <section label="Journal Articles">
      <field label="Article Title"><value>Not a publication</value></field>
    </section>
  </section>
</generic-cv:generic-cv>
"#;
        let records = parse_ccv(xml).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_ccv_missing_title_is_error() {
        let xml = r#"<generic-cv:generic-cv xmlns:generic-cv="http://www.cihr-irsc.gc.ca/generic-cv/1.0.0">
  <section label="Contributions"><section label="Publications">
    <section label="Journal Articles">
      <field label="Authors"><value>Smith J</value></field>
    </section>
  </section></section>
</generic-cv:generic-cv>"#;
        assert!(matches!(
            parse_ccv(xml),
            Err(ConvertError::CcvStructure(_))
        ));
    }

    #[test]
    fn test_read_ccv_file_missing() {
        let result = read_ccv_file(Path::new("/nonexistent/ccv.xml"));
        assert!(result.is_err());
    }
}
