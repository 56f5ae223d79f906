//! BibTeX output, for import into Zotero or similar managers.

use std::fmt::Write as _;

use bibeasy_core::model::{PubType, Record};

/// Render records as a BibTeX database.
///
/// Articles come out as `@article` entries with a `journal` field,
/// proceedings as `@proceedings` with an `organization` field. Other
/// types have no BibTeX counterpart and are skipped with a warning.
#[must_use]
pub fn render_bibtex(records: &[Record]) -> String {
    let mut out = String::new();
    for record in records {
        let (entry_type, venue_field) = match record.pub_type {
            PubType::Article => ("article", "journal"),
            PubType::Proceedings => ("proceedings", "organization"),
            other => {
                log::warn!("No BibTeX entry type for {}: {}", other, record.title);
                continue;
            }
        };
        log::info!("{}: {}", record.id, record.title);

        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "@{}{{{},", entry_type, record.id);
        let _ = writeln!(out, " author = {{{}}},", record.authors);
        let _ = writeln!(out, " {} = {{{}}},", venue_field, record.venue);
        let _ = writeln!(out, " title = {{{}}},", record.title);
        let _ = writeln!(out, " year = {{{}}}", record.year);
        out.push_str("}\n");
    }
    out
}
