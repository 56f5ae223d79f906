//! Markdown output for the lab website.
//!
//! Publications are grouped by year, newest first, each year wrapped in
//! a `publications-container` div that the site's label-filtering
//! script hooks into.

use std::fmt::Write as _;

use bibeasy_core::model::Record;

/// Render records as the website's markdown/HTML hybrid.
#[must_use]
pub fn render_markdown(records: &[Record]) -> String {
    let mut years: Vec<i32> = records.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();
    years.reverse();

    let mut out = String::new();
    for year in years {
        let _ = writeln!(out, "\n## {year}");
        out.push_str("<div class=\"publications-container\">\n");
        for record in records.iter().filter(|r| r.year == year) {
            log::debug!("{}: {}", record.id, record.title);
            out.push_str(&render_publication(record));
            out.push('\n');
        }
        out.push_str("</div>\n");
    }
    out
}

fn render_publication(record: &Record) -> String {
    let labels = record.labels.join(", ");
    let data_labels = record.labels.join(" ");

    let link = match record.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => format!(" <a href=\"{url}\">Link to paper</a>"),
        None => String::new(),
    };
    let label_span = if labels.is_empty() {
        String::new()
    } else {
        format!("<span class=\"publication-label\"> (Labels: {labels})</span>")
    };

    format!(
        "<div class=\"publication\" data-labels=\"{}\">\n\
         \x20   <h3>{}</h3>\n\
         \x20   <p><em>{}</em></p>\n\
         \x20   <p><strong>{}</strong> ({}){}{}</p>\n\
         </div>",
        data_labels, record.title, record.authors, record.venue, record.year, link, label_span
    )
}
