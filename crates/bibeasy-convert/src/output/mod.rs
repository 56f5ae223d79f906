//! Rendering records into the supported output formats.

mod bibtex;
mod markdown;
mod style;

pub use bibtex::render_bibtex;
pub use markdown::render_markdown;
pub use style::{format_records, CitationStyle};

use std::path::{Path, PathBuf};

use bibeasy_core::model::PubType;

/// Per-type output path used when types are kept in separate files.
///
/// `biblio.md` becomes `biblio-article.md`, `biblio-proceedings.md`
/// and so on.
#[must_use]
pub fn separate_path(output: &Path, pub_type: PubType) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{}-{}", stem, pub_type);
    if let Some(ext) = output.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    output.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separate_path() {
        let path = separate_path(Path::new("out/biblio.md"), PubType::Article);
        assert_eq!(path, Path::new("out/biblio-article.md"));
    }

    #[test]
    fn test_separate_path_without_extension() {
        let path = separate_path(Path::new("biblio"), PubType::Talk);
        assert_eq!(path, Path::new("biblio-talk"));
    }
}
