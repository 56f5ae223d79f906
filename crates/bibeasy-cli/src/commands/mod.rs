pub mod check_labels;
pub mod config;
pub mod fetch;
pub mod format;
pub mod mark_students;
pub mod matching;
pub mod rewrite;
pub mod show;
pub mod sync;

use anyhow::Result;
use std::path::{Path, PathBuf};

use bibeasy_core::model::{PubType, Record};
use bibeasy_core::taxonomy::Roster;
use bibeasy_convert::{Config, SheetSource};

/// Load sheet records for `types` from an explicit input or the cache.
///
/// A single requested type doubles as the type of a file input whose
/// stem does not name one. `required` overrides the default required
/// columns; talks carry no authors, so formatting them needs
/// `--required-columns Title`.
pub fn load_sheet(
    config: &Config,
    input: Option<&Path>,
    types: &[PubType],
    required: Option<&[String]>,
) -> Result<Vec<Record>> {
    let pub_type = match types {
        [only] => Some(*only),
        _ => None,
    };
    let source = SheetSource::resolve(input, pub_type, &config.cache_dir)?;
    let required: Vec<String> = match required {
        Some(columns) => columns.to_vec(),
        None => bibeasy_convert::sheet::DEFAULT_REQUIRED
            .iter()
            .map(ToString::to_string)
            .collect(),
    };
    Ok(source.load(types, &required)?)
}

/// Roster from the configured file, or the built-in lab roster.
pub fn load_roster(config: &Config) -> Result<Roster> {
    match &config.roster_path {
        Some(path) => Ok(Roster::load(path)?),
        None => Ok(Roster::default()),
    }
}

/// Read `input` as a file when it names one, otherwise treat it as
/// inline text.
pub fn file_or_inline(input: &str) -> Result<String> {
    let path = PathBuf::from(input);
    if path.is_file() {
        Ok(std::fs::read_to_string(path)?)
    } else {
        Ok(input.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(cache_dir: &Path) -> Config {
        Config {
            sheet_url: None,
            labels_path: None,
            roster_path: None,
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    #[test]
    fn test_load_sheet_custom_required_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.csv");
        std::fs::write(
            &path,
            "Title,Journal/Conference,Year\nInvited talk on QSM,McGill seminar,2021\n",
        )
        .unwrap();
        let config = test_config(dir.path());

        let title_only = vec!["Title".to_string()];
        let records = load_sheet(&config, Some(&path), &[], Some(&title_only)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pub_type, PubType::Talk);
        assert_eq!(records[0].authors, "");

        // The default required columns drop the authorless row.
        let records = load_sheet(&config, Some(&path), &[], None).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_sheet_single_type_names_unnamed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pubs.csv");
        std::fs::write(&path, "Authors,Title,Year\nSmith J,Paper,2020\n").unwrap();
        let config = test_config(dir.path());

        let records = load_sheet(&config, Some(&path), &[PubType::Article], None).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pub_type, PubType::Article);
    }
}
