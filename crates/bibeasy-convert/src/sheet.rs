//! Publications sheet ingestion.
//!
//! The sheet is ingested as CSV, either from local files (one file per
//! publication type, or a directory of `<type>.csv`) or from the cache
//! written by [`crate::fetch`]. Column names follow the sheet convention:
//! ID, Authors, Title, Journal/Conference, Year, Volume:Pages, Location,
//! Impact, Prize, URL, Labels; any other column is kept as a marker.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};

use bibeasy_core::model::{PubType, Record, RefId};

use crate::error::{ConvertError, ConvertResult};
use crate::fetch::cached_tab_path;

/// Columns that must be non-empty for a row to be kept.
pub const DEFAULT_REQUIRED: &[&str] = &["Title", "Authors"];

/// One raw CSV row, before validation.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "ID", default)]
    id: Option<String>,
    #[serde(rename = "Authors", default)]
    authors: Option<String>,
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Journal/Conference", default)]
    venue: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Volume:Pages", default)]
    volume_pages: Option<String>,
    #[serde(rename = "Location", default)]
    location: Option<String>,
    #[serde(rename = "Impact", default)]
    impact: Option<String>,
    #[serde(rename = "Prize", default)]
    prize: Option<String>,
    #[serde(rename = "URL", default)]
    url: Option<String>,
    #[serde(rename = "Labels", default)]
    labels: Option<String>,
    #[serde(flatten)]
    extra: HashMap<String, String>,
}

impl RawRow {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name.to_ascii_lowercase().as_str() {
            "id" => self.id.as_deref(),
            "authors" => self.authors.as_deref(),
            "title" => self.title.as_deref(),
            "journal/conference" | "venue" => self.venue.as_deref(),
            "year" => self.year.as_deref(),
            "volume:pages" => self.volume_pages.as_deref(),
            "location" => self.location.as_deref(),
            "impact" => self.impact.as_deref(),
            "prize" => self.prize.as_deref(),
            "url" => self.url.as_deref(),
            "labels" => self.labels.as_deref(),
            _ => self.extra.get(name).map(String::as_str),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }
}

/// Where sheet records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSource {
    /// A single CSV file holding one publication type.
    File(PathBuf, PubType),
    /// A directory of `<type>.csv` files.
    Directory(PathBuf),
}

impl SheetSource {
    /// Resolve the input argument against the cache directory.
    ///
    /// With no explicit input, the fetch cache is used; a missing cache
    /// is reported as an error telling the user to fetch first.
    pub fn resolve(
        input: Option<&Path>,
        pub_type: Option<PubType>,
        cache_dir: &Path,
    ) -> ConvertResult<Self> {
        match input {
            Some(path) if path.is_dir() => Ok(Self::Directory(path.to_path_buf())),
            Some(path) if path.is_file() => {
                let pub_type = pub_type
                    .or_else(|| guess_type_from_stem(path))
                    .ok_or_else(|| {
                        ConvertError::NoInput(format!(
                            "cannot infer the publication type of '{}'; pass --type",
                            path.display()
                        ))
                    })?;
                Ok(Self::File(path.to_path_buf(), pub_type))
            }
            Some(path) => Err(ConvertError::NoInput(format!(
                "input '{}' is neither a file nor a directory",
                path.display()
            ))),
            None => {
                if cache_dir.is_dir() {
                    log::info!("Using cached sheet tabs from {}", cache_dir.display());
                    Ok(Self::Directory(cache_dir.to_path_buf()))
                } else {
                    Err(ConvertError::NoInput(
                        "no input file given and no sheet cache exists; \
                         run `bibeasy fetch` first"
                            .to_string(),
                    ))
                }
            }
        }
    }

    /// Load records for the requested publication types.
    ///
    /// An empty `types` slice means "whatever is present". Explicitly
    /// requested types must exist.
    pub fn load(&self, types: &[PubType], required: &[String]) -> ConvertResult<Vec<Record>> {
        match self {
            Self::File(path, pub_type) => {
                if !types.is_empty() && !types.contains(pub_type) {
                    return Ok(Vec::new());
                }
                load_csv_file(path, *pub_type, required)
            }
            Self::Directory(dir) => {
                let explicit = !types.is_empty();
                let wanted: Vec<PubType> = if explicit {
                    types.to_vec()
                } else {
                    PubType::ALL.to_vec()
                };

                let mut records = Vec::new();
                let mut found_any = false;
                for pub_type in wanted {
                    let path = cached_tab_path(dir, pub_type);
                    if !path.is_file() {
                        if explicit {
                            return Err(ConvertError::NoInput(format!(
                                "requested publication type '{}' has no sheet file at {}",
                                pub_type,
                                path.display()
                            )));
                        }
                        continue;
                    }
                    found_any = true;
                    records.extend(load_csv_file(&path, pub_type, required)?);
                }

                if !found_any {
                    return Err(ConvertError::NoInput(format!(
                        "no <type>.csv files found in {}",
                        dir.display()
                    )));
                }
                Ok(records)
            }
        }
    }
}

/// Load one CSV file as records of the given publication type.
pub fn load_csv_file(
    path: &Path,
    pub_type: PubType,
    required: &[String],
) -> ConvertResult<Vec<Record>> {
    let file = std::fs::File::open(path)?;
    let records = load_csv_reader(file, pub_type, required)?;
    log::info!("  Total '{}' entries: {}", pub_type, records.len());
    Ok(records)
}

/// Load CSV text from any reader.
pub fn load_csv_reader<R: Read>(
    reader: R,
    pub_type: PubType,
    required: &[String],
) -> ConvertResult<Vec<Record>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut next_ordinal: u32 = 1;

    for row in csv_reader.deserialize::<RawRow>() {
        let row = row?;

        if let Some(missing) = required.iter().find(|name| row.field(name).is_none()) {
            log::debug!(
                "Dropping row missing required column '{}': {:?}",
                missing,
                row.title
            );
            continue;
        }

        let Some(year) = row.year.as_deref().and_then(parse_year) else {
            log::warn!("Dropping row with unparsable year: {:?}", row.title);
            continue;
        };

        let id = row
            .id
            .as_deref()
            .and_then(|raw| parse_id(raw, pub_type))
            .unwrap_or_else(|| RefId::new(pub_type, next_ordinal));
        next_ordinal = next_ordinal.max(id.ordinal) + 1;

        let labels = row
            .labels
            .as_deref()
            .map(split_labels)
            .unwrap_or_default();

        let extra: BTreeMap<String, String> = row
            .extra
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (k.clone(), v.trim().to_string()))
            .collect();

        let mut record = Record::new(
            id,
            row.authors.as_deref().unwrap_or_default().trim(),
            row.title.as_deref().unwrap_or_default().trim(),
            row.venue.as_deref().unwrap_or_default().trim(),
            year,
        );
        record.volume_pages = row.field("Volume:Pages").map(String::from);
        record.location = row.field("Location").map(String::from);
        record.impact = row.field("Impact").map(String::from);
        record.prize = row.field("Prize").map(String::from);
        record.url = row.field("URL").map(String::from);
        record.labels = labels;
        record.extra = extra;

        records.push(record);
    }

    Ok(records)
}

/// Selection options applied after loading.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Minimum year (inclusive) to keep.
    pub min_year: Option<i32>,
    /// Keep only rows where this marker column is checked ("x").
    pub marker: Option<String>,
    /// Sort most-recent first instead of the default oldest-first.
    pub reverse: bool,
}

/// Apply filters and ordering to a loaded record set.
#[must_use]
pub fn apply_filters(mut records: Vec<Record>, opts: &FilterOptions) -> Vec<Record> {
    if let Some(min_year) = opts.min_year {
        records.retain(|r| r.year >= min_year);
    }
    if let Some(marker) = &opts.marker {
        records.retain(|r| r.has_marker(marker));
    }
    if opts.reverse {
        records.sort_by_key(|r| std::cmp::Reverse(r.year));
    } else {
        records.sort_by_key(|r| r.year);
    }
    records
}

/// Parse a year cell, tolerating the float rendering spreadsheets
/// produce ("2020.0").
fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }
    raw.parse::<f64>().ok().map(|f| f as i32)
}

/// Parse an ID cell: either a full reference ID ("J12") or a bare
/// ordinal ("12") which takes the file's type prefix.
fn parse_id(raw: &str, pub_type: PubType) -> Option<RefId> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<RefId>() {
        return Some(id);
    }
    raw.parse::<u32>().ok().map(|n| RefId::new(pub_type, n))
}

fn guess_type_from_stem(path: &Path) -> Option<PubType> {
    path.file_stem()?.to_str()?.parse().ok()
}

fn split_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required() -> Vec<String> {
        DEFAULT_REQUIRED.iter().map(ToString::to_string).collect()
    }

    const CSV: &str = "\
ID,Authors,Title,Journal/Conference,Year,Volume:Pages,Location,Impact,Prize,URL,Labels,IVADO17
J1,\"Smith J, Gros C\",Deep segmentation,NeuroImage,2019,12:1-10,,5.4,,https://doi.org/x,\"MRI, Deep Learning\",x
J2,Doe A,Qsm mapping,MRM,2020.0,,,,,,,\n";

    #[test]
    fn test_load_csv_basic() {
        let records = load_csv_reader(CSV.as_bytes(), PubType::Article, &required()).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.id.to_string(), "J1");
        assert_eq!(first.authors, "Smith J, Gros C");
        assert_eq!(first.venue, "NeuroImage");
        assert_eq!(first.year, 2019);
        assert_eq!(first.volume_pages.as_deref(), Some("12:1-10"));
        assert_eq!(first.labels, vec!["MRI", "Deep Learning"]);
        assert!(first.has_marker("IVADO17"));

        // Float year from spreadsheet export is coerced.
        assert_eq!(records[1].year, 2020);
        assert!(!records[1].has_marker("IVADO17"));
    }

    #[test]
    fn test_load_csv_drops_rows_missing_required() {
        let csv = "Authors,Title,Year\nSmith J,,2020\n,Orphan title,2020\nDoe A,Kept,2021\n";
        let records = load_csv_reader(csv.as_bytes(), PubType::Article, &required()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Kept");
    }

    #[test]
    fn test_load_csv_title_only_required_keeps_talks() {
        // Talk tabs carry no Authors column at all.
        let csv = "Title,Journal/Conference,Year\nInvited talk on QSM,McGill seminar,2021\n";

        let title_only = vec!["Title".to_string()];
        let records = load_csv_reader(csv.as_bytes(), PubType::Talk, &title_only).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Invited talk on QSM");
        assert_eq!(records[0].authors, "");

        // The default required columns drop the same row.
        let records = load_csv_reader(csv.as_bytes(), PubType::Talk, &required()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_csv_drops_unparsable_year() {
        let csv = "Authors,Title,Year\nSmith J,Paper,in press\n";
        let records = load_csv_reader(csv.as_bytes(), PubType::Article, &required()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_csv_assigns_sequential_ids() {
        let csv = "Authors,Title,Year\nA,P1,2019\nB,P2,2020\n";
        let records = load_csv_reader(csv.as_bytes(), PubType::Proceedings, &required()).unwrap();
        assert_eq!(records[0].id.to_string(), "C1");
        assert_eq!(records[1].id.to_string(), "C2");
    }

    #[test]
    fn test_load_csv_bare_numeric_ids() {
        let csv = "ID,Authors,Title,Year\n4,A,P1,2019\n,B,P2,2020\n";
        let records = load_csv_reader(csv.as_bytes(), PubType::Article, &required()).unwrap();
        assert_eq!(records[0].id.to_string(), "J4");
        // Sequential assignment continues past the explicit ID.
        assert_eq!(records[1].id.to_string(), "J5");
    }

    #[test]
    fn test_apply_filters_min_year_and_order() {
        let csv = "Authors,Title,Year\nA,P1,2018\nB,P2,2021\nC,P3,2015\n";
        let records = load_csv_reader(csv.as_bytes(), PubType::Article, &required()).unwrap();

        let opts = FilterOptions {
            min_year: Some(2016),
            ..Default::default()
        };
        let filtered = apply_filters(records.clone(), &opts);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].year, 2018);

        let opts = FilterOptions {
            reverse: true,
            ..Default::default()
        };
        let reversed = apply_filters(records, &opts);
        assert_eq!(reversed[0].year, 2021);
    }

    #[test]
    fn test_apply_filters_marker() {
        let records =
            load_csv_reader(CSV.as_bytes(), PubType::Article, &required()).unwrap();
        let opts = FilterOptions {
            marker: Some("IVADO17".to_string()),
            ..Default::default()
        };
        let filtered = apply_filters(records, &opts);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id.to_string(), "J1");
    }

    #[test]
    fn test_source_resolve_missing_cache() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = SheetSource::resolve(None, None, &missing);
        assert!(matches!(result, Err(ConvertError::NoInput(_))));
    }

    #[test]
    fn test_source_directory_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("article.csv"),
            "Authors,Title,Year\nA,P1,2019\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("proceedings.csv"),
            "Authors,Title,Year\nB,P2,2020\n",
        )
        .unwrap();

        let source = SheetSource::resolve(None, None, dir.path()).unwrap();
        let records = source.load(&[], &required()).unwrap();
        assert_eq!(records.len(), 2);

        let articles = source.load(&[PubType::Article], &required()).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].pub_type, PubType::Article);

        // Explicitly requesting a type with no file is an error.
        let missing = source.load(&[PubType::Talk], &required());
        assert!(matches!(missing, Err(ConvertError::NoInput(_))));
    }

    #[test]
    fn test_source_file_infers_type_from_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proceedings.csv");
        std::fs::write(&path, "Authors,Title,Year\nA,P,2019\n").unwrap();

        let source = SheetSource::resolve(Some(&path), None, dir.path()).unwrap();
        assert_eq!(source, SheetSource::File(path, PubType::Proceedings));
    }

    #[test]
    fn test_source_explicit_type_overrides_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pubs.csv");
        std::fs::write(&path, "Authors,Title,Year\nA,P,2019\n").unwrap();

        // Unguessable stem is an error without a type.
        let result = SheetSource::resolve(Some(&path), None, dir.path());
        assert!(matches!(result, Err(ConvertError::NoInput(_))));

        let source =
            SheetSource::resolve(Some(&path), Some(PubType::Article), dir.path()).unwrap();
        assert_eq!(source, SheetSource::File(path, PubType::Article));
    }
}
