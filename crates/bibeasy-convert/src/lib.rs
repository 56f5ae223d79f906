//! Ingestion and conversion for bibeasy.
//!
//! Reads the publications sheet (local CSV or the cached Google Sheet
//! export), parses and rewrites CCV XML indexes, matches records between
//! the two, and renders markdown/BibTeX/plain-text publication lists.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod ccv;
pub mod config;
pub mod error;
pub mod fetch;
pub mod matching;
pub mod output;
pub mod rewrite;
pub mod sheet;

pub use config::Config;
pub use error::{ConvertError, ConvertResult};
pub use fetch::SheetClient;
pub use matching::{ccv_id_map, match_records, MatchOutcome, MatchReport};
pub use output::CitationStyle;
pub use rewrite::rewrite_text;
pub use sheet::{FilterOptions, SheetSource};
