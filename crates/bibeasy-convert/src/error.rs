//! Conversion error types.

use thiserror::Error;

/// Errors that can occur while ingesting sheets or converting CCV XML.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An error propagated from the core domain layer.
    #[error(transparent)]
    Core(#[from] bibeasy_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The CCV XML does not have the expected section structure.
    #[error("invalid CCV structure: {0}")]
    CcvStructure(String),

    /// A publication in the CCV could not be unambiguously matched.
    #[error("could not disambiguate publication '{title}' found in CCV XML")]
    AmbiguousMatch { title: String },

    /// No usable input source (no file given, no cache present).
    #[error("no input source: {0}")]
    NoInput(String),
}

impl ConvertError {
    /// Returns `true` when the error indicates a transient network failure.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout() || e.is_connect())
    }
}

/// Convenience alias for conversion results.
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
