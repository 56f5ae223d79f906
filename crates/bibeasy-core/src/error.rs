use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid reference id: {0}")]
    InvalidRefId(String),

    #[error("unknown publication type: {0}")]
    UnknownPubType(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unauthorized labels found:\n{0}")]
    UnauthorizedLabels(String),
}

pub type Result<T> = std::result::Result<T, Error>;
