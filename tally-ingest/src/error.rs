//! Error types for tally-ingest

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid directory: {0}")]
    Directory(#[from] tally_core::Error),

    #[error("Missing column '{0}' in CSV header")]
    MissingColumn(&'static str),
}

pub type Result<T> = std::result::Result<T, IngestError>;
