//! tally-ingest: load category directories and message batches from CSV exports.

pub mod directory_csv;
pub mod error;
pub mod messages;

pub use directory_csv::{load_directory_csv, parse_directory_csv};
pub use error::{IngestError, Result};
pub use messages::{parse_messages_csv, read_messages_csv, MessageRow};
