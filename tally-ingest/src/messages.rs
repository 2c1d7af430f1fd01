//! Batch message CSV reader
//!
//! Expected layout (header required):
//!   message,user_id
//!   "Lunch 12.50 @deli #food",1
//!
//! `user_id` is optional; blank messages are skipped.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::directory_csv::column;
use crate::error::{IngestError, Result};

/// One message awaiting parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRow {
    pub user_id: Option<i64>,
    pub message: String,
}

/// Parse a message CSV from any reader.
pub fn parse_messages_csv<R: Read>(reader: R) -> Result<Vec<MessageRow>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let msg_col = column(&headers, "message").ok_or(IngestError::MissingColumn("message"))?;
    let user_col = column(&headers, "user_id");

    let mut out = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        // Keep the message as typed; the parser does its own normalization
        let message = record.get(msg_col).unwrap_or("");
        if message.trim().is_empty() {
            continue;
        }

        let user_id = match user_col.and_then(|i| record.get(i)).map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!("message row {}: invalid user_id '{}', ignored", line + 2, raw);
                    None
                }
            },
        };

        out.push(MessageRow {
            user_id,
            message: message.to_string(),
        });
    }

    Ok(out)
}

/// Read a message CSV from disk.
pub fn read_messages_csv(path: impl AsRef<Path>) -> Result<Vec<MessageRow>> {
    let file = std::fs::File::open(path.as_ref())?;
    parse_messages_csv(file)
}
