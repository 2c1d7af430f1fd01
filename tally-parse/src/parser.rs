//! Message pipeline: extract tokens, resolve the category, stamp the time.

use chrono::{DateTime, Utc};
use tally_core::{CategoryDirectory, ExpenseRecord, ParsedExpense};
use tracing::debug;

use crate::extractor::extract;
use crate::resolver::resolve;

/// Parse one raw message against a directory snapshot, stamped with now.
pub fn parse_message(raw: &str, directory: &CategoryDirectory) -> ParsedExpense {
    parse_message_at(raw, directory, Utc::now())
}

/// Same as [`parse_message`] with an explicit timestamp.
pub fn parse_message_at(
    raw: &str,
    directory: &CategoryDirectory,
    timestamp: DateTime<Utc>,
) -> ParsedExpense {
    let extraction = extract(raw);
    let resolution = resolve(&extraction.hashtags, &extraction.description, directory);
    debug!(
        amount = extraction.amount,
        merchant = %extraction.merchant,
        category = %resolution.category,
        subcategory = %resolution.subcategory,
        "parsed message"
    );
    ParsedExpense::new(extraction, resolution, timestamp)
}

/// Parse a message and build the record handed to persistence.
pub fn parse_record(user_id: i64, raw: &str, directory: &CategoryDirectory) -> ExpenseRecord {
    let parsed = parse_message(raw, directory);
    ExpenseRecord::from_parsed(user_id, raw, &parsed)
}
