//! tally-parse: free-text expense message extraction and category resolution

pub mod extractor;
pub mod parser;
pub mod resolver;

pub use extractor::extract;
pub use parser::{parse_message, parse_message_at, parse_record};
pub use resolver::resolve;
