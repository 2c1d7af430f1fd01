//! tally-core: Core types for the Tally expense tracker

pub mod directory;
pub mod error;
pub mod expense;

pub use directory::{Category, CategoryDirectory, DirectoryBuilder, SubCategory, OTHER};
pub use error::{Error, Result};
pub use expense::{ExpenseRecord, Extraction, MatchTier, ParsedExpense, Resolution};
