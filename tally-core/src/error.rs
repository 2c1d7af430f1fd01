//! Error types for tally-core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),

    #[error("Subcategory '{subcategory}' references unknown category '{category}'")]
    UnknownCategory {
        subcategory: String,
        category: String,
    },

    #[error("Subcategory '{name}' belongs to both '{first}' and '{second}'")]
    ConflictingSubcategory {
        name: String,
        first: String,
        second: String,
    },

    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: i64 },

    #[error("Invalid name: {0:?}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
