//! Expense value types produced by the message parser

use crate::directory::OTHER;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Typed fragments pulled out of a raw message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Extraction {
    /// First numeric token; 0.0 when none
    pub amount: f64,
    /// Text after `@` in the first merchant tag; empty when none
    pub merchant: String,
    /// `#tag` texts without the `#`, in order of appearance
    pub hashtags: Vec<String>,
    /// Lower-cased residual text with amount/merchant/hashtags removed
    pub description: String,
}

/// Which resolution tier produced the category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum MatchTier {
    #[serde(rename = "subcategory")]
    Subcategory,
    #[serde(rename = "category")]
    Category,
    #[default]
    #[serde(rename = "fallback")]
    Fallback,
}

/// Outcome of category resolution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub category: String,
    pub subcategory: String,
    /// Id of the resolved category record, if one exists in the directory
    pub category_id: Option<i64>,
    /// Id of the matched subcategory record (subcategory tier only)
    pub subcategory_id: Option<i64>,
    pub tier: MatchTier,
    /// The candidate word that matched, as written in the message
    pub matched: Option<String>,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            category: OTHER.to_string(),
            subcategory: OTHER.to_string(),
            category_id: None,
            subcategory_id: None,
            tier: MatchTier::Fallback,
            matched: None,
        }
    }
}

/// A fully parsed message. Built once and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedExpense {
    extraction: Extraction,
    resolution: Resolution,
    timestamp: DateTime<Utc>,
}

impl ParsedExpense {
    pub fn new(extraction: Extraction, resolution: Resolution, timestamp: DateTime<Utc>) -> Self {
        Self {
            extraction,
            resolution,
            timestamp,
        }
    }

    pub fn amount(&self) -> f64 {
        self.extraction.amount
    }

    pub fn merchant(&self) -> &str {
        &self.extraction.merchant
    }

    pub fn hashtags(&self) -> &[String] {
        &self.extraction.hashtags
    }

    pub fn description(&self) -> &str {
        &self.extraction.description
    }

    pub fn category(&self) -> &str {
        &self.resolution.category
    }

    pub fn subcategory(&self) -> &str {
        &self.resolution.subcategory
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn extraction(&self) -> &Extraction {
        &self.extraction
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }
}

/// The finalized record handed to persistence. `id` stays `None` until the
/// store assigns one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseRecord {
    pub id: Option<i64>,
    pub user_id: i64,
    /// The message exactly as the user typed it
    pub msg_unparsed: String,
    pub amount: f64,
    pub merchant: String,
    pub hashtags: Vec<String>,
    pub description: String,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub category: String,
    pub subcategory: String,
    pub timestamp: DateTime<Utc>,
}

impl ExpenseRecord {
    pub fn from_parsed(user_id: i64, raw: impl Into<String>, parsed: &ParsedExpense) -> Self {
        let r = parsed.resolution();
        Self {
            id: None,
            user_id,
            msg_unparsed: raw.into(),
            amount: parsed.amount(),
            merchant: parsed.merchant().to_string(),
            hashtags: parsed.hashtags().to_vec(),
            description: parsed.description().to_string(),
            category_id: r.category_id,
            subcategory_id: r.subcategory_id,
            category: r.category.clone(),
            subcategory: r.subcategory.clone(),
            timestamp: parsed.timestamp(),
        }
    }
}
