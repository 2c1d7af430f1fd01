//! Token extraction: pull amount, merchant, hashtags and description out of a
//! free-text expense message.
//!
//! Example message:
//!   Spent 1,045.50 @starbucks #coffee #morning treat
//!
//! Thousand separators are stripped first (every `,`, no locale handling).
//! Each step below reads the comma-stripped text; none edits a shared buffer.

use regex::Regex;
use std::sync::LazyLock;
use tally_core::Extraction;

/// Digits with an optional fractional part
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("amount pattern"));

/// `@handle`
static MERCHANT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("merchant pattern"));

/// `#tag`
static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("hashtag pattern"));

/// Word separator: Unicode whitespace plus the ASCII information separators
/// `\x1c`-`\x1f`.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Remove every `,` so "1,000" reads as "1000".
pub fn strip_separators(raw: &str) -> String {
    raw.replace(',', "")
}

/// First numeric token as f64, or 0.0.
///
/// Later numbers are ignored. A token that matches the pattern but does not
/// convert to a finite f64 (digits from other scripts, absurd lengths) also
/// yields 0.0.
pub fn extract_amount(text: &str) -> f64 {
    AMOUNT_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Handle of the first `@merchant` tag, without the `@`; empty when absent.
pub fn extract_merchant(text: &str) -> String {
    MERCHANT_RE
        .find(text)
        .map(|m| m.as_str()[1..].to_string())
        .unwrap_or_default()
}

/// Every `#tag` in order of appearance, without the `#`. Duplicates are kept.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_RE
        .find_iter(text)
        .map(|m| m.as_str()[1..].to_string())
        .collect()
}

/// Residual text: merchant tags, then hashtags, then numbers removed
/// everywhere; trimmed and lower-cased. Inner whitespace is left as is.
pub fn extract_description(text: &str) -> String {
    let without_merchants = MERCHANT_RE.replace_all(text, "");
    let without_tags = HASHTAG_RE.replace_all(&without_merchants, "");
    let without_amounts = AMOUNT_RE.replace_all(&without_tags, "");
    without_amounts.trim_matches(is_separator).to_lowercase()
}

/// Run every extraction step over one raw message. Never fails.
pub fn extract(raw: &str) -> Extraction {
    let text = strip_separators(raw);
    Extraction {
        amount: extract_amount(&text),
        merchant: extract_merchant(&text),
        hashtags: extract_hashtags(&text),
        description: extract_description(&text),
    }
}
