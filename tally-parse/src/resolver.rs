//! Deterministic category resolution for a parsed message.
//!
//! No scoring: the first textual match in reading order wins.
//! 1) subcategory tier: hashtags, then description words, matched
//!    case-insensitively against subcategory names
//! 2) category tier (only when tier 1 found nothing): the same candidates,
//!    capitalized, matched exactly against category names
//! 3) otherwise "Other" / "Other"

use tally_core::{CategoryDirectory, MatchTier, Resolution, OTHER};
use tracing::debug;

use crate::extractor::is_separator;

/// Candidate words in scan order: hashtags first, then description words.
pub fn candidates<'a>(
    hashtags: &'a [String],
    description: &'a str,
) -> impl Iterator<Item = &'a str> {
    hashtags
        .iter()
        .map(String::as_str)
        .chain(description.split(is_separator).filter(|w| !w.is_empty()))
}

/// Title case of the Latin digraph letters, which differs from their upper
/// case ("ǆ" -> "ǅ", not "Ǆ").
fn digraph_titlecase(c: char) -> Option<char> {
    match c {
        '\u{01C4}'..='\u{01C6}' => Some('\u{01C5}'),
        '\u{01C7}'..='\u{01C9}' => Some('\u{01C8}'),
        '\u{01CA}'..='\u{01CC}' => Some('\u{01CB}'),
        '\u{01F1}'..='\u{01F3}' => Some('\u{01F2}'),
        _ => None,
    }
}

/// Title-case the first character and lower-case the rest ("fOOD" -> "Food").
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = String::with_capacity(word.len());
    match digraph_titlecase(first) {
        Some(title) => out.push(title),
        None => out.extend(first.to_uppercase()),
    }
    out.extend(chars.flat_map(char::to_lowercase));
    out
}

/// Resolve (category, subcategory) for the extracted hashtags and description.
pub fn resolve(
    hashtags: &[String],
    description: &str,
    directory: &CategoryDirectory,
) -> Resolution {
    for word in candidates(hashtags, description) {
        if let Some((sub, owner)) = directory.subcategory(word) {
            debug!("subcategory match '{}' -> {}/{}", word, owner.name, sub.name);
            return Resolution {
                category: owner.name.clone(),
                subcategory: sub.name.clone(),
                category_id: Some(owner.id),
                subcategory_id: Some(sub.id),
                tier: MatchTier::Subcategory,
                matched: Some(word.to_string()),
            };
        }
    }

    for word in candidates(hashtags, description) {
        if let Some(cat) = directory.category_named(&capitalize(word)) {
            debug!("category match '{}' -> {}", word, cat.name);
            return Resolution {
                category: cat.name.clone(),
                subcategory: OTHER.to_string(),
                category_id: Some(cat.id),
                subcategory_id: None,
                tier: MatchTier::Category,
                matched: Some(word.to_string()),
            };
        }
    }

    debug!(
        "no match in {} hashtags / '{}', falling back to {}",
        hashtags.len(),
        description,
        OTHER
    );
    Resolution {
        category_id: directory.other_category().map(|c| c.id),
        ..Resolution::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn food_dir() -> CategoryDirectory {
        CategoryDirectory::builder()
            .category_with("Food", ["coffee", "groceries"])
            .category_with("Transport", ["taxi"])
            .category("Health", "")
            .category(OTHER, "")
            .build()
            .unwrap()
    }

    #[test]
    fn test_subcategory_match() {
        let dir = CategoryDirectory::builder()
            .category_with("Food", ["coffee"])
            .build()
            .unwrap();
        let r = resolve(&tags(&["coffee", "morning"]), "", &dir);
        assert_eq!(r.category, "Food");
        assert_eq!(r.subcategory, "coffee");
        assert_eq!(r.tier, MatchTier::Subcategory);
        assert_eq!(r.category_id, Some(1));
        assert_eq!(r.subcategory_id, Some(1));
    }

    #[test]
    fn test_category_fallback() {
        let dir = CategoryDirectory::builder().category("Food", "").build().unwrap();
        let r = resolve(&tags(&["food", "extra"]), "", &dir);
        assert_eq!(r.category, "Food");
        assert_eq!(r.subcategory, OTHER);
        assert_eq!(r.tier, MatchTier::Category);
        assert_eq!(r.subcategory_id, None);
        assert_eq!(r.matched.as_deref(), Some("food"));
    }

    #[test]
    fn test_total_fallback() {
        let r = resolve(&tags(&["misc"]), "random words", &food_dir());
        assert_eq!(r.category, OTHER);
        assert_eq!(r.subcategory, OTHER);
        assert_eq!(r.tier, MatchTier::Fallback);
        // Linked to the directory's Other record
        assert_eq!(r.category_id, Some(4));
        assert_eq!(r.subcategory_id, None);
    }

    #[test]
    fn test_empty_directory_always_defaults() {
        let r = resolve(&tags(&["coffee", "food"]), "groceries", &CategoryDirectory::default());
        assert_eq!(r, Resolution::default());
    }

    #[test]
    fn test_subcategory_tier_wins_regardless_of_position() {
        // "health" would match a category first, but "taxi" later is a subcategory
        let r = resolve(&tags(&["health"]), "ride taxi", &food_dir());
        assert_eq!(r.category, "Transport");
        assert_eq!(r.subcategory, "taxi");
        assert_eq!(r.matched.as_deref(), Some("taxi"));
    }

    #[test]
    fn test_hashtags_scanned_before_description() {
        let r = resolve(&tags(&["Groceries"]), "coffee", &food_dir());
        assert_eq!(r.subcategory, "groceries");
        assert_eq!(r.matched.as_deref(), Some("Groceries"));
    }

    #[test]
    fn test_description_words_used_in_order() {
        let r = resolve(&[], "taxi   then coffee", &food_dir());
        assert_eq!(r.subcategory, "taxi");
    }

    #[test]
    fn test_subcategory_match_is_case_insensitive() {
        let r = resolve(&tags(&["COFFEE"]), "", &food_dir());
        assert_eq!(r.category, "Food");
        assert_eq!(r.subcategory, "coffee");
    }

    #[test]
    fn test_category_match_uses_capitalization() {
        let r = resolve(&tags(&["hEALTH"]), "", &food_dir());
        assert_eq!(r.category, "Health");

        // Categories not stored in Title-Case never match
        let dir = CategoryDirectory::builder().category("HEALTH", "").build().unwrap();
        let r = resolve(&tags(&["health"]), "", &dir);
        assert_eq!(r.tier, MatchTier::Fallback);
        assert_eq!(r.category_id, None);
    }

    #[test]
    fn test_no_partial_matching() {
        let r = resolve(&tags(&["coffees"]), "foodie", &food_dir());
        assert_eq!(r.tier, MatchTier::Fallback);
    }

    #[test]
    fn test_multi_word_category_needs_exact_token() {
        let dir = CategoryDirectory::builder()
            .category_with("Home Goods", ["furniture"])
            .build()
            .unwrap();
        let r = resolve(&[], "home goods", &dir);
        assert_eq!(r.tier, MatchTier::Fallback);
        let r = resolve(&[], "new furniture", &dir);
        assert_eq!(r.category, "Home Goods");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("food"), "Food");
        assert_eq!(capitalize("fOOD"), "Food");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
        assert_eq!(capitalize("1st"), "1st");
        // Digraphs take their title-case form
        assert_eq!(capitalize("\u{01C6}ungla"), "\u{01C5}ungla");
        assert_eq!(capitalize("\u{01C7}UBLJANA"), "\u{01C8}ubljana");
    }

    #[test]
    fn test_digraph_category_matches_by_name() {
        let dir = CategoryDirectory::builder()
            .category("\u{01C5}ungla", "")
            .build()
            .unwrap();
        let r = resolve(&[], "\u{01C6}ungla", &dir);
        assert_eq!(r.tier, MatchTier::Category);
        assert_eq!(r.category, "\u{01C5}ungla");
    }

    #[test]
    fn test_candidates_order() {
        let t = tags(&["b", "a"]);
        let c: Vec<_> = candidates(&t, " x  y ").collect();
        assert_eq!(c, vec!["b", "a", "x", "y"]);
        // Information separators split words too
        let c: Vec<_> = candidates(&[], "x\x1fy\x1c\x1cz").collect();
        assert_eq!(c, vec!["x", "y", "z"]);
    }
}
