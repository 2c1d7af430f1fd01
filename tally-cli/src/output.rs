//! Human-readable rendering for parsed messages and the directory tree.

use chrono_tz::Tz;
use tally_core::{CategoryDirectory, MatchTier, ParsedExpense};

pub fn render_parsed(p: &ParsedExpense, tz: Tz) -> String {
    let r = p.resolution();
    let how = match (r.tier, r.matched.as_deref()) {
        (MatchTier::Subcategory, Some(w)) => format!("subcategory match on '{w}'"),
        (MatchTier::Category, Some(w)) => format!("category match on '{w}'"),
        _ => "no match".to_string(),
    };
    let hashtags = p
        .hashtags()
        .iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ");

    let mut s = String::new();
    s.push_str(&format!("amount:      {:.2}\n", p.amount()));
    s.push_str(&format!("merchant:    {}\n", p.merchant()));
    s.push_str(&format!("hashtags:    {}\n", hashtags));
    s.push_str(&format!("description: {}\n", p.description()));
    s.push_str(&format!("category:    {} / {} ({})\n", p.category(), p.subcategory(), how));
    s.push_str(&format!(
        "time:        {}\n",
        p.timestamp().with_timezone(&tz).format("%Y-%m-%d %H:%M %Z")
    ));
    s
}

pub fn render_directory(dir: &CategoryDirectory) -> String {
    let mut s = String::new();
    for c in dir.categories() {
        if c.description.is_empty() {
            s.push_str(&format!("{}\n", c.name));
        } else {
            s.push_str(&format!("{} ({})\n", c.name, c.description));
        }
        for sub in dir.subcategories_of(c.id) {
            s.push_str(&format!("  - {}\n", sub.name));
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tally_parse::parse_message_at;

    fn directory() -> CategoryDirectory {
        CategoryDirectory::builder()
            .category("Food", "Eating out")
            .subcategory("Food", "coffee", "")
            .category("Other", "")
            .build()
            .unwrap()
    }

    #[test]
    fn test_render_parsed_in_timezone() {
        let ts = Utc.with_ymd_and_hms(2026, 2, 20, 18, 5, 0).unwrap();
        let p = parse_message_at("4.5 @bluebottle #coffee latte", &directory(), ts);
        let out = render_parsed(&p, chrono_tz::America::Chicago);
        assert!(out.contains("amount:      4.50\n"));
        assert!(out.contains("hashtags:    #coffee\n"));
        assert!(out.contains("Food / coffee (subcategory match on 'coffee')"));
        assert!(out.contains("2026-02-20 12:05 CST"));
    }

    #[test]
    fn test_render_directory_tree() {
        let out = render_directory(&directory());
        assert_eq!(out, "Food (Eating out)\n  - coffee\nOther\n");
    }
}
