//! Category directory CSV loader
//!
//! Expected layout (header required, column order free, `description`
//! optional):
//!   category,subcategory,description
//!   Food,coffee,Cafes and coffee shops
//!   Food,groceries,
//!   Other,,Catch-all
//!
//! A row with a blank subcategory only declares the category; its
//! description then describes the category.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tally_core::{CategoryDirectory, DirectoryBuilder};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Index of a header, ignoring case and surrounding spaces
pub(crate) fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// Parse a directory CSV from any reader.
pub fn parse_directory_csv<R: Read>(reader: R) -> Result<CategoryDirectory> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let cat_col = column(&headers, "category").ok_or(IngestError::MissingColumn("category"))?;
    let sub_col =
        column(&headers, "subcategory").ok_or(IngestError::MissingColumn("subcategory"))?;
    let desc_col = column(&headers, "description");

    // (name, description) in first-seen order
    let mut categories: Vec<(String, String)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut subcategories: Vec<(String, String, String)> = Vec::new();
    let mut rows = 0usize;

    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let category = record.get(cat_col).unwrap_or("");
        if category.is_empty() {
            warn!("directory row {}: blank category, skipped", line + 2);
            continue;
        }
        let subcategory = record.get(sub_col).unwrap_or("");
        let description = desc_col.and_then(|i| record.get(i)).unwrap_or("");

        let i = *index.entry(category.to_string()).or_insert_with(|| {
            categories.push((category.to_string(), String::new()));
            categories.len() - 1
        });

        if subcategory.is_empty() {
            // Category-only row: its description describes the category
            let current = &mut categories[i].1;
            if current.is_empty() {
                *current = description.to_string();
            } else if !description.is_empty() && current.as_str() != description {
                warn!(
                    "directory row {}: second description for '{}' ignored",
                    line + 2,
                    category
                );
            }
        } else {
            subcategories.push((
                category.to_string(),
                subcategory.to_string(),
                description.to_string(),
            ));
        }
        rows += 1;
    }

    let mut builder = DirectoryBuilder::default();
    for (name, description) in categories {
        builder = builder.category(name, description);
    }
    for (category, name, description) in subcategories {
        builder = builder.subcategory(category, name, description);
    }

    let directory = builder.build()?;
    debug!(
        rows,
        categories = directory.categories().len(),
        subcategories = directory.subcategories().len(),
        "loaded category directory"
    );
    Ok(directory)
}

/// Load a directory CSV from disk.
pub fn load_directory_csv(path: impl AsRef<Path>) -> Result<CategoryDirectory> {
    let file = std::fs::File::open(path.as_ref())?;
    parse_directory_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
category,subcategory,description
Food,coffee,Cafes
Food,Groceries,
Transport,taxi,
Other,,Catch-all
";

    #[test]
    fn test_parse_directory_csv() {
        let dir = parse_directory_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dir.categories().len(), 3);
        assert_eq!(dir.subcategories().len(), 3);

        let (sub, owner) = dir.subcategory("groceries").unwrap();
        assert_eq!(sub.name, "Groceries");
        assert_eq!(owner.name, "Food");
        assert_eq!(dir.subcategory("coffee").unwrap().0.description, "Cafes");
        assert_eq!(dir.other_category().unwrap().description, "Catch-all");
    }

    #[test]
    fn test_column_order_and_case_are_free() {
        let csv = "Subcategory , CATEGORY\nrent,Housing\n";
        let dir = parse_directory_csv(csv.as_bytes()).unwrap();
        assert_eq!(dir.subcategory("rent").unwrap().1.name, "Housing");
    }

    #[test]
    fn test_blank_category_rows_skipped() {
        let csv = "category,subcategory\n,orphan\nFood,lunch\n";
        let dir = parse_directory_csv(csv.as_bytes()).unwrap();
        assert!(dir.subcategory("orphan").is_none());
        assert!(dir.subcategory("lunch").is_some());
    }

    #[test]
    fn test_category_description_from_later_row() {
        let csv = "category,subcategory,description\nFood,coffee,Cafes\nFood,,Eating out\n";
        let dir = parse_directory_csv(csv.as_bytes()).unwrap();
        let food = dir.category_named("Food").unwrap();
        assert_eq!(food.description, "Eating out");
        assert_eq!(dir.subcategory("coffee").unwrap().0.description, "Cafes");
    }

    #[test]
    fn test_first_category_description_kept() {
        let csv = "category,subcategory,description\nFood,,Eating out\nFood,,Meals\n";
        let dir = parse_directory_csv(csv.as_bytes()).unwrap();
        assert_eq!(dir.categories().len(), 1);
        assert_eq!(dir.categories()[0].description, "Eating out");
    }

    #[test]
    fn test_missing_column() {
        let err = parse_directory_csv("name,parent\nx,y\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn("category")));
    }

    #[test]
    fn test_conflicting_subcategory_surfaces() {
        let csv = "category,subcategory\nFood,snacks\nFun,Snacks\n";
        let err = parse_directory_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Directory(tally_core::Error::ConflictingSubcategory { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(SAMPLE.as_bytes()).unwrap();
        let dir = load_directory_csv(f.path()).unwrap();
        assert_eq!(dir.category_named("Transport").map(|c| c.id), Some(2));
    }
}
