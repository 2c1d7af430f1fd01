//! Category directory: the read-only category/subcategory snapshot consulted
//! when resolving a parsed message.
//!
//! The directory is built once per request by the caller (from config, a CSV
//! export, or a database) and never mutated by the resolver.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Name of the catch-all category and subcategory.
pub const OTHER: &str = "Other";

/// A top-level category, e.g. "Food"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A subcategory owned by exactly one category, e.g. "coffee" under "Food"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryDirectory {
    categories: Vec<Category>,
    subcategories: Vec<SubCategory>,
    /// Lower-cased subcategory name -> index into `subcategories`
    by_subcategory: HashMap<String, usize>,
    /// Exact category name -> index into `categories`
    by_category_name: HashMap<String, usize>,
    by_category_id: HashMap<i64, usize>,
}

impl CategoryDirectory {
    pub fn builder() -> DirectoryBuilder {
        DirectoryBuilder::default()
    }

    /// Build a directory from records that already carry ids (e.g. rows loaded
    /// by a persistence layer).
    ///
    /// Rejects blank names, duplicate category names, repeated category or
    /// subcategory ids, subcategories pointing at a missing category, and a
    /// subcategory name (case-insensitive) claimed by two different
    /// categories. A repeated subcategory name under the same category keeps
    /// the first record.
    pub fn from_parts(categories: Vec<Category>, subcategories: Vec<SubCategory>) -> Result<Self> {
        let mut by_category_name = HashMap::new();
        let mut by_category_id = HashMap::new();

        for (i, c) in categories.iter().enumerate() {
            if c.name.trim().is_empty() {
                return Err(Error::InvalidName(c.name.clone()));
            }
            if by_category_name.insert(c.name.clone(), i).is_some() {
                return Err(Error::DuplicateCategory(c.name.clone()));
            }
            if by_category_id.insert(c.id, i).is_some() {
                return Err(Error::DuplicateId {
                    kind: "category",
                    id: c.id,
                });
            }
        }

        let mut kept = Vec::with_capacity(subcategories.len());
        let mut by_subcategory: HashMap<String, usize> = HashMap::new();
        let mut sub_ids = HashSet::new();

        for s in subcategories {
            if s.name.trim().is_empty() {
                return Err(Error::InvalidName(s.name));
            }
            if !sub_ids.insert(s.id) {
                return Err(Error::DuplicateId {
                    kind: "subcategory",
                    id: s.id,
                });
            }
            let Some(&owner) = by_category_id.get(&s.category_id) else {
                return Err(Error::UnknownCategory {
                    subcategory: s.name,
                    category: s.category_id.to_string(),
                });
            };

            let key = s.name.to_lowercase();
            if let Some(&existing) = by_subcategory.get(&key) {
                let existing: &SubCategory = &kept[existing];
                if existing.category_id != s.category_id {
                    let first = by_category_id
                        .get(&existing.category_id)
                        .map(|&i| categories[i].name.clone())
                        .unwrap_or_default();
                    return Err(Error::ConflictingSubcategory {
                        name: s.name,
                        first,
                        second: categories[owner].name.clone(),
                    });
                }
                continue;
            }

            by_subcategory.insert(key, kept.len());
            kept.push(s);
        }

        Ok(Self {
            categories,
            subcategories: kept,
            by_subcategory,
            by_category_name,
            by_category_id,
        })
    }

    /// True when the directory has neither categories nor subcategories
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.subcategories.is_empty()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn subcategories(&self) -> &[SubCategory] {
        &self.subcategories
    }

    /// Subcategories owned by the given category, in insertion order
    pub fn subcategories_of(&self, category_id: i64) -> impl Iterator<Item = &SubCategory> {
        self.subcategories
            .iter()
            .filter(move |s| s.category_id == category_id)
    }

    pub fn category(&self, id: i64) -> Option<&Category> {
        self.by_category_id.get(&id).map(|&i| &self.categories[i])
    }

    /// Exact (case-sensitive) category lookup by name
    pub fn category_named(&self, name: &str) -> Option<&Category> {
        self.by_category_name.get(name).map(|&i| &self.categories[i])
    }

    /// The "Other" category record, when the directory defines one
    pub fn other_category(&self) -> Option<&Category> {
        self.category_named(OTHER)
    }

    /// Case-insensitive subcategory lookup, returning the subcategory and its
    /// owning category.
    pub fn subcategory(&self, name: &str) -> Option<(&SubCategory, &Category)> {
        let sub = self
            .by_subcategory
            .get(&name.to_lowercase())
            .map(|&i| &self.subcategories[i])?;
        let owner = self.category(sub.category_id)?;
        Some((sub, owner))
    }
}

/// Assembles a directory by name, assigning sequential ids from 1.
///
/// Mirrors the category form: a category plus its list of subcategory
/// names. Names are trimmed and blank subcategory names are skipped.
#[derive(Debug, Clone, Default)]
pub struct DirectoryBuilder {
    categories: Vec<(String, String)>,
    subcategories: Vec<(String, String, String)>,
}

impl DirectoryBuilder {
    pub fn category(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.categories
            .push((name.into().trim().to_string(), description.into().trim().to_string()));
        self
    }

    pub fn subcategory(
        mut self,
        category: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        if name.trim().is_empty() {
            return self;
        }
        self.subcategories.push((
            category.into().trim().to_string(),
            name.trim().to_string(),
            description.into().trim().to_string(),
        ));
        self
    }

    /// Add a category together with its subcategory names (no descriptions)
    pub fn category_with<I, S>(self, name: impl Into<String>, subcategories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let mut b = self.category(name.clone(), "");
        for sub in subcategories {
            b = b.subcategory(name.clone(), sub, "");
        }
        b
    }

    pub fn build(self) -> Result<CategoryDirectory> {
        let categories: Vec<Category> = self
            .categories
            .into_iter()
            .enumerate()
            .map(|(i, (name, description))| Category {
                id: i as i64 + 1,
                name,
                description,
            })
            .collect();

        let mut subcategories = Vec::with_capacity(self.subcategories.len());
        for (i, (category, name, description)) in self.subcategories.into_iter().enumerate() {
            let Some(owner) = categories.iter().find(|c| c.name == category) else {
                return Err(Error::UnknownCategory {
                    subcategory: name,
                    category,
                });
            };
            subcategories.push(SubCategory {
                id: i as i64 + 1,
                name,
                description,
                category_id: owner.id,
            });
        }

        CategoryDirectory::from_parts(categories, subcategories)
    }
}
