use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_core::{CategoryDirectory, OTHER};
use tally_ingest::load_directory_csv;
use tracing::debug;

use crate::state::ensure_tally_home;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Owner id written into parsed records
    #[serde(default = "default_user_id")]
    pub user_id: i64,

    /// IANA timezone used when printing timestamps
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Directory CSV to use instead of the inline categories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_csv: Option<PathBuf>,

    #[serde(default)]
    pub categories: Vec<CategorySection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySection {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

fn default_user_id() -> i64 {
    1
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn section(name: &str, description: &str, subs: &[&str]) -> CategorySection {
    CategorySection {
        name: name.to_string(),
        description: description.to_string(),
        subcategories: subs.iter().map(|s| s.to_string()).collect(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            timezone: default_timezone(),
            directory_csv: None,
            categories: vec![
                section("Food", "Eating and drinking", &["coffee", "groceries", "lunch", "dinner"]),
                section("Transport", "Getting around", &["taxi", "fuel", "parking", "bus"]),
                section("Housing", "Rent and bills", &["rent", "utilities"]),
                section(OTHER, "Everything else", &[]),
            ],
        }
    }
}

impl Config {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone: {}", self.timezone))
    }

    /// Directory from the inline `[[categories]]` tables
    pub fn inline_directory(&self) -> Result<CategoryDirectory> {
        let mut b = CategoryDirectory::builder();
        for c in &self.categories {
            b = b.category(c.name.as_str(), c.description.as_str());
            for s in &c.subcategories {
                b = b.subcategory(c.name.as_str(), s.as_str(), "");
            }
        }
        b.build().context("invalid [[categories]] in config")
    }

    /// Pick the directory snapshot: explicit CSV > configured CSV > inline.
    pub fn directory(&self, override_csv: Option<&Path>) -> Result<CategoryDirectory> {
        let csv = override_csv.or(self.directory_csv.as_deref());
        match csv {
            Some(path) => {
                debug!("loading directory from {}", path.display());
                load_directory_csv(path).with_context(|| format!("load {}", path.display()))
            }
            None => self.inline_directory(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.tz()?;
    Ok(cfg)
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
