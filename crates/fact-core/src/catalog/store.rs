//! Read-only competition store

use std::collections::HashSet;
use std::path::Path;

use fact_calendar::month_number;
use serde::Deserialize;
use tracing::{debug, info};

use super::filter::CategoryFilter;
use super::models::Competition;
use crate::error::{Error, Result};

const EMBEDDED_CATALOG: &str = include_str!("../../data/competitions.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    competitions: Vec<Competition>,
}

/// Competition catalog, in display order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    competitions: Vec<Competition>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and unknown month names
    pub fn new(competitions: Vec<Competition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for comp in &competitions {
            if comp.id.trim().is_empty() {
                return Err(Error::Catalog(format!(
                    "Competition '{}' has an empty id",
                    comp.name
                )));
            }
            if !seen.insert(comp.id.as_str()) {
                return Err(Error::Catalog(format!("Duplicate competition id: {}", comp.id)));
            }
            if !comp.month_str.trim().is_empty() && month_number(&comp.month_str).is_none() {
                return Err(Error::Catalog(format!(
                    "Competition {} has unknown month '{}'",
                    comp.id, comp.month_str
                )));
            }
        }

        Ok(Self { competitions })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| Error::Catalog(format!("Failed to parse catalog: {}", e)))?;
        Self::new(file.competitions)
    }

    /// The catalog shipped with the binary
    pub fn embedded() -> Result<Self> {
        let catalog = Self::from_toml_str(EMBEDDED_CATALOG)?;
        debug!("Loaded embedded catalog ({} competitions)", catalog.len());
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        info!(
            "Loaded catalog from {} ({} competitions)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Load from `path` when given, otherwise the embedded catalog
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::embedded(),
        }
    }

    pub fn all(&self) -> &[Competition] {
        &self.competitions
    }

    pub fn get(&self, id: &str) -> Option<&Competition> {
        self.competitions.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.competitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitions.is_empty()
    }

    /// The first `n` competitions, for the dashboard
    pub fn featured(&self, n: usize) -> &[Competition] {
        &self.competitions[..n.min(self.competitions.len())]
    }

    /// Competitions matching both the text query and the category filter
    pub fn search<'a>(&'a self, query: &str, filter: &CategoryFilter) -> Vec<&'a Competition> {
        let query = query.to_lowercase();
        self.competitions
            .iter()
            .filter(|c| filter.allows(c.category) && c.matches_query(&query))
            .collect()
    }
}
