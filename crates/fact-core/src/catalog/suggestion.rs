//! User-submitted competition suggestions
//!
//! Suggestions are validated and logged. They never reach the catalog.

use serde::{Deserialize, Serialize};

use super::models::Category;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionSuggestion {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl CompetitionSuggestion {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidSubmission(
                "Competition name is required".to_string(),
            ));
        }
        let website = self.website.as_deref().map(str::trim).unwrap_or_default();
        if !website.is_empty() && !(website.starts_with("http://") || website.starts_with("https://")) {
            return Err(Error::InvalidSubmission(format!(
                "Website must be an http(s) URL: {}",
                website
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(name: &str, website: Option<&str>) -> CompetitionSuggestion {
        CompetitionSuggestion {
            name: name.to_string(),
            category: Category::Chemistry,
            date: "May".to_string(),
            website: website.map(str::to_string),
            description: String::new(),
        }
    }

    #[test]
    fn test_validate() {
        assert!(suggestion("Chem Cup", None).validate().is_ok());
        assert!(suggestion("Chem Cup", Some("https://chem.example")).validate().is_ok());
        assert!(suggestion("Chem Cup", Some("")).validate().is_ok());
        assert!(suggestion("  ", None).validate().is_err());
        assert!(suggestion("Chem Cup", Some("ftp://x")).validate().is_err());
    }
}
