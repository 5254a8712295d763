//! Competition types

use std::fmt;
use std::str::FromStr;

use fact_calendar::Schedulable;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Subject area of a competition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Mathematics,
    Physics,
    Chemistry,
    Biology,
    Economics,
    Informatics,
    Linguistics,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Mathematics,
        Category::Physics,
        Category::Chemistry,
        Category::Biology,
        Category::Economics,
        Category::Informatics,
        Category::Linguistics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Mathematics => "Mathematics",
            Category::Physics => "Physics",
            Category::Chemistry => "Chemistry",
            Category::Biology => "Biology",
            Category::Economics => "Economics",
            Category::Informatics => "Informatics",
            Category::Linguistics => "Linguistics",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::Catalog(format!("Unknown category: {}", s)))
    }
}

/// Past paper or other preparation resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub title: String,
    pub url: String,
}

/// One academic competition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    /// Stable lookup key
    pub id: String,
    pub name: String,
    /// Abbreviation, e.g. "AMC"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    pub category: Category,
    pub description: String,
    /// Exam date as written, not necessarily machine readable
    pub date: String,
    /// Month name used to group the competition on the calendar
    #[serde(default)]
    pub month_str: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_date: Option<String>,
}

impl Competition {
    /// Short name if present, otherwise the full name
    pub fn label(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }

    /// Case-insensitive match on name, short name or description.
    ///
    /// `query` must already be lowercase. An empty query matches everything.
    pub(crate) fn matches_query(&self, query: &str) -> bool {
        query.is_empty()
            || self.name.to_lowercase().contains(query)
            || self
                .short_name
                .as_ref()
                .is_some_and(|s| s.to_lowercase().contains(query))
            || self.description.to_lowercase().contains(query)
    }
}

impl Schedulable for Competition {
    fn date_text(&self) -> &str {
        &self.date
    }

    fn month_text(&self) -> &str {
        &self.month_str
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("Physics".parse::<Category>().unwrap(), Category::Physics);
        assert_eq!(" informatics ".parse::<Category>().unwrap(), Category::Informatics);
        assert!("Astronomy".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&Category::Linguistics).unwrap();
        assert_eq!(json, "\"Linguistics\"");
        assert_eq!(Category::Economics.to_string(), "Economics");
    }

    #[test]
    fn test_label_prefers_short_name() {
        let json = r#"{
            "id": "x", "name": "Long Name", "short_name": "LN",
            "category": "Biology", "description": "", "date": "May 3"
        }"#;
        let mut comp: Competition = serde_json::from_str(json).unwrap();
        assert_eq!(comp.label(), "LN");
        assert!(comp.month_str.is_empty());

        comp.short_name = None;
        assert_eq!(comp.label(), "Long Name");
    }
}
