//! Team request types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Academic program of a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curriculum {
    #[serde(rename = "AP")]
    Ap,
    #[serde(rename = "ALEVEL", alias = "A-Level")]
    ALevel,
    #[serde(rename = "OSSD")]
    Ossd,
    #[serde(rename = "CHP")]
    Chp,
}

impl Curriculum {
    pub const ALL: [Curriculum; 4] = [
        Curriculum::Ap,
        Curriculum::ALevel,
        Curriculum::Ossd,
        Curriculum::Chp,
    ];
}

impl fmt::Display for Curriculum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Curriculum::Ap => "AP",
            Curriculum::ALevel => "A-Level",
            Curriculum::Ossd => "OSSD",
            Curriculum::Chp => "CHP",
        };
        f.write_str(label)
    }
}

impl FromStr for Curriculum {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().replace(['-', ' '], "").as_str() {
            "AP" => Ok(Curriculum::Ap),
            "ALEVEL" => Ok(Curriculum::ALevel),
            "OSSD" => Ok(Curriculum::Ossd),
            "CHP" => Ok(Curriculum::Chp),
            _ => Err(Error::InvalidSubmission(format!("Unknown curriculum: {}", s))),
        }
    }
}

/// A posted request for teammates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRequest {
    pub id: String,
    /// May reference a competition that is not in the catalog
    pub competition_id: String,
    pub student_name: String,
    pub grade: String,
    pub curriculum: Curriculum,
    /// Background: free-text self description
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Form input for a new team request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeamRequest {
    pub student_name: String,
    pub grade: String,
    pub curriculum: Curriculum,
    pub bio: String,
    #[serde(default)]
    pub contact: Option<String>,
}

impl NewTeamRequest {
    /// Presence checks only. Whitespace-only counts as missing.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("student_name", &self.student_name),
            ("grade", &self.grade),
            ("bio", &self.bio),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidSubmission(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// A request joined with its competition label for display
#[derive(Debug, Clone, Serialize)]
pub struct RequestView {
    #[serde(flatten)]
    pub request: TeamRequest,
    pub competition_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewTeamRequest {
        NewTeamRequest {
            student_name: "Alice".to_string(),
            grade: "11".to_string(),
            curriculum: Curriculum::Ap,
            bio: "strong in algebra".to_string(),
            contact: None,
        }
    }

    #[test]
    fn test_validate() {
        assert!(form().validate().is_ok());

        let mut blank = form();
        blank.student_name = "   ".to_string();
        blank.bio = String::new();
        let err = blank.validate().unwrap_err().to_string();
        assert!(err.contains("student_name"));
        assert!(err.contains("bio"));
        assert!(!err.contains("grade"));
    }

    #[test]
    fn test_curriculum_serde() {
        assert_eq!(serde_json::to_string(&Curriculum::ALevel).unwrap(), "\"ALEVEL\"");
        let parsed: Curriculum = serde_json::from_str("\"A-Level\"").unwrap();
        assert_eq!(parsed, Curriculum::ALevel);
        assert_eq!(Curriculum::ALevel.to_string(), "A-Level");
    }

    #[test]
    fn test_curriculum_from_str() {
        assert_eq!("ap".parse::<Curriculum>().unwrap(), Curriculum::Ap);
        assert_eq!("a-level".parse::<Curriculum>().unwrap(), Curriculum::ALevel);
        assert_eq!("ALEVEL".parse::<Curriculum>().unwrap(), Curriculum::ALevel);
        assert!("IB".parse::<Curriculum>().is_err());
    }
}
