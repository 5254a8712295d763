//! In-memory request board

use chrono::{TimeZone, Utc};
use tracing::info;
use uuid::Uuid;

use super::types::{Curriculum, NewTeamRequest, RequestView, TeamRequest};
use crate::catalog::Catalog;
use crate::error::Result;

/// Label shown when a request points at a competition we don't know
pub const UNKNOWN_COMPETITION: &str = "Unknown";

/// Competition name for a request, or "Unknown"
pub fn competition_label<'a>(catalog: &'a Catalog, competition_id: &str) -> &'a str {
    catalog
        .get(competition_id)
        .map(|c| c.name.as_str())
        .unwrap_or(UNKNOWN_COMPETITION)
}

/// Team requests, newest first
#[derive(Debug, Clone, Default)]
pub struct TeamBoard {
    requests: Vec<TeamRequest>,
}

impl TeamBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A board seeded with two example posts
    pub fn with_samples() -> Self {
        let at = |h| {
            Utc.with_ymd_and_hms(2025, 10, 1, h, 0, 0)
                .single()
                .unwrap_or_default()
        };
        Self {
            requests: vec![
                TeamRequest {
                    id: "req-1".to_string(),
                    competition_id: "math-1".to_string(),
                    student_name: "Alice Chen".to_string(),
                    grade: "11".to_string(),
                    curriculum: Curriculum::Ap,
                    bio: "Math Olympiad Gold Medalist, strong in Combinatorics. I have prepared \
                          for this for 2 years and have a lot of past paper resources to share. \
                          Looking for someone who is good at Geometry."
                        .to_string(),
                    contact: Some("achen@school.edu".to_string()),
                    timestamp: at(10),
                },
                TeamRequest {
                    id: "req-2".to_string(),
                    competition_id: "econ-1".to_string(),
                    student_name: "James Smith".to_string(),
                    grade: "12".to_string(),
                    curriculum: Curriculum::ALevel,
                    bio: "Studying Higher Level Economics, good at data analysis. Need a teammate \
                          who is good at presentation and slide design."
                        .to_string(),
                    contact: Some("jsmith@school.edu".to_string()),
                    timestamp: at(9),
                },
            ],
        }
    }

    /// Validate and prepend a new request
    pub fn submit(&mut self, competition_id: &str, form: NewTeamRequest) -> Result<&TeamRequest> {
        form.validate()?;

        let request = TeamRequest {
            id: format!("req-{}", Uuid::now_v7()),
            competition_id: competition_id.to_string(),
            student_name: form.student_name.trim().to_string(),
            grade: form.grade.trim().to_string(),
            curriculum: form.curriculum,
            bio: form.bio.trim().to_string(),
            contact: form
                .contact
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            timestamp: Utc::now(),
        };

        info!(
            "New team request {} from {} for {}",
            request.id, request.student_name, request.competition_id
        );

        self.requests.insert(0, request);
        Ok(&self.requests[0])
    }

    pub fn list(&self) -> &[TeamRequest] {
        &self.requests
    }

    /// The `n` newest requests
    pub fn recent(&self, n: usize) -> &[TeamRequest] {
        &self.requests[..n.min(self.requests.len())]
    }

    pub fn get(&self, id: &str) -> Option<&TeamRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    /// Requests posted for one competition, newest first
    pub fn for_competition<'a>(&'a self, competition_id: &'a str) -> impl Iterator<Item = &'a TeamRequest> + 'a {
        self.requests
            .iter()
            .filter(move |r| r.competition_id == competition_id)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Join a request with its competition label
    pub fn view(&self, request: &TeamRequest, catalog: &Catalog) -> RequestView {
        RequestView {
            request: request.clone(),
            competition_name: competition_label(catalog, &request.competition_id).to_string(),
        }
    }
}
