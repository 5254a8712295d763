//! HTTP API handlers
//!
//! Request handlers for the catalog, calendar, team board and chats.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use fact_calendar::MonthView;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use fact_core::{
    AdvisorExchange, AdvisorSession, Category, CategoryFilter, Competition, CompetitionDetail,
    CompetitionSuggestion, Dashboard, NewTeamRequest, RequestView, TeamChat, DASHBOARD_ITEMS,
};

use crate::error::{ApiError, Result};
use crate::server::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// New team request payload
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub competition_id: String,
    #[serde(flatten)]
    pub form: NewTeamRequest,
}

/// Advisor chat payload
#[derive(Debug, Deserialize)]
pub struct AdvisorRequest {
    /// User message
    pub message: String,
    /// Session ID for conversation continuity
    pub session_id: Option<String>,
}

/// A message sent into a team chat, or the opening message when connecting
#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    pub message: String,
}

/// Compact competition entry used on the calendar
#[derive(Debug, Serialize)]
pub struct CalendarEntry {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    pub category: Category,
    pub date: String,
}

impl From<&Competition> for CalendarEntry {
    fn from(c: &Competition) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            short_name: c.short_name.clone(),
            category: c.category,
            date: c.date.clone(),
        }
    }
}

/// One month of the calendar
#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub days_in_month: u32,
    /// Empty cells before day 1 (weeks start on Sunday)
    pub leading_blanks: u32,
    /// Day of month to highlight, when today is in this month
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today: Option<u32>,
    pub scheduled_count: usize,
    pub days: BTreeMap<u32, Vec<CalendarEntry>>,
    pub flexible: Vec<CalendarEntry>,
}

// ============================================================================
// Handler functions
// ============================================================================

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Competitions matching `q` and `category`.
///
/// `category` may be repeated or comma separated. No category means all.
pub async fn list_competitions(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Competition>>> {
    let mut query = String::new();
    let mut categories = Vec::new();

    for (key, value) in params {
        match key.as_str() {
            "q" => query = value,
            "category" => {
                for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    if name.eq_ignore_ascii_case("all") {
                        continue;
                    }
                    let category = name
                        .parse::<Category>()
                        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                    categories.push(category);
                }
            }
            _ => {}
        }
    }

    debug!("Competition search: q={:?} categories={:?}", query, categories);

    let filter = CategoryFilter::only(categories);
    let app = state.hub.read().await;
    let found = app.catalog().search(&query, &filter).into_iter().cloned().collect();
    Ok(Json(found))
}

pub async fn featured_competitions(State(state): State<AppState>) -> Json<Vec<Competition>> {
    let app = state.hub.read().await;
    Json(app.catalog().featured(DASHBOARD_ITEMS).to_vec())
}

/// Competition with the team requests posted for it
pub async fn get_competition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CompetitionDetail>> {
    let detail = state.hub.read().await.competition_detail(&id)?;
    Ok(Json(detail))
}

/// "Add missing competition" form. Suggestions are logged only.
pub async fn suggest_competition(
    State(state): State<AppState>,
    Json(suggestion): Json<CompetitionSuggestion>,
) -> Result<(StatusCode, Json<Value>)> {
    state.hub.write().await.submit_suggestion(&suggestion)?;
    Ok((StatusCode::ACCEPTED, Json(json!({ "status": "received" }))))
}

pub async fn dashboard(State(state): State<AppState>) -> Json<Dashboard> {
    Json(state.hub.read().await.dashboard())
}

/// Calendar grid for one month
pub async fn calendar(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<CalendarResponse>> {
    let view = MonthView::new(year, month)?;
    let app = state.hub.read().await;
    let grid = app.calendar_for(view);

    let days = grid
        .days
        .iter()
        .map(|(day, comps)| (*day, comps.iter().map(|c| CalendarEntry::from(*c)).collect()))
        .collect();

    Ok(Json(CalendarResponse {
        year: view.year(),
        month: view.month(),
        title: view.to_string(),
        days_in_month: view.days_in_month(),
        leading_blanks: view.leading_blanks(),
        today: grid.today_marker(Local::now().date_naive()),
        scheduled_count: grid.scheduled_count(),
        days,
        flexible: grid.flexible.iter().map(|c| CalendarEntry::from(*c)).collect(),
    }))
}

/// All team requests, newest first
pub async fn list_requests(State(state): State<AppState>) -> Json<Vec<RequestView>> {
    Json(state.hub.read().await.request_views())
}

pub async fn create_request(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<RequestView>)> {
    let mut app = state.hub.write().await;
    let request = app.submit_request(&req.competition_id, req.form)?;
    let view = app.request_view(&request.id)?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RequestView>> {
    let view = state.hub.read().await.request_view(&id)?;
    Ok(Json(view))
}

/// Advisor chat. Omitting `session_id` starts a new conversation.
pub async fn advisor(
    State(state): State<AppState>,
    Json(req): Json<AdvisorRequest>,
) -> Result<Json<AdvisorExchange>> {
    let exchange = state
        .hub
        .ask_advisor(req.session_id.as_deref(), &req.message)
        .await?;
    Ok(Json(exchange))
}

pub async fn advisor_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdvisorSession>> {
    let app = state.hub.read().await;
    let session = app
        .advisor_session(&id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("advisor session {}", id)))?;
    Ok(Json(session))
}

/// Connect to a request's author. The teammate replies in the background.
pub async fn connect(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    Json(req): Json<ChatMessageRequest>,
) -> Result<(StatusCode, Json<TeamChat>)> {
    let (chat, _reply) = state.hub.connect(&request_id, &req.message).await?;
    info!("Team chat {} opened for request {}", chat.id, request_id);
    Ok((StatusCode::CREATED, Json(chat)))
}

pub async fn get_team_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TeamChat>> {
    let app = state.hub.read().await;
    let chat = app
        .team_chat(&id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("team chat {}", id)))?;
    Ok(Json(chat))
}

/// Send a team chat message. Replies arrive in the background.
pub async fn send_team_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatMessageRequest>,
) -> Result<(StatusCode, Json<TeamChat>)> {
    let (chat, _reply) = state.hub.send_team_message(&id, &req.message).await?;
    Ok((StatusCode::ACCEPTED, Json(chat)))
}

pub async fn close_team_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.hub.write().await.close_team_chat(&id) {
        info!("Closed team chat {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("team chat {}", id)))
    }
}
