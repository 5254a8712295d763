//! Route definitions
//!
//! Defines all HTTP API endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{
    advisor, advisor_session, calendar, close_team_chat, connect, create_request, dashboard,
    featured_competitions, get_competition, get_request, get_team_chat, health,
    list_competitions, list_requests, send_team_message, suggest_competition,
};
use crate::server::AppState;

/// Create the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health))
        .route("/api/dashboard", get(dashboard))
        // Catalog
        .route("/api/competitions", get(list_competitions))
        .route("/api/competitions/featured", get(featured_competitions))
        .route("/api/competitions/suggestions", post(suggest_competition))
        .route("/api/competitions/{id}", get(get_competition))
        // Calendar
        .route("/api/calendar/{year}/{month}", get(calendar))
        // Team board
        .route("/api/requests", get(list_requests).post(create_request))
        .route("/api/requests/{id}", get(get_request))
        .route("/api/requests/{id}/connect", post(connect))
        // Chats
        .route("/api/advisor", post(advisor))
        .route("/api/advisor/{id}", get(advisor_session))
        .route("/api/team-chats/{id}", get(get_team_chat).delete(close_team_chat))
        .route("/api/team-chats/{id}/messages", post(send_team_message))
}
