//! HTTP API Server
//!
//! Starts and manages the axum-based HTTP server.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use fact_core::{Config, Hub};

use crate::routes::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub hub: Hub,
}

/// CORS layer from `api.allowed_origins`; any origin when unset
fn cors_layer(config: &Config) -> CorsLayer {
    match &config.api.allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", o);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        _ => CorsLayer::permissive(),
    }
}

/// Build the router with all layers applied
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        .merge(routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP API server
pub async fn start_server(config: Config, hub: Hub) -> anyhow::Result<()> {
    let listener =
        tokio::net::TcpListener::bind((config.api.host.as_str(), config.api.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let app = build_router(AppState { config, hub });

    info!("HTTP API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use fact_calendar::MonthView;
    use fact_core::{AppController, Catalog, ChatContext, ChatService, TeamBoard, TypingDelay};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct EchoChat;

    #[async_trait]
    impl ChatService for EchoChat {
        async fn send(&self, _context: &ChatContext, message: &str) -> fact_core::Result<String> {
            if message.contains("roleplaying") {
                Ok("Sounds fun, count me in!".to_string())
            } else {
                Ok(format!("echo: {}", message))
            }
        }
    }

    fn app() -> Router {
        let controller = AppController::new(
            Catalog::embedded().unwrap(),
            TeamBoard::with_samples(),
            MonthView::new(2025, 10).unwrap(),
        );
        let hub = Hub::new(controller, Arc::new(EchoChat), TypingDelay::instant());
        build_router(AppState {
            config: Config::default(),
            hub,
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_competition_search() {
        let app = app();

        let (status, body) = send(&app, get("/api/competitions")).await;
        assert_eq!(status, StatusCode::OK);
        let total = body.as_array().unwrap().len();
        assert_eq!(total, Catalog::embedded().unwrap().len());

        let (_, body) = send(&app, get("/api/competitions?category=Biology&category=chemistry")).await;
        let cats: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["category"].as_str().unwrap())
            .collect();
        assert!(!cats.is_empty());
        assert!(cats.iter().all(|c| *c == "Biology" || *c == "Chemistry"));

        let (_, body) = send(&app, get("/api/competitions?q=amc&category=Mathematics,All")).await;
        assert_eq!(body[0]["id"], "math-1");

        let (status, _) = send(&app, get("/api/competitions?category=Astronomy")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_competition_detail() {
        let app = app();
        let (status, body) = send(&app, get("/api/competitions/math-1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["competition"]["id"], "math-1");
        assert_eq!(body["requests"][0]["student_name"], "Alice Chen");

        let (status, body) = send(&app, get("/api/competitions/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));

        let (_, body) = send(&app, get("/api/competitions/featured")).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_dashboard() {
        let app = app();
        let (status, body) = send(&app, get("/api/dashboard")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["featured"].as_array().unwrap().len(), 3);
        let recent = body["recent_requests"].as_array().unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent.iter().all(|r| r["competition_name"].is_string()));
    }

    #[tokio::test]
    async fn test_calendar() {
        let app = app();
        let (status, body) = send(&app, get("/api/calendar/2025/11")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "November 2025");
        assert_eq!(body["days_in_month"], 30);
        assert_eq!(body["leading_blanks"], 6);
        assert_eq!(body["days"]["5"][0]["id"], "math-1");
        assert!(body["flexible"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c["id"] == "phys-2"));

        let (status, _) = send(&app, get("/api/calendar/2025/13")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_and_get_request() {
        let app = app();
        let payload = json!({
            "competition_id": "math-1",
            "student_name": "Alice",
            "grade": "11",
            "curriculum": "AP",
            "bio": "strong in algebra"
        });
        let (status, created) = send(&app, post("/api/requests", payload)).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("req-"));

        let (_, list) = send(&app, get("/api/requests")).await;
        assert_eq!(list[0]["id"], id.as_str());
        assert_eq!(list.as_array().unwrap().len(), 3);

        let (status, fetched) = send(&app, get(&format!("/api/requests/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["bio"], "strong in algebra");
        assert_eq!(fetched["competition_name"], created["competition_name"]);
    }

    #[tokio::test]
    async fn test_request_validation_and_unknown_competition() {
        let app = app();
        let missing = json!({
            "competition_id": "math-1",
            "student_name": "  ",
            "grade": "11",
            "curriculum": "OSSD",
            "bio": "hi"
        });
        let (status, body) = send(&app, post("/api/requests", missing)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("student_name"));

        let dangling = json!({
            "competition_id": "gone-1",
            "student_name": "Bo",
            "grade": "10",
            "curriculum": "A-Level",
            "bio": "hi"
        });
        let (status, body) = send(&app, post("/api/requests", dangling)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["competition_name"], "Unknown");
        assert_eq!(body["curriculum"], "ALEVEL");

        let (status, _) = send(&app, get("/api/requests/req-missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_suggestion() {
        let app = app();
        let (status, _) = send(
            &app,
            post("/api/competitions/suggestions", json!({"name": "Astro Cup", "category": "Physics"})),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let (status, _) = send(
            &app,
            post("/api/competitions/suggestions", json!({"name": "", "category": "Physics"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_advisor() {
        let app = app();
        let (status, first) = send(&app, post("/api/advisor", json!({"message": "coding"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["text"], "echo: coding");
        let session_id = first["session_id"].as_str().unwrap().to_string();

        let (_, second) = send(
            &app,
            post("/api/advisor", json!({"message": "math", "session_id": session_id})),
        )
        .await;
        assert_eq!(second["session_id"], session_id.as_str());

        let (_, session) = send(&app, get(&format!("/api/advisor/{}", session_id))).await;
        assert_eq!(session["transcript"].as_array().unwrap().len(), 5);

        let (status, _) = send(
            &app,
            post("/api/advisor", json!({"message": "hi", "session_id": "adv-nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_team_chat() {
        let app = app();
        let (status, chat) = send(
            &app,
            post("/api/requests/req-1/connect", json!({"message": "Hi Alice!"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(chat["teammate_name"], "Alice Chen");
        assert_eq!(chat["messages"][1]["sender"], "system");
        let chat_id = chat["id"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &app,
            post(&format!("/api/team-chats/{}/messages", chat_id), json!({"message": "Ready?"})),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(updated["messages"]
            .as_array()
            .unwrap()
            .iter()
            .any(|m| m["text"] == "Ready?"));

        let (status, _) = send(&app, get(&format!("/api/team-chats/{}", chat_id))).await;
        assert_eq!(status, StatusCode::OK);

        let delete = Request::delete(format!("/api/team-chats/{}", chat_id))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, get(&format!("/api/team-chats/{}", chat_id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            post("/api/requests/req-404/connect", json!({"message": "Hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
