//! エラー型定義 (fact-api)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// fact-api のエラー型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Calendar error: {0}")]
    Calendar(#[from] fact_calendar::CalendarError),

    #[error("{0}")]
    Core(#[from] fact_core::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use fact_core::Error as CoreError;

        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) | ApiError::Calendar(_) => StatusCode::BAD_REQUEST,
            ApiError::Core(e) => match e {
                CoreError::CompetitionNotFound(_)
                | CoreError::RequestNotFound(_)
                | CoreError::SessionNotFound(_) => StatusCode::NOT_FOUND,
                CoreError::InvalidSubmission(_) | CoreError::Calendar(_) => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, ApiError>;
