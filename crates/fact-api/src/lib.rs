//! fact-api: HTTP API for the FACT Competition Hub
//!
//! JSON endpoints over the competition catalog, calendar, team request board
//! and chat features. Built with axum.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::{ApiError, Result};
pub use server::{AppState, build_router, start_server};
