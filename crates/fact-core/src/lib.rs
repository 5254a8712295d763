//! fact-core: FACT Competition Hub core library
//!
//! Competition catalog, team request board, chat features on top of a
//! generative API, and the application controller that owns all state.
//!
//! ```rust,ignore
//! use fact_core::{AppController, Catalog, Config, Hub, LlmClient, TeamBoard, TypingDelay};
//!
//! let config = Config::load()?;
//! let controller = AppController::new(Catalog::embedded()?, TeamBoard::with_samples(), config.start_month()?);
//! let hub = Hub::new(controller, Arc::new(LlmClient::new(&config)?), TypingDelay::new(config.chat.clone()));
//! let exchange = hub.ask_advisor(None, "I like coding").await?;
//! ```

pub mod app;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod hub;
pub mod llm;
pub mod team;

pub use app::{AppController, CompetitionDetail, Dashboard, Dialog, DASHBOARD_ITEMS};
pub use catalog::{Catalog, Category, CategoryFilter, Competition, CompetitionSuggestion, Material};
pub use chat::{
    AdvisorReply, AdvisorSession, ChatContext, ChatService, Sender, TeamChat, TeamMessage, TypingDelay,
};
pub use config::{ApiConfig, CalendarConfig, CatalogConfig, ChatConfig, Config, LlmConfig, LlmProvider};
pub use error::{Error, Result};
pub use hub::{AdvisorExchange, Hub};
pub use llm::{LlmClient, Message, Role};
pub use team::{Curriculum, NewTeamRequest, RequestView, TeamBoard, TeamRequest};
