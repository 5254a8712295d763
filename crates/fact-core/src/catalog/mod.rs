//! Competition catalog
//!
//! The catalog is loaded once at startup and is read-only afterwards.

mod filter;
mod models;
mod store;
mod suggestion;

pub use filter::CategoryFilter;
pub use models::{Category, Competition, Material};
pub use store::Catalog;
pub use suggestion::CompetitionSuggestion;
