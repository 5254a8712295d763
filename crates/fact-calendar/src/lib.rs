//! fact-calendar: Competition calendar for the FACT hub
//!
//! This crate places competitions with hand-written dates onto a month grid.
//!
//! ## Features
//!
//! - Free-text date resolver (month membership + day extraction)
//! - Month model with navigation and Sunday-first cell layout
//! - Grid builder with per-day buckets and a flexible list
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fact_calendar::{CalendarGrid, MonthView, Schedulable};
//!
//! let view = MonthView::new(2025, 11)?;
//! let grid = CalendarGrid::build(&competitions, view);
//!
//! for day in 1..=view.days_in_month() {
//!     for event in grid.events_on(day) {
//!         println!("{} {}: {}", view.abbreviation(), day, event.date_text());
//!     }
//! }
//! println!("{} flexible", grid.flexible.len());
//! ```

pub mod error;
pub mod grid;
pub mod models;
pub mod resolver;

pub use error::{CalendarError, Result};
pub use grid::CalendarGrid;
pub use models::{month_number, MonthView};
pub use resolver::{classify, Classification, DateResolver, Placement, Schedulable};

/// Re-export models for easy use
pub mod prelude {
    pub use super::{CalendarGrid, Classification, MonthView, Schedulable};
}
