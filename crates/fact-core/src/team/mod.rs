//! Team request board
//!
//! Students post requests for teammates against a competition. The board is
//! in-memory only and lists newest requests first.

mod board;
mod types;

pub use board::{TeamBoard, competition_label, UNKNOWN_COMPETITION};
pub use types::{Curriculum, NewTeamRequest, RequestView, TeamRequest};
