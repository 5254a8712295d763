//! Chat features on top of the generative API
//!
//! - Competition advisor: a multi-turn conversation grounded in the catalog
//! - Team chat: a simulated teammate plus a facilitator that chimes in
//!
//! Every outbound call goes through [`ChatService`], so tests can swap in a
//! stub. Calls never fail from the caller's point of view: errors and empty
//! replies are replaced by fixed fallback strings.

mod advisor;
mod pacing;
pub mod prompts;
mod service;
mod team_chat;

pub use advisor::{AdvisorEntry, AdvisorReply, AdvisorSession, ADVISOR_GREETING, advisor_reply};
pub use pacing::TypingDelay;
pub use service::{ChatContext, ChatService};
pub use team_chat::{Sender, TeamChat, TeamMessage, facilitator_question, teammate_reply};
