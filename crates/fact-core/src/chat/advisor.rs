//! Competition advisor conversation

use serde::Serialize;
use tracing::warn;

use super::service::{ChatContext, ChatService};
use crate::llm::{Message, Role};

pub const ADVISOR_GREETING: &str = "Hi! I'm your Competition Advisor. Tell me about your interests (e.g., Math, Coding) and I'll suggest the best competitions for you.";

const ADVISOR_FAILURE: &str =
    "I'm currently having trouble connecting to my knowledge base. Please try again later.";
const ADVISOR_EMPTY: &str = "I'm sorry, I couldn't process that request.";

/// One line of the advisor transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisorEntry {
    pub role: Role,
    pub text: String,
    /// Set on fallback replies shown after a failed call
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// Reply to one advisor message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisorReply {
    pub text: String,
    pub is_error: bool,
}

/// A multi-turn advisor conversation
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorSession {
    pub id: String,
    #[serde(skip)]
    system: String,
    pub transcript: Vec<AdvisorEntry>,
}

impl AdvisorSession {
    /// Start a session; the transcript opens with the greeting
    pub fn new(id: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            system: system.into(),
            transcript: vec![AdvisorEntry {
                role: Role::Model,
                text: ADVISOR_GREETING.to_string(),
                is_error: false,
            }],
        }
    }

    /// Context for the next call.
    ///
    /// The greeting and fallback replies are display-only and are not sent.
    pub fn context(&self) -> ChatContext {
        let history = self
            .transcript
            .iter()
            .skip(1)
            .filter(|e| !e.is_error)
            .map(|e| Message {
                role: e.role,
                text: e.text.clone(),
            })
            .collect();

        ChatContext {
            system: Some(self.system.clone()),
            history,
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.transcript.push(AdvisorEntry {
            role: Role::User,
            text: text.into(),
            is_error: false,
        });
    }

    pub fn push_reply(&mut self, reply: &AdvisorReply) {
        self.transcript.push(AdvisorEntry {
            role: Role::Model,
            text: reply.text.clone(),
            is_error: reply.is_error,
        });
    }
}

/// Ask the advisor. Never fails: errors become the fallback text.
pub async fn advisor_reply(
    service: &dyn ChatService,
    context: &ChatContext,
    message: &str,
) -> AdvisorReply {
    match service.send(context, message).await {
        Ok(text) if !text.trim().is_empty() => AdvisorReply {
            text,
            is_error: false,
        },
        Ok(_) => AdvisorReply {
            text: ADVISOR_EMPTY.to_string(),
            is_error: false,
        },
        Err(e) => {
            warn!("Advisor call failed: {}", e);
            AdvisorReply {
                text: ADVISOR_FAILURE.to_string(),
                is_error: true,
            }
        }
    }
}
