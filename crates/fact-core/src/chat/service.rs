//! Chat capability interface

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::llm::{LlmClient, Message};

/// Conversation state sent along with a message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatContext {
    /// System instruction, if any
    pub system: Option<String>,
    /// Earlier turns, oldest first
    pub history: Vec<Message>,
}

impl ChatContext {
    /// A single-shot context: no system instruction, no history
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_system(system: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            history: Vec::new(),
        }
    }
}

/// Sends one message and returns the reply text.
///
/// An `Ok` reply may be empty; callers decide how to present that.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn send(&self, context: &ChatContext, message: &str) -> Result<String>;
}

#[async_trait]
impl ChatService for LlmClient {
    async fn send(&self, context: &ChatContext, message: &str) -> Result<String> {
        let mut builder = self
            .request_builder()
            .messages(context.history.iter().cloned())
            .user(message);
        if let Some(system) = &context.system {
            builder = builder.system(system.clone());
        }

        let response = self.generate(&builder.build()).await?;
        debug!("Chat reply: {} chars", response.text.len());
        Ok(response.text)
    }
}
