//! Shared application handle
//!
//! [`Hub`] wraps the controller in a lock and drives the chat features.
//! Outbound chat calls run without holding the lock: the context is
//! snapshotted, the lock released, and the reply appended afterwards.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::AppController;
use crate::chat::{
    AdvisorReply, ChatService, Sender, TeamChat, TypingDelay, advisor_reply, facilitator_question,
    teammate_reply,
};
use crate::error::{Error, Result};

/// Result of one advisor exchange
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorExchange {
    pub session_id: String,
    #[serde(flatten)]
    pub reply: AdvisorReply,
}

/// Cloneable handle to the application state and chat backend
#[derive(Clone)]
pub struct Hub {
    controller: Arc<RwLock<AppController>>,
    chat: Arc<dyn ChatService>,
    pacing: TypingDelay,
}

impl Hub {
    pub fn new(controller: AppController, chat: Arc<dyn ChatService>, pacing: TypingDelay) -> Self {
        Self {
            controller: Arc::new(RwLock::new(controller)),
            chat,
            pacing,
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, AppController> {
        self.controller.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, AppController> {
        self.controller.write().await
    }

    /// Send a message to the advisor.
    ///
    /// Without a session id a new session is started.
    pub async fn ask_advisor(&self, session_id: Option<&str>, message: &str) -> Result<AdvisorExchange> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::InvalidSubmission("Message is empty".to_string()));
        }

        let (session_id, context) = {
            let mut app = self.controller.write().await;
            let id = match session_id {
                Some(id) => id.to_string(),
                None => app.open_advisor().id.clone(),
            };
            let context = app.advisor_prepare(&id, message)?;
            (id, context)
        };

        let reply = advisor_reply(self.chat.as_ref(), &context, message).await;
        self.controller
            .write()
            .await
            .advisor_finish(&session_id, &reply);

        Ok(AdvisorExchange { session_id, reply })
    }

    /// Connect to a request's author.
    ///
    /// Returns the chat as opened and a handle to the task that delivers
    /// the teammate's first reply.
    pub async fn connect(&self, request_id: &str, opening: &str) -> Result<(TeamChat, JoinHandle<()>)> {
        let chat = self.controller.write().await.connect(request_id, opening)?.clone();

        let hub = self.clone();
        let chat_id = chat.id.clone();
        let name = chat.teammate_name.clone();
        let bio = chat.teammate_bio().to_string();
        let opening = opening.trim().to_string();

        let task = tokio::spawn(async move {
            hub.pacing.wait(hub.pacing.initial()).await;
            let reply = teammate_reply(hub.chat.as_ref(), &name, &bio, &opening, &[]).await;
            if hub.append(&chat_id, Sender::Teammate, &reply).await {
                hub.facilitate(&chat_id).await;
            }
        });

        Ok((chat, task))
    }

    /// Send a message in a team chat.
    ///
    /// Returns the updated chat and a handle to the task that delivers the
    /// teammate's reply (and any facilitator question).
    pub async fn send_team_message(&self, chat_id: &str, text: &str) -> Result<(TeamChat, JoinHandle<()>)> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidSubmission("Message is empty".to_string()));
        }

        let (chat, due) = {
            let mut app = self.controller.write().await;
            if !app.append_team_message(chat_id, Sender::Me, text) {
                return Err(Error::SessionNotFound(chat_id.to_string()));
            }
            let chat = app
                .team_chat(chat_id)
                .cloned()
                .ok_or_else(|| Error::SessionNotFound(chat_id.to_string()))?;
            let due = chat
                .needs_facilitator(self.pacing.facilitator_interval())
                .then(|| chat.history_lines());
            (chat, due)
        };

        let hub = self.clone();
        let chat_id = chat.id.clone();
        let name = chat.teammate_name.clone();
        let bio = chat.teammate_bio().to_string();
        let history = chat.history_lines();
        let text = text.to_string();

        let task = tokio::spawn(async move {
            let facilitator = async {
                if let Some(history) = &due {
                    hub.ask_facilitator(&chat_id, history).await;
                }
            };
            let teammate = async {
                let reply = teammate_reply(hub.chat.as_ref(), &name, &bio, &text, &history).await;
                hub.pacing.wait(hub.pacing.reply()).await;
                if hub.append(&chat_id, Sender::Teammate, &reply).await {
                    hub.facilitate(&chat_id).await;
                }
            };
            tokio::join!(facilitator, teammate);
        });

        Ok((chat, task))
    }

    async fn append(&self, chat_id: &str, sender: Sender, text: &str) -> bool {
        self.controller
            .write()
            .await
            .append_team_message(chat_id, sender, text)
    }

    /// Let the facilitator speak if the transcript calls for it
    async fn facilitate(&self, chat_id: &str) {
        let history = {
            let app = self.controller.read().await;
            match app.team_chat(chat_id) {
                Some(chat) if chat.needs_facilitator(self.pacing.facilitator_interval()) => {
                    chat.history_lines()
                }
                _ => return,
            }
        };
        self.ask_facilitator(chat_id, &history).await;
    }

    async fn ask_facilitator(&self, chat_id: &str, history: &[String]) {
        self.pacing.wait(self.pacing.facilitator()).await;
        let question = facilitator_question(self.chat.as_ref(), history).await;
        debug!("Facilitator question for {}: {}", chat_id, question);
        self.append(chat_id, Sender::System, &question).await;
    }
}
