//! Simulated team chat
//!
//! After connecting to a team request, the user chats with a simulated
//! teammate speaking as the request's author. A facilitator drops in a
//! get-to-know-you question at regular intervals.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::prompts::{facilitator_prompt, teammate_prompt};
use super::service::{ChatContext, ChatService};
use crate::team::TeamRequest;

const TEAMMATE_FAILURE: &str = "Sounds good! When do you want to start preparing?";
const TEAMMATE_EMPTY: &str = "That sounds cool! Let's do it.";
const FACILITATOR_FAILURE: &str =
    "Facilitator Question: How do you usually handle difficult problems?";
const FACILITATOR_EMPTY: &str =
    "To help you bond: What is your preferred communication style during stressful deadlines?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Me,
    Teammate,
    System,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::Me => "me",
            Sender::Teammate => "teammate",
            Sender::System => "system",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMessage {
    pub sender: Sender,
    pub text: String,
}

/// Transcript of one team chat
#[derive(Debug, Clone, Serialize)]
pub struct TeamChat {
    pub id: String,
    pub request_id: String,
    pub teammate_name: String,
    #[serde(skip)]
    teammate_bio: String,
    pub messages: Vec<TeamMessage>,
}

impl TeamChat {
    /// Open a chat with the author of `request`
    pub fn open(id: impl Into<String>, request: &TeamRequest, opening: &str) -> Self {
        let mut chat = Self {
            id: id.into(),
            request_id: request.id.clone(),
            teammate_name: request.student_name.clone(),
            teammate_bio: request.bio.clone(),
            messages: Vec::new(),
        };
        chat.push(Sender::Me, opening);
        chat.push(
            Sender::System,
            format!(
                "Connection accepted! You are now chatting with {}.",
                request.student_name
            ),
        );
        chat
    }

    pub fn teammate_bio(&self) -> &str {
        &self.teammate_bio
    }

    pub fn push(&mut self, sender: Sender, text: impl Into<String>) {
        self.messages.push(TeamMessage {
            sender,
            text: text.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Transcript as `sender: text` lines
    pub fn history_lines(&self) -> Vec<String> {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.sender.as_str(), m.text))
            .collect()
    }

    /// Whether the facilitator should speak now.
    ///
    /// True when the transcript length is a multiple of `interval` and the
    /// last message did not come from the system.
    pub fn needs_facilitator(&self, interval: usize) -> bool {
        if interval == 0 {
            return false;
        }
        match self.messages.last() {
            Some(last) => self.messages.len() % interval == 0 && last.sender != Sender::System,
            None => false,
        }
    }
}

/// Reply from the simulated teammate, or a fallback line
pub async fn teammate_reply(
    service: &dyn ChatService,
    name: &str,
    bio: &str,
    message: &str,
    history: &[String],
) -> String {
    let prompt = teammate_prompt(name, bio, message, history);
    match service.send(&ChatContext::empty(), &prompt).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => TEAMMATE_EMPTY.to_string(),
        Err(e) => {
            warn!("Teammate reply failed: {}", e);
            TEAMMATE_FAILURE.to_string()
        }
    }
}

/// A facilitator question, or a fallback question
pub async fn facilitator_question(service: &dyn ChatService, history: &[String]) -> String {
    let prompt = facilitator_prompt(history);
    match service.send(&ChatContext::empty(), &prompt).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => FACILITATOR_EMPTY.to_string(),
        Err(e) => {
            warn!("Facilitator prompt failed: {}", e);
            FACILITATOR_FAILURE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::team::Curriculum;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Records prompts and answers with a fixed result
    struct Recorder {
        reply: Option<&'static str>,
        prompts: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn new(reply: Option<&'static str>) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatService for Recorder {
        async fn send(&self, context: &ChatContext, message: &str) -> Result<String> {
            assert!(context.system.is_none());
            assert!(context.history.is_empty());
            self.prompts.lock().unwrap().push(message.to_string());
            self.reply
                .map(str::to_string)
                .ok_or_else(|| Error::LlmApi("unavailable".to_string()))
        }
    }

    fn request() -> TeamRequest {
        TeamRequest {
            id: "req-1".to_string(),
            competition_id: "math-1".to_string(),
            student_name: "Alice Chen".to_string(),
            grade: "11".to_string(),
            curriculum: Curriculum::Ap,
            bio: "Strong in algebra".to_string(),
            contact: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_open() {
        let chat = TeamChat::open("chat-1", &request(), "Hi Alice!");
        assert_eq!(chat.len(), 2);
        assert_eq!(
            chat.history_lines(),
            vec![
                "me: Hi Alice!".to_string(),
                "system: Connection accepted! You are now chatting with Alice Chen.".to_string(),
            ]
        );
        assert_eq!(chat.teammate_bio(), "Strong in algebra");
    }

    #[test]
    fn test_needs_facilitator() {
        let mut chat = TeamChat::open("chat-1", &request(), "Hi");
        assert!(!chat.needs_facilitator(4));

        chat.push(Sender::Teammate, "Hey");
        assert!(!chat.needs_facilitator(4));

        chat.push(Sender::Me, "Let's practise");
        assert!(chat.needs_facilitator(4));

        chat.push(Sender::System, "What's your biggest strength?");
        assert!(!chat.needs_facilitator(4));

        // system message landing on a multiple of the interval
        let mut chat = TeamChat::open("chat-2", &request(), "Hi");
        chat.push(Sender::Teammate, "Hey");
        chat.push(Sender::System, "Question");
        assert!(!chat.needs_facilitator(4));
        assert!(!chat.needs_facilitator(0));
    }

    #[tokio::test]
    async fn test_teammate_reply() {
        let service = Recorder::new(Some(" Sure, let's meet Friday. "));
        let history = vec!["me: Hi".to_string()];
        let reply = teammate_reply(&service, "Alice Chen", "Strong in algebra", "Hi", &history).await;
        assert_eq!(reply, "Sure, let's meet Friday.");

        let prompts = service.prompts.lock().unwrap();
        assert!(prompts[0].contains("Alice Chen"));
        assert!(prompts[0].contains("me: Hi"));
    }

    #[tokio::test]
    async fn test_teammate_fallbacks() {
        let reply = teammate_reply(&Recorder::new(None), "A", "B", "Hi", &[]).await;
        assert_eq!(reply, TEAMMATE_FAILURE);

        let reply = teammate_reply(&Recorder::new(Some("")), "A", "B", "Hi", &[]).await;
        assert_eq!(reply, TEAMMATE_EMPTY);
    }

    #[tokio::test]
    async fn test_facilitator_fallbacks() {
        let history = vec!["me: hi".to_string()];
        let question = facilitator_question(&Recorder::new(Some("Night owl or early bird?")), &history).await;
        assert_eq!(question, "Night owl or early bird?");

        let question = facilitator_question(&Recorder::new(None), &history).await;
        assert_eq!(question, FACILITATOR_FAILURE);

        let question = facilitator_question(&Recorder::new(Some(" ")), &history).await;
        assert_eq!(question, FACILITATOR_EMPTY);
    }
}
