use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use chrono::Utc;
use rand::seq::SliceRandom;
use serde::Serialize;

use super::respond;
use crate::models::{new_id, HealthMetrics};

pub const CHATBOT_REPLIES: [&str; 5] = [
    "Based on your medical history, I recommend consulting with your doctor about this symptom.",
    "Your next medicine dose is scheduled in 2 hours.",
    "According to your health data, your blood pressure has been stable this week.",
    "I've found some information about that medication. Would you like to know about side effects or dosage?",
    "Remember to stay hydrated, especially with your current medication regimen.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    /// Unix milliseconds.
    pub timestamp: i64,
}

impl ChatMessage {
    fn new(text: String, sender: Sender) -> Self {
        Self {
            id: new_id(),
            text,
            sender,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Which chat page the session backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Persona {
    /// Keyword rules over the live health metrics.
    Assistant,
    /// A random canned line.
    Chatbot,
}

impl Persona {
    pub fn greeting(self, display_name: Option<&str>) -> String {
        match self {
            Persona::Assistant => {
                let first_name = display_name
                    .and_then(|name| name.split_whitespace().next())
                    .unwrap_or("there");
                format!(
                    "Hello {first_name}! I'm your CUREXO health assistant. How can I help you today?"
                )
            }
            Persona::Chatbot => {
                "Hello! I'm your CUREXO health assistant. How can I help you today?".into()
            }
        }
    }

    pub fn reply(self, input: &str, metrics: &HealthMetrics) -> String {
        match self {
            Persona::Assistant => respond(input, metrics),
            Persona::Chatbot => CHATBOT_REPLIES
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(CHATBOT_REPLIES[0])
                .to_string(),
        }
    }
}

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// In-memory transcript of one chat page. Nothing here is persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    persona: Persona,
    #[serde(skip)]
    latency: Duration,
    messages: Vec<ChatMessage>,
    is_loading: bool,
    /// Distinct per transcript; a reply tagged with another one is stale.
    #[serde(skip)]
    generation: u64,
}

impl ChatSession {
    pub fn new(persona: Persona, latency: Duration, display_name: Option<&str>) -> Self {
        Self {
            persona,
            latency,
            messages: vec![ChatMessage::new(
                persona.greeting(display_name),
                Sender::Assistant,
            )],
            is_loading: false,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Appends the user's message and marks a reply as pending. Blank input
    /// is ignored.
    pub fn push_user(&mut self, text: &str) -> Option<ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }
        let message = ChatMessage::new(text.to_string(), Sender::User);
        self.messages.push(message.clone());
        self.is_loading = true;
        Some(message)
    }

    pub fn push_reply(&mut self, text: String) -> ChatMessage {
        let message = ChatMessage::new(text, Sender::Assistant);
        self.messages.push(message.clone());
        self.is_loading = false;
        message
    }

    /// Appends a reply computed for transcript `generation`. Dropped when the
    /// transcript has been replaced since.
    pub fn push_reply_for(&mut self, generation: u64, text: String) -> Option<ChatMessage> {
        if generation != self.generation {
            return None;
        }
        Some(self.push_reply(text))
    }

    /// Full exchange: user message, simulated latency, reply.
    #[cfg(test)]
    async fn send(&mut self, text: &str, metrics: &HealthMetrics) -> Option<ChatMessage> {
        self.push_user(text)?;
        let reply = self.persona.reply(text, metrics);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Some(self.push_reply(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_greets_by_first_name() {
        let session = ChatSession::new(Persona::Assistant, Duration::ZERO, Some("Jane Doe"));
        assert_eq!(session.messages().len(), 1);
        assert_eq!(
            session.messages()[0].text,
            "Hello Jane! I'm your CUREXO health assistant. How can I help you today?"
        );

        let anonymous = ChatSession::new(Persona::Assistant, Duration::ZERO, None);
        assert!(anonymous.messages()[0].text.starts_with("Hello there!"));
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut session = ChatSession::new(Persona::Chatbot, Duration::ZERO, None);
        assert!(session.send("   ", &HealthMetrics::default()).await.is_none());
        assert_eq!(session.messages().len(), 1);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn assistant_reply_follows_user_message() {
        let mut session = ChatSession::new(Persona::Assistant, Duration::ZERO, None);
        let reply = session
            .send("steps?", &HealthMetrics::default())
            .await
            .unwrap();

        assert!(reply.text.contains("6532"));
        let senders: Vec<Sender> = session.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::Assistant, Sender::User, Sender::Assistant]);
        assert!(!session.is_loading());
    }

    #[test]
    fn reply_for_a_replaced_transcript_is_dropped() {
        let mut old = ChatSession::new(Persona::Assistant, Duration::ZERO, None);
        old.push_user("steps?").unwrap();
        let pending = old.generation();

        let mut fresh = ChatSession::new(Persona::Assistant, Duration::ZERO, None);
        assert_ne!(fresh.generation(), pending);
        assert!(fresh.push_reply_for(pending, "late".into()).is_none());
        assert_eq!(fresh.messages().len(), 1);

        assert!(old.push_reply_for(pending, "on time".into()).is_some());
        assert!(!old.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn reply_waits_for_latency() {
        let mut session = ChatSession::new(Persona::Chatbot, Duration::from_millis(1000), None);
        let started = tokio::time::Instant::now();
        let reply = session.send("hello", &HealthMetrics::default()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert!(CHATBOT_REPLIES.contains(&reply.text.as_str()));
    }
}
