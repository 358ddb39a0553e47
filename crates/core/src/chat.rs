use serde::{Deserialize, Serialize};

/// Greeting the chat panel opens with before any turn has happened.
pub const GREETING: &str = "Hi! Ask me anything about this slide.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry in the chat log. Entries are append-only and never mutated
/// after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
}
