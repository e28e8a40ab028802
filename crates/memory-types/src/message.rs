//! Chat message type.
//!
//! Messages are exchanged between the user and the assistant and may reference
//! the memories they were generated from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSender {
    /// Assistant
    Ai,
    /// End user
    Human,
}

impl std::fmt::Display for MessageSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageSender::Ai => write!(f, "ai"),
            MessageSender::Human => write!(f, "human"),
        }
    }
}

/// Kind of message content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Plain chat text
    #[default]
    Text,
    /// Generated recap of a day's memories
    DaySummary,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier
    pub id: String,

    /// Message body
    pub text: String,

    pub created_at: DateTime<Utc>,

    pub sender: MessageSender,

    #[serde(rename = "type", default)]
    pub message_type: MessageType,

    /// App that produced the message, if not the default assistant
    #[serde(default)]
    pub app_id: Option<String>,

    /// Memories referenced by this message
    #[serde(default)]
    pub memory_ids: Vec<String>,
}

impl Message {
    /// Create a plain text message
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
        sender: MessageSender,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            created_at,
            sender,
            message_type: MessageType::Text,
            app_id: None,
            memory_ids: Vec::new(),
        }
    }

    pub fn with_type(mut self, message_type: MessageType) -> Self {
        self.message_type = message_type;
        self
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Set the referenced memories
    pub fn with_memory_ids(mut self, memory_ids: Vec<String>) -> Self {
        self.memory_ids = memory_ids;
        self
    }
}
