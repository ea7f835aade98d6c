//! Contact Message Model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::form::FieldError;
use crate::util::deserialize_id;

/// Message status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    Unread,
    Read,
    Archived,
}

impl MessageStatus {
    pub const ALL: [MessageStatus; 3] = [
        MessageStatus::Unread,
        MessageStatus::Read,
        MessageStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Unread => "unread",
            MessageStatus::Read => "read",
            MessageStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| FieldError::InvalidChoice(s.to_string()))
    }
}

/// Contact form message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Message {
    /// First `max_chars` characters, with an ellipsis when cut
    pub fn snippet(&self, max_chars: usize) -> String {
        let mut chars = self.message.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}…")
        } else {
            head
        }
    }

    /// Payload that keeps everything but the status
    pub fn fields_with_status(&self, status: MessageStatus) -> MessageFields {
        MessageFields {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            message: self.message.clone(),
            status,
        }
    }
}

impl Entity for Message {
    const TABLE: &'static str = "messages";
    type Fields = MessageFields;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create/update message payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageFields {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub status: MessageStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet() {
        let msg = Message {
            id: "1".into(),
            name: "Sam".into(),
            email: "sam@example.com".into(),
            phone: None,
            message: "Do you have appointments on Friday?".into(),
            status: MessageStatus::Unread,
            created_at: None,
        };
        assert_eq!(msg.snippet(6), "Do you…");
        assert_eq!(msg.snippet(100), "Do you have appointments on Friday?");
    }
}
