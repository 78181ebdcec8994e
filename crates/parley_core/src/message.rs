use serde::{Deserialize, Serialize};

use crate::fragment::{Fragment, Part};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    /// Any role this crate does not know about. Kept so that messages from
    /// newer producers still deserialize and can be dropped downstream.
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_text: Option<String>,
}

/// One chat message as produced by the chat store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default = "new_message_id")]
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub fragments: Vec<Fragment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

fn new_message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Message {
    pub fn new(role: Role) -> Self {
        Self {
            id: new_message_id(),
            role,
            fragments: Vec::new(),
            metadata: None,
        }
    }

    pub fn system() -> Self {
        Self::new(Role::System)
    }

    pub fn user() -> Self {
        Self::new(Role::User)
    }

    pub fn assistant() -> Self {
        Self::new(Role::Assistant)
    }

    pub fn with_fragment(mut self, fragment: Fragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    /// Append a content fragment carrying `part`.
    pub fn with_part(self, part: Part) -> Self {
        self.with_fragment(Fragment::content(part))
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_part(Part::text(text))
    }

    pub fn with_reply_to(mut self, text: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(MessageMetadata::default)
            .in_reply_to_text = Some(text.into());
        self
    }

    /// Reply-to text, if the message carries a non-empty one.
    pub fn in_reply_to_text(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.in_reply_to_text.as_deref())
            .filter(|t| !t.is_empty())
    }
}
