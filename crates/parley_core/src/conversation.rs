use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::message::{Message, Role};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { id: None, messages }
    }

    /// Parse either a bare message array or an object with `messages`.
    ///
    /// The shape is picked from the first token so serde's error (field,
    /// line, column) reaches the caller unchanged.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim_start().starts_with('[') {
            Ok(Self::new(serde_json::from_str(json)?))
        } else {
            Ok(serde_json::from_str(json)?)
        }
    }

    /// Check that a system message, if any, is the first message.
    pub fn validate(&self) -> Result<()> {
        let misplaced = self
            .messages
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, m)| m.role == Role::System);

        match misplaced {
            Some((index, _)) => Err(CoreError::InvalidConversation(format!(
                "system message at position {}",
                index
            ))),
            None => Ok(()),
        }
    }

    pub fn has_system_message(&self) -> bool {
        self.messages
            .first()
            .is_some_and(|m| m.role == Role::System)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
