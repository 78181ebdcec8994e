//! The normalized generation request handed to an inference backend.

use serde::{Deserialize, Serialize};

use crate::fragment::{DocPart, ToolCallPart};

/// A plain text part. Serializes with its `pt` tag so it reads the same
/// inside a system message as inside a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pt", rename = "text")]
pub struct TextPart {
    pub text: String,
}

impl TextPart {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pt", rename_all = "snake_case")]
pub enum OutputPart {
    Text {
        text: String,
    },
    InlineImage {
        #[serde(rename = "mimeType")]
        mime_type: String,
        base64: String,
    },
    Doc(DocPart),
    ToolCall(ToolCallPart),
    /// Synthetic part telling the model which earlier text the user replied to.
    MetaInReplyTo {
        #[serde(rename = "replyTo")]
        reply_to: String,
    },
}

impl OutputPart {
    pub fn text(text: impl Into<String>) -> Self {
        OutputPart::Text { text: text.into() }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            OutputPart::Text { .. } => "text",
            OutputPart::InlineImage { .. } => "inline_image",
            OutputPart::Doc(_) => "doc",
            OutputPart::ToolCall(_) => "tool_call",
            OutputPart::MetaInReplyTo { .. } => "meta_in_reply_to",
        }
    }
}

impl From<TextPart> for OutputPart {
    fn from(part: TextPart) -> Self {
        OutputPart::Text { text: part.text }
    }
}

pub fn create_inline_image_part(
    base64: impl Into<String>,
    mime_type: impl Into<String>,
) -> OutputPart {
    OutputPart::InlineImage {
        mime_type: mime_type.into(),
        base64: base64.into(),
    }
}

pub fn create_meta_reply_to_part(reply_to: impl Into<String>) -> OutputPart {
    OutputPart::MetaInReplyTo {
        reply_to: reply_to.into(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub parts: Vec<OutputPart>,
}

impl Turn {
    pub fn new(role: TurnRole) -> Self {
        Self {
            role,
            parts: Vec::new(),
        }
    }

    pub fn user() -> Self {
        Self::new(TurnRole::User)
    }

    pub fn model() -> Self {
        Self::new(TurnRole::Model)
    }

    pub fn with_part(mut self, part: OutputPart) -> Self {
        self.parts.push(part);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemMessage {
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_message: Option<SystemMessage>,
    pub chat_sequence: Vec<Turn>,
}

impl GenerationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the system preamble, parts joined by blank lines.
    pub fn system_text(&self) -> Option<String> {
        self.system_message.as_ref().map(|s| {
            s.parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n")
        })
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
