//! Soft failures recorded while converting.
//!
//! A diagnostic never stops the conversion: the offending element is dropped
//! and the event is logged at `warn` and kept for the caller.

use parley_assets::ResizeMode;
use parley_core::{Role, TurnRole};
use serde::Serialize;
use tracing::warn;

/// Position of an element in the source conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub message_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment_index: Option<usize>,
}

impl Location {
    pub fn message(message_index: usize) -> Self {
        Self {
            message_index,
            fragment_index: None,
        }
    }

    pub fn fragment(message_index: usize, fragment_index: usize) -> Self {
        Self {
            message_index,
            fragment_index: Some(fragment_index),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.fragment_index {
            Some(fragment) => write!(f, "message {}, fragment {}", self.message_index, fragment),
            None => write!(f, "message {}", self.message_index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// System message fragment that is not a text content fragment
    UnexpectedSystemFragment {
        fragment: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        part: Option<&'static str>,
    },
    /// Part tag the converter does not know for this side
    UnexpectedPart { turn: TurnRole, part: &'static str },
    /// Known part kind with no conversion for this side yet
    UnimplementedPart { turn: TurnRole, part: &'static str },
    /// Tool call or response whose `ctype`/`rtype` is not recognized
    UnknownToolShape { turn: TurnRole, part: &'static str },
    /// Message role other than a leading system, user or assistant
    UnexpectedRole { role: Role },
    /// Image sent at its original size because the resize failed
    ResizeSkipped { mode: ResizeMode, reason: String },
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::UnexpectedSystemFragment { fragment, part } => match part {
                Some(part) => write!(f, "unexpected system fragment: {} ({})", fragment, part),
                None => write!(f, "unexpected system fragment: {}", fragment),
            },
            DiagnosticKind::UnexpectedPart { turn, part } => {
                write!(f, "unexpected {:?} part type: {}", turn, part)
            }
            DiagnosticKind::UnimplementedPart { turn, part } => {
                write!(f, "{} part not implemented for {:?} turns", part, turn)
            }
            DiagnosticKind::UnknownToolShape { turn, part } => {
                write!(f, "{} with unrecognized tool shape in {:?} turn", part, turn)
            }
            DiagnosticKind::UnexpectedRole { role } => {
                write!(f, "unexpected message role: {}", role)
            }
            DiagnosticKind::ResizeSkipped { mode, reason } => {
                write!(f, "image resize ({}) skipped: {}", mode, reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    #[serde(flatten)]
    pub location: Location,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.kind)
    }
}

/// Accumulates diagnostics for one conversion.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, location: Location, kind: DiagnosticKind) {
        warn!(
            message_index = location.message_index,
            fragment_index = ?location.fragment_index,
            "{}",
            kind
        );
        self.items.push(Diagnostic { location, kind });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
