//! parley-aix: reduces a chat conversation into a generation request.
//!
//! ## Pipeline
//!
//! ```text
//! [Message] ──► ConversationReducer ──► GenerationRequest
//!                     │                   { systemMessage?, chatSequence }
//!                     ▼
//!                TurnBuilder (per user/assistant message)
//!                     │
//!                     ▼
//!              ImageMaterializer ──► AssetStore
//!                                └─► ImageResizer
//! ```
//!
//! A missing or unsupported image reference fails the whole conversion.
//! Anything else the reducer cannot use is dropped and reported as a
//! [`Diagnostic`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use parley_aix::{ConversationReducer, ConvertConfig};
//! use parley_assets::{ImageCrateResizer, InMemoryAssetStore};
//! use parley_core::Message;
//!
//! # async fn run() -> parley_aix::Result<()> {
//! let reducer = ConversationReducer::new(
//!     Arc::new(InMemoryAssetStore::new()),
//!     Arc::new(ImageCrateResizer::new()),
//!     ConvertConfig::from_env(),
//! );
//! let messages = vec![Message::system().with_text("be brief"), Message::user().with_text("hi")];
//! let request = reducer.reduce(&messages).await?;
//! assert_eq!(request.chat_sequence.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod materializer;
pub mod reducer;
pub mod turn_builder;


pub use config::{ConvertConfig, MODEL_IMAGE_RESCALE_MIMETYPE, MODEL_IMAGE_RESCALE_QUALITY};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Location};
pub use error::{ConvertError, MaterializeError, Result};
pub use materializer::{ImageMaterializer, MaterializedImage, ResizeOutcome};
pub use reducer::{ConversationReducer, ConversionOutput, convert};
pub use turn_builder::TurnBuilder;
