//! Conversation reducer: messages in, generation request out.

use std::sync::Arc;
use std::time::Instant;

use parley_assets::{AssetStore, ImageResizer};
use parley_core::{
    Fragment, GenerationRequest, Message, Part, Role, SystemMessage, TextPart, TurnRole,
    create_meta_reply_to_part,
};
use parley_observability::{conversion_span, record_duration, record_error};
use serde::Serialize;
use tracing::{Instrument, Span, debug, info};

use crate::config::ConvertConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Location};
use crate::error::Result;
use crate::materializer::ImageMaterializer;
use crate::turn_builder::TurnBuilder;

/// A request together with everything that was dropped on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOutput {
    pub request: GenerationRequest,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ConversationReducer {
    materializer: ImageMaterializer,
    config: ConvertConfig,
}

impl ConversationReducer {
    pub fn new(
        assets: Arc<dyn AssetStore>,
        resizer: Arc<dyn ImageResizer>,
        config: ConvertConfig,
    ) -> Self {
        let materializer = ImageMaterializer::new(assets, resizer)
            .with_rescale(config.rescale_mime_type.clone(), config.rescale_quality);
        Self {
            materializer,
            config,
        }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    pub async fn reduce(&self, messages: &[Message]) -> Result<GenerationRequest> {
        Ok(self.reduce_with_diagnostics(messages).await?.request)
    }

    /// Reduce `messages` and keep the diagnostics instead of only logging them.
    pub async fn reduce_with_diagnostics(&self, messages: &[Message]) -> Result<ConversionOutput> {
        let span = conversion_span!(messages.len());
        async move {
            let started = Instant::now();
            let result = self.run(messages).await;
            record_duration("duration_ms", started.elapsed());

            match &result {
                Ok(output) => {
                    Span::current().record("turns", output.request.chat_sequence.len());
                    info!(
                        turns = output.request.chat_sequence.len(),
                        diagnostics = output.diagnostics.len(),
                        "conversation reduced"
                    );
                }
                Err(e) => record_error(e),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, messages: &[Message]) -> Result<ConversionOutput> {
        let mut request = GenerationRequest::new();
        let mut diagnostics = Diagnostics::new();
        let builder = TurnBuilder::new(&self.materializer, &self.config);

        for (message_index, message) in messages.iter().enumerate() {
            match message.role {
                Role::System if message_index == 0 => {
                    request.system_message =
                        Some(system_preamble(message, &mut diagnostics));
                }
                Role::User => {
                    let mut turn = builder
                        .build(message_index, &message.fragments, TurnRole::User, &mut diagnostics)
                        .await?;
                    if let Some(reply_to) = message.in_reply_to_text() {
                        turn.parts.push(create_meta_reply_to_part(reply_to));
                    }
                    request.chat_sequence.push(turn);
                }
                Role::Assistant => {
                    let turn = builder
                        .build(message_index, &message.fragments, TurnRole::Model, &mut diagnostics)
                        .await?;
                    request.chat_sequence.push(turn);
                }
                role => diagnostics.record(
                    Location::message(message_index),
                    DiagnosticKind::UnexpectedRole { role },
                ),
            }
        }

        debug!(
            system = request.system_message.is_some(),
            turns = request.chat_sequence.len(),
            "request assembled"
        );

        Ok(ConversionOutput {
            request,
            diagnostics: diagnostics.into_vec(),
        })
    }
}

// Only text content goes into the preamble.
fn system_preamble(message: &Message, diagnostics: &mut Diagnostics) -> SystemMessage {
    let mut preamble = SystemMessage::default();

    for (fragment_index, fragment) in message.fragments.iter().enumerate() {
        match fragment {
            Fragment::Content {
                part: Part::Text { text },
                ..
            } => preamble.parts.push(TextPart::new(text.clone())),
            other => diagnostics.record(
                Location::fragment(0, fragment_index),
                DiagnosticKind::UnexpectedSystemFragment {
                    fragment: other.tag(),
                    part: other.part().map(Part::tag),
                },
            ),
        }
    }

    preamble
}

/// Reduce with the default [`ConvertConfig`].
pub async fn convert(
    messages: &[Message],
    assets: Arc<dyn AssetStore>,
    resizer: Arc<dyn ImageResizer>,
) -> Result<GenerationRequest> {
    ConversationReducer::new(assets, resizer, ConvertConfig::default())
        .reduce(messages)
        .await
}
