//! Folds one message's fragments into a turn.

use parley_assets::ResizeMode;
use parley_core::{Fragment, ImageRefPart, OutputPart, Part, Turn, TurnRole};

use crate::config::ConvertConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics, Location};
use crate::error::{ConvertError, Result};
use crate::materializer::{ImageMaterializer, ResizeOutcome};

pub struct TurnBuilder<'a> {
    materializer: &'a ImageMaterializer,
    config: &'a ConvertConfig,
}

impl<'a> TurnBuilder<'a> {
    pub fn new(materializer: &'a ImageMaterializer, config: &'a ConvertConfig) -> Self {
        Self {
            materializer,
            config,
        }
    }

    /// Build the turn for message `message_index`.
    ///
    /// Each fragment yields at most one part, in fragment order. Fails only
    /// if an image cannot be materialized.
    pub async fn build(
        &self,
        message_index: usize,
        fragments: &[Fragment],
        role: TurnRole,
        diagnostics: &mut Diagnostics,
    ) -> Result<Turn> {
        let mut turn = Turn::new(role);

        for (fragment_index, fragment) in fragments.iter().enumerate() {
            let Some(part) = fragment.part() else {
                continue;
            };
            if part.is_void() {
                continue;
            }

            let location = Location::fragment(message_index, fragment_index);
            let converted = match role {
                TurnRole::User => self.user_part(location, part, diagnostics).await?,
                TurnRole::Model => self.model_part(location, part, diagnostics).await?,
            };

            if let Some(converted) = converted {
                turn.parts.push(converted);
            }
        }

        Ok(turn)
    }

    async fn user_part(
        &self,
        location: Location,
        part: &Part,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<OutputPart>> {
        let converted = match part {
            Part::Text { text } => Some(OutputPart::text(text.clone())),
            // User images keep the resolution chosen at attach time unless
            // configured otherwise.
            Part::ImageRef(image) => Some(
                self.image_part(location, image, self.config.user_image_resize, diagnostics)
                    .await?,
            ),
            Part::Doc(doc) => Some(OutputPart::Doc(doc.clone())),
            // not user-authored
            Part::Error { .. } | Part::ToolCall(_) | Part::ToolResponse(_) => None,
            Part::Placeholder { .. } | Part::Sentinel => None,
            Part::Unknown => {
                diagnostics.record(
                    location,
                    DiagnosticKind::UnexpectedPart {
                        turn: TurnRole::User,
                        part: part.tag(),
                    },
                );
                None
            }
        };
        Ok(converted)
    }

    async fn model_part(
        &self,
        location: Location,
        part: &Part,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<OutputPart>> {
        let converted = match part {
            Part::Text { text } => Some(OutputPart::text(text.clone())),
            Part::ToolCall(call) if call.call.is_unknown() => {
                diagnostics.record(
                    location,
                    DiagnosticKind::UnknownToolShape {
                        turn: TurnRole::Model,
                        part: part.tag(),
                    },
                );
                None
            }
            Part::ToolCall(call) => Some(OutputPart::ToolCall(call.clone())),
            Part::Error { error } => Some(OutputPart::text(format!("[ERROR] {}", error))),
            Part::ImageRef(image) => Some(
                self.image_part(location, image, self.config.model_image_resize, diagnostics)
                    .await?,
            ),
            Part::Doc(_) | Part::ToolResponse(_) => {
                diagnostics.record(
                    location,
                    DiagnosticKind::UnimplementedPart {
                        turn: TurnRole::Model,
                        part: part.tag(),
                    },
                );
                None
            }
            Part::Placeholder { .. } | Part::Sentinel => None,
            Part::Unknown => {
                diagnostics.record(
                    location,
                    DiagnosticKind::UnexpectedPart {
                        turn: TurnRole::Model,
                        part: part.tag(),
                    },
                );
                None
            }
        };
        Ok(converted)
    }

    async fn image_part(
        &self,
        location: Location,
        image: &ImageRefPart,
        resize: Option<ResizeMode>,
        diagnostics: &mut Diagnostics,
    ) -> Result<OutputPart> {
        let materialized = self
            .materializer
            .materialize(image, resize)
            .await
            .map_err(|source| ConvertError::Image {
                message_index: location.message_index,
                fragment_index: location.fragment_index.unwrap_or_default(),
                source,
            })?;

        if let (Some(mode), ResizeOutcome::Failed { reason }) = (resize, &materialized.resize) {
            diagnostics.record(
                location,
                DiagnosticKind::ResizeSkipped {
                    mode,
                    reason: reason.clone(),
                },
            );
        }

        Ok(materialized.part)
    }
}
