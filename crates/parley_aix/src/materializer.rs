//! Image reference -> inline image part.

use std::sync::Arc;

use parley_assets::{AssetStore, ImageResizer, ResizeMode, ResizeRequest};
use parley_core::{DataRef, ImageRefPart, OutputPart, create_inline_image_part};
use parley_observability::asset_span;
use tracing::{Instrument, debug, warn};

use crate::config::{MODEL_IMAGE_RESCALE_MIMETYPE, MODEL_IMAGE_RESCALE_QUALITY};
use crate::error::MaterializeError;

/// What happened to the image on its way to the request.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeOutcome {
    /// No resize mode was asked for
    NotRequested,
    /// The image already fit the mode
    NotNeeded,
    Resized { width: u32, height: u32 },
    /// Resizing failed; the original bytes were used
    Failed { reason: String },
}

/// A successfully materialized image. Degraded results (a failed resize)
/// still land here; only unresolvable references are errors.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedImage {
    pub part: OutputPart,
    pub resize: ResizeOutcome,
}

pub struct ImageMaterializer {
    assets: Arc<dyn AssetStore>,
    resizer: Arc<dyn ImageResizer>,
    rescale_mime_type: String,
    rescale_quality: f32,
}

impl ImageMaterializer {
    pub fn new(assets: Arc<dyn AssetStore>, resizer: Arc<dyn ImageResizer>) -> Self {
        Self {
            assets,
            resizer,
            rescale_mime_type: MODEL_IMAGE_RESCALE_MIMETYPE.to_string(),
            rescale_quality: MODEL_IMAGE_RESCALE_QUALITY,
        }
    }

    pub fn with_rescale(mut self, mime_type: impl Into<String>, quality: f32) -> Self {
        self.rescale_mime_type = mime_type.into();
        self.rescale_quality = quality;
        self
    }

    /// Resolve `image` to inline bytes, resizing with `resize` if given.
    pub async fn materialize(
        &self,
        image: &ImageRefPart,
        resize: Option<ResizeMode>,
    ) -> Result<MaterializedImage, MaterializeError> {
        let asset_id = match &image.data_ref {
            // An empty id is still looked up and reported as not found.
            DataRef::Dblob {
                dblob_asset_id: Some(id),
                ..
            } => id.as_str(),
            other => {
                warn!(reftype = other.reftype(), "image reference is not supported");
                return Err(MaterializeError::UnsupportedReference {
                    reftype: other.reftype(),
                });
            }
        };

        let span = asset_span!(asset_id, "materialize");
        self.materialize_asset(asset_id, image.data_ref.mime_type(), resize)
            .instrument(span)
            .await
    }

    async fn materialize_asset(
        &self,
        asset_id: &str,
        fallback_mime_type: Option<&str>,
        resize: Option<ResizeMode>,
    ) -> Result<MaterializedImage, MaterializeError> {
        let Some(asset) = self.assets.get(asset_id).await? else {
            warn!(asset.id = %asset_id, "image asset not found");
            return Err(MaterializeError::AssetNotFound {
                asset_id: asset_id.to_string(),
            });
        };

        let mut mime_type = asset.data.mime_type;
        let mut base64 = asset.data.base64;

        let outcome = match resize {
            None => ResizeOutcome::NotRequested,
            Some(mode) => {
                let request = ResizeRequest {
                    mime_type: mime_type.clone(),
                    base64: base64.clone(),
                    mode,
                    target_mime_type: self.rescale_mime_type.clone(),
                    quality: self.rescale_quality,
                };
                match self.resizer.resize(request).await {
                    Ok(Some(resized)) => {
                        mime_type = resized.mime_type;
                        base64 = resized.base64;
                        ResizeOutcome::Resized {
                            width: resized.width,
                            height: resized.height,
                        }
                    }
                    Ok(None) => ResizeOutcome::NotNeeded,
                    // Resizing only saves bandwidth; keep the original.
                    Err(e) => {
                        debug!(mode = %mode, error = %e, "resize failed, using original image");
                        ResizeOutcome::Failed {
                            reason: e.to_string(),
                        }
                    }
                }
            }
        };

        if mime_type.is_empty() {
            mime_type = fallback_mime_type.unwrap_or_default().to_string();
        }

        debug!(mime = %mime_type, resize = ?outcome, "image materialized");

        Ok(MaterializedImage {
            part: create_inline_image_part(base64, mime_type),
            resize: outcome,
        })
    }
}
