//! `parley resize`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use parley_aix::{MODEL_IMAGE_RESCALE_MIMETYPE, MODEL_IMAGE_RESCALE_QUALITY};
use parley_assets::{DirAssetStore, ImageCrateResizer, ImageResizer, ResizeMode, ResizeRequest};

use crate::output;

pub async fn handle(
    image: &Path,
    mode: ResizeMode,
    target: Option<String>,
    out: Option<PathBuf>,
) -> Result<()> {
    let asset_id = image
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("{} has no usable file name", image.display()))?;
    // Same mime detection as `convert --assets`, but on the exact file given.
    let asset = DirAssetStore::load_file(asset_id, image)
        .await
        .with_context(|| format!("failed to read {}", image.display()))?;
    if asset.data.mime_type.is_empty() {
        return Err(anyhow!("{} is not a recognized image type", image.display()));
    }

    let request = ResizeRequest {
        mime_type: asset.data.mime_type.clone(),
        base64: asset.data.base64,
        mode,
        target_mime_type: target.unwrap_or_else(|| MODEL_IMAGE_RESCALE_MIMETYPE.to_string()),
        quality: MODEL_IMAGE_RESCALE_QUALITY,
    };

    let Some(resized) = ImageCrateResizer::new().resize(request).await? else {
        output::success(&format!("{} already fits {}", image.display(), mode));
        return Ok(());
    };

    output::success(&format!("resized with {}", mode));
    output::kv("size", &format!("{}x{}", resized.width, resized.height));
    output::kv("mime", &resized.mime_type);

    if let Some(path) = out {
        let bytes = STANDARD.decode(&resized.base64)?;
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        output::kv("written", &path.display().to_string());
    }
    Ok(())
}
