//! Asset store over a flat directory: one file per asset, named
//! `<asset_id>.<ext>`. The mime type comes from the extension.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::asset::{Asset, AssetData, AssetStore};
use crate::error::{AssetError, Result};

#[derive(Debug, Clone)]
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the single file named `<asset_id>.<ext>`.
    ///
    /// Several files sharing the stem are an error rather than a pick that
    /// would depend on directory order.
    async fn find_file(&self, asset_id: &str) -> Result<Option<PathBuf>> {
        let mut matches = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let stem_matches = path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|s| s == asset_id);
            if stem_matches && entry.file_type().await?.is_file() {
                matches.push(path);
            }
        }

        if matches.len() > 1 {
            let mut candidates: Vec<String> = matches
                .iter()
                .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
                .collect();
            candidates.sort();
            return Err(AssetError::AmbiguousAssetId {
                asset_id: asset_id.to_string(),
                candidates,
            });
        }
        Ok(matches.pop())
    }

    /// Load one file as an asset with id `asset_id`.
    pub async fn load_file(asset_id: &str, path: &Path) -> Result<Asset> {
        let bytes = tokio::fs::read(path).await?;
        // Unknown extensions leave the mime empty so callers fall back to
        // whatever the reference declared.
        let mime_type = mime_guess::from_path(path)
            .first()
            .filter(|m| m.type_() == mime_guess::mime::IMAGE)
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();

        debug!(
            asset.id = %asset_id,
            path = %path.display(),
            bytes = bytes.len(),
            mime = %mime_type,
            "asset loaded"
        );

        let label = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(asset_id)
            .to_string();

        Ok(Asset {
            id: asset_id.to_string(),
            label,
            data: AssetData {
                mime_type,
                base64: STANDARD.encode(&bytes),
            },
            metadata: None,
        })
    }
}

fn check_asset_id(asset_id: &str) -> Result<()> {
    let bad = asset_id.is_empty()
        || asset_id.contains(['/', '\\'])
        || asset_id.starts_with('.');
    if bad {
        return Err(AssetError::InvalidAssetId(asset_id.to_string()));
    }
    Ok(())
}

#[async_trait]
impl AssetStore for DirAssetStore {
    async fn get(&self, asset_id: &str) -> Result<Option<Asset>> {
        check_asset_id(asset_id)?;

        let Some(path) = self.find_file(asset_id).await? else {
            debug!(asset.id = %asset_id, root = %self.root.display(), "asset file not found");
            return Ok(None);
        };

        Self::load_file(asset_id, &path).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_asset_id() {
        assert!(check_asset_id("abc-123").is_ok());
        assert!(check_asset_id("").is_err());
        assert!(check_asset_id("../etc/passwd").is_err());
        assert!(check_asset_id("a/b").is_err());
        assert!(check_asset_id(".hidden").is_err());
    }
}
