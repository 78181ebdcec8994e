use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Encoded image bytes as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetData {
    /// May be empty when the store could not tell.
    pub mime_type: String,
    pub base64: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub data: AssetData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,
}

impl Asset {
    pub fn image(
        id: impl Into<String>,
        mime_type: impl Into<String>,
        base64: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            data: AssetData {
                mime_type: mime_type.into(),
                base64: base64.into(),
            },
            metadata: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Read-only lookup of binary assets by id.
///
/// `Ok(None)` means the store is healthy but has no such asset; `Err` is
/// reserved for the store itself failing.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn get(&self, asset_id: &str) -> Result<Option<Asset>>;
}

/// Asset store held entirely in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAssetStore {
    assets: HashMap<String, Asset>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset, keyed by its id. Returns `self` for chaining.
    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.insert(asset);
        self
    }

    pub fn insert(&mut self, asset: Asset) {
        self.assets.insert(asset.id.clone(), asset);
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn get(&self, asset_id: &str) -> Result<Option<Asset>> {
        Ok(self.assets.get(asset_id).cloned())
    }
}
