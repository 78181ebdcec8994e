//! Error types for asset lookups and image resizing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    /// The id cannot name an asset (empty, or contains path components)
    #[error("invalid asset id: {0}")]
    InvalidAssetId(String),

    /// Several files share the asset id as their stem
    #[error("ambiguous asset id {asset_id}: {candidates:?}")]
    AmbiguousAssetId {
        asset_id: String,
        candidates: Vec<String>,
    },

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("unsupported target mime type: {0}")]
    UnsupportedFormat(String),

    #[error("resize failed: {0}")]
    Resize(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AssetError>;
