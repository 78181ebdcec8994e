//! Conversion error types.
//!
//! Only image materialization can fail a conversion. Everything else that
//! goes wrong is a [`Diagnostic`](crate::diagnostics::Diagnostic).

use parley_assets::AssetError;
use thiserror::Error;

/// Fatal image materialization failures.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// Reference is not a `dblob`, or has no asset id
    #[error("unsupported image reference (reftype '{reftype}')")]
    UnsupportedReference { reftype: &'static str },

    #[error("image asset not found: {asset_id}")]
    AssetNotFound { asset_id: String },

    #[error("asset store error: {0}")]
    AssetStore(#[from] AssetError),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("message {message_index}, fragment {fragment_index}: {source}")]
    Image {
        message_index: usize,
        fragment_index: usize,
        #[source]
        source: MaterializeError,
    },
}

impl ConvertError {
    /// The materialization failure behind this error.
    pub fn materialize_error(&self) -> &MaterializeError {
        match self {
            ConvertError::Image { source, .. } => source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_reference_message() {
        let err = MaterializeError::UnsupportedReference { reftype: "url" };
        assert_eq!(err.to_string(), "unsupported image reference (reftype 'url')");
    }

    #[test]
    fn test_convert_error_carries_location() {
        let err = ConvertError::Image {
            message_index: 3,
            fragment_index: 1,
            source: MaterializeError::AssetNotFound {
                asset_id: "a9".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "message 3, fragment 1: image asset not found: a9"
        );
        assert!(matches!(
            err.materialize_error(),
            MaterializeError::AssetNotFound { .. }
        ));
    }

    #[test]
    fn test_asset_store_error_from() {
        let err = MaterializeError::from(AssetError::InvalidAssetId("..".to_string()));
        assert_eq!(err.to_string(), "asset store error: invalid asset id: ..");
    }
}
