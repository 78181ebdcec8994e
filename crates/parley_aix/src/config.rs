//! Conversion configuration

use parley_assets::ResizeMode;
use serde::{Deserialize, Serialize};

/// Mime type images are re-encoded to when resized.
pub const MODEL_IMAGE_RESCALE_MIMETYPE: &str = "image/webp";
/// Encoder quality used when resizing.
pub const MODEL_IMAGE_RESCALE_QUALITY: f32 = 0.90;

/// How images are prepared for each side of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Resize applied to images in user turns. `None` keeps the resolution
    /// the user picked when attaching the image.
    pub user_image_resize: Option<ResizeMode>,
    /// Resize applied to images in model turns
    pub model_image_resize: Option<ResizeMode>,
    /// Target mime type for resized images
    pub rescale_mime_type: String,
    /// Target quality for resized images, `0.0..=1.0`
    pub rescale_quality: f32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            user_image_resize: None,
            model_image_resize: Some(ResizeMode::OpenAiLowRes),
            rescale_mime_type: MODEL_IMAGE_RESCALE_MIMETYPE.to_string(),
            rescale_quality: MODEL_IMAGE_RESCALE_QUALITY,
        }
    }
}

/// Parse a resize setting: a mode name, or one of `none`/`off`/`false`.
/// Returns `None` for values that are neither.
pub fn parse_resize_setting(value: &str) -> Option<Option<ResizeMode>> {
    match value.trim().to_lowercase().as_str() {
        "" | "none" | "off" | "false" => Some(None),
        other => other.parse::<ResizeMode>().ok().map(Some),
    }
}

impl ConvertConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_image_resize(mut self, mode: Option<ResizeMode>) -> Self {
        self.user_image_resize = mode;
        self
    }

    pub fn with_model_image_resize(mut self, mode: Option<ResizeMode>) -> Self {
        self.model_image_resize = mode;
        self
    }

    pub fn with_rescale_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.rescale_mime_type = mime_type.into();
        self
    }

    pub fn with_rescale_quality(mut self, quality: f32) -> Self {
        self.rescale_quality = quality.clamp(0.0, 1.0);
        self
    }

    /// Load configuration from environment variables
    ///
    /// - `PARLEY_USER_IMAGE_RESIZE`
    /// - `PARLEY_MODEL_IMAGE_RESIZE`
    /// - `PARLEY_RESCALE_MIME`
    /// - `PARLEY_RESCALE_QUALITY`
    ///
    /// Unparseable values are ignored and the default kept.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(mode) = lookup("PARLEY_USER_IMAGE_RESIZE")
            .as_deref()
            .and_then(parse_resize_setting)
        {
            config.user_image_resize = mode;
        }

        if let Some(mode) = lookup("PARLEY_MODEL_IMAGE_RESIZE")
            .as_deref()
            .and_then(parse_resize_setting)
        {
            config.model_image_resize = mode;
        }

        if let Some(mime) = lookup("PARLEY_RESCALE_MIME") {
            let mime = mime.trim();
            if !mime.is_empty() {
                config.rescale_mime_type = mime.to_string();
            }
        }

        if let Some(quality) = lookup("PARLEY_RESCALE_QUALITY") {
            if let Ok(val) = quality.trim().parse::<f32>() {
                config = config.with_rescale_quality(val);
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConvertConfig::default();
        assert_eq!(config.user_image_resize, None);
        assert_eq!(config.model_image_resize, Some(ResizeMode::OpenAiLowRes));
        assert_eq!(config.rescale_mime_type, "image/webp");
        assert_eq!(config.rescale_quality, 0.90);
    }

    #[test]
    fn test_builder() {
        let config = ConvertConfig::new()
            .with_user_image_resize(Some(ResizeMode::Anthropic))
            .with_model_image_resize(None)
            .with_rescale_mime_type("image/jpeg")
            .with_rescale_quality(1.5);

        assert_eq!(config.user_image_resize, Some(ResizeMode::Anthropic));
        assert_eq!(config.model_image_resize, None);
        assert_eq!(config.rescale_mime_type, "image/jpeg");
        assert_eq!(config.rescale_quality, 1.0);
    }

    #[test]
    fn test_parse_resize_setting() {
        assert_eq!(parse_resize_setting("off"), Some(None));
        assert_eq!(parse_resize_setting(" None "), Some(None));
        assert_eq!(
            parse_resize_setting("google"),
            Some(Some(ResizeMode::Google))
        );
        assert_eq!(parse_resize_setting("gigantic"), None);
    }

    #[test]
    fn test_from_lookup() {
        let config = ConvertConfig::from_lookup(lookup_from(&[
            ("PARLEY_USER_IMAGE_RESIZE", "thumbnail-256"),
            ("PARLEY_MODEL_IMAGE_RESIZE", "false"),
            ("PARLEY_RESCALE_MIME", "image/png"),
            ("PARLEY_RESCALE_QUALITY", "0.5"),
        ]));

        assert_eq!(config.user_image_resize, Some(ResizeMode::Thumbnail256));
        assert_eq!(config.model_image_resize, None);
        assert_eq!(config.rescale_mime_type, "image/png");
        assert_eq!(config.rescale_quality, 0.5);
    }

    #[test]
    fn test_from_lookup_ignores_garbage() {
        let config = ConvertConfig::from_lookup(lookup_from(&[
            ("PARLEY_MODEL_IMAGE_RESIZE", "enormous"),
            ("PARLEY_RESCALE_MIME", "  "),
            ("PARLEY_RESCALE_QUALITY", "high"),
        ]));
        assert_eq!(config, ConvertConfig::default());
    }
}
