//! Image re-encoding under named resize policies.
//!
//! A resize is an optimization: callers are expected to fall back to the
//! original bytes whenever it fails.

use std::io::Cursor;
use std::str::FromStr;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AssetError, Result};

/// Named target resolution for images sent to a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeMode {
    /// Fit within 512x512.
    #[serde(rename = "openai-low-res")]
    OpenAiLowRes,
    /// Fit within 2048x2048, then shortest side at most 768.
    #[serde(rename = "openai-high-res")]
    OpenAiHighRes,
    /// Fit within 3072x3072.
    #[serde(rename = "google")]
    Google,
    /// Fit within 1568x1568.
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "thumbnail-128")]
    Thumbnail128,
    #[serde(rename = "thumbnail-256")]
    Thumbnail256,
}

impl ResizeMode {
    pub const ALL: [ResizeMode; 6] = [
        ResizeMode::OpenAiLowRes,
        ResizeMode::OpenAiHighRes,
        ResizeMode::Google,
        ResizeMode::Anthropic,
        ResizeMode::Thumbnail128,
        ResizeMode::Thumbnail256,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeMode::OpenAiLowRes => "openai-low-res",
            ResizeMode::OpenAiHighRes => "openai-high-res",
            ResizeMode::Google => "google",
            ResizeMode::Anthropic => "anthropic",
            ResizeMode::Thumbnail128 => "thumbnail-128",
            ResizeMode::Thumbnail256 => "thumbnail-256",
        }
    }

    /// Dimensions to resize to, or `None` if the image already fits.
    pub fn target_dimensions(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width == 0 || height == 0 {
            return None;
        }
        match self {
            ResizeMode::OpenAiLowRes => fit_within(width, height, 512, 512),
            ResizeMode::OpenAiHighRes => {
                let (w, h) = fit_within(width, height, 2048, 2048).unwrap_or((width, height));
                let shortest = w.min(h);
                let (w, h) = if shortest > 768 {
                    scaled(w, h, 768.0 / shortest as f64)
                } else {
                    (w, h)
                };
                ((w, h) != (width, height)).then_some((w, h))
            }
            ResizeMode::Google => fit_within(width, height, 3072, 3072),
            ResizeMode::Anthropic => fit_within(width, height, 1568, 1568),
            ResizeMode::Thumbnail128 => fit_within(width, height, 128, 128),
            ResizeMode::Thumbnail256 => fit_within(width, height, 256, 256),
        }
    }
}

fn scaled(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = (width as f64 * scale).round().max(1.0) as u32;
    let h = (height as f64 * scale).round().max(1.0) as u32;
    (w, h)
}

fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> Option<(u32, u32)> {
    if width <= max_w && height <= max_h {
        return None;
    }
    let scale = (max_w as f64 / width as f64).min(max_h as f64 / height as f64);
    Some(scaled(width, height, scale))
}

impl FromStr for ResizeMode {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        ResizeMode::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| AssetError::Resize(format!("unknown resize mode '{}'", s)))
    }
}

impl std::fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeRequest {
    pub mime_type: String,
    pub base64: String,
    pub mode: ResizeMode,
    pub target_mime_type: String,
    /// Encoder quality in `0.0..=1.0`; only lossy encoders use it.
    pub quality: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizedImage {
    pub mime_type: String,
    pub base64: String,
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait ImageResizer: Send + Sync {
    /// Re-encode the image if `mode` requires it.
    ///
    /// Returns `Ok(None)` when the image already fits the mode.
    async fn resize(&self, request: ResizeRequest) -> Result<Option<ResizedImage>>;
}

/// Resizer backed by the `image` crate. Decoding, scaling and encoding run
/// on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateResizer;

impl ImageCrateResizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageResizer for ImageCrateResizer {
    async fn resize(&self, request: ResizeRequest) -> Result<Option<ResizedImage>> {
        tokio::task::spawn_blocking(move || resize_blocking(&request))
            .await
            .map_err(|e| AssetError::Resize(format!("resize task failed: {}", e)))?
    }
}

fn decode(mime_type: &str, bytes: &[u8]) -> Result<DynamicImage> {
    let image = match ImageFormat::from_mime_type(mime_type) {
        Some(format) => image::load_from_memory_with_format(bytes, format)?,
        None => ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()?,
    };
    Ok(image)
}

fn encode(image: &DynamicImage, target_mime_type: &str, quality: f32) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match target_mime_type {
        // The webp encoder is lossless, so quality does not apply.
        "image/webp" => {
            DynamicImage::ImageRgba8(image.to_rgba8())
                .write_with_encoder(WebPEncoder::new_lossless(&mut buf))?;
        }
        "image/jpeg" => {
            let q = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
            DynamicImage::ImageRgb8(image.to_rgb8())
                .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, q))?;
        }
        "image/png" => {
            DynamicImage::ImageRgba8(image.to_rgba8())
                .write_with_encoder(PngEncoder::new(&mut buf))?;
        }
        other => return Err(AssetError::UnsupportedFormat(other.to_string())),
    }
    Ok(buf)
}

fn resize_blocking(request: &ResizeRequest) -> Result<Option<ResizedImage>> {
    let bytes = STANDARD.decode(request.base64.as_bytes())?;
    let image = decode(&request.mime_type, &bytes)?;
    let (width, height) = image.dimensions();

    let Some((new_w, new_h)) = request.mode.target_dimensions(width, height) else {
        debug!(mode = %request.mode, width, height, "image already within bounds");
        return Ok(None);
    };

    let resized = image.resize_exact(new_w, new_h, FilterType::Lanczos3);
    let encoded = encode(&resized, &request.target_mime_type, request.quality)?;

    debug!(
        mode = %request.mode,
        from = %format!("{}x{}", width, height),
        to = %format!("{}x{}", new_w, new_h),
        bytes_in = bytes.len(),
        bytes_out = encoded.len(),
        "image resized"
    );

    Ok(Some(ResizedImage {
        mime_type: request.target_mime_type.clone(),
        base64: STANDARD.encode(&encoded),
        width: new_w,
        height: new_h,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_mode_round_trip_names() {
        for mode in ResizeMode::ALL {
            assert_eq!(mode.as_str().parse::<ResizeMode>().unwrap(), mode);
        }
        assert_eq!("OPENAI-LOW-RES".parse::<ResizeMode>().unwrap(), ResizeMode::OpenAiLowRes);
        assert!("huge".parse::<ResizeMode>().is_err());
    }

    #[test]
    fn test_resize_mode_serde() {
        let json = serde_json::to_string(&ResizeMode::Thumbnail256).unwrap();
        assert_eq!(json, "\"thumbnail-256\"");
    }

    #[test]
    fn test_low_res_dimensions() {
        assert_eq!(ResizeMode::OpenAiLowRes.target_dimensions(400, 300), None);
        assert_eq!(ResizeMode::OpenAiLowRes.target_dimensions(512, 512), None);
        assert_eq!(
            ResizeMode::OpenAiLowRes.target_dimensions(1024, 600),
            Some((512, 300))
        );
        assert_eq!(
            ResizeMode::OpenAiLowRes.target_dimensions(600, 1200),
            Some((256, 512))
        );
    }

    #[test]
    fn test_high_res_dimensions() {
        // fits 2048 but shortest side exceeds 768
        assert_eq!(
            ResizeMode::OpenAiHighRes.target_dimensions(2000, 1000),
            Some((1536, 768))
        );
        // first fit to 2048x2048, then shortest side to 768
        assert_eq!(
            ResizeMode::OpenAiHighRes.target_dimensions(4096, 4096),
            Some((768, 768))
        );
        assert_eq!(ResizeMode::OpenAiHighRes.target_dimensions(1024, 700), None);
    }

    #[test]
    fn test_degenerate_dimensions() {
        assert_eq!(ResizeMode::Thumbnail128.target_dimensions(0, 500), None);
        assert_eq!(
            ResizeMode::Thumbnail128.target_dimensions(10_000, 1),
            Some((128, 1))
        );
    }

    #[test]
    fn test_encode_unsupported_target() {
        let image = DynamicImage::new_rgb8(4, 4);
        let err = encode(&image, "image/tiff", 0.9).unwrap_err();
        assert!(matches!(err, AssetError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_resize_blocking_rejects_bad_base64() {
        let request = ResizeRequest {
            mime_type: "image/png".to_string(),
            base64: "not base64!".to_string(),
            mode: ResizeMode::OpenAiLowRes,
            target_mime_type: "image/webp".to_string(),
            quality: 0.9,
        };
        assert!(matches!(
            resize_blocking(&request),
            Err(AssetError::Base64(_))
        ));
    }
}
