//! Shared helpers for conversion integration tests.

use std::io::Cursor;
use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use parley_assets::{Asset, InMemoryAssetStore};
use parley_core::Conversation;

pub fn png_base64(width: u32, height: u32) -> String {
    let buffer = ImageBuffer::from_pixel(width, height, Rgba([40u8, 90, 160, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(buffer)
        .write_to(&mut out, ImageFormat::Png)
        .expect("test image should encode");
    STANDARD.encode(out.into_inner())
}

pub fn dimensions(base64: &str) -> (u32, u32) {
    let bytes = STANDARD.decode(base64).expect("valid base64");
    let image = image::load_from_memory(&bytes).expect("decodable image");
    (image.width(), image.height())
}

pub fn load_fixture(name: &str) -> Conversation {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let json = std::fs::read_to_string(&path).expect("fixture should exist");
    Conversation::from_json(&json).expect("fixture should parse")
}

/// Store holding the two images the fixture conversation references.
pub fn fixture_store() -> InMemoryAssetStore {
    InMemoryAssetStore::new()
        .with_asset(Asset::image("sketch", "image/png", png_base64(300, 200)))
        .with_asset(Asset::image("photo", "image/png", png_base64(1024, 768)))
}
