//! Shared helpers for asset integration tests.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};

/// Encode a solid-colour image of the given size in `format`.
pub fn solid_image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let buffer = ImageBuffer::from_pixel(width, height, Rgba([200u8, 30, 30, 255]));
    let image = DynamicImage::ImageRgba8(buffer);
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, format)
        .expect("test image should encode");
    out.into_inner()
}

#[allow(dead_code)]
pub fn solid_png_base64(width: u32, height: u32) -> String {
    STANDARD.encode(solid_image_bytes(width, height, ImageFormat::Png))
}

#[allow(dead_code)]
pub fn decoded_dimensions(base64: &str) -> (u32, u32) {
    let bytes = STANDARD.decode(base64).expect("valid base64");
    let image = image::load_from_memory(&bytes).expect("decodable image");
    (image.width(), image.height())
}
