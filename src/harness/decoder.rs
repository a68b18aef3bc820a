// src/harness/decoder.rs
//
// Decoder operations: header-only and full PNG decode through the image crate.

use crate::error::{HarnessError, Result};
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;

/// Pixel region of a decoded image: origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelBounds {
    /// Images from the image crate always start at the origin.
    pub fn of(img: &DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

fn png_reader(data: &[u8]) -> ImageReader<Cursor<&[u8]>> {
    ImageReader::with_format(Cursor::new(data), ImageFormat::Png)
}

/// Read declared width/height from IHDR without decoding any pixel data.
pub fn read_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    png_reader(data)
        .into_dimensions()
        .map_err(|e| HarnessError::decode_failed(format!("png: failed to read header: {e}")))
}

/// Full decode of a PNG buffer.
pub fn decode_png(data: &[u8]) -> Result<DynamicImage> {
    png_reader(data)
        .decode()
        .map_err(|e| HarnessError::decode_failed(format!("png: decode failed: {e}")))
}
