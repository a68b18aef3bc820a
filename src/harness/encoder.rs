// src/harness/encoder.rs
//
// PNG re-encoding at each compression effort the round trip covers.

use crate::error::{HarnessError, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;

/// Encoder effort settings exercised by every round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionEffort {
    Default,
    NoCompression,
    BestSpeed,
    BestCompression,
}

impl CompressionEffort {
    /// Round-trip order: the default first, then from cheapest to most expensive.
    pub const ALL: [CompressionEffort; 4] = [
        CompressionEffort::Default,
        CompressionEffort::NoCompression,
        CompressionEffort::BestSpeed,
        CompressionEffort::BestCompression,
    ];

    /// Map onto the image crate's PNG encoder knobs.
    ///
    /// Every effort filters adaptively except NoCompression, which writes
    /// stored deflate blocks over unfiltered scanlines.
    pub fn png_params(self) -> (CompressionType, FilterType) {
        match self {
            CompressionEffort::Default => (CompressionType::Default, FilterType::Adaptive),
            CompressionEffort::NoCompression => (CompressionType::Uncompressed, FilterType::NoFilter),
            CompressionEffort::BestSpeed => (CompressionType::Level(1), FilterType::Adaptive),
            CompressionEffort::BestCompression => (CompressionType::Best, FilterType::Adaptive),
        }
    }
}

/// Encode `img` as PNG at the given effort.
pub fn encode_png(img: &DynamicImage, effort: CompressionEffort) -> Result<Vec<u8>> {
    let (compression, filter) = effort.png_params();
    let mut buf = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buf, compression, filter);
    img.write_with_encoder(encoder)
        .map_err(|e| HarnessError::encode_failed(effort, format!("PNG encode failed: {e}")))?;
    Ok(buf)
}
