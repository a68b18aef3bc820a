// src/harness/limits.rs
//
// Resource ceilings for a single fuzz iteration and their enforcement helpers.

use crate::chunk::DEFAULT_MAX_CHUNK_LEN;
use crate::error::HarnessError;

/// Default cap on width * height before the full decode.
/// Bounds per-iteration latency only; PNG itself allows far larger images.
pub const DEFAULT_MAX_PIXELS: u64 = 1_000_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessLimits {
    /// Ceiling on a chunk's declared length plus its 4-byte type tag
    pub max_chunk_len: u64,
    /// Ceiling on declared width * height
    pub max_pixels: u64,
}

impl Default for HarnessLimits {
    fn default() -> Self {
        Self {
            max_chunk_len: DEFAULT_MAX_CHUNK_LEN,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

impl HarnessLimits {
    /// Limits used by the fuzz targets.
    pub fn fuzzing() -> Self {
        Self::default()
    }

    /// Keep the chunk ceiling but let any declared geometry through to the decoder.
    pub fn unbounded_pixels() -> Self {
        Self {
            max_pixels: u64::MAX,
            ..Self::default()
        }
    }

    pub fn with_max_chunk_len(mut self, max_chunk_len: u64) -> Self {
        self.max_chunk_len = max_chunk_len;
        self
    }

    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    pub fn enforce_pixels(&self, width: u32, height: u32) -> Result<(), HarnessError> {
        let pixels = width as u64 * height as u64;
        if pixels > self.max_pixels {
            return Err(HarnessError::pixel_count_exceeds_limit(
                pixels,
                self.max_pixels,
            ));
        }
        Ok(())
    }
}
