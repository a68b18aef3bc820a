// src/error.rs
//
// Unified error handling for png-fuzz-harness
// Uses thiserror for simple, type-safe error handling
//
// Error Taxonomy:
// - MalformedInput: structurally broken input, discard it
// - ResourceLimit: input exceeds a configured ceiling, discard it
// - InvariantViolation: decoded image failed to round trip (a real finding)

use std::borrow::Cow;
use thiserror::Error;

use crate::harness::{CompressionEffort, PixelBounds};

/// Error taxonomy used to decide between "skip this input" and "crash loudly".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input is too short, truncated or otherwise not decodable
    MalformedInput,
    /// Chunk length or pixel count over the configured ceiling
    ResourceLimit,
    /// A successfully decoded image could not be reproduced
    InvariantViolation,
}

/// png-fuzz-harness error types
#[derive(Debug, Error)]
pub enum HarnessError {
    // Chunk stream errors
    #[error("Input too short: {len} bytes, need at least {min} for the signature")]
    InputTooShort { len: usize, min: usize },

    #[error("Truncated chunk at offset {offset}")]
    TruncatedChunk { offset: u64 },

    #[error("Chunk length {len} exceeds maximum {max}")]
    ChunkTooLarge { len: u64, max: u64 },

    #[error("I/O error while reading chunk stream: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    // Decode Errors
    #[error("Failed to decode image: {message}")]
    DecodeFailed { message: Cow<'static, str> },

    // Size Limit Errors
    #[error("Image pixel count {pixels} exceeds maximum {max}")]
    PixelCountExceedsLimit { pixels: u64, max: u64 },

    // Round-trip Errors
    #[error("Failed to re-encode at {effort:?}: {message}")]
    EncodeFailed {
        effort: CompressionEffort,
        message: Cow<'static, str>,
    },

    #[error("Failed to decode re-encoded image ({effort:?}): {message}")]
    RoundTripDecodeFailed {
        effort: CompressionEffort,
        message: Cow<'static, str>,
    },

    #[error("Bounds changed after round trip at {effort:?}: before {before:?}, after {after:?}")]
    BoundsChanged {
        effort: CompressionEffort,
        before: PixelBounds,
        after: PixelBounds,
    },
}

// Constructor Helpers
impl HarnessError {
    pub fn input_too_short(len: usize, min: usize) -> Self {
        Self::InputTooShort { len, min }
    }

    pub fn truncated_chunk(offset: u64) -> Self {
        Self::TruncatedChunk { offset }
    }

    pub fn chunk_too_large(len: u64, max: u64) -> Self {
        Self::ChunkTooLarge { len, max }
    }

    pub fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }

    pub fn decode_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn pixel_count_exceeds_limit(pixels: u64, max: u64) -> Self {
        Self::PixelCountExceedsLimit { pixels, max }
    }

    pub fn encode_failed(effort: CompressionEffort, message: impl Into<Cow<'static, str>>) -> Self {
        Self::EncodeFailed {
            effort,
            message: message.into(),
        }
    }

    pub fn round_trip_decode_failed(
        effort: CompressionEffort,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::RoundTripDecodeFailed {
            effort,
            message: message.into(),
        }
    }

    pub fn bounds_changed(effort: CompressionEffort, before: PixelBounds, after: PixelBounds) -> Self {
        Self::BoundsChanged {
            effort,
            before,
            after,
        }
    }

    /// Check if the fuzz harness should discard the input instead of crashing.
    ///
    /// Consistent with category(): only InvariantViolation is fatal.
    pub fn is_skippable(&self) -> bool {
        match self.category() {
            ErrorCategory::MalformedInput | ErrorCategory::ResourceLimit => true,
            ErrorCategory::InvariantViolation => false,
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InputTooShort { .. }
            | Self::TruncatedChunk { .. }
            | Self::Io { .. }
            | Self::DecodeFailed { .. } => ErrorCategory::MalformedInput,

            // ChunkTooLarge bounds allocation on attacker-controlled lengths,
            // so it is a limit rather than a format error.
            Self::ChunkTooLarge { .. } | Self::PixelCountExceedsLimit { .. } => {
                ErrorCategory::ResourceLimit
            }

            Self::EncodeFailed { .. }
            | Self::RoundTripDecodeFailed { .. }
            | Self::BoundsChanged { .. } => ErrorCategory::InvariantViolation,
        }
    }
}

impl ErrorCategory {
    /// Get string representation of error category
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::MalformedInput => "MalformedInput",
            ErrorCategory::ResourceLimit => "ResourceLimit",
            ErrorCategory::InvariantViolation => "InvariantViolation",
        }
    }
}

// Result type alias
pub type Result<T> = std::result::Result<T, HarnessError>;
