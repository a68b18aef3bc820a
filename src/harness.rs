// src/harness.rs
//
// Decode/re-encode/decode round-trip harness built on top of chunk repair.
// This file is a facade over the modules in harness/

mod decoder;
mod encoder;
mod limits;
mod roundtrip;

pub use decoder::{decode_png, read_dimensions, PixelBounds};
pub use encoder::{encode_png, CompressionEffort};
pub use limits::{HarnessLimits, DEFAULT_MAX_PIXELS};
pub use roundtrip::{
    check_round_trip, decode_repaired, fuzz_one, fuzz_one_with_limits, run_round_trip,
    verify_round_trip, Verdict,
};
