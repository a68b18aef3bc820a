// lib.rs
//
// png-fuzz-harness: keep mutated PNG inputs past CRC validation and check
// that whatever the decoder accepts survives an encode/decode round trip.
//
// - chunk: per-chunk CRC repair
// - harness: header check, decode, re-encode at every effort, compare bounds
// - error: skip-vs-fatal error taxonomy

pub mod chunk;
pub mod error;
pub mod harness;

pub use chunk::{fix_checksums, fix_checksums_with_limit, ChunkReader};
pub use error::{ErrorCategory, HarnessError, Result};
pub use harness::{fuzz_one, HarnessLimits, Verdict};
