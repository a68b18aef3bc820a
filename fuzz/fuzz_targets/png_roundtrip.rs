#![no_main]

//! Fuzz target for the PNG decode/encode/decode round trip.
//! CRCs are repaired first so mutations reach the decoder; any input that
//! decodes but fails to round trip panics inside fuzz_one.

use libfuzzer_sys::{fuzz_target, Corpus};
use png_fuzz_harness::{fuzz_one, Verdict};

fuzz_target!(|data: &[u8]| -> Corpus {
    match fuzz_one(data) {
        Verdict::Interesting => Corpus::Keep,
        Verdict::Skip => Corpus::Reject,
    }
});
