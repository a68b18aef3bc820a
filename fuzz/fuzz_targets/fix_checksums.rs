#![no_main]

//! Fuzz target for chunk CRC repair on its own.
//! Accepted inputs must keep their length and be a fixed point of a second pass.

use libfuzzer_sys::fuzz_target;
use png_fuzz_harness::fix_checksums;

fuzz_target!(|data: &[u8]| {
    let Ok(once) = fix_checksums(data) else {
        return;
    };
    assert!(once.len() >= data.len());
    assert_eq!(&once[..8], &data[..8]);

    let twice = fix_checksums(&once).expect("repaired stream must parse again");
    assert_eq!(once, twice);
});
