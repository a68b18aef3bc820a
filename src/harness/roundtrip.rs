// src/harness/roundtrip.rs
//
// The fuzz iteration itself:
// 1. Repair chunk CRCs so mutations survive integrity checks
// 2. Header-only decode, reject oversized geometry
// 3. Full decode
// 4. For every compression effort: encode, decode, compare bounds
//
// Failures in 1-3 mean "uninteresting input". Failures in 4 mean the decoder
// accepted an image the encoder/decoder pair cannot reproduce, which is the
// bug class this harness hunts for.

use crate::chunk::fix_checksums_with_limit;
use crate::error::{HarnessError, Result};
use crate::harness::decoder::{decode_png, read_dimensions, PixelBounds};
use crate::harness::encoder::{encode_png, CompressionEffort};
use crate::harness::limits::HarnessLimits;
use image::DynamicImage;
use tracing::{debug, error};

/// Feedback for the fuzz engine about one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Input was rejected before the round trip; discard it
    Skip,
    /// Input decoded and survived every round trip; worth keeping in the corpus
    Interesting,
}

/// Repair, size-check and fully decode `data`.
pub fn decode_repaired(data: &[u8], limits: &HarnessLimits) -> Result<DynamicImage> {
    let fixed = fix_checksums_with_limit(data, limits.max_chunk_len)?;
    let (width, height) = read_dimensions(&fixed)?;
    limits.enforce_pixels(width, height)?;
    decode_png(&fixed)
}

/// Re-encode `img` at every effort and check that the bounds survive each time.
///
/// Returns the bounds shared by the original and every round-tripped image.
pub fn verify_round_trip(img: &DynamicImage) -> Result<PixelBounds> {
    let before = PixelBounds::of(img);
    for effort in CompressionEffort::ALL {
        let encoded = encode_png(img, effort)?;
        let decoded = decode_png(&encoded)
            .map_err(|e| HarnessError::round_trip_decode_failed(effort, e.to_string()))?;
        let after = PixelBounds::of(&decoded);
        if after != before {
            return Err(HarnessError::bounds_changed(effort, before, after));
        }
    }
    Ok(before)
}

/// Full check without any skip/crash policy applied: every error is returned.
pub fn check_round_trip(data: &[u8], limits: &HarnessLimits) -> Result<PixelBounds> {
    let img = decode_repaired(data, limits)?;
    verify_round_trip(&img)
}

/// Run one iteration, turning skippable errors into `Verdict::Skip`.
///
/// Invariant violations are still returned as `Err`.
pub fn run_round_trip(data: &[u8], limits: &HarnessLimits) -> Result<Verdict> {
    match check_round_trip(data, limits) {
        Ok(_) => Ok(Verdict::Interesting),
        Err(err) if err.is_skippable() => {
            debug!(
                target: "png_fuzz_harness::skip",
                category = err.category().as_str(),
                reason = %err,
                input_len = data.len(),
                "input skipped"
            );
            Ok(Verdict::Skip)
        }
        Err(err) => Err(err),
    }
}

/// Fuzz entry point with the default limits.
///
/// Panics when a decoded image fails to round trip.
pub fn fuzz_one(data: &[u8]) -> Verdict {
    fuzz_one_with_limits(data, &HarnessLimits::fuzzing())
}

/// Fuzz entry point with explicit limits.
///
/// Panics when a decoded image fails to round trip.
pub fn fuzz_one_with_limits(data: &[u8], limits: &HarnessLimits) -> Verdict {
    verdict_or_panic(run_round_trip(data, limits))
}

fn verdict_or_panic(result: Result<Verdict>) -> Verdict {
    match result {
        Ok(verdict) => verdict,
        Err(err) => {
            error!(
                target: "png_fuzz_harness::roundtrip",
                category = err.category().as_str(),
                "round trip invariant violated"
            );
            panic!("{err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Luma, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode_png(img: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn rgb_png(width: u32, height: u32) -> Vec<u8> {
        encode_png(DynamicImage::ImageRgb8(RgbImage::from_fn(
            width,
            height,
            |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]),
        )))
    }

    /// Byte offset of the CRC field of the first chunk with the given type.
    fn crc_offset(png: &[u8], chunk_type: &[u8; 4]) -> usize {
        let mut pos = 8;
        loop {
            let len = u32::from_be_bytes(png[pos..pos + 4].try_into().unwrap()) as usize;
            if &png[pos + 4..pos + 8] == chunk_type {
                return pos + 8 + len;
            }
            pos += 12 + len;
        }
    }

    #[test]
    fn test_valid_png_is_interesting() {
        let png = rgb_png(16, 8);
        assert_eq!(fuzz_one(&png), Verdict::Interesting);
        let bounds = check_round_trip(&png, &HarnessLimits::default()).unwrap();
        assert_eq!((bounds.width, bounds.height), (16, 8));
    }

    #[test]
    fn test_corrupted_checksums_are_repaired_before_decode() {
        let mut png = rgb_png(5, 5);
        for chunk_type in [b"IHDR", b"IDAT", b"IEND"] {
            let at = crc_offset(&png, chunk_type);
            png[at] ^= 0xFF;
        }
        assert!(decode_png(&png).is_err());
        assert_eq!(fuzz_one(&png), Verdict::Interesting);
    }

    #[test]
    fn test_pixel_cap_skips_before_full_decode() {
        let png = rgb_png(40, 30);
        let limits = HarnessLimits::default().with_max_pixels(1199);
        let err = check_round_trip(&png, &limits).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::PixelCountExceedsLimit {
                pixels: 1200,
                max: 1199
            }
        ));
        assert_eq!(fuzz_one_with_limits(&png, &limits), Verdict::Skip);
        assert_eq!(
            fuzz_one_with_limits(&png, &limits.with_max_pixels(1200)),
            Verdict::Interesting
        );
    }

    #[test]
    fn test_malformed_inputs_are_skipped() {
        assert_eq!(fuzz_one(&[]), Verdict::Skip);
        assert_eq!(fuzz_one(b"\x89PNG"), Verdict::Skip);
        assert_eq!(fuzz_one(b"\x89PNG\r\n\x1a\n"), Verdict::Skip);

        let png = rgb_png(4, 4);
        assert_eq!(fuzz_one(&png[..png.len() - 20]), Verdict::Skip);
    }

    #[test]
    fn test_chunk_ceiling_comes_from_limits() {
        let png = rgb_png(4, 4);
        let limits = HarnessLimits::default().with_max_chunk_len(8);
        let err = check_round_trip(&png, &limits).unwrap_err();
        assert!(matches!(err, HarnessError::ChunkTooLarge { max: 8, .. }));
        assert_eq!(run_round_trip(&png, &limits).unwrap(), Verdict::Skip);
    }

    #[test]
    fn test_verify_round_trip_grayscale() {
        let img = DynamicImage::ImageLuma8(image::ImageBuffer::from_pixel(3, 11, Luma([200u8])));
        let bounds = verify_round_trip(&img).unwrap();
        assert_eq!(
            bounds,
            PixelBounds {
                x: 0,
                y: 0,
                width: 3,
                height: 11
            }
        );
    }

    #[test]
    #[should_panic(expected = "Bounds changed after round trip at BestSpeed")]
    fn test_invariant_violation_panics() {
        let err = HarnessError::bounds_changed(
            CompressionEffort::BestSpeed,
            PixelBounds {
                x: 0,
                y: 0,
                width: 1,
                height: 1,
            },
            PixelBounds {
                x: 0,
                y: 0,
                width: 1,
                height: 2,
            },
        );
        verdict_or_panic(Err(err));
    }

    #[test]
    fn test_verdicts_pass_through() {
        assert_eq!(verdict_or_panic(Ok(Verdict::Skip)), Verdict::Skip);
        assert_eq!(verdict_or_panic(Ok(Verdict::Interesting)), Verdict::Interesting);
    }
}
