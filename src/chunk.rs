// src/chunk.rs
//
// Chunk stream re-checksumming.
//
// A PNG file is an 8-byte signature followed by chunks laid out as
// [length: u32 BE][type: 4 bytes][payload: length bytes][crc: u32 BE].
// The fuzzer mutates bytes freely, which almost always breaks a CRC and gets
// the input rejected before any interesting decoder code runs. fix_checksums
// rewrites every CRC from the chunk's actual bytes and leaves everything
// else untouched.

use crate::error::{HarnessError, Result};
use flate2::Crc;
use std::io::{Cursor, ErrorKind, Read};
use tracing::trace;

/// Length of the PNG file signature.
pub const SIGNATURE_LEN: usize = 8;

/// Default ceiling on `declared length + 4` (type tag included).
pub const DEFAULT_MAX_CHUNK_LEN: u64 = 1 << 20;

const LENGTH_FIELD_LEN: usize = 4;
const TYPE_TAG_LEN: u64 = 4;
const CRC_FIELD_LEN: u64 = 4;

/// CRC-32 (IEEE) over a chunk body, i.e. type tag followed by payload.
pub fn chunk_checksum(body: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(body);
    crc.sum()
}

/// Reads length-prefixed chunk bodies from a byte stream.
///
/// The reader is positioned right after the signature, or right after a
/// previous chunk's CRC. It never consumes the CRC itself; call
/// [`ChunkReader::skip_checksum`] after each body.
pub struct ChunkReader<R> {
    inner: R,
    max_chunk_len: u64,
    offset: u64,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(inner: R, max_chunk_len: u64) -> Self {
        Self {
            inner,
            max_chunk_len,
            offset: 0,
        }
    }

    /// Bytes consumed from the underlying reader so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read the next chunk body (type tag + payload).
    ///
    /// Returns `Ok(None)` when the stream ends exactly on a chunk boundary.
    /// A partial length field or a short body is a `TruncatedChunk` error.
    pub fn read_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        let chunk_start = self.offset;
        let mut length = [0u8; LENGTH_FIELD_LEN];
        match self.fill(&mut length)? {
            0 => return Ok(None),
            LENGTH_FIELD_LEN => {}
            _ => return Err(HarnessError::truncated_chunk(chunk_start)),
        }

        // u64 so a declared length near u32::MAX cannot wrap under the ceiling
        let body_len = u64::from(u32::from_be_bytes(length)) + TYPE_TAG_LEN;
        if body_len > self.max_chunk_len {
            return Err(HarnessError::chunk_too_large(body_len, self.max_chunk_len));
        }

        let mut body = vec![0u8; body_len as usize];
        if self.fill(&mut body)? != body.len() {
            return Err(HarnessError::truncated_chunk(chunk_start));
        }
        Ok(Some(body))
    }

    /// Skip over the stale CRC that follows a chunk body.
    ///
    /// Running out of input here is fine: the next `read_chunk` reports a
    /// clean end of stream.
    pub fn skip_checksum(&mut self) -> Result<()> {
        let skipped = std::io::copy(
            &mut (&mut self.inner).take(CRC_FIELD_LEN),
            &mut std::io::sink(),
        )
        .map_err(HarnessError::io)?;
        self.offset += skipped;
        Ok(())
    }

    /// Read until `buf` is full or the stream ends. Returns bytes read.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HarnessError::io(e)),
            }
        }
        self.offset += filled as u64;
        Ok(filled)
    }
}

/// Recompute every chunk CRC using the default 1 MiB chunk ceiling.
pub fn fix_checksums(data: &[u8]) -> Result<Vec<u8>> {
    fix_checksums_with_limit(data, DEFAULT_MAX_CHUNK_LEN)
}

/// Recompute every chunk CRC.
///
/// Output is byte-identical to the input except that each CRC field is
/// replaced with one computed from that chunk's type tag and payload. The
/// signature is copied without being checked.
pub fn fix_checksums_with_limit(data: &[u8], max_chunk_len: u64) -> Result<Vec<u8>> {
    if data.len() < SIGNATURE_LEN {
        return Err(HarnessError::input_too_short(data.len(), SIGNATURE_LEN));
    }

    let mut out = Vec::with_capacity(data.len() + CRC_FIELD_LEN as usize);
    out.extend_from_slice(&data[..SIGNATURE_LEN]);

    let mut reader = ChunkReader::new(Cursor::new(&data[SIGNATURE_LEN..]), max_chunk_len);
    while let Some(body) = reader.read_chunk()? {
        let declared = (body.len() as u64 - TYPE_TAG_LEN) as u32;
        let crc = chunk_checksum(&body);
        trace!(
            target: "png_fuzz_harness::chunk",
            chunk_type = %String::from_utf8_lossy(&body[..TYPE_TAG_LEN as usize]),
            length = declared,
            crc,
            "rewrote chunk checksum"
        );

        out.extend_from_slice(&declared.to_be_bytes());
        out.extend_from_slice(&body);
        out.extend_from_slice(&crc.to_be_bytes());
        reader.skip_checksum()?;
    }

    Ok(out)
}
