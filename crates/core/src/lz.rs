//! Window-bounded LZ compressor and decompressor.
//!
//! A byte buffer is serialized as a header followed by a token stream,
//! written through a [`BitWriter`] bound to the caller's word sink and read
//! back through a [`BitReader`] bound to the caller's word source.
//!
//! # Wire Format
//!
//! ```text
//! +--------------------+
//! | header word 1      |  raw u64: original byte count
//! +--------------------+
//! | header word 2      |  raw u64: window_bits (valid range 10..=20)
//! +--------------------+
//! | token stream       |  bit-packed, LSB-first within 64-bit words:
//! |                    |    0  + 7 bits      literal byte < 0x80
//! |                    |    10 + 7 bits      literal byte >= 0x80
//! |                    |    11 + pos + len   back-reference, both numbers
//! |                    |                     variable-length in the
//! |                    |                     derived chunk base
//! +--------------------+
//! ```
//!
//! Flag bits are listed in wire order (first bit on the left). `pos` is the
//! backward distance in bytes, bounded by the window `2^window_bits`; `len`
//! is bounded only by the remaining input. The chunk base for the
//! variable-length numbers is `(window_bits - 4) / 2`, so larger windows
//! get wider per-chunk codes.
//!
//! There is no end-of-stream marker: both directions stop exactly at the
//! header's declared byte count, and the final partial word is zero-padded.
//!
//! # Match Search
//!
//! The compressor scans every candidate start in the open interval
//! `(i - window, i)` backward from the current position, with no auxiliary
//! index structure, keeping the longest run (nearest wins a tie). A match
//! is only emitted when it is longer than two bytes; shorter runs cost
//! more as a token than as literals.

use crate::bitio::{BitReader, BitWriter, WordCursor, WordRead, WordWrite};
use crate::error::{CodecError, Result};

/// Smallest accepted `window_bits`: a 1 KiB window.
pub const MIN_WINDOW_BITS: u8 = 10;

/// Largest accepted `window_bits`: a 1 MiB window.
pub const MAX_WINDOW_BITS: u8 = 20;

fn check_window_bits(window_bits: u8) -> Result<()> {
    if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&window_bits) {
        return Err(CodecError::WindowBitsOutOfRange(u64::from(window_bits)).into());
    }
    Ok(())
}

/// Chunk width for position/length codes, proportioned to the window.
fn number_base(window_bits: u8) -> u32 {
    u32::from(window_bits - 4) / 2
}

/// Write the two raw header words: byte count, then `window_bits`.
///
/// `window_bits` is validated before anything is written.
pub fn write_header<W: WordWrite>(
    writer: &mut BitWriter<W>,
    bytes: u64,
    window_bits: u8,
) -> Result<()> {
    check_window_bits(window_bits)?;
    writer.write_raw(bytes)?;
    writer.write_raw(u64::from(window_bits))
}

/// Read the two raw header words and validate `window_bits`.
pub fn read_header<R: WordRead>(reader: &mut BitReader<R>) -> Result<(u64, u8)> {
    let bytes = reader.read_raw()?;
    let window_bits = reader.read_raw()?;
    if window_bits < u64::from(MIN_WINDOW_BITS) || window_bits > u64::from(MAX_WINDOW_BITS) {
        return Err(CodecError::WindowBitsOutOfRange(window_bits).into());
    }
    Ok((bytes, window_bits as u8))
}

/// Compress `data` as a token stream through `writer`.
///
/// The header is not included; see [`compress_stream`] for the full
/// envelope. The writer is flushed once the last token is out.
pub fn compress<W: WordWrite>(
    writer: &mut BitWriter<W>,
    data: &[u8],
    window_bits: u8,
) -> Result<()> {
    check_window_bits(window_bits)?;
    let window = 1usize << window_bits;
    let base = number_base(window_bits);

    let mut i = 0usize;
    while i < data.len() {
        // Longest earlier run matching the bytes at `i`. Candidate starts
        // run backward over the open interval (i - window, i); the buffer
        // start itself is never a candidate.
        let mut len = 0usize;
        let mut pos = 0usize;
        if i >= 1 {
            let min_j = i.saturating_sub(window);
            let mut j = i - 1;
            while j > min_j {
                let limit = data.len() - i;
                let mut k = 0usize;
                while k < limit && data[j + k] == data[i + k] {
                    k += 1;
                }
                if k > len {
                    len = k;
                    pos = i - j;
                }
                j -= 1;
            }
        }
        if len > 2 {
            debug_assert!(0 < pos && pos < window);
            writer.write_bit(true)?;
            writer.write_bit(true)?;
            writer.write_number(pos as u64, base)?;
            writer.write_number(len as u64, base)?;
            i += len;
        } else {
            let b = data[i];
            if b < 0x80 {
                writer.write_bit(false)?;
                writer.write_bits(u64::from(b), 7)?;
            } else {
                // High-half literal: the dropped top bit is implied by the
                // flag pair.
                writer.write_bit(true)?;
                writer.write_bit(false)?;
                writer.write_bits(u64::from(b), 7)?;
            }
            i += 1;
        }
    }
    writer.flush()
}

/// Decompress `bytes` output bytes from the token stream on `reader`.
///
/// The header must already have been consumed; see [`decompress_stream`]
/// for the full envelope.
///
/// # Errors
/// `CodecError` variants for a corrupt token stream: a distance of zero,
/// at/beyond the window, or reaching before the produced output, a zero
/// or overrunning length. Nothing further is read once a token is
/// rejected.
pub fn decompress<R: WordRead>(
    reader: &mut BitReader<R>,
    bytes: usize,
    window_bits: u8,
) -> Result<Vec<u8>> {
    check_window_bits(window_bits)?;
    let window = 1u64 << window_bits;
    let base = number_base(window_bits);

    let mut out = Vec::with_capacity(bytes);
    while out.len() < bytes {
        if !reader.read_bit()? {
            let b = reader.read_bits(7)? as u8;
            out.push(b);
        } else if !reader.read_bit()? {
            let b = reader.read_bits(7)? as u8;
            out.push(b | 0x80);
        } else {
            let pos = reader.read_number(base)?;
            let len = reader.read_number(base)?;
            if pos == 0 || pos >= window {
                return Err(CodecError::InvalidDistance { pos, window }.into());
            }
            if len == 0 {
                return Err(CodecError::ZeroLengthMatch.into());
            }
            if pos > out.len() as u64 {
                return Err(CodecError::DistanceBeforeStart {
                    pos,
                    produced: out.len() as u64,
                }
                .into());
            }
            let remaining = (bytes - out.len()) as u64;
            if len > remaining {
                return Err(CodecError::RunPastEnd { run: len, remaining }.into());
            }
            let pos = pos as usize;
            // The source may overlap the bytes being produced (pos < len
            // is a legitimate repeated run), so copy strictly one byte at
            // a time.
            for _ in 0..len {
                let b = out[out.len() - pos];
                out.push(b);
            }
        }
    }
    Ok(out)
}

/// Write the full envelope: header, then compressed token stream.
pub fn compress_stream<W: WordWrite>(
    writer: &mut BitWriter<W>,
    data: &[u8],
    window_bits: u8,
) -> Result<()> {
    write_header(writer, data.len() as u64, window_bits)?;
    compress(writer, data, window_bits)
}

/// Read the full envelope: header, then compressed token stream.
pub fn decompress_stream<R: WordRead>(reader: &mut BitReader<R>) -> Result<Vec<u8>> {
    let (bytes, window_bits) = read_header(reader)?;
    let bytes = usize::try_from(bytes).map_err(|_| CodecError::LengthOverflow(bytes))?;
    decompress(reader, bytes, window_bits)
}

/// Compress `data` into an in-memory word buffer (header included).
pub fn compress_to_words(data: &[u8], window_bits: u8) -> Result<Vec<u64>> {
    let mut writer = BitWriter::new(Vec::new());
    compress_stream(&mut writer, data, window_bits)?;
    Ok(writer.into_inner())
}

/// Decompress an in-memory word buffer produced by [`compress_to_words`].
pub fn decompress_words(words: &[u64]) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(WordCursor::new(words));
    decompress_stream(&mut reader)
}
