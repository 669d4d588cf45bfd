//! Word-granular bit I/O.
//!
//! This module provides the bit channel the codec serializes through:
//! `BitWriter` and `BitReader` sessions layered over a caller-supplied
//! 64-bit word transport. Bits are packed LSB-first: the first bit written
//! lands in bit 0 of the first word, the 65th in bit 0 of the second word.
//!
//! # Transport Contract
//!
//! The host supplies the transport as a [`WordWrite`] or [`WordRead`]
//! implementation (usually by mutable reference). A transport failure is an
//! ordinary `Err`; the session that observes it latches a sticky fault and
//! refuses all further operations with [`BitIoError::Faulted`], so a caller
//! that only checks the result of a logical operation sequence can never
//! drive I/O past the first failure.
//!
//! # Sessions
//!
//! One session serves exactly one compress or decompress call and is
//! discarded afterward. Sessions are not thread-safe: accumulator, cursor,
//! and fault state belong to the one in-flight call that owns them.
//!
//! # Example
//! ```
//! use bitpress_core::bitio::{BitReader, BitWriter, WordCursor};
//!
//! let mut writer = BitWriter::new(Vec::new());
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_number(1000, 4).unwrap();
//! writer.flush().unwrap();
//!
//! let words = writer.into_inner();
//! let mut reader = BitReader::new(WordCursor::new(&words));
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_number(4).unwrap(), 1000);
//! ```

use crate::error::{BitIoError, Error, Result};
use std::io::{Read, Write};

/// Word sink capability: accept one 64-bit word.
pub trait WordWrite {
    fn write_word(&mut self, word: u64) -> Result<()>;
}

/// Word source capability: produce the next 64-bit word.
pub trait WordRead {
    fn read_word(&mut self) -> Result<u64>;
}

impl<T: WordWrite + ?Sized> WordWrite for &mut T {
    fn write_word(&mut self, word: u64) -> Result<()> {
        (**self).write_word(word)
    }
}

impl<T: WordRead + ?Sized> WordRead for &mut T {
    fn read_word(&mut self) -> Result<u64> {
        (**self).read_word()
    }
}

/// In-memory word sink. Never fails.
impl WordWrite for Vec<u64> {
    fn write_word(&mut self, word: u64) -> Result<()> {
        self.push(word);
        Ok(())
    }
}

/// Word source over a slice of words.
///
/// Reading past the end yields [`BitIoError::UnexpectedEof`].
#[derive(Debug, Clone)]
pub struct WordCursor<'a> {
    words: &'a [u64],
    pos: usize,
}

impl<'a> WordCursor<'a> {
    pub fn new(words: &'a [u64]) -> Self {
        Self { words, pos: 0 }
    }

    /// Number of words consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of words still available.
    pub fn remaining(&self) -> usize {
        self.words.len() - self.pos
    }
}

impl WordRead for WordCursor<'_> {
    fn read_word(&mut self) -> Result<u64> {
        let word = self
            .words
            .get(self.pos)
            .copied()
            .ok_or(BitIoError::UnexpectedEof)?;
        self.pos += 1;
        Ok(word)
    }
}

/// Word sink over any `std::io::Write`, one little-endian word per write.
pub struct IoWordWriter<W> {
    inner: W,
}

impl<W: Write> IoWordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> WordWrite for IoWordWriter<W> {
    fn write_word(&mut self, word: u64) -> Result<()> {
        self.inner.write_all(&word.to_le_bytes())?;
        Ok(())
    }
}

/// Word source over any `std::io::Read`, one little-endian word per read.
///
/// A short read surfaces as `Error::Io`; word streams are always a whole
/// number of 8-byte words.
pub struct IoWordReader<R> {
    inner: R,
}

impl<R: Read> IoWordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> WordRead for IoWordReader<R> {
    fn read_word(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.inner.read_exact(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }
}

/// Writes bits LSB-first into 64-bit words.
///
/// Bits accumulate in a word; a full accumulator is handed to the sink the
/// next time a bit is written, and [`flush`](BitWriter::flush) pushes out a
/// final zero-padded word. The only point where sink failure can surface is
/// a word hand-off; the session latches the first failure and every later
/// call returns [`BitIoError::Faulted`] without touching the sink.
#[derive(Debug)]
pub struct BitWriter<W> {
    sink: W,
    acc: u64,
    cursor: u32,
    written: u64,
    faulted: bool,
}

impl<W: WordWrite> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            acc: 0,
            cursor: 0,
            written: 0,
            faulted: false,
        }
    }

    fn guard(&self) -> Result<()> {
        if self.faulted {
            return Err(BitIoError::Faulted.into());
        }
        Ok(())
    }

    fn fail<T>(&mut self, err: Error) -> Result<T> {
        self.faulted = true;
        Err(err)
    }

    fn flush_word(&mut self) -> Result<()> {
        match self.sink.write_word(self.acc) {
            Ok(()) => {
                self.acc = 0;
                self.cursor = 0;
                self.written += 1;
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.guard()?;
        if self.cursor == 64 {
            self.flush_word()?;
        }
        if bit {
            self.acc |= 1u64 << self.cursor;
        }
        self.cursor += 1;
        Ok(())
    }

    /// Write the low `count` bits of `value`, least-significant first.
    ///
    /// # Errors
    /// `BitIoError::InvalidBitCount` if `count > 64`.
    pub fn write_bits(&mut self, value: u64, count: u32) -> Result<()> {
        self.guard()?;
        if count > 64 {
            return self.fail(BitIoError::InvalidBitCount(count).into());
        }
        let mut value = value;
        for _ in 0..count {
            self.write_bit(value & 1 != 0)?;
            value >>= 1;
        }
        Ok(())
    }

    /// Write an unbounded unsigned integer as `base`-bit chunks, each
    /// followed by one continuation bit (1 = more chunks, 0 = done).
    pub fn write_number(&mut self, value: u64, base: u32) -> Result<()> {
        self.guard()?;
        if base == 0 || base > 63 {
            return self.fail(BitIoError::InvalidBitCount(base).into());
        }
        let mut value = value;
        loop {
            self.write_bits(value, base)?;
            value >>= base;
            self.write_bit(value != 0)?;
            if value == 0 {
                return Ok(());
            }
        }
    }

    /// Write one word directly to the sink, bypassing the accumulator.
    ///
    /// Used for headers, before any bit is written. Raw words do not count
    /// toward [`words_written`](BitWriter::words_written).
    pub fn write_raw(&mut self, word: u64) -> Result<()> {
        self.guard()?;
        if let Err(err) = self.sink.write_word(word) {
            return self.fail(err);
        }
        Ok(())
    }

    /// Push any pending bits out as one final zero-padded word.
    pub fn flush(&mut self) -> Result<()> {
        self.guard()?;
        if self.cursor > 0 {
            self.flush_word()?;
        }
        Ok(())
    }

    /// Number of words flushed from the bit accumulator so far.
    pub fn words_written(&self) -> u64 {
        self.written
    }

    /// Whether the session has latched a failure.
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Reads bits LSB-first from 64-bit words.
///
/// Mirrors [`BitWriter`]: a fresh word is pulled whenever the cursor wraps
/// to 0, and the first source failure latches the session.
#[derive(Debug)]
pub struct BitReader<R> {
    source: R,
    acc: u64,
    cursor: u32,
    faulted: bool,
}

impl<R: WordRead> BitReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            acc: 0,
            cursor: 0,
            faulted: false,
        }
    }

    fn guard(&self) -> Result<()> {
        if self.faulted {
            return Err(BitIoError::Faulted.into());
        }
        Ok(())
    }

    fn fail<T>(&mut self, err: Error) -> Result<T> {
        self.faulted = true;
        Err(err)
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        self.guard()?;
        if self.cursor == 0 {
            match self.source.read_word() {
                Ok(word) => self.acc = word,
                Err(err) => return self.fail(err),
            }
        }
        let bit = (self.acc >> self.cursor) & 1 != 0;
        self.cursor = if self.cursor == 63 { 0 } else { self.cursor + 1 };
        Ok(bit)
    }

    /// Read `count` bits, least-significant first.
    ///
    /// # Errors
    /// `BitIoError::InvalidBitCount` if `count > 64`.
    pub fn read_bits(&mut self, count: u32) -> Result<u64> {
        self.guard()?;
        if count > 64 {
            return self.fail(BitIoError::InvalidBitCount(count).into());
        }
        let mut bits = 0u64;
        for i in 0..count {
            if self.read_bit()? {
                bits |= 1u64 << i;
            }
        }
        Ok(bits)
    }

    /// Read a number written by [`BitWriter::write_number`] with the same
    /// `base`.
    ///
    /// # Errors
    /// `BitIoError::NumberOverflow` if the encoding carries more than 64
    /// bits of magnitude (only corrupt streams do).
    pub fn read_number(&mut self, base: u32) -> Result<u64> {
        self.guard()?;
        if base == 0 || base > 63 {
            return self.fail(BitIoError::InvalidBitCount(base).into());
        }
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let chunk = self.read_bits(base)?;
            if shift < 64 {
                value |= chunk << shift;
                if shift > 0 && chunk >> (64 - shift) != 0 {
                    return self.fail(BitIoError::NumberOverflow.into());
                }
            } else if chunk != 0 {
                return self.fail(BitIoError::NumberOverflow.into());
            }
            shift = shift.saturating_add(base);
            if !self.read_bit()? {
                return Ok(value);
            }
        }
    }

    /// Read one word directly from the source, bypassing the accumulator.
    ///
    /// Used for headers, before any bit is read.
    pub fn read_raw(&mut self) -> Result<u64> {
        self.guard()?;
        match self.source.read_word() {
            Ok(word) => Ok(word),
            Err(err) => self.fail(err),
        }
    }

    /// Whether the session has latched a failure.
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Sink that refuses every word, counting how often it was asked.
    struct RefusingSink {
        calls: usize,
    }

    impl WordWrite for RefusingSink {
        fn write_word(&mut self, _word: u64) -> Result<()> {
            self.calls += 1;
            Err(std::io::Error::new(std::io::ErrorKind::Other, "sink refused").into())
        }
    }

    #[test]
    fn test_bits_pack_lsb_first() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0xAB, 8).unwrap();
        writer.flush().unwrap();

        // The low 8 bits of the value occupy the low 8 bits of the word.
        assert_eq!(writer.into_inner(), vec![0xAB]);
    }

    #[test]
    fn test_bit_by_bit_round_trip() {
        let pattern = [true, false, true, true, false, false, true, false];

        let mut writer = BitWriter::new(Vec::new());
        for &bit in &pattern {
            writer.write_bit(bit).unwrap();
        }
        writer.flush().unwrap();

        let words = writer.into_inner();
        let mut reader = BitReader::new(WordCursor::new(&words));
        for &expected in &pattern {
            assert_eq!(reader.read_bit().unwrap(), expected);
        }
    }

    #[test]
    fn test_word_boundary_crossing() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0x1FFF, 13).unwrap();
        writer.write_bits(0x123456789ABCDEF0, 64).unwrap();
        writer.flush().unwrap();

        let words = writer.into_inner();
        assert_eq!(words.len(), 2);

        let mut reader = BitReader::new(WordCursor::new(&words));
        assert_eq!(reader.read_bits(13).unwrap(), 0x1FFF);
        assert_eq!(reader.read_bits(64).unwrap(), 0x123456789ABCDEF0);
    }

    #[test]
    fn test_invalid_bit_count() {
        let mut writer = BitWriter::new(Vec::new());
        assert!(matches!(
            writer.write_bits(0, 65),
            Err(Error::BitIo(BitIoError::InvalidBitCount(65)))
        ));
    }

    #[test]
    fn test_number_wire_layout() {
        // 5 in base 3 is one chunk (101) plus a 0 continuation bit.
        let mut writer = BitWriter::new(Vec::new());
        writer.write_number(5, 3).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), vec![0b0101]);
    }

    #[test]
    fn test_number_round_trip() {
        let values = [0u64, 1, 2, 7, 8, 1000, 1023, 1024, u64::MAX / 3, u64::MAX];
        for base in 3..=8u32 {
            let mut writer = BitWriter::new(Vec::new());
            for &v in &values {
                writer.write_number(v, base).unwrap();
            }
            writer.flush().unwrap();

            let words = writer.into_inner();
            let mut reader = BitReader::new(WordCursor::new(&words));
            for &v in &values {
                assert_eq!(reader.read_number(base).unwrap(), v, "base {base}");
            }
        }
    }

    #[test]
    fn test_number_overflow_rejected() {
        // Nine nonzero 8-bit chunks claim 72 bits of magnitude.
        let mut writer = BitWriter::new(Vec::new());
        for _ in 0..8 {
            writer.write_bits(0xFF, 8).unwrap();
            writer.write_bit(true).unwrap();
        }
        writer.write_bits(0x01, 8).unwrap();
        writer.write_bit(false).unwrap();
        writer.flush().unwrap();

        let words = writer.into_inner();
        let mut reader = BitReader::new(WordCursor::new(&words));
        assert!(matches!(
            reader.read_number(8),
            Err(Error::BitIo(BitIoError::NumberOverflow))
        ));
    }

    #[test]
    fn test_flush_with_no_pending_bits() {
        let mut writer = BitWriter::new(Vec::new());
        writer.flush().unwrap();
        assert_eq!(writer.words_written(), 0);
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn test_raw_words_not_counted() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_raw(42).unwrap();
        writer.write_raw(10).unwrap();
        writer.write_bits(0b111, 3).unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.words_written(), 1);
        assert_eq!(writer.into_inner(), vec![42, 10, 0b111]);
    }

    #[test]
    fn test_sink_failure_latches() {
        let mut writer = BitWriter::new(RefusingSink { calls: 0 });
        // 64 bits fit in the accumulator without touching the sink.
        writer.write_bits(u64::MAX, 64).unwrap();
        // The 65th bit forces a hand-off, which fails.
        assert!(matches!(writer.write_bit(true), Err(Error::Io(_))));
        // Every later call short-circuits without another sink call.
        assert!(matches!(
            writer.write_bit(true),
            Err(Error::BitIo(BitIoError::Faulted))
        ));
        assert!(matches!(
            writer.flush(),
            Err(Error::BitIo(BitIoError::Faulted))
        ));
        assert!(writer.is_faulted());
        assert_eq!(writer.into_inner().calls, 1);
    }

    #[test]
    fn test_source_exhaustion_latches() {
        let words: Vec<u64> = vec![7];
        let mut reader = BitReader::new(WordCursor::new(&words));
        assert_eq!(reader.read_bits(64).unwrap(), 7);
        assert!(matches!(
            reader.read_bit(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
        assert!(matches!(
            reader.read_bit(),
            Err(Error::BitIo(BitIoError::Faulted))
        ));
        assert!(reader.is_faulted());
    }

    #[test]
    fn test_io_transports_round_trip() {
        let mut writer = IoWordWriter::new(Vec::new());
        writer.write_word(0xDEADBEEF).unwrap();
        writer.write_word(u64::MAX).unwrap();

        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), 16);

        let mut reader = IoWordReader::new(&bytes[..]);
        assert_eq!(reader.read_word().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_word().unwrap(), u64::MAX);
        assert!(matches!(reader.read_word(), Err(Error::Io(_))));
    }

    #[test]
    fn test_reader_wraps_across_words() {
        let mut writer = BitWriter::new(Vec::new());
        for i in 0..130u32 {
            writer.write_bit(i % 3 == 0).unwrap();
        }
        writer.flush().unwrap();

        let words = writer.into_inner();
        assert_eq!(words.len(), 3);

        let mut reader = BitReader::new(WordCursor::new(&words));
        for i in 0..130u32 {
            assert_eq!(reader.read_bit().unwrap(), i % 3 == 0, "bit {i}");
        }
    }
}
