//! Error types for the bitpress codec.
//!
//! All operations return structured errors rather than panicking.
//! A corrupt or truncated input stream must never take the library down;
//! it surfaces as a typed error the caller can report.

use thiserror::Error;

/// Top-level error type for all operations in the library.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: moving bits through the word channel
/// - Codec: header validation and token-stream validation
/// - Heap: frequency-heap construction and update preconditions
/// - I/O: word transports backed by files or other std I/O
#[derive(Debug, Error)]
pub enum Error {
    /// Bit channel operation failed (e.g., reading past the last word)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Codec failure (invalid header parameter or corrupt token stream)
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Frequency heap precondition failure
    #[error("frequency heap error: {0}")]
    Heap(#[from] HeapError),

    /// Word transport I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bit channel errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// The word source ran out before the requested bits were read
    #[error("unexpected end of word stream")]
    UnexpectedEof,

    /// Requested a bit count outside what one 64-bit word can hold
    #[error("invalid bit count: {0}")]
    InvalidBitCount(u32),

    /// A variable-length number decoded to more than 64 bits of magnitude
    #[error("variable-length number wider than 64 bits")]
    NumberOverflow,

    /// The session latched a previous failure; no further I/O is attempted
    #[error("channel already failed, operation skipped")]
    Faulted,
}

/// Codec errors: invalid parameters and corrupt token streams.
#[derive(Debug, Error)]
pub enum CodecError {
    /// `window_bits` outside the supported range
    #[error("window bits {0} outside supported range 10..=20")]
    WindowBitsOutOfRange(u64),

    /// Decoded match distance of zero or at/beyond the window size
    #[error("match distance {pos} outside window (1..{window})")]
    InvalidDistance { pos: u64, window: u64 },

    /// Decoded match length of zero
    #[error("match length is zero")]
    ZeroLengthMatch,

    /// Decoded match distance reaching before the start of the output
    #[error("match distance {pos} reaches before output start ({produced} bytes produced)")]
    DistanceBeforeStart { pos: u64, produced: u64 },

    /// Decoded match run extending past the declared byte count
    #[error("match run of {run} exceeds the {remaining} remaining declared bytes")]
    RunPastEnd { run: u64, remaining: u64 },

    /// Declared byte count does not fit in this platform's address space
    #[error("declared byte count {0} exceeds addressable memory")]
    LengthOverflow(u64),
}

/// Frequency heap errors.
#[derive(Debug, Error)]
pub enum HeapError {
    /// Alphabet size must be a power of two greater than 2
    #[error("alphabet size {0} is not a power of two greater than 2")]
    InvalidAlphabet(usize),

    /// Symbol id outside the configured alphabet
    #[error("symbol {symbol} outside alphabet of {alphabet}")]
    SymbolOutOfRange { symbol: usize, alphabet: usize },

    /// Symbol added twice; the table tracks one live leaf per symbol
    #[error("symbol {0} already added")]
    DuplicateSymbol(usize),

    /// Node storage is full
    #[error("heap capacity of {capacity} nodes exhausted")]
    CapacityExhausted { capacity: usize },

    /// Frequency bump for a symbol that was never added
    #[error("symbol {0} was never added")]
    UnknownSymbol(usize),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
