//! bitpress-core: window-bounded LZ compression over a word-granular bit
//! channel, with an incremental frequency heap for prefix-code statistics.
//!
//! This library provides the core pieces of a small compression system:
//! - Serializes byte buffers as literal/back-reference token streams
//!   bounded by a configurable sliding window
//! - Moves every bit through 64-bit words supplied by caller-owned word
//!   transports (in-memory buffers or std I/O)
//! - Tracks symbol frequencies incrementally and derives root-to-leaf
//!   prefix-code paths from the heap layout
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `bitio`: word transports and bit-granular reader/writer sessions
//! - `lz`: header and token-stream compressor/decompressor
//! - `heap`: incremental frequency heap with code-path derivation
//!
//! The heap is an independent statistics structure: it feeds a prefix-code
//! assignment step and has no call dependency on the codec.
//!
//! # Design Principles
//!
//! - **No panics**: corrupt streams and bad parameters surface as typed
//!   errors, never aborts
//! - **Sticky failure**: a bit channel that fails once refuses all further
//!   I/O, so errors cannot be driven past
//! - **Bounded state**: the heap has fixed capacity, the codec a bounded
//!   window; one session serves one call
//! - **Checkable invariants**: the heap's `verify` is an ordinary function
//!   available to tests in any build

pub mod bitio;
pub mod error;
pub mod heap;
pub mod lz;

// Re-export commonly used types
pub use error::{Error, Result};
