//! Run statistics for the demo pipeline.
//!
//! Collected explicitly at each stage and printed at the end. This is a
//! single-threaded demo; no synchronization.

use std::time::Duration;

/// Sizes and timings for one compress/expand/verify run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Bytes of raw input
    pub input_bytes: u64,

    /// Total output words (header + payload)
    pub output_words: u64,

    /// Configured window selector
    pub window_bits: u8,

    /// Wall-clock time spent compressing
    pub compress_time: Duration,

    /// Wall-clock time spent expanding
    pub expand_time: Duration,

    /// Whether the expanded output matched the input (None = not checked)
    pub verified: Option<bool>,
}

impl RunStats {
    /// Output bytes on the wire (8 bytes per word).
    pub fn output_bytes(&self) -> u64 {
        self.output_words * 8
    }

    /// Compression ratio (output / input). Returns 0.0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes() as f64 / self.input_bytes as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("=== Run Summary ===");
        println!("Window bits: {}", self.window_bits);
        println!("Input:  {} bytes", self.input_bytes);
        println!(
            "Output: {} bytes ({} words)",
            self.output_bytes(),
            self.output_words
        );
        println!("Ratio: {:.1}%", self.ratio() * 100.0);
        println!(
            "Compress: {} ms, expand: {} ms",
            self.compress_time.as_millis(),
            self.expand_time.as_millis()
        );
        match self.verified {
            Some(true) => println!("Verification: PASSED"),
            Some(false) => println!("Verification: FAILED (output differs from input)"),
            None => {}
        }
        println!();
    }
}
