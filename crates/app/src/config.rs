//! Configuration for the bitpress demo tool.
//!
//! Handles parsing command-line arguments and generating sensible defaults
//! (including randomized defaults that are reproducible with a seed).
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments: generate a sample buffer,
//! compress it, expand it, verify, report. All defaults are printable so
//! runs are reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input file path (None = generate a sample buffer)
    pub input_file: Option<PathBuf>,

    /// Output file path (compressed words, or expanded bytes with
    /// `--decompress`)
    pub output_file: Option<PathBuf>,

    /// Expand a compressed file instead of compressing
    pub decompress: bool,

    /// Window size selector, `10..=20`
    pub window_bits: u8,

    /// Generated sample size in bytes
    pub sample_bytes: usize,

    /// Seed for sample generation and randomized defaults
    pub seed: u64,

    /// Run the frequency-heap dump instead of the codec pipeline
    pub heap_demo: bool,

    /// Alphabet size for the heap dump (power of two > 2)
    pub heap_symbols: usize,

    /// Whether to print the resolved configuration
    pub print_config: bool,

    /// Whether to print the run summary
    pub print_summary: bool,
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// If `--seed` is absent, a time-based seed is used (and printed via
    /// `--print-config`). `window_bits` defaults to a seeded random value
    /// in the valid range so repeated runs exercise different windows.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut input_file: Option<PathBuf> = None;
        let mut output_file: Option<PathBuf> = None;
        let mut decompress = false;
        let mut window_bits: Option<u8> = None;
        let mut sample_bytes: Option<usize> = None;
        let mut seed: Option<u64> = None;
        let mut heap_demo = false;
        let mut heap_symbols: Option<usize> = None;
        let mut print_config = false;
        let mut print_summary = true;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--in" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--in requires a path".to_string());
                    }
                    input_file = Some(PathBuf::from(&args[i]));
                }
                "--out" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--out requires a path".to_string());
                    }
                    output_file = Some(PathBuf::from(&args[i]));
                }
                "--decompress" => {
                    decompress = true;
                }
                "--window-bits" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--window-bits requires a number".to_string());
                    }
                    window_bits = Some(args[i].parse().map_err(|_| "invalid window-bits")?);
                }
                "--size" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--size requires a number".to_string());
                    }
                    sample_bytes = Some(args[i].parse().map_err(|_| "invalid size")?);
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--heap-demo" => {
                    heap_demo = true;
                }
                "--alphabet" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--alphabet requires a number".to_string());
                    }
                    heap_symbols = Some(args[i].parse().map_err(|_| "invalid alphabet")?);
                }
                "--print-config" => {
                    print_config = true;
                }
                "--no-summary" => {
                    print_summary = false;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("unknown argument: {}", args[i]));
                }
            }
            i += 1;
        }

        if decompress && input_file.is_none() {
            return Err("--decompress requires --in".to_string());
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|t| t.as_millis() as u64)
                .unwrap_or(0)
        });

        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        Ok(Config {
            input_file,
            output_file,
            decompress,
            window_bits: window_bits.unwrap_or_else(|| rng.gen_range(10..=20)),
            sample_bytes: sample_bytes.unwrap_or(64 * 1024),
            seed,
            heap_demo,
            heap_symbols: heap_symbols.unwrap_or(32),
            print_config,
            print_summary,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!(
            "Input:  {}",
            self.input_file
                .as_ref()
                .and_then(|p| p.to_str())
                .unwrap_or("(generate sample)")
        );
        println!(
            "Output: {}",
            self.output_file
                .as_ref()
                .and_then(|p| p.to_str())
                .unwrap_or("(none)")
        );
        println!("Mode: {}", if self.decompress { "decompress" } else { "compress" });
        println!("Seed: {}", self.seed);
        println!("Window bits: {} ({} KiB window)", self.window_bits, (1usize << self.window_bits) / 1024);
        println!("Sample size: {} bytes", self.sample_bytes);
        if self.heap_demo {
            println!("Heap demo alphabet: {}", self.heap_symbols);
        }
        println!();
    }
}

fn print_help() {
    println!("bitpress: window-bounded LZ codec demo");
    println!();
    println!("USAGE:");
    println!("    bitpress [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --in <PATH>          Input file (default: generate sample)");
    println!("    --out <PATH>         Output file (compressed words; with");
    println!("                         --decompress, the expanded bytes)");
    println!("    --decompress         Expand a compressed file (requires --in)");
    println!();
    println!("    --window-bits <N>    Window selector 10-20 (default: random)");
    println!("    --size <N>           Sample size in bytes (default: 65536)");
    println!("    --seed <N>           Random seed for determinism");
    println!();
    println!("    --heap-demo          Print a frequency-heap code table and exit");
    println!("    --alphabet <N>       Heap demo alphabet size (default: 32)");
    println!();
    println!("    --print-config       Print resolved configuration");
    println!("    --no-summary         Don't print the run summary");
    println!("    --help, -h           Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    bitpress                                  # random sample round trip");
    println!("    bitpress --seed 42 --window-bits 12       # deterministic run");
    println!("    bitpress --in file.bin --out file.bp      # compress a file");
    println!("    bitpress --decompress --in file.bp --out file.out");
    println!();
}
