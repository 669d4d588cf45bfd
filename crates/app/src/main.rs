//! bitpress: demo driver for the window codec.
//!
//! Default run: generate a sample buffer, compress it through the word
//! pipeline, expand it again, verify byte equality, print a summary.
//! `--in`/`--out` switch the pipeline onto real files, `--decompress`
//! expands a previously written stream, `--heap-demo` prints a frequency
//! heap code table instead.

mod config;
mod dump;
mod input_gen;
mod stats;

use bitpress_core::bitio::{BitReader, IoWordReader, IoWordWriter, WordWrite};
use bitpress_core::{lz, Result};
use config::Config;
use stats::RunStats;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::time::Instant;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("try --help");
            std::process::exit(2);
        }
    };

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(ok) => {
            if !ok {
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// Dispatch on mode. Returns `Ok(false)` when the pipeline ran but
/// verification failed.
fn run(config: &Config) -> Result<bool> {
    if config.heap_demo {
        dump::run(config.seed, config.heap_symbols)?;
        return Ok(true);
    }
    if config.decompress {
        expand_file(config)?;
        return Ok(true);
    }
    compress_pipeline(config)
}

/// Compress (file or generated sample), expand in memory, verify, report.
fn compress_pipeline(config: &Config) -> Result<bool> {
    let data = match &config.input_file {
        Some(path) => std::fs::read(path)?,
        None => input_gen::sample(config.seed, config.sample_bytes),
    };

    let mut stats = RunStats {
        input_bytes: data.len() as u64,
        window_bits: config.window_bits,
        ..Default::default()
    };

    let start = Instant::now();
    let words = lz::compress_to_words(&data, config.window_bits)?;
    stats.compress_time = start.elapsed();
    stats.output_words = words.len() as u64;

    let start = Instant::now();
    let decoded = lz::decompress_words(&words)?;
    stats.expand_time = start.elapsed();
    stats.verified = Some(decoded == data);

    if let Some(path) = &config.output_file {
        let mut sink = IoWordWriter::new(BufWriter::new(File::create(path)?));
        for &word in &words {
            sink.write_word(word)?;
        }
        sink.into_inner().flush()?;
    }

    if config.print_summary {
        stats.print_summary();
    }
    match stats.verified {
        Some(true) => {
            println!(
                "ok: {} bytes -> {} bytes",
                stats.input_bytes,
                stats.output_bytes()
            );
            Ok(true)
        }
        _ => {
            println!("FAILED: expanded output differs from input");
            Ok(false)
        }
    }
}

/// Expand a compressed word stream straight from a file.
fn expand_file(config: &Config) -> Result<()> {
    let Some(path) = &config.input_file else {
        unreachable!("--decompress without --in is rejected at parse time");
    };

    let file = File::open(path)?;
    let mut reader = BitReader::new(IoWordReader::new(BufReader::new(file)));
    let data = lz::decompress_stream(&mut reader)?;

    match &config.output_file {
        Some(out) => {
            std::fs::write(out, &data)?;
            println!("ok: expanded {} bytes to {}", data.len(), out.display());
        }
        None => {
            println!("ok: expanded {} bytes (no --out, discarded)", data.len());
        }
    }
    Ok(())
}
