//! Integration tests for the full compression pipeline.
//!
//! These tests drive the public envelope (header + token stream, in-memory
//! word buffers) across window sizes and input shapes, and exercise the
//! frequency heap against a symbol stream derived from generated data.

use bitpress_core::bitio::{BitReader, WordCursor};
use bitpress_core::heap::FrequencyHeap;
use bitpress_core::lz;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Mixed-compressibility buffer: byte runs, a small text-like alphabet,
/// repeated earlier slices, and incompressible noise.
fn sample_data(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(len);
    while data.len() < len {
        let section = (len - data.len()).min(rng.gen_range(16..=512));
        match rng.gen_range(0..4u8) {
            0 => {
                let b: u8 = rng.gen();
                data.extend(std::iter::repeat(b).take(section));
            }
            1 => {
                let alphabet = b"etaoin shrdlu.";
                for _ in 0..section {
                    data.push(alphabet[rng.gen_range(0..alphabet.len())]);
                }
            }
            2 if !data.is_empty() => {
                // Re-emit an earlier slice so back-references pay off.
                let start = rng.gen_range(0..data.len());
                for k in 0..section {
                    let b = data[start + k % (data.len() - start)];
                    data.push(b);
                }
            }
            _ => {
                for _ in 0..section {
                    data.push(rng.gen());
                }
            }
        }
    }
    data.truncate(len);
    data
}

#[test]
fn test_round_trip_all_window_sizes() {
    for window_bits in 10..=20u8 {
        let data = sample_data(u64::from(window_bits), 4096);
        let words = lz::compress_to_words(&data, window_bits).unwrap();
        let decoded = lz::decompress_words(&words).unwrap();
        assert_eq!(decoded, data, "window_bits {window_bits}");
    }
}

#[test]
fn test_round_trip_seeded_buffers() {
    for seed in 0..8u64 {
        let len = 256 + (seed as usize) * 391;
        let data = sample_data(0xC0DEC + seed, len);
        let words = lz::compress_to_words(&data, 12).unwrap();
        assert_eq!(lz::decompress_words(&words).unwrap(), data, "seed {seed}");
    }
}

#[test]
fn test_round_trip_all_byte_values() {
    let data: Vec<u8> = (0..=255u8).cycle().take(2048).collect();
    let words = lz::compress_to_words(&data, 11).unwrap();
    assert_eq!(lz::decompress_words(&words).unwrap(), data);
}

#[test]
fn test_empty_input() {
    for window_bits in [10u8, 15, 20] {
        let words = lz::compress_to_words(&[], window_bits).unwrap();
        // Header only: zero payload words.
        assert_eq!(words, vec![0, u64::from(window_bits)]);
        assert!(lz::decompress_words(&words).unwrap().is_empty());
    }
}

#[test]
fn test_header_declares_exact_byte_count() {
    for len in [1usize, 2, 3, 100, 1000] {
        let data = sample_data(len as u64, len);
        let words = lz::compress_to_words(&data, 12).unwrap();
        assert_eq!(words[0], len as u64);
        assert_eq!(words[1], 12);
        assert_eq!(lz::decompress_words(&words).unwrap().len(), len);
    }
}

/// Walk the token stream of a compressed buffer, yielding `(pos, len)` for
/// every back-reference. Follows the wire format directly.
fn match_tokens(words: &[u64]) -> Vec<(u64, u64)> {
    let mut reader = BitReader::new(WordCursor::new(words));
    let (bytes, window_bits) = lz::read_header(&mut reader).unwrap();
    let base = u32::from(window_bits - 4) / 2;

    let mut matches = Vec::new();
    let mut produced = 0u64;
    while produced < bytes {
        if !reader.read_bit().unwrap() {
            reader.read_bits(7).unwrap();
            produced += 1;
        } else if !reader.read_bit().unwrap() {
            reader.read_bits(7).unwrap();
            produced += 1;
        } else {
            let pos = reader.read_number(base).unwrap();
            let len = reader.read_number(base).unwrap();
            matches.push((pos, len));
            produced += len;
        }
    }
    matches
}

#[test]
fn test_run_longer_than_window_stays_inside_window() {
    // 3000 identical bytes against a 1024-byte window.
    let data = vec![b'x'; 3000];
    let words = lz::compress_to_words(&data, 10).unwrap();
    assert_eq!(lz::decompress_words(&words).unwrap(), data);

    let matches = match_tokens(&words);
    assert!(!matches.is_empty());
    for &(pos, len) in &matches {
        assert!(pos > 0 && pos < 1024, "distance {pos} outside window");
        assert!(len > 2);
    }
}

#[test]
fn test_self_overlapping_run_expands() {
    // A two-byte seed and a pos=1 match reproduce the whole run.
    let data = vec![0xEEu8; 5000];
    let words = lz::compress_to_words(&data, 16).unwrap();
    assert_eq!(lz::decompress_words(&words).unwrap(), data);

    let matches = match_tokens(&words);
    assert_eq!(matches, vec![(1, 4998)]);
}

#[test]
fn test_repeated_pattern_round_trip() {
    let data = b"The quick brown fox jumps over the lazy dog. ".repeat(40);
    let words = lz::compress_to_words(&data, 12).unwrap();
    // Far fewer output bytes than input bytes.
    assert!(words.len() * 8 < data.len() / 2);
    assert_eq!(lz::decompress_words(&words).unwrap(), data);
}

#[test]
fn test_window_bits_rejected_on_both_directions() {
    for bad in [9u8, 21] {
        let err = lz::compress_to_words(b"payload", bad);
        assert!(err.is_err(), "compress accepted window_bits {bad}");
    }
    for bad in [9u64, 21] {
        // A header declaring an out-of-range window must fail before any
        // payload word is touched.
        let words = vec![3u64, bad, 0xFFFF_FFFF];
        assert!(lz::decompress_words(&words).is_err());
    }
}

#[test]
fn test_heap_tracks_symbol_stream_from_sample_data() {
    let data = sample_data(77, 2000);
    let mut heap = FrequencyHeap::new(32).unwrap();

    for &b in &data {
        let sym = usize::from(b) % 32;
        if heap.path_of(sym).index.is_none() {
            heap.add(sym).unwrap();
        } else {
            heap.increment(sym).unwrap();
        }
    }
    assert!(heap.verify());

    for sym in 0..32 {
        let seen = data.iter().filter(|&&b| usize::from(b) % 32 == sym).count() as u64;
        match heap.frequency(sym) {
            Some(freq) => assert_eq!(freq, seen, "symbol {sym}"),
            None => assert_eq!(seen, 0, "symbol {sym}"),
        }
    }
}
