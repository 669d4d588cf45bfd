//! Sample input generation.
//!
//! When no input file is specified, the demo compresses a generated buffer
//! with interesting characteristics for a window codec: long byte runs
//! (self-overlapping matches), text-like sections (literal-heavy), echoes
//! of earlier content at bounded distances (real back-references), and
//! incompressible noise.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generate `len` bytes of mixed-compressibility sample data.
///
/// Deterministic for a given seed.
pub fn sample(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data: Vec<u8> = Vec::with_capacity(len);

    while data.len() < len {
        let section = (len - data.len()).min(rng.gen_range(64..=4096));
        match rng.gen_range(0..10u8) {
            // Runs of one byte: the codec covers these with pos=1 matches.
            0..=2 => {
                let b: u8 = rng.gen();
                data.extend(std::iter::repeat(b).take(section));
            }
            // Text-like content, mostly below 0x80, literal-heavy.
            3..=5 => {
                let alphabet = b"abcdefghijklmnopqrstuvwxyz ,.\n";
                for _ in 0..section {
                    data.push(alphabet[rng.gen_range(0..alphabet.len())]);
                }
            }
            // Echo an earlier slice from a bounded distance back, the
            // shape a back-reference token captures directly.
            6..=7 if data.len() >= 16 => {
                let distance = rng.gen_range(1..=data.len().min(4096));
                let start = data.len() - distance;
                for k in 0..section {
                    let b = data[start + k % distance];
                    data.push(b);
                }
            }
            // Incompressible noise.
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
