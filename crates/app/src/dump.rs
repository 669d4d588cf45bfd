//! Frequency-heap diagnostic dump.
//!
//! Builds a heap from a seeded random workload (the whole alphabet added
//! once, then a burst of random frequency bumps) and prints one row per
//! live node: index, frequency, symbol, and the derived code path.

use bitpress_core::heap::FrequencyHeap;
use bitpress_core::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Run the demo workload and print the resulting code table.
pub fn run(seed: u64, alphabet: usize) -> Result<()> {
    let mut heap = FrequencyHeap::new(alphabet)?;
    for sym in 0..alphabet {
        heap.add(sym)?;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..alphabet * 64 {
        let sym = rng.gen_range(0..alphabet);
        heap.increment(sym)?;
    }
    assert!(heap.verify());

    print_table(&heap);
    Ok(())
}

/// Print every live node with its code path (root-to-leaf turn bits).
pub fn print_table(heap: &FrequencyHeap) {
    println!("=== Frequency Heap ({} nodes) ===", heap.len());
    for ix in 0..heap.len() {
        let Some((freq, sym)) = heap.slot(ix) else {
            continue;
        };
        match sym {
            Some(sym) => {
                let found = heap.path_of(sym);
                println!(
                    "[{ix:3}] freq {freq:6}  sym {sym:4}  depth {:2}  code {}",
                    found.bits,
                    code_string(found.path, found.bits)
                );
            }
            None => {
                println!("[{ix:3}] freq {freq:6}  internal");
            }
        }
    }
    println!();
}

/// Turn bits as a root-first string of '0'/'1' (LSB of the path is the
/// turn taken at the root).
fn code_string(path: u64, bits: u32) -> String {
    if bits == 0 {
        return "(root)".to_string();
    }
    (0..bits)
        .map(|b| if (path >> b) & 1 == 1 { '1' } else { '0' })
        .collect()
}
