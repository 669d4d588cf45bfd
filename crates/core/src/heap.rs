//! Incremental frequency heap with derivable prefix-code paths.
//!
//! `FrequencyHeap` is an array-backed max-heap over symbol frequencies with
//! an auxiliary symbol-to-index table, built for incremental statistics: a
//! symbol enters once via [`add`](FrequencyHeap::add) and its frequency is
//! bumped via [`increment`](FrequencyHeap::increment) as further
//! occurrences arrive. The heap position of a symbol's leaf determines its
//! code path: the sequence of left/right turns from the root, readable via
//! [`path_of`](FrequencyHeap::path_of).
//!
//! # Construction strategy
//!
//! `add` pairs the two *most recently appended* nodes into an internal
//! sum node before appending the new leaf. This is deliberately not the
//! classical merge of the two globally smallest frequencies; the two
//! strategies produce different code lengths, and the incremental one is
//! the contract here.
//!
//! # Invariants
//!
//! After every public operation:
//! - max-heap property over the live prefix of the node array;
//! - every live leaf is indexed by the symbol table, and every table entry
//!   points at the live leaf carrying that symbol;
//! - the leaf-to-root walk reproduces each symbol's code path.
//!
//! [`verify`](FrequencyHeap::verify) checks all three. It is an ordinary
//! pure function, compiled in every build so tests can call it directly;
//! the mutating operations assert it in debug builds.

use crate::error::{HeapError, Result};

/// One slot in the heap array: a frequency plus the owning symbol
/// (`None` for internal sum nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    freq: u64,
    sym: Option<usize>,
}

const EMPTY: Node = Node { freq: 0, sym: None };

/// A symbol's position and code path, as returned by
/// [`FrequencyHeap::path_of`].
///
/// For a symbol that was never added (or is out of range), `index` is
/// `None` and `path`/`bits` are zero. That is the documented in-band
/// answer, not an error: an absent symbol and a leaf sitting at the root
/// both have a zero-length path.
///
/// `path` holds one bit per tree level, least-significant bit first from
/// the root: bit 0 is the turn taken at the root (1 = right child), and
/// `bits` is the code depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolPath {
    pub index: Option<usize>,
    pub path: u64,
    pub bits: u32,
}

/// Fixed-capacity max-heap over symbol frequencies.
///
/// Capacity is `2 × alphabet` nodes: one leaf per symbol plus the internal
/// sum nodes the construction appends between leaves.
#[derive(Debug, Clone)]
pub struct FrequencyHeap {
    /// Node storage, always at full capacity; `count` marks the live prefix.
    nodes: Vec<Node>,
    /// symbol -> live leaf index
    table: Vec<Option<usize>>,
    count: usize,
    alphabet: usize,
}

impl FrequencyHeap {
    /// Create an empty heap for `alphabet` distinct symbol ids.
    ///
    /// # Errors
    /// `HeapError::InvalidAlphabet` unless `alphabet` is a power of two
    /// greater than 2.
    pub fn new(alphabet: usize) -> Result<Self> {
        if alphabet <= 2 || !alphabet.is_power_of_two() {
            return Err(HeapError::InvalidAlphabet(alphabet).into());
        }
        Ok(Self {
            nodes: vec![EMPTY; alphabet * 2],
            table: vec![None; alphabet],
            count: 0,
            alphabet,
        })
    }

    /// Configured alphabet size.
    pub fn alphabet(&self) -> usize {
        self.alphabet
    }

    /// Number of live nodes (leaves plus internal nodes).
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Node capacity (`2 × alphabet`).
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Frequency and symbol of the live node at `ix`, if any.
    pub fn slot(&self, ix: usize) -> Option<(u64, Option<usize>)> {
        if ix < self.count {
            Some((self.nodes[ix].freq, self.nodes[ix].sym))
        } else {
            None
        }
    }

    /// Current frequency of `symbol`, if it was added.
    pub fn frequency(&self, symbol: usize) -> Option<u64> {
        let ix = self.table.get(symbol).copied().flatten()?;
        Some(self.nodes[ix].freq)
    }

    fn is_leaf(&self, ix: usize) -> bool {
        self.nodes[ix].sym.is_some()
    }

    /// Frequency at `ix`, reading past the live prefix (or the capacity)
    /// as zero. Ancestor re-summing uses this for a missing right child.
    fn freq_at(&self, ix: usize) -> u64 {
        self.nodes.get(ix).map_or(0, |n| n.freq)
    }

    /// Swap two nodes, keeping the symbol table aimed at the leaves.
    ///
    /// Two leaves swap their table entries; a lone leaf is retargeted to
    /// the index it moves to; two internal nodes need no table update.
    fn swap_nodes(&mut self, ix0: usize, ix1: usize) {
        match (self.nodes[ix0].sym, self.nodes[ix1].sym) {
            (Some(a), Some(b)) => self.table.swap(a, b),
            (Some(a), None) => self.table[a] = Some(ix1),
            (None, Some(b)) => self.table[b] = Some(ix0),
            (None, None) => {}
        }
        self.nodes.swap(ix0, ix1);
    }

    /// Move the node at `ix` up while it outweighs its parent. Returns the
    /// settled index, with the table fixed for the symbol that ends there.
    fn sift_up(&mut self, mut ix: usize) -> usize {
        while ix > 0 {
            let parent = (ix - 1) / 2;
            if self.nodes[ix].freq > self.nodes[parent].freq {
                self.swap_nodes(ix, parent);
                ix = parent;
            } else {
                break;
            }
        }
        if let Some(sym) = self.nodes[ix].sym {
            self.table[sym] = Some(ix);
        }
        ix
    }

    /// Move the node at `ix` down toward the heavier child while either
    /// child outweighs it. Depth is bounded by log2(capacity).
    fn sift_down(&mut self, ix: usize) -> usize {
        let mut largest = ix;
        let left = 2 * ix + 1;
        let right = 2 * ix + 2;
        if left < self.count && self.nodes[left].freq > self.nodes[largest].freq {
            largest = left;
        }
        if right < self.count && self.nodes[right].freq > self.nodes[largest].freq {
            largest = right;
        }
        let settled = if largest != ix {
            self.swap_nodes(ix, largest);
            self.sift_down(largest)
        } else {
            ix
        };
        if let Some(sym) = self.nodes[settled].sym {
            self.table[sym] = Some(settled);
        }
        settled
    }

    /// Insert a new symbol with frequency 1 and return its settled index.
    ///
    /// With fewer than two live nodes the leaf is simply appended. After
    /// that, every insertion first merges the two most recently appended
    /// nodes into an internal node carrying their summed frequency, repairs
    /// the heap around the three disturbed positions, then appends the new
    /// leaf and sifts it up.
    ///
    /// # Errors
    /// - `HeapError::SymbolOutOfRange` if `symbol >= alphabet`
    /// - `HeapError::DuplicateSymbol` if the symbol is already tracked
    /// - `HeapError::CapacityExhausted` if the node array cannot take the
    ///   insertion
    pub fn add(&mut self, symbol: usize) -> Result<usize> {
        if symbol >= self.alphabet {
            return Err(HeapError::SymbolOutOfRange {
                symbol,
                alphabet: self.alphabet,
            }
            .into());
        }
        if self.table[symbol].is_some() {
            return Err(HeapError::DuplicateSymbol(symbol).into());
        }

        if self.count < 2 {
            let ix = self.count;
            self.nodes[ix] = Node {
                freq: 1,
                sym: Some(symbol),
            };
            self.table[symbol] = Some(ix);
            self.count += 1;
            let settled = self.sift_up(ix);
            debug_assert!(self.verify());
            return Ok(settled);
        }

        if self.count + 2 > self.nodes.len() {
            return Err(HeapError::CapacityExhausted {
                capacity: self.nodes.len(),
            }
            .into());
        }

        // Merge the two most recently appended nodes into an internal node.
        let first = self.count - 2;
        let second = self.count - 1;
        let internal = self.count;
        self.nodes[internal] = Node {
            freq: self.nodes[first].freq + self.nodes[second].freq,
            sym: None,
        };
        self.count += 1;
        // The merged source positions may now sit below heavier children;
        // the internal node may outweigh its ancestors.
        self.sift_down(first);
        self.sift_down(second);
        self.sift_up(internal);

        let leaf = self.count;
        self.nodes[leaf] = Node {
            freq: 1,
            sym: Some(symbol),
        };
        self.table[symbol] = Some(leaf);
        self.count += 1;
        let settled = self.sift_up(leaf);
        debug_assert!(self.verify());
        Ok(settled)
    }

    /// Bump a tracked symbol's frequency by one and return its settled
    /// index.
    ///
    /// After the local sift, every ancestor of the settled position is
    /// re-summed from its current children, so internal frequencies stay
    /// equal to their subtree sums wherever the sifting left them.
    ///
    /// # Errors
    /// - `HeapError::SymbolOutOfRange` if `symbol >= alphabet`
    /// - `HeapError::UnknownSymbol` if the symbol was never added
    pub fn increment(&mut self, symbol: usize) -> Result<usize> {
        if symbol >= self.alphabet {
            return Err(HeapError::SymbolOutOfRange {
                symbol,
                alphabet: self.alphabet,
            }
            .into());
        }
        let ix = self.table[symbol].ok_or(HeapError::UnknownSymbol(symbol))?;
        debug_assert!(self.is_leaf(ix));
        self.nodes[ix].freq += 1;

        let ix = self.sift_down(ix);
        let ix = self.sift_up(ix);
        debug_assert_eq!(self.table[symbol], Some(ix));

        let mut p = ix;
        while p > 0 {
            let parent = (p - 1) / 2;
            self.nodes[parent].freq = self.freq_at(2 * parent + 1) + self.freq_at(2 * parent + 2);
            p = parent;
        }
        debug_assert!(self.verify());
        Ok(ix)
    }

    /// Code path for `symbol`: its live index, the root-to-leaf turn bits
    /// (LSB = turn at the root), and the code depth.
    ///
    /// A symbol that was never added yields `index: None` with an empty
    /// path; see [`SymbolPath`].
    pub fn path_of(&self, symbol: usize) -> SymbolPath {
        let ix = match self.table.get(symbol).copied().flatten() {
            Some(ix) => ix,
            None => {
                return SymbolPath {
                    index: None,
                    path: 0,
                    bits: 0,
                }
            }
        };
        let mut path = 0u64;
        let mut bits = 0u32;
        let mut i = ix;
        while i > 0 {
            let parent = (i - 1) / 2;
            path <<= 1;
            if i == 2 * parent + 2 {
                path |= 1;
            }
            i = parent;
            bits += 1;
        }
        SymbolPath {
            index: Some(ix),
            path,
            bits,
        }
    }

    /// Check every structural invariant over the live range.
    ///
    /// Pure and always compiled: the mutating operations assert it in
    /// debug builds, and tests call it in any build.
    pub fn verify(&self) -> bool {
        for ix in 0..self.count {
            let left = 2 * ix + 1;
            let right = 2 * ix + 2;
            if left < self.count && self.nodes[ix].freq < self.nodes[left].freq {
                return false;
            }
            if right < self.count && self.nodes[ix].freq < self.nodes[right].freq {
                return false;
            }
            if let Some(sym) = self.nodes[ix].sym {
                if sym >= self.alphabet || self.table[sym] != Some(ix) {
                    return false;
                }
                if self.path_of(sym).index != Some(ix) {
                    return false;
                }
            }
        }
        for sym in 0..self.alphabet {
            if let Some(ix) = self.table[sym] {
                if ix >= self.count || self.nodes[ix].sym != Some(sym) {
                    return false;
                }
            }
        }
        true
    }
}
