//! Reference LRU-stack model.
//!
//! Each set is a recency stack of resident blocks (front = most recent).
//! There are no ranks, victims or invalid ways: a miss pushes to the front
//! and a full set drops its back entry. The hierarchy mirrors the
//! write-back, write-allocate protocol without prefetching, so its counters
//! must match the engine's exactly.

use std::collections::VecDeque;

use cachesim_core::{AccessKind, Counters};

/// A resident block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefLine {
    /// Block address (`addr >> offset_bits`).
    pub block: u32,
    /// Written since it was filled.
    pub dirty: bool,
}

/// Result of one reference access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Block was resident.
    Hit,
    /// Block was filled; `writeback` is the byte address of a dirty block dropped to make room.
    Miss {
        /// Block-aligned address of the dirty evictee, if any.
        writeback: Option<u32>,
    },
}

/// One set-associative level as a vector of recency stacks.
#[derive(Clone, Debug)]
pub struct ReferenceCache {
    sets: Vec<VecDeque<RefLine>>,
    ways: usize,
    offset_bits: u32,
    index_bits: u32,
}

impl ReferenceCache {
    /// Builds an empty level.
    pub fn new(block_size: u32, size: u32, assoc: u32) -> Self {
        let num_sets = size / (block_size * assoc);
        Self {
            sets: vec![VecDeque::new(); num_sets as usize],
            ways: assoc as usize,
            offset_bits: block_size.trailing_zeros(),
            index_bits: num_sets.trailing_zeros(),
        }
    }

    fn set_of(&self, block: u32) -> usize {
        (block & ((1 << self.index_bits) - 1)) as usize
    }

    /// Accesses `addr`, updating recency and dirtiness.
    pub fn access(&mut self, write: bool, addr: u32) -> Outcome {
        let block = addr >> self.offset_bits;
        let set = self.set_of(block);
        let offset_bits = self.offset_bits;
        let ways = self.ways;
        let lines = &mut self.sets[set];

        if let Some(pos) = lines.iter().position(|l| l.block == block) {
            let mut line = lines.remove(pos).unwrap();
            line.dirty |= write;
            lines.push_front(line);
            return Outcome::Hit;
        }

        let writeback = if lines.len() == ways {
            lines
                .pop_back()
                .filter(|l| l.dirty)
                .map(|l| l.block << offset_bits)
        } else {
            None
        };
        lines.push_front(RefLine {
            block,
            dirty: write,
        });
        Outcome::Miss { writeback }
    }

    /// Resident `(tag, dirty)` pairs of `set`, most recent first.
    pub fn set_tags(&self, set: usize) -> Vec<(u32, bool)> {
        self.sets[set]
            .iter()
            .map(|l| (l.block >> self.index_bits, l.dirty))
            .collect()
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }
}

/// L1 plus optional L2, no prefetching.
#[derive(Clone, Debug)]
pub struct ReferenceHierarchy {
    /// First level.
    pub l1: ReferenceCache,
    /// Second level, if configured.
    pub l2: Option<ReferenceCache>,
    /// Counters in the engine's layout.
    pub counters: Counters,
}

impl ReferenceHierarchy {
    /// Builds an empty hierarchy; `l2_size == 0` omits L2.
    pub fn new(block_size: u32, l1_size: u32, l1_assoc: u32, l2_size: u32, l2_assoc: u32) -> Self {
        Self {
            l1: ReferenceCache::new(block_size, l1_size, l1_assoc),
            l2: (l2_size != 0).then(|| ReferenceCache::new(block_size, l2_size, l2_assoc)),
            counters: Counters::default(),
        }
    }

    /// Processes one access issued to L1.
    pub fn access(&mut self, kind: AccessKind, addr: u32) {
        let write = kind.is_write();
        let c = &mut self.counters;
        if write {
            c.l1_writes += 1;
        } else {
            c.l1_reads += 1;
        }

        let Outcome::Miss { writeback } = self.l1.access(write, addr) else {
            return;
        };
        if write {
            self.counters.l1_write_misses += 1;
        } else {
            self.counters.l1_read_misses += 1;
        }
        if let Some(victim) = writeback {
            self.counters.l1_writebacks += 1;
            if self.l2.is_some() {
                self.access_l2(true, victim);
            } else {
                self.counters.main_memory_traffic += 1;
            }
        }
        if self.l2.is_some() {
            self.access_l2(false, addr);
        } else {
            self.counters.main_memory_traffic += 1;
        }
    }

    fn access_l2(&mut self, write: bool, addr: u32) {
        let Some(l2) = self.l2.as_mut() else {
            return;
        };
        let c = &mut self.counters;
        if write {
            c.l2_writes += 1;
        } else {
            c.l2_reads += 1;
        }
        if let Outcome::Miss { writeback } = l2.access(write, addr) {
            if write {
                c.l2_write_misses += 1;
            } else {
                c.l2_read_misses += 1;
            }
            if writeback.is_some() {
                c.l2_writebacks += 1;
                c.main_memory_traffic += 1;
            }
            c.main_memory_traffic += 1;
        }
    }
}
