//! Set-Associative Cache Level.
//!
//! This module implements one level of the hierarchy as plain storage: a flat
//! array of `num_sets * ways` lines plus their LRU ranks. It knows how to find,
//! promote, evict and fill lines, but nothing about what lies below it; the
//! write-back / write-allocate protocol is driven by
//! [`MemoryHierarchy`](crate::core::MemoryHierarchy), which instantiates this
//! type once for L1 and once for L2.

/// Rank-based LRU ordering shared with the stream-buffer bank.
pub mod lru;

use serde::Serialize;
use tracing::trace;

use self::lru::LruPolicy;
use crate::common::{AddressDecoder, ConfigError, DecodedAddr, Level};
use crate::config::check_level;

/// Cache line entry containing tag, validity, and dirty bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Stored tag; meaningful only when `valid`.
    pub tag: u32,
    /// Line holds a block.
    pub valid: bool,
    /// Line was written since it was filled.
    pub dirty: bool,
}

/// Read-only view of a line for dumps, ordered by recency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LineView {
    /// Stored tag (`0` for never-filled lines).
    pub tag: u32,
    /// Line holds a block.
    pub valid: bool,
    /// Line is dirty.
    pub dirty: bool,
    /// LRU rank, `0` = most recently used.
    pub rank: u32,
}

/// One set-associative cache level with LRU replacement.
#[derive(Debug, Clone)]
pub struct CacheLevel {
    level: Level,
    block_size: u32,
    capacity: u32,
    ways: usize,
    num_sets: usize,
    decoder: AddressDecoder,
    lines: Vec<CacheLine>,
    lru: LruPolicy,
}

impl CacheLevel {
    /// Creates an empty level: every line invalid, way `w` of each set at rank `w`.
    ///
    /// # Arguments
    ///
    /// * `level` - Which level this is, used in diagnostics.
    /// * `block_size` - Block size in bytes.
    /// * `capacity` - Total size in bytes.
    /// * `associativity` - Ways per set.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if any parameter is not a power of two or one set does not fit.
    pub fn new(
        level: Level,
        block_size: u32,
        capacity: u32,
        associativity: u32,
    ) -> Result<Self, ConfigError> {
        check_level(level, block_size, capacity, associativity)?;

        let num_sets = capacity / (block_size * associativity);
        let decoder = AddressDecoder::from_geometry(block_size, num_sets);
        let ways = associativity as usize;
        let num_sets = num_sets as usize;

        Ok(Self {
            level,
            block_size,
            capacity,
            ways,
            num_sets,
            decoder,
            lines: vec![CacheLine::default(); num_sets * ways],
            lru: LruPolicy::new(num_sets, ways),
        })
    }

    /// Which level this is.
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Block size in bytes.
    pub const fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Capacity in bytes.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Ways per set.
    pub const fn associativity(&self) -> usize {
        self.ways
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Address decoder for this level's geometry.
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// Splits `addr` against this level's geometry.
    #[inline]
    pub const fn decode(&self, addr: u32) -> DecodedAddr {
        self.decoder.decode(addr)
    }

    /// Block address of `addr` at this level.
    #[inline]
    pub const fn block_address(&self, addr: u32) -> u32 {
        self.decoder.block_address(addr)
    }

    #[inline(always)]
    const fn slot(&self, index: usize, way: usize) -> usize {
        index * self.ways + way
    }

    /// The line at `(index, way)`.
    pub fn line(&self, index: usize, way: usize) -> &CacheLine {
        &self.lines[self.slot(index, way)]
    }

    /// LRU rank of the line at `(index, way)`.
    pub fn rank(&self, index: usize, way: usize) -> u32 {
        self.lru.rank(index, way)
    }

    /// Ranks of every way in set `index`, indexed by way.
    pub fn ranks(&self, index: usize) -> &[u32] {
        self.lru.ranks(index)
    }

    /// Looks up `tag` in set `index`.
    ///
    /// # Returns
    ///
    /// The way holding a valid copy of the block, if any. Fills never
    /// duplicate a tag within a set, so at most one way can match.
    pub fn probe(&self, index: usize, tag: u32) -> Option<usize> {
        let base = self.slot(index, 0);
        self.lines[base..base + self.ways]
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    /// Promotes `way` to most recently used within its set.
    #[inline]
    pub fn touch(&mut self, index: usize, way: usize) {
        self.lru.update(index, way);
    }

    /// The least recently used way of set `index`.
    #[inline]
    pub fn victim(&self, index: usize) -> usize {
        self.lru.get_victim(index)
    }

    /// Installs a clean copy of the block with `tag` into `(index, way)` and promotes it.
    pub fn fill(&mut self, index: usize, way: usize, tag: u32) {
        let slot = self.slot(index, way);
        self.lines[slot] = CacheLine {
            tag,
            valid: true,
            dirty: false,
        };
        self.touch(index, way);
    }

    /// Marks `(index, way)` dirty without touching its recency.
    #[inline]
    pub fn mark_dirty(&mut self, index: usize, way: usize) {
        let slot = self.slot(index, way);
        self.lines[slot].dirty = true;
    }

    /// If `(index, way)` holds dirty data, the block-aligned address it must be written back to.
    pub fn dirty_victim_address(&self, index: usize, way: usize) -> Option<u32> {
        let line = self.line(index, way);
        if line.valid && line.dirty {
            let addr = self.decoder.compose(line.tag, index as u32);
            trace!(cache = %self.level, set = index, way, tag = line.tag, addr, "dirty victim");
            Some(addr)
        } else {
            None
        }
    }

    /// Contents of set `index` ordered from most to least recently used.
    pub fn set_contents(&self, index: usize) -> Vec<LineView> {
        self.lru
            .order(index)
            .into_iter()
            .map(|way| {
                let line = self.line(index, way);
                LineView {
                    tag: line.tag,
                    valid: line.valid,
                    dirty: line.dirty,
                    rank: self.rank(index, way),
                }
            })
            .collect()
    }

    /// Contents of every set, each ordered from most to least recently used.
    pub fn contents(&self) -> Vec<Vec<LineView>> {
        (0..self.num_sets).map(|set| self.set_contents(set)).collect()
    }
}
