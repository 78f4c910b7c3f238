//! Stream-Buffer Prefetcher.
//!
//! A bank of `N` stream buffers, each holding the next `M` sequential block
//! addresses after the block that started or last advanced the stream. The
//! buffers are ranked by recency exactly like the ways of a cache set.
//!
//! A stream is either *continued* (the demanded block was found in a buffer;
//! the window slides forward and only blocks beyond the old window count as
//! new prefetches) or *started* (the LRU buffer is overwritten and all `M`
//! blocks count). Prefetching here is bookkeeping only: no data moves and no
//! fetch is scheduled.

use tracing::trace;

use crate::core::units::cache::lru::LruPolicy;

/// Bank of sequential stream buffers with LRU ordering.
#[derive(Debug, Clone)]
pub struct StreamBufferBank {
    /// Buffer contents stored flat as `[buffer * depth + slot]`.
    entries: Vec<u32>,
    count: usize,
    depth: usize,
    /// One "set" whose ways are the buffers.
    lru: LruPolicy,
}

impl StreamBufferBank {
    /// Creates a zero-filled bank with buffer `i` at rank `i`.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of buffers (`N`).
    /// * `depth` - Block addresses per buffer (`M`).
    ///
    /// # Returns
    ///
    /// `None` when either dimension is zero, which disables prefetching.
    pub fn new(count: usize, depth: usize) -> Option<Self> {
        if count == 0 || depth == 0 {
            return None;
        }
        Some(Self {
            entries: vec![0; count * depth],
            count,
            depth,
            lru: LruPolicy::new(1, count),
        })
    }

    /// Number of buffers.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Block addresses per buffer.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Contents of buffer `buffer`, oldest prediction first.
    pub fn buffer(&self, buffer: usize) -> &[u32] {
        let base = buffer * self.depth;
        &self.entries[base..base + self.depth]
    }

    /// Recency rank of buffer `buffer` (`0` = most recently used).
    pub fn rank(&self, buffer: usize) -> u32 {
        self.lru.rank(0, buffer)
    }

    /// Ranks of all buffers, indexed by buffer.
    pub fn ranks(&self) -> &[u32] {
        self.lru.ranks(0)
    }

    /// Searches the bank for `block_addr`, most recently used buffer first.
    ///
    /// # Returns
    ///
    /// The first buffer in recency order containing the block. Should two
    /// buffers ever hold the same block, the more recent one wins.
    pub fn probe(&self, block_addr: u32) -> Option<usize> {
        self.lru
            .order(0)
            .into_iter()
            .find(|&b| self.buffer(b).contains(&block_addr))
    }

    /// Advances buffer `buffer` so it holds `block_addr + 1 ..= block_addr + M`.
    ///
    /// # Returns
    ///
    /// The number of entries that lie beyond the buffer's previous last entry,
    /// i.e. blocks newly fetched into the stream.
    pub fn refill_from_hit(&mut self, buffer: usize, block_addr: u32) -> u64 {
        let base = buffer * self.depth;
        let old_last = self.entries[base + self.depth - 1];
        let mut fetched = 0;
        for (j, slot) in self.entries[base..base + self.depth].iter_mut().enumerate() {
            *slot = block_addr.wrapping_add(j as u32 + 1);
            if *slot > old_last {
                fetched += 1;
            }
        }
        self.lru.update(0, buffer);
        trace!(buffer, block_addr, fetched, "stream continued");
        fetched
    }

    /// Starts a new stream after `block_addr` in the least recently used buffer.
    ///
    /// # Returns
    ///
    /// The number of blocks fetched, always `M`.
    pub fn refill_from_miss(&mut self, block_addr: u32) -> u64 {
        let buffer = self.lru.get_victim(0);
        let base = buffer * self.depth;
        for (j, slot) in self.entries[base..base + self.depth].iter_mut().enumerate() {
            *slot = block_addr.wrapping_add(j as u32 + 1);
        }
        self.lru.update(0, buffer);
        trace!(buffer, block_addr, "stream allocated");
        self.depth as u64
    }

    /// Buffer contents ordered from most to least recently used.
    pub fn contents(&self) -> Vec<Vec<u32>> {
        self.lru
            .order(0)
            .into_iter()
            .map(|b| self.buffer(b).to_vec())
            .collect()
    }
}
