//! Rank-Based Least Recently Used (LRU) Ordering.
//!
//! Every way of a set carries an integer rank: `0` is the most recently used,
//! `ways - 1` the least. The ranks of a set always form a permutation of
//! `0..ways`. Promotion does not re-sort: the promoted way drops to rank 0 and
//! only the ways that were more recent than it shift down by one.
//!
//! The same structure orders the stream buffers of a prefetcher bank, which is
//! simply a single "set" whose ways are buffers.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(W) where W is the number of ways
//!   - `get_victim()`: O(W) (scan for the maximal rank)
//! - **Space Complexity:** O(S × W) where S is the number of sets

/// Per-set recency ranks stored flat as `[set * ways + way]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LruPolicy {
    ranks: Vec<u32>,
    ways: usize,
}

impl LruPolicy {
    /// Creates the initial ordering: way `w` of every set has rank `w`.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets.
    /// * `ways` - The associativity (number of ways) of each set.
    pub fn new(sets: usize, ways: usize) -> Self {
        let mut ranks = Vec::with_capacity(sets * ways);
        for _ in 0..sets {
            ranks.extend((0..ways).map(|w| w as u32));
        }
        Self { ranks, ways }
    }

    /// Number of ways per set.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Ranks of every way in `set`, indexed by way.
    pub fn ranks(&self, set: usize) -> &[u32] {
        let base = set * self.ways;
        &self.ranks[base..base + self.ways]
    }

    /// Rank of a single way.
    #[inline]
    pub fn rank(&self, set: usize, way: usize) -> u32 {
        self.ranks[set * self.ways + way]
    }

    /// Promotes `way` to most recently used.
    ///
    /// Ways whose rank was strictly lower than the old rank of `way` age by
    /// one; ways that were already older keep their rank.
    pub fn update(&mut self, set: usize, way: usize) {
        let base = set * self.ways;
        let slots = &mut self.ranks[base..base + self.ways];
        let old = slots[way];
        for rank in slots.iter_mut() {
            if *rank < old {
                *rank += 1;
            }
        }
        slots[way] = 0;
    }

    /// Identifies the least recently used way of `set` (rank `ways - 1`).
    ///
    /// Falls back to way 0 if the permutation were ever broken.
    pub fn get_victim(&self, set: usize) -> usize {
        let lru = self.ways as u32 - 1;
        self.ranks(set)
            .iter()
            .position(|&r| r == lru)
            .unwrap_or(0)
    }

    /// Ways of `set` ordered from most to least recently used.
    pub fn order(&self, set: usize) -> Vec<usize> {
        let mut ways: Vec<usize> = (0..self.ways).collect();
        let ranks = self.ranks(set);
        ways.sort_by_key(|&w| ranks[w]);
        ways
    }
}
