//! Cache level tests.


/// Rank-based LRU ordering.
pub mod lru;
