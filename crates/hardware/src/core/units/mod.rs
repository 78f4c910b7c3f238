//! Hierarchy building blocks.
//!
//! Storage units composed by [`MemoryHierarchy`](crate::core::MemoryHierarchy):
//! 1. **Cache:** Set-associative levels with rank-based LRU replacement.
//! 2. **Prefetch:** Stream-buffer banks.

/// Set-associative cache levels and LRU ordering.
pub mod cache;

/// Stream-buffer prefetcher.
pub mod prefetch;
