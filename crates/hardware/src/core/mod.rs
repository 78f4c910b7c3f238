//! Cache hierarchy engine.
//!
//! This module contains the simulation core: the storage units (cache levels,
//! LRU ordering, stream buffers) and the controller that runs the write-back,
//! write-allocate protocol across them.

/// Memory hierarchy controller (L1, optional L2, optional stream buffers).
pub mod hierarchy;

/// Storage units (set-associative cache levels, stream-buffer prefetcher).
pub mod units;

pub use self::hierarchy::{HierarchySnapshot, MemoryHierarchy};
