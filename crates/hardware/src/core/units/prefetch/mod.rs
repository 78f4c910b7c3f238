//! Hardware Prefetcher implementations.
//!
//! The hierarchy supports a single prefetcher kind: a bank of sequential
//! stream buffers attached to the last configured cache level.

/// Stream-buffer bank (sequential block streams with LRU buffer replacement).
pub mod stream;

pub use self::stream::StreamBufferBank;
