//! Two-level cache hierarchy simulator library.
//!
//! This crate models a set-associative L1, an optional L2 and an optional
//! stream-buffer prefetcher, driven by a trace of reads and writes, and
//! reports exact hit/miss/traffic statistics:
//! 1. **Core:** Cache levels with rank-based LRU, stream buffers, and the
//!    write-back / write-allocate hierarchy controller.
//! 2. **Common:** Address decoding, access kinds, and error types.
//! 3. **Simulation:** Trace parsing and trace-driven runs.
//! 4. **Configuration and statistics:** Run geometry, counters, and the text report.
//!
//! ```
//! use cachesim_core::{AccessKind, MemoryHierarchy};
//!
//! let mut sim = MemoryHierarchy::new(32, 8192, 4, 0, 0, 0, 0).unwrap();
//! sim.access(AccessKind::Read, 0x1000);
//! sim.access(AccessKind::Read, 0x1004);
//! let c = sim.counters();
//! assert_eq!((c.l1_reads, c.l1_read_misses), (2, 1));
//! ```

/// Common types (address decoding, access kinds, errors).
pub mod common;
/// Hierarchy configuration (defaults, validation).
pub mod config;
/// Simulation engine (cache levels, prefetcher, controller).
pub mod core;
/// Trace parsing and trace-driven runs.
pub mod sim;
/// Counters and report rendering.
pub mod stats;

/// Access kind of a trace record.
pub use crate::common::{AccessKind, ConfigError, Level, SimError, TraceError};
/// Root configuration type; use `HierarchyConfig::default()` or deserialize from JSON.
pub use crate::config::HierarchyConfig;
/// Main engine type; construct with `MemoryHierarchy::new`.
pub use crate::core::MemoryHierarchy;
/// Counter snapshot and report.
pub use crate::stats::{Counters, Report};
