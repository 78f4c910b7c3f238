//! Simulation statistics collection and reporting.
//!
//! This module tracks and renders the results of a run. It provides:
//! 1. **Level counters:** Reads, writes, their misses, writebacks and prefetches per level.
//! 2. **Snapshot:** The flat [`Counters`] record handed to callers (serializable to JSON).
//! 3. **Report:** The classic text report: configuration, cache and stream-buffer
//!    contents, and the lettered measurement block.

use std::fmt;

use serde::Serialize;

use crate::common::AccessKind;
use crate::config::HierarchyConfig;
use crate::core::HierarchySnapshot;
use crate::core::units::cache::LineView;

/// Monotonic counters of one cache level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// Read requests received.
    pub reads: u64,
    /// Read requests that missed.
    pub read_misses: u64,
    /// Write requests received.
    pub writes: u64,
    /// Write requests that missed.
    pub write_misses: u64,
    /// Dirty victims written to the next level or memory.
    pub writebacks: u64,
    /// Blocks newly brought into this level's stream buffers.
    pub prefetches: u64,
}

impl LevelStats {
    /// Counts an incoming request.
    #[inline]
    pub const fn record_access(&mut self, kind: AccessKind) {
        match kind {
            AccessKind::Read => self.reads += 1,
            AccessKind::Write => self.writes += 1,
        }
    }

    /// Counts a miss of the given kind.
    #[inline]
    pub const fn record_miss(&mut self, kind: AccessKind) {
        match kind {
            AccessKind::Read => self.read_misses += 1,
            AccessKind::Write => self.write_misses += 1,
        }
    }

    /// `(read_misses + write_misses) / (reads + writes)`, or 0 with no accesses.
    pub fn miss_rate(&self) -> f64 {
        let accesses = self.reads + self.writes;
        if accesses == 0 {
            0.0
        } else {
            (self.read_misses + self.write_misses) as f64 / accesses as f64
        }
    }

    /// `read_misses / reads`, or 0 with no reads.
    pub fn read_miss_rate(&self) -> f64 {
        if self.reads == 0 {
            0.0
        } else {
            self.read_misses as f64 / self.reads as f64
        }
    }
}

/// Counter snapshot of a whole run.
///
/// `main_memory_traffic` is the total memory-bus traffic: demand misses and
/// writebacks that reached memory plus every prefetched block of both levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    /// L1 read requests.
    pub l1_reads: u64,
    /// L1 read misses.
    pub l1_read_misses: u64,
    /// L1 write requests.
    pub l1_writes: u64,
    /// L1 write misses.
    pub l1_write_misses: u64,
    /// L1 dirty evictions.
    pub l1_writebacks: u64,
    /// Blocks prefetched at L1.
    pub l1_prefetches: u64,
    /// L2 read requests (demand fetches from L1).
    pub l2_reads: u64,
    /// L2 read misses.
    pub l2_read_misses: u64,
    /// L2 write requests (L1 writebacks).
    pub l2_writes: u64,
    /// L2 write misses.
    pub l2_write_misses: u64,
    /// L2 dirty evictions.
    pub l2_writebacks: u64,
    /// Blocks prefetched at L2.
    pub l2_prefetches: u64,
    /// Total main-memory traffic in blocks.
    pub main_memory_traffic: u64,
}

impl Counters {
    /// L1 combined miss rate.
    pub fn l1_miss_rate(&self) -> f64 {
        LevelStats {
            reads: self.l1_reads,
            read_misses: self.l1_read_misses,
            writes: self.l1_writes,
            write_misses: self.l1_write_misses,
            ..LevelStats::default()
        }
        .miss_rate()
    }

    /// L2 demand read miss rate.
    pub fn l2_miss_rate(&self) -> f64 {
        LevelStats {
            reads: self.l2_reads,
            read_misses: self.l2_read_misses,
            ..LevelStats::default()
        }
        .read_miss_rate()
    }
}

/// Human-readable end-of-run report.
///
/// Rendering is byte-compatible with the classic course simulator output so
/// results can be diffed against reference runs.
#[derive(Debug)]
pub struct Report<'a> {
    config: &'a HierarchyConfig,
    trace_file: &'a str,
    snapshot: &'a HierarchySnapshot,
    counters: Counters,
}

impl<'a> Report<'a> {
    /// Assembles a report.
    pub const fn new(
        config: &'a HierarchyConfig,
        trace_file: &'a str,
        snapshot: &'a HierarchySnapshot,
        counters: Counters,
    ) -> Self {
        Self {
            config,
            trace_file,
            snapshot,
            counters,
        }
    }

    /// Writes only the configuration block.
    ///
    /// # Errors
    ///
    /// Propagates formatter errors.
    pub fn write_configuration(&self, f: &mut impl fmt::Write) -> fmt::Result {
        let c = self.config;
        writeln!(f, "===== Simulator configuration =====")?;
        writeln!(f, "BLOCKSIZE:  {}", c.block_size)?;
        writeln!(f, "L1_SIZE:    {}", c.l1_size)?;
        writeln!(f, "L1_ASSOC:   {}", c.l1_assoc)?;
        writeln!(f, "L2_SIZE:    {}", c.l2_size)?;
        writeln!(f, "L2_ASSOC:   {}", c.l2_assoc)?;
        writeln!(f, "PREF_N:     {}", c.pref_n)?;
        writeln!(f, "PREF_M:     {}", c.pref_m)?;
        writeln!(f, "trace_file: {}", self.trace_file)?;
        writeln!(f)
    }

    /// Writes the cache and stream-buffer contents.
    ///
    /// # Errors
    ///
    /// Propagates formatter errors.
    pub fn write_contents(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write_sets(f, "L1", &self.snapshot.l1, " D ", "  ")?;
        if let Some(l2) = &self.snapshot.l2 {
            writeln!(f)?;
            write_sets(f, "L2", l2, " D   ", "     ")?;
        }
        if let Some(buffers) = &self.snapshot.stream_buffers {
            writeln!(f)?;
            writeln!(f, "===== Stream Buffer(s) contents =====")?;
            for buffer in buffers {
                for block in buffer {
                    write!(f, " {block:x}  ")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }

    /// Writes the lettered measurement block.
    ///
    /// # Errors
    ///
    /// Propagates formatter errors.
    pub fn write_measurements(&self, f: &mut impl fmt::Write) -> fmt::Result {
        let s = &self.counters;
        let l2_miss_rate = if self.config.has_l2() {
            s.l2_miss_rate()
        } else {
            0.0
        };
        writeln!(f)?;
        writeln!(f, "===== Measurements =====")?;
        writeln!(f, "a. L1 reads:                   {}", s.l1_reads)?;
        writeln!(f, "b. L1 read misses:             {}", s.l1_read_misses)?;
        writeln!(f, "c. L1 writes:                  {}", s.l1_writes)?;
        writeln!(f, "d. L1 write misses:            {}", s.l1_write_misses)?;
        writeln!(f, "e. L1 miss rate:               {:.4}", s.l1_miss_rate())?;
        writeln!(f, "f. L1 writebacks:              {}", s.l1_writebacks)?;
        writeln!(f, "g. L1 prefetches:              {}", s.l1_prefetches)?;
        writeln!(f, "h. L2 reads (demand):          {}", s.l2_reads)?;
        writeln!(f, "i. L2 read misses (demand):    {}", s.l2_read_misses)?;
        writeln!(f, "j. L2 reads (prefetch):        0")?;
        writeln!(f, "k. L2 read misses (prefetch):  0")?;
        writeln!(f, "l. L2 writes:                  {}", s.l2_writes)?;
        writeln!(f, "m. L2 write misses:            {}", s.l2_write_misses)?;
        writeln!(f, "n. L2 miss rate:               {l2_miss_rate:.4}")?;
        writeln!(f, "o. L2 writebacks:              {}", s.l2_writebacks)?;
        writeln!(f, "p. L2 prefetches:              {}", s.l2_prefetches)?;
        writeln!(f, "q. memory traffic:             {}", s.main_memory_traffic)
    }
}

/// One `set <n>:` row per set, tags MRU → LRU.
fn write_sets(
    f: &mut impl fmt::Write,
    name: &str,
    sets: &[Vec<LineView>],
    dirty: &str,
    clean: &str,
) -> fmt::Result {
    writeln!(f, "===== {name} contents =====")?;
    for (index, lines) in sets.iter().enumerate() {
        write!(f, "set      {index:>4}:   ")?;
        for line in lines {
            let marker = if line.dirty { dirty } else { clean };
            write!(f, "{:x}{marker}", line.tag)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_configuration(f)?;
        self.write_contents(f)?;
        self.write_measurements(f)
    }
}
