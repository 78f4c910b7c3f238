//! Memory Hierarchy Controller.
//!
//! This module composes the L1, the optional L2 and the optional stream-buffer
//! bank into one engine and implements the access protocol:
//! 1. **Lookup:** Decode against the target level, probe the prefetcher if it is
//!    attached there, then probe the cache set.
//! 2. **Hit:** Promote the line, dirty it on writes, and continue the stream if
//!    the prefetcher also holds the block.
//! 3. **Miss:** Write back a dirty LRU victim (into L2, or to memory from the last
//!    level), fetch the block from L2 or from memory / the stream buffers, and fill.
//!
//! Every access is a plain nested call; an L1 miss recurses into L2 through the
//! same protocol. Nothing can fail once the hierarchy is built.

use serde::Serialize;
use tracing::{debug, trace};

use crate::common::{AccessKind, ConfigError, Level};
use crate::config::HierarchyConfig;
use crate::core::units::cache::{CacheLevel, LineView};
use crate::core::units::prefetch::StreamBufferBank;
use crate::stats::{Counters, LevelStats};

/// Read-only picture of every line and stream buffer, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchySnapshot {
    /// L1 sets, each ordered MRU → LRU.
    pub l1: Vec<Vec<LineView>>,
    /// L2 sets, each ordered MRU → LRU; `None` without an L2.
    pub l2: Option<Vec<Vec<LineView>>>,
    /// Stream buffers ordered MRU → LRU; `None` without a prefetcher.
    pub stream_buffers: Option<Vec<Vec<u32>>>,
}

/// Two-level write-back, write-allocate cache hierarchy with stream-buffer prefetching.
#[derive(Debug, Clone)]
pub struct MemoryHierarchy {
    config: HierarchyConfig,
    l1: CacheLevel,
    l2: Option<CacheLevel>,
    prefetcher: Option<StreamBufferBank>,
    stats: [LevelStats; 2],
    /// Demand misses and writebacks that reached main memory.
    memory_traffic: u64,
}

impl MemoryHierarchy {
    /// Builds a hierarchy from the seven run parameters.
    ///
    /// `l2_size == 0` disables L2; `pref_n == 0` or `pref_m == 0` disables prefetching.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the geometry is invalid.
    pub fn new(
        block_size: u32,
        l1_size: u32,
        l1_assoc: u32,
        l2_size: u32,
        l2_assoc: u32,
        pref_n: u32,
        pref_m: u32,
    ) -> Result<Self, ConfigError> {
        Self::from_config(&HierarchyConfig::new(
            block_size, l1_size, l1_assoc, l2_size, l2_assoc, pref_n, pref_m,
        ))
    }

    /// Builds a hierarchy from a configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the geometry is invalid.
    pub fn from_config(config: &HierarchyConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let l1 = CacheLevel::new(Level::L1, config.block_size, config.l1_size, config.l1_assoc)?;
        let l2 = if config.has_l2() {
            Some(CacheLevel::new(
                Level::L2,
                config.block_size,
                config.l2_size,
                config.l2_assoc,
            )?)
        } else {
            None
        };
        let prefetcher = StreamBufferBank::new(config.pref_n as usize, config.pref_m as usize);

        debug!(
            l1_sets = l1.num_sets(),
            l1_ways = l1.associativity(),
            l1_index_bits = l1.decoder().index_bits(),
            l1_tag_bits = l1.decoder().tag_bits(),
            l2_sets = l2.as_ref().map_or(0, CacheLevel::num_sets),
            l2_ways = l2.as_ref().map_or(0, CacheLevel::associativity),
            stream_buffers = prefetcher.as_ref().map_or(0, StreamBufferBank::count),
            prefetch_level = %config.last_level(),
            "hierarchy built"
        );

        Ok(Self {
            config: *config,
            l1,
            l2,
            prefetcher,
            stats: [LevelStats::default(); 2],
            memory_traffic: 0,
        })
    }

    /// The configuration this hierarchy was built from.
    pub const fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// The L1 cache.
    pub const fn l1(&self) -> &CacheLevel {
        &self.l1
    }

    /// The L2 cache, if configured.
    pub const fn l2(&self) -> Option<&CacheLevel> {
        self.l2.as_ref()
    }

    /// The stream-buffer bank, if prefetching is enabled.
    pub const fn prefetcher(&self) -> Option<&StreamBufferBank> {
        self.prefetcher.as_ref()
    }

    /// The level the prefetcher is attached to (the last configured level).
    pub const fn prefetch_level(&self) -> Level {
        if self.l2.is_some() { Level::L2 } else { Level::L1 }
    }

    /// Counters of a single level.
    pub const fn level_stats(&self, level: Level) -> &LevelStats {
        &self.stats[level.index()]
    }

    /// Main-memory accesses from demand misses and writebacks, excluding prefetches.
    pub const fn demand_traffic(&self) -> u64 {
        self.memory_traffic
    }

    /// Processes one trace record.
    pub fn access(&mut self, kind: AccessKind, address: u32) {
        self.access_level(Level::L1, kind, address);
    }

    /// Shorthand for `access(AccessKind::Read, address)`.
    pub fn read(&mut self, address: u32) {
        self.access(AccessKind::Read, address);
    }

    /// Shorthand for `access(AccessKind::Write, address)`.
    pub fn write(&mut self, address: u32) {
        self.access(AccessKind::Write, address);
    }

    /// Snapshot of every counter.
    ///
    /// `main_memory_traffic` includes all prefetches of both levels on top of
    /// the demand traffic.
    pub const fn counters(&self) -> Counters {
        let l1 = &self.stats[0];
        let l2 = &self.stats[1];
        Counters {
            l1_reads: l1.reads,
            l1_read_misses: l1.read_misses,
            l1_writes: l1.writes,
            l1_write_misses: l1.write_misses,
            l1_writebacks: l1.writebacks,
            l1_prefetches: l1.prefetches,
            l2_reads: l2.reads,
            l2_read_misses: l2.read_misses,
            l2_writes: l2.writes,
            l2_write_misses: l2.write_misses,
            l2_writebacks: l2.writebacks,
            l2_prefetches: l2.prefetches,
            main_memory_traffic: self.memory_traffic + l1.prefetches + l2.prefetches,
        }
    }

    /// Contents of every cache line and stream buffer, ordered by recency.
    pub fn dump_state(&self) -> HierarchySnapshot {
        HierarchySnapshot {
            l1: self.l1.contents(),
            l2: self.l2.as_ref().map(CacheLevel::contents),
            stream_buffers: self.prefetcher.as_ref().map(StreamBufferBank::contents),
        }
    }

    fn cache(&self, level: Level) -> &CacheLevel {
        match (level, &self.l2) {
            (Level::L2, Some(l2)) => l2,
            _ => &self.l1,
        }
    }

    fn cache_mut(&mut self, level: Level) -> &mut CacheLevel {
        match (level, &mut self.l2) {
            (Level::L2, Some(l2)) => l2,
            _ => &mut self.l1,
        }
    }

    /// Runs the read/write protocol at `level`.
    fn access_level(&mut self, level: Level, kind: AccessKind, addr: u32) {
        let li = level.index();
        self.stats[li].record_access(kind);

        let cache = self.cache(level);
        let decoded = cache.decode(addr);
        let set = decoded.index as usize;
        let block = cache.block_address(addr);
        let hit_way = cache.probe(set, decoded.tag);

        let attached = self.prefetch_level() == level;
        let stream_hit = if attached {
            self.prefetcher.as_ref().and_then(|bank| bank.probe(block))
        } else {
            None
        };

        if let Some(way) = hit_way {
            let cache = self.cache_mut(level);
            cache.touch(set, way);
            if kind.is_write() {
                cache.mark_dirty(set, way);
            }
            // A hit alone neither grows nor restarts a stream.
            if let (Some(buffer), Some(bank)) = (stream_hit, self.prefetcher.as_mut()) {
                self.stats[li].prefetches += bank.refill_from_hit(buffer, block);
            }
            return;
        }

        let victim = self.cache(level).victim(set);
        if let Some(victim_addr) = self.cache(level).dirty_victim_address(set, victim) {
            self.stats[li].writebacks += 1;
            if level == Level::L1 && self.l2.is_some() {
                self.access_level(Level::L2, AccessKind::Write, victim_addr);
            } else {
                self.memory_traffic += 1;
            }
        }

        if level == Level::L1 && self.l2.is_some() {
            // Read-for-ownership: the write side was already used by the writeback.
            self.access_level(Level::L2, AccessKind::Read, addr);
            self.stats[li].record_miss(kind);
        } else {
            let bank = if attached { self.prefetcher.as_mut() } else { None };
            match (bank, stream_hit) {
                (Some(bank), Some(buffer)) => {
                    // An L2 write miss served by a stream buffer is not counted as a miss.
                    if !(level == Level::L2 && kind.is_write()) {
                        self.stats[li].record_miss(kind);
                    }
                    self.stats[li].prefetches += bank.refill_from_hit(buffer, block);
                    trace!(cache = %level, block, buffer, "miss served by stream buffer");
                }
                (Some(bank), None) => {
                    self.stats[li].record_miss(kind);
                    self.memory_traffic += 1;
                    self.stats[li].prefetches += bank.refill_from_miss(block);
                }
                (None, _) => {
                    self.stats[li].record_miss(kind);
                    self.memory_traffic += 1;
                }
            }
        }

        let cache = self.cache_mut(level);
        cache.fill(set, victim, decoded.tag);
        if kind.is_write() {
            cache.mark_dirty(set, victim);
        }
    }
}
