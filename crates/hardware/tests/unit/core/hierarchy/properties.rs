//! # Hierarchy Invariant Tests
//!
//! Randomized geometries and traces checked against the reference LRU-stack
//! model and against the structural invariants of the engine.

use std::collections::HashSet;

use cachesim_core::core::units::cache::CacheLevel;
use cachesim_core::{AccessKind, MemoryHierarchy};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::reference::ReferenceHierarchy;
use crate::common::hierarchy;

/// `(block_size, l1_size, l1_assoc, l2_size, l2_assoc)` with at most 8 L1
/// sets and an optional L2 of up to 16 sets.
fn geometry() -> impl Strategy<Value = (u32, u32, u32, u32, u32)> {
    (
        prop::sample::select(vec![4u32, 8, 16, 32]),
        0u32..=3,
        0u32..=2,
        prop::option::of((0u32..=4, 0u32..=3)),
    )
        .prop_map(|(block, l1_sets, l1_ways, l2)| {
            let l1_assoc = 1 << l1_ways;
            let l1_size = block * (1 << l1_sets) * l1_assoc;
            let (l2_size, l2_assoc) = l2.map_or((0, 0), |(sets, ways)| {
                let assoc = 1 << ways;
                (block * (1 << sets) * assoc, assoc)
            });
            (block, l1_size, l1_assoc, l2_size, l2_assoc)
        })
}

/// Accesses over a 4 KiB window so that sets conflict often.
fn accesses() -> impl Strategy<Value = Vec<(AccessKind, u32)>> {
    prop::collection::vec((any::<bool>(), 0u32..4096), 1..200).prop_map(|ops| {
        ops.into_iter()
            .map(|(write, addr)| {
                let kind = if write {
                    AccessKind::Write
                } else {
                    AccessKind::Read
                };
                (kind, addr)
            })
            .collect()
    })
}

fn check_level(cache: &CacheLevel) -> Result<(), TestCaseError> {
    for set in 0..cache.num_sets() {
        let mut ranks = cache.ranks(set).to_vec();
        ranks.sort_unstable();
        prop_assert_eq!(ranks, (0..cache.associativity() as u32).collect::<Vec<_>>());

        let mut tags = HashSet::new();
        for line in cache.set_contents(set).iter().filter(|l| l.valid) {
            prop_assert!(tags.insert(line.tag), "tag {:#x} twice in set {}", line.tag, set);
        }
    }
    Ok(())
}

fn check_invariants(sim: &MemoryHierarchy) -> Result<(), TestCaseError> {
    check_level(sim.l1())?;
    if let Some(l2) = sim.l2() {
        check_level(l2)?;
    }
    if let Some(bank) = sim.prefetcher() {
        let mut ranks = bank.ranks().to_vec();
        ranks.sort_unstable();
        prop_assert_eq!(ranks, (0..bank.count() as u32).collect::<Vec<_>>());
    }
    Ok(())
}

fn valid_lines(cache: &CacheLevel, set: usize) -> Vec<(u32, bool)> {
    cache
        .set_contents(set)
        .into_iter()
        .filter(|l| l.valid)
        .map(|l| (l.tag, l.dirty))
        .collect()
}

/// Five distinct blocks in an 8 KiB 4-way L1 agree with the reference stack.
#[test]
fn small_trace_matches_reference() {
    let ops = [0u32, 32, 64, 96, 128, 0];
    let mut sim = hierarchy(32, 8192, 4, 0, 0, 0, 0);
    let mut reference = ReferenceHierarchy::new(32, 8192, 4, 0, 0);
    for addr in ops {
        sim.read(addr);
        reference.access(AccessKind::Read, addr);
    }
    assert_eq!(sim.counters(), reference.counters);
}

proptest! {
    /// Without prefetching every counter and every set's recency order match the reference model.
    #[test]
    fn counters_match_reference_model(geometry in geometry(), ops in accesses()) {
        let (block, l1_size, l1_assoc, l2_size, l2_assoc) = geometry;
        let mut sim = MemoryHierarchy::new(block, l1_size, l1_assoc, l2_size, l2_assoc, 0, 0).unwrap();
        let mut reference = ReferenceHierarchy::new(block, l1_size, l1_assoc, l2_size, l2_assoc);

        for &(kind, addr) in &ops {
            sim.access(kind, addr);
            reference.access(kind, addr);
        }

        prop_assert_eq!(sim.counters(), reference.counters);
        for set in 0..reference.l1.num_sets() {
            prop_assert_eq!(valid_lines(sim.l1(), set), reference.l1.set_tags(set));
        }
        if let (Some(l2), Some(ref_l2)) = (sim.l2(), reference.l2.as_ref()) {
            for set in 0..ref_l2.num_sets() {
                prop_assert_eq!(valid_lines(l2, set), ref_l2.set_tags(set));
            }
        }
    }

    /// Ranks stay permutations and tags stay unique after every access.
    #[test]
    fn structural_invariants_hold(
        geometry in geometry(),
        pref_n in 0u32..=3,
        pref_m in 0u32..=4,
        ops in accesses(),
    ) {
        let (block, l1_size, l1_assoc, l2_size, l2_assoc) = geometry;
        let mut sim = MemoryHierarchy::new(block, l1_size, l1_assoc, l2_size, l2_assoc, pref_n, pref_m).unwrap();
        for &(kind, addr) in &ops {
            sim.access(kind, addr);
            check_invariants(&sim)?;
        }
    }

    /// Repeating an access hits and leaves miss and writeback counters unchanged.
    #[test]
    fn repeated_access_hits(
        geometry in geometry(),
        pref_n in 0u32..=3,
        pref_m in 0u32..=4,
        ops in accesses(),
    ) {
        let (block, l1_size, l1_assoc, l2_size, l2_assoc) = geometry;
        let mut sim = MemoryHierarchy::new(block, l1_size, l1_assoc, l2_size, l2_assoc, pref_n, pref_m).unwrap();
        let (&(kind, addr), prefix) = ops.split_last().unwrap();
        for &(k, a) in prefix {
            sim.access(k, a);
        }

        sim.access(kind, addr);
        let before = sim.counters();
        sim.access(kind, addr);
        let after = sim.counters();

        prop_assert_eq!(after.l1_reads + after.l1_writes, before.l1_reads + before.l1_writes + 1);
        prop_assert_eq!(
            (after.l1_read_misses, after.l1_write_misses, after.l1_writebacks),
            (before.l1_read_misses, before.l1_write_misses, before.l1_writebacks)
        );
        prop_assert_eq!(
            (after.l2_reads, after.l2_writes, after.l2_read_misses, after.l2_write_misses, after.l2_writebacks),
            (before.l2_reads, before.l2_writes, before.l2_read_misses, before.l2_write_misses, before.l2_writebacks)
        );
        prop_assert_eq!(sim.demand_traffic(), before.main_memory_traffic - before.l1_prefetches - before.l2_prefetches);
    }

    /// Memory traffic is demand traffic plus all prefetches; demand traffic never
    /// exceeds last-level misses plus writebacks, and equals it without a prefetcher.
    #[test]
    fn traffic_accounting_identity(
        geometry in geometry(),
        pref_n in 0u32..=3,
        pref_m in 0u32..=4,
        ops in accesses(),
    ) {
        let (block, l1_size, l1_assoc, l2_size, l2_assoc) = geometry;
        let mut sim = MemoryHierarchy::new(block, l1_size, l1_assoc, l2_size, l2_assoc, pref_n, pref_m).unwrap();
        for &(kind, addr) in &ops {
            sim.access(kind, addr);
        }

        let c = sim.counters();
        prop_assert_eq!(c.main_memory_traffic, sim.demand_traffic() + c.l1_prefetches + c.l2_prefetches);

        let last = if l2_size != 0 {
            c.l2_read_misses + c.l2_write_misses + c.l2_writebacks
        } else {
            c.l1_read_misses + c.l1_write_misses + c.l1_writebacks
        };
        if sim.prefetcher().is_some() {
            prop_assert!(sim.demand_traffic() <= last);
        } else {
            prop_assert_eq!(sim.demand_traffic(), last);
            prop_assert_eq!(c.l1_prefetches + c.l2_prefetches, 0);
        }
        if l2_size != 0 {
            prop_assert_eq!(c.l1_prefetches, 0);
        }
    }
}
