//! Rank-Based LRU Tests.
//!
//! `update(set, way)` must promote `way` to rank 0 and age only the ways that
//! were more recent than it; `get_victim(set)` returns the way at rank
//! `ways - 1`.

use cachesim_core::core::units::cache::lru::LruPolicy;

use crate::common::assert_rank_permutation;

// ══════════════════════════════════════════════════════════
// 1. Initial state
// ══════════════════════════════════════════════════════════

/// Way `w` starts at rank `w`, so the last way is the first victim.
#[test]
fn initial_ranks_follow_way_order() {
    let policy = LruPolicy::new(2, 4);
    assert_eq!(policy.ranks(0), &[0, 1, 2, 3]);
    assert_eq!(policy.ranks(1), &[0, 1, 2, 3]);
    assert_eq!(policy.get_victim(0), 3);
    assert_eq!(policy.order(0), vec![0, 1, 2, 3]);
}

// ══════════════════════════════════════════════════════════
// 2. Promotion
// ══════════════════════════════════════════════════════════

/// Only ranks below the promoted way's old rank shift.
#[test]
fn update_ages_only_more_recent_ways() {
    let mut policy = LruPolicy::new(1, 4);

    policy.update(0, 2);
    // Ways 0 and 1 were more recent than way 2; way 3 was older.
    assert_eq!(policy.ranks(0), &[1, 2, 0, 3]);
    assert_eq!(policy.get_victim(0), 3);

    policy.update(0, 3);
    assert_eq!(policy.ranks(0), &[2, 3, 1, 0]);
    assert_eq!(policy.get_victim(0), 1);
    assert_eq!(policy.order(0), vec![3, 2, 0, 1]);
}

/// Classic scenario: touch 0..3 in order, then re-touch 0.
#[test]
fn evicts_true_lru_after_reaccess() {
    let mut policy = LruPolicy::new(1, 4);
    for w in 0..4 {
        policy.update(0, w);
    }
    assert_eq!(policy.get_victim(0), 0);

    policy.update(0, 0);
    assert_eq!(policy.get_victim(0), 1);

    policy.update(0, 1);
    assert_eq!(policy.get_victim(0), 2);
}

/// Promoting the MRU way changes nothing.
#[test]
fn update_of_mru_is_a_no_op() {
    let mut policy = LruPolicy::new(1, 4);
    policy.update(0, 1);
    let before = policy.ranks(0).to_vec();
    policy.update(0, 1);
    assert_eq!(policy.ranks(0), before.as_slice());
}

/// Sets are ordered independently.
#[test]
fn sets_are_independent() {
    let mut policy = LruPolicy::new(2, 4);
    policy.update(0, 3);
    assert_eq!(policy.ranks(0), &[1, 2, 3, 0]);
    assert_eq!(policy.ranks(1), &[0, 1, 2, 3]);
    assert_eq!(policy.get_victim(1), 3);
    assert_eq!(policy.get_victim(0), 2);
}

/// Direct-mapped: the only way is always the victim.
#[test]
fn single_way_is_always_victim() {
    let mut policy = LruPolicy::new(4, 1);
    policy.update(2, 0);
    assert_eq!(policy.get_victim(2), 0);
    assert_eq!(policy.rank(2, 0), 0);
}

/// Any update sequence keeps each set's ranks a permutation.
#[test]
fn ranks_stay_a_permutation() {
    let mut policy = LruPolicy::new(1, 8);
    for w in [3, 7, 0, 0, 5, 3, 1, 6, 2, 7, 4] {
        policy.update(0, w);
        assert_rank_permutation(policy.ranks(0));
        assert_eq!(policy.order(0)[0], w);
    }
}
