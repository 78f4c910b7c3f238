//! # Configuration Tests
//!
//! Defaults, JSON loading and geometry validation.

use cachesim_core::common::{ConfigError, Level};
use cachesim_core::config::{HierarchyConfig, check_level};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn default_is_plain_l1() {
    let config = HierarchyConfig::default();
    assert_eq!(config, HierarchyConfig::new(32, 8192, 4, 0, 8, 0, 0));
    assert!(!config.has_l2());
    assert!(!config.has_prefetcher());
    assert_eq!(config.last_level(), Level::L1);
    assert!(config.validate().is_ok());
}

/// Absent keys fall back to the defaults.
#[test]
fn json_fills_missing_fields() {
    let config = HierarchyConfig::from_json(r#"{ "l2_size": 65536, "pref_n": 3, "pref_m": 10 }"#)
        .unwrap();
    assert_eq!(config, HierarchyConfig::new(32, 8192, 4, 65536, 8, 3, 10));
    assert!(config.has_l2());
    assert!(config.has_prefetcher());
    assert_eq!(config.last_level(), Level::L2);
    assert_eq!(config.level_geometry(Level::L2), (65536, 8));
}

#[test]
fn json_rejects_mistyped_fields() {
    assert!(HierarchyConfig::from_json(r#"{ "l1_size": "big" }"#).is_err());
    assert!(HierarchyConfig::from_json(r#"{ "l1_size": -1 }"#).is_err());
}

#[test]
fn json_round_trip_preserves_every_field() {
    let config = HierarchyConfig::new(64, 1024, 2, 16384, 4, 2, 6);
    let text = serde_json::to_string(&config).unwrap();
    assert_eq!(HierarchyConfig::from_json(&text).unwrap(), config);
}

// ══════════════════════════════════════════════════════════
// Validation
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::zero_block(HierarchyConfig::new(0, 8192, 4, 0, 0, 0, 0), ConfigError::ZeroParameter { name: "BLOCKSIZE" })]
#[case::odd_block(HierarchyConfig::new(24, 8192, 4, 0, 0, 0, 0), ConfigError::NotPowerOfTwo { name: "BLOCKSIZE", value: 24 })]
#[case::odd_l1_size(HierarchyConfig::new(32, 1000, 4, 0, 0, 0, 0), ConfigError::NotPowerOfTwo { name: "L1_SIZE", value: 1000 })]
#[case::zero_l1_assoc(HierarchyConfig::new(32, 8192, 0, 0, 0, 0, 0), ConfigError::ZeroParameter { name: "L1_ASSOC" })]
#[case::odd_l1_assoc(HierarchyConfig::new(32, 8192, 3, 0, 0, 0, 0), ConfigError::NotPowerOfTwo { name: "L1_ASSOC", value: 3 })]
#[case::l1_set_too_big(
    HierarchyConfig::new(64, 128, 4, 0, 0, 0, 0),
    ConfigError::AssociativityMismatch { level: Level::L1, size: 128, block_size: 64, assoc: 4 }
)]
#[case::odd_l2_size(HierarchyConfig::new(32, 8192, 4, 3000, 8, 0, 0), ConfigError::NotPowerOfTwo { name: "L2_SIZE", value: 3000 })]
#[case::zero_l2_assoc(HierarchyConfig::new(32, 8192, 4, 65536, 0, 0, 0), ConfigError::ZeroParameter { name: "L2_ASSOC" })]
#[case::l2_set_too_big(
    HierarchyConfig::new(32, 1024, 1, 64, 4, 0, 0),
    ConfigError::AssociativityMismatch { level: Level::L2, size: 64, block_size: 32, assoc: 4 }
)]
fn invalid_geometry_is_rejected(#[case] config: HierarchyConfig, #[case] expected: ConfigError) {
    assert_eq!(config.validate(), Err(expected));
}

/// L2 parameters are ignored while the level is disabled.
#[test]
fn disabled_l2_is_not_validated() {
    assert!(HierarchyConfig::new(32, 8192, 4, 0, 3, 0, 0).validate().is_ok());
}

/// Prefetch parameters never fail validation; a zero just disables the bank.
#[rstest]
#[case(0, 0)]
#[case(3, 0)]
#[case(0, 10)]
#[case(7, 5)]
fn prefetch_parameters_are_always_valid(#[case] pref_n: u32, #[case] pref_m: u32) {
    let config = HierarchyConfig::new(32, 8192, 4, 0, 0, pref_n, pref_m);
    assert!(config.validate().is_ok());
    assert_eq!(config.has_prefetcher(), pref_n != 0 && pref_m != 0);
}

/// One set exactly filling the level is a valid fully associative cache.
#[test]
fn fully_associative_level_is_valid() {
    assert!(check_level(Level::L1, 32, 128, 4).is_ok());
    assert!(check_level(Level::L1, 32, 128, 8).is_err());
}
