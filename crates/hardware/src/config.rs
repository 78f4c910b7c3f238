//! Configuration system for the cache simulator.
//!
//! This module defines the run configuration of the hierarchy. It provides:
//! 1. **Defaults:** A baseline 8 KiB 4-way L1 with 32-byte blocks, no L2, no prefetching.
//! 2. **Structure:** The seven geometry parameters of a run.
//! 3. **Validation:** Power-of-two and set-divisibility checks, reported once before any access.
//!
//! Configuration is supplied positionally by the CLI, as JSON via `--config`, or as a
//! Python dict through the bindings; all three deserialize into [`HierarchyConfig`].

use serde::{Deserialize, Serialize};

use crate::common::{ConfigError, Level};

/// Default configuration constants for the simulator.
mod defaults {
    /// Block size in bytes, shared by both levels.
    pub const BLOCK_SIZE: u32 = 32;

    /// L1 capacity in bytes (8 KiB).
    pub const L1_SIZE: u32 = 8192;

    /// L1 associativity.
    pub const L1_ASSOC: u32 = 4;

    /// L2 capacity in bytes; zero disables the level.
    pub const L2_SIZE: u32 = 0;

    /// L2 associativity, used only when the level is enabled.
    pub const L2_ASSOC: u32 = 8;

    /// Number of stream buffers; zero disables prefetching.
    pub const PREF_N: u32 = 0;

    /// Blocks held per stream buffer; zero disables prefetching.
    pub const PREF_M: u32 = 0;
}

/// Geometry of the whole hierarchy.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::HierarchyConfig;
///
/// let config = HierarchyConfig::from_json(
///     r#"{ "block_size": 32, "l1_size": 1024, "l1_assoc": 2, "l2_size": 8192, "l2_assoc": 4 }"#,
/// )
/// .unwrap();
/// assert!(config.has_l2());
/// assert!(!config.has_prefetcher());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Block size in bytes for both levels.
    #[serde(default = "HierarchyConfig::default_block_size")]
    pub block_size: u32,

    /// L1 capacity in bytes.
    #[serde(default = "HierarchyConfig::default_l1_size")]
    pub l1_size: u32,

    /// L1 associativity (ways per set).
    #[serde(default = "HierarchyConfig::default_l1_assoc")]
    pub l1_assoc: u32,

    /// L2 capacity in bytes; `0` means no L2.
    #[serde(default = "HierarchyConfig::default_l2_size")]
    pub l2_size: u32,

    /// L2 associativity.
    #[serde(default = "HierarchyConfig::default_l2_assoc")]
    pub l2_assoc: u32,

    /// Number of stream buffers (`N`).
    #[serde(default = "HierarchyConfig::default_pref_n")]
    pub pref_n: u32,

    /// Depth of each stream buffer in blocks (`M`).
    #[serde(default = "HierarchyConfig::default_pref_m")]
    pub pref_m: u32,
}

impl HierarchyConfig {
    fn default_block_size() -> u32 {
        defaults::BLOCK_SIZE
    }

    fn default_l1_size() -> u32 {
        defaults::L1_SIZE
    }

    fn default_l1_assoc() -> u32 {
        defaults::L1_ASSOC
    }

    fn default_l2_size() -> u32 {
        defaults::L2_SIZE
    }

    fn default_l2_assoc() -> u32 {
        defaults::L2_ASSOC
    }

    fn default_pref_n() -> u32 {
        defaults::PREF_N
    }

    fn default_pref_m() -> u32 {
        defaults::PREF_M
    }

    /// Builds a configuration from the seven positional parameters.
    pub const fn new(
        block_size: u32,
        l1_size: u32,
        l1_assoc: u32,
        l2_size: u32,
        l2_assoc: u32,
        pref_n: u32,
        pref_m: u32,
    ) -> Self {
        Self {
            block_size,
            l1_size,
            l1_assoc,
            l2_size,
            l2_assoc,
            pref_n,
            pref_m,
        }
    }

    /// Parses a JSON object; absent keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON or mistyped fields.
    /// Geometry is not validated here; see [`HierarchyConfig::validate`].
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Returns `true` when an L2 is configured.
    pub const fn has_l2(&self) -> bool {
        self.l2_size != 0
    }

    /// Returns `true` when stream-buffer prefetching is enabled.
    pub const fn has_prefetcher(&self) -> bool {
        self.pref_n != 0 && self.pref_m != 0
    }

    /// The level the prefetcher attaches to: the last configured one.
    pub const fn last_level(&self) -> Level {
        if self.has_l2() { Level::L2 } else { Level::L1 }
    }

    /// Capacity and associativity of `level`.
    pub const fn level_geometry(&self, level: Level) -> (u32, u32) {
        match level {
            Level::L1 => (self.l1_size, self.l1_assoc),
            Level::L2 => (self.l2_size, self.l2_assoc),
        }
    }

    /// Checks every geometry constraint.
    ///
    /// Prefetch parameters are never rejected; a zero in either disables prefetching.
    ///
    /// # Errors
    ///
    /// The first violated constraint, checking the block size, then L1, then L2.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_power_of_two("BLOCKSIZE", self.block_size)?;
        check_level(Level::L1, self.block_size, self.l1_size, self.l1_assoc)?;
        if self.has_l2() {
            check_level(Level::L2, self.block_size, self.l2_size, self.l2_assoc)?;
        }
        Ok(())
    }
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            block_size: defaults::BLOCK_SIZE,
            l1_size: defaults::L1_SIZE,
            l1_assoc: defaults::L1_ASSOC,
            l2_size: defaults::L2_SIZE,
            l2_assoc: defaults::L2_ASSOC,
            pref_n: defaults::PREF_N,
            pref_m: defaults::PREF_M,
        }
    }
}

fn check_power_of_two(name: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroParameter { name });
    }
    if !value.is_power_of_two() {
        return Err(ConfigError::NotPowerOfTwo { name, value });
    }
    Ok(())
}

/// Validates the geometry of one cache level.
///
/// Size and associativity must be non-zero powers of two and one set
/// (`block_size * assoc` bytes) must fit in `size`. With every operand a power
/// of two, fitting implies dividing, so the set count is itself a power of two.
///
/// # Errors
///
/// [`ConfigError`] naming the first offending parameter.
pub fn check_level(
    level: Level,
    block_size: u32,
    size: u32,
    assoc: u32,
) -> Result<(), ConfigError> {
    let (size_name, assoc_name) = match level {
        Level::L1 => ("L1_SIZE", "L1_ASSOC"),
        Level::L2 => ("L2_SIZE", "L2_ASSOC"),
    };
    check_power_of_two("BLOCKSIZE", block_size)?;
    check_power_of_two(size_name, size)?;
    check_power_of_two(assoc_name, assoc)?;

    let set_bytes = u64::from(block_size) * u64::from(assoc);
    if set_bytes > u64::from(size) {
        return Err(ConfigError::AssociativityMismatch {
            level,
            size,
            block_size,
            assoc,
        });
    }
    Ok(())
}
