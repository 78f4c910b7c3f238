//! Access Kinds and Hierarchy Levels.
//!
//! This module defines the small enums that flow through every layer of the simulator:
//! 1. **Access Kind:** Whether a trace record reads or writes its address.
//! 2. **Level:** Which cache of the two-level hierarchy an operation targets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type of memory access carried by a trace record.
///
/// Only demand reads and writes exist; a write miss still fetches the block
/// through the read path of the level below (write-allocate).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    /// Data read (`r` in a trace).
    Read,

    /// Data write (`w` in a trace).
    ///
    /// Marks the target line dirty once it is resident.
    Write,
}

impl AccessKind {
    /// Parses the single-character trace mnemonic (`r` or `w`).
    ///
    /// # Returns
    ///
    /// The matching kind, or `None` for any other character.
    pub const fn from_mnemonic(c: char) -> Option<Self> {
        match c {
            'r' => Some(Self::Read),
            'w' => Some(Self::Write),
            _ => None,
        }
    }

    /// Returns the single-character trace mnemonic.
    pub const fn mnemonic(self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
        }
    }

    /// Returns `true` for [`AccessKind::Write`].
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// A cache level of the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    /// First-level cache; every trace record enters here.
    L1,
    /// Optional second-level cache, present when its size is non-zero.
    L2,
}

impl Level {
    /// Dense index used for per-level storage (`L1 = 0`, `L2 = 1`).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::L1 => 0,
            Self::L2 => 1,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
        }
    }
}
