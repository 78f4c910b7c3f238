//! Error definitions.
//!
//! The engine itself cannot fail once built; errors only arise at its edges:
//! 1. **Configuration:** Geometry that cannot be laid out as a set-associative cache.
//! 2. **Trace Input:** Unreadable files and records that do not parse.
//! 3. **Simulation:** The union of the two for one-shot build-and-run helpers.

use thiserror::Error;

use super::data::Level;

/// Invalid cache geometry, detected once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A parameter that must be positive was zero.
    #[error("{name} must be non-zero")]
    ZeroParameter {
        /// Parameter name as it appears on the command line.
        name: &'static str,
    },

    /// A size or associativity that must be a power of two was not.
    #[error("{name} must be a power of two (got {value})")]
    NotPowerOfTwo {
        /// Parameter name as it appears on the command line.
        name: &'static str,
        /// Offending value.
        value: u32,
    },

    /// `block_size * assoc` does not divide the level size, leaving no whole set.
    #[error(
        "{level} cannot hold a {assoc}-way set of {block_size}-byte blocks in {size} bytes"
    )]
    AssociativityMismatch {
        /// Level being configured.
        level: Level,
        /// Level capacity in bytes.
        size: u32,
        /// Block size in bytes.
        block_size: u32,
        /// Requested associativity.
        assoc: u32,
    },
}

/// Failure while reading or parsing a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Underlying reader failed.
    #[error("unable to read trace: {0}")]
    Io(#[from] std::io::Error),

    /// Line does not have the `<kind> <hex address>` shape.
    #[error("malformed trace record at line {line}: {text:?}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Offending line, trimmed.
        text: String,
    },

    /// Access kind is neither `r` nor `w`.
    #[error("unknown request type {kind:?} at line {line}")]
    UnknownKind {
        /// 1-based line number.
        line: usize,
        /// Offending kind token.
        kind: String,
    },

    /// Address field is not a 32-bit hexadecimal number.
    #[error("invalid address {text:?} at line {line}")]
    BadAddress {
        /// 1-based line number.
        line: usize,
        /// Offending address token.
        text: String,
    },
}

/// Errors from building a hierarchy and running a trace through it in one step.
#[derive(Debug, Error)]
pub enum SimError {
    /// Hierarchy could not be constructed.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Trace could not be read to completion.
    #[error(transparent)]
    Trace(#[from] TraceError),
}
