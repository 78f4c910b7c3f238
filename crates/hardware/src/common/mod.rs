//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Address Decoding:** Tag / index / offset extraction for a cache geometry.
//! 2. **Constants:** Address width and report labels.
//! 3. **Access Kinds:** Read/write classification and hierarchy level identifiers.
//! 4. **Error Handling:** Configuration, trace and simulation error types.

/// Address decomposition (tag, set index, block offset).
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Access kind and level definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{AddressDecoder, DecodedAddr};
pub use constants::ADDRESS_BITS;
pub use data::{AccessKind, Level};
pub use error::{ConfigError, SimError, TraceError};
