//! Global Simulator Constants.

/// Width of a trace address in bits.
pub const ADDRESS_BITS: u32 = 32;

/// Label printed for the trace file when the engine is driven without one.
pub const UNNAMED_TRACE: &str = "<stdin>";
