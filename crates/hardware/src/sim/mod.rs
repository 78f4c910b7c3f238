//! Trace-driven simulation.
//!
//! Provides the trace reader and helpers that feed every record of a trace
//! through a [`MemoryHierarchy`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::common::{SimError, TraceError};
use crate::config::HierarchyConfig;
use crate::core::MemoryHierarchy;

/// Trace line parsing and iteration.
pub mod trace;

pub use self::trace::{TraceReader, TraceRecord, parse_record};

/// Drives every record of `reader` through `hierarchy`.
///
/// Records before a malformed line have already been applied when the error
/// is returned.
///
/// # Returns
///
/// The number of records processed.
///
/// # Errors
///
/// The first [`TraceError`] encountered.
pub fn run_trace<R: BufRead>(
    hierarchy: &mut MemoryHierarchy,
    reader: R,
) -> Result<u64, TraceError> {
    let mut records = 0;
    for record in TraceReader::new(reader) {
        let record = record?;
        hierarchy.access(record.kind, record.address);
        records += 1;
    }
    debug!(records, "trace complete");
    Ok(records)
}

/// Builds a hierarchy from `config` and runs the trace file at `path` through it.
///
/// # Errors
///
/// [`SimError::Config`] for an invalid geometry, [`SimError::Trace`] if the
/// file cannot be opened or contains a malformed record.
pub fn run_trace_file(
    config: &HierarchyConfig,
    path: impl AsRef<Path>,
) -> Result<MemoryHierarchy, SimError> {
    let mut hierarchy = MemoryHierarchy::from_config(config)?;
    let path = path.as_ref();
    let file = File::open(path).map_err(TraceError::Io)?;
    info!(path = %path.display(), "running trace");
    let _records = run_trace(&mut hierarchy, BufReader::new(file))?;
    Ok(hierarchy)
}
