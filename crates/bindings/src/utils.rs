//! Utility functions exposed to Python.

use pyo3::prelude::*;
use tracing_subscriber::EnvFilter;

/// Returns the simulator version string.
#[pyfunction]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Routes simulator diagnostics to stderr.
///
/// `filter` uses `RUST_LOG` syntax (e.g. `"cachesim_core=trace"`); when
/// omitted, `RUST_LOG` itself is read, falling back to `"warn"`. Calling this
/// more than once keeps the first subscriber.
///
/// # Returns
///
/// `True` if this call installed the subscriber.
#[pyfunction]
#[pyo3(signature = (filter=None))]
pub fn init_logging(filter: Option<&str>) -> bool {
    let filter = filter.map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        EnvFilter::new,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
