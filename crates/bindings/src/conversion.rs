//! Python↔Rust configuration conversion.
//!
//! Converts Python dicts into the core `HierarchyConfig` via JSON serialization,
//! so the same schema is used from both Python and the CLI's `--config` file.

use cachesim_core::HierarchyConfig;
use cachesim_core::{ConfigError, TraceError};
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

/// Converts a Python dict to a `HierarchyConfig`.
///
/// The dict is serialized to JSON and then deserialized; missing keys take
/// their defaults (e.g. `{"l1_size": 1024, "l1_assoc": 2}`).
///
/// # Errors
///
/// `ValueError` if a key has the wrong type or the dict is not JSON-serializable.
pub fn py_dict_to_config(py: Python<'_>, dict: &Bound<'_, PyAny>) -> PyResult<HierarchyConfig> {
    let json = py.import("json")?;
    let dumps = json.getattr("dumps")?;
    let json_str: String = dumps.call1((dict,))?.extract()?;

    HierarchyConfig::from_json(&json_str)
        .map_err(|e| PyValueError::new_err(format!("Invalid config: {e}")))
}

/// Maps a geometry error to `ValueError`.
pub fn config_err(e: ConfigError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Maps a trace error to `OSError` (unreadable file) or `ValueError` (bad record).
pub fn trace_err(e: TraceError) -> PyErr {
    match e {
        TraceError::Io(io) => PyIOError::new_err(io.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}
