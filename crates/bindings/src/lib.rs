//! Python bindings for the cache hierarchy simulator.
//!
//! This crate exposes the simulator to Python via PyO3. It provides:
//! 1. **Hierarchy:** `PyHierarchy` for building a hierarchy, issuing accesses and running traces.
//! 2. **Statistics:** `PyStats` for the counter snapshot and dict export.
//! 3. **Utilities:** Version string, logging setup and dict-to-config conversion.

use pyo3::prelude::*;

/// Python dict to Rust `HierarchyConfig` conversion.
pub mod conversion;
/// Hierarchy binding (`PyHierarchy`).
pub mod hierarchy;
/// Statistics binding (`PyStats`).
pub mod stats;
/// Utility functions (version, logging).
pub mod utils;

/// Registers all simulator classes and functions onto the given Python module.
///
/// # Arguments
///
/// * `m` - The Python module to register types and functions on.
///
/// # Returns
///
/// `Ok(())` on success, or a `PyErr` if registration fails.
pub fn register_simulator_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<hierarchy::PyHierarchy>()?;
    m.add_class::<stats::PyStats>()?;

    m.add_function(wrap_pyfunction!(utils::version, m)?)?;
    m.add_function(wrap_pyfunction!(utils::init_logging, m)?)?;

    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_simulator_module(m)
}
