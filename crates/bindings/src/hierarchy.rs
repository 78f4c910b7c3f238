//! Hierarchy Python binding.
//!
//! Exposes the memory hierarchy to Python: build from parameters or a config
//! dict, issue single accesses, run trace files, and read back counters,
//! contents and the text report.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use cachesim_core::common::constants::UNNAMED_TRACE;
use cachesim_core::sim::run_trace;
use cachesim_core::{AccessKind, MemoryHierarchy, Report, TraceError};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::conversion::{config_err, py_dict_to_config, trace_err};
use crate::stats::PyStats;

/// Python-exposed cache hierarchy.
#[pyclass]
#[derive(Debug)]
pub struct PyHierarchy {
    /// Wrapped engine.
    pub inner: MemoryHierarchy,
}

#[pymethods]
impl PyHierarchy {
    /// Builds a hierarchy from the seven run parameters.
    ///
    /// # Errors
    ///
    /// `ValueError` if the geometry is invalid.
    #[new]
    #[pyo3(signature = (block_size, l1_size, l1_assoc, l2_size=0, l2_assoc=1, pref_n=0, pref_m=0))]
    fn new(
        block_size: u32,
        l1_size: u32,
        l1_assoc: u32,
        l2_size: u32,
        l2_assoc: u32,
        pref_n: u32,
        pref_m: u32,
    ) -> PyResult<Self> {
        MemoryHierarchy::new(block_size, l1_size, l1_assoc, l2_size, l2_assoc, pref_n, pref_m)
            .map(|inner| Self { inner })
            .map_err(config_err)
    }

    /// Builds a hierarchy from a config dict; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// `ValueError` if the dict does not describe a valid geometry.
    #[staticmethod]
    fn from_dict(py: Python<'_>, config: &Bound<'_, PyAny>) -> PyResult<Self> {
        let config = py_dict_to_config(py, config)?;
        MemoryHierarchy::from_config(&config)
            .map(|inner| Self { inner })
            .map_err(config_err)
    }

    /// Issues a read of byte address `addr`.
    fn read(&mut self, addr: u32) {
        self.inner.read(addr);
    }

    /// Issues a write of byte address `addr`.
    fn write(&mut self, addr: u32) {
        self.inner.write(addr);
    }

    /// Issues an access given its trace mnemonic (`"r"` or `"w"`).
    ///
    /// # Errors
    ///
    /// `ValueError` for any other kind string.
    fn access(&mut self, kind: &str, addr: u32) -> PyResult<()> {
        let mut chars = kind.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => AccessKind::from_mnemonic(c),
            _ => None,
        }
        .ok_or_else(|| PyValueError::new_err(format!("unknown access kind '{kind}'")))?;
        self.inner.access(kind, addr);
        Ok(())
    }

    /// Runs every record of the trace file at `path`.
    ///
    /// Releases the GIL for the duration of the run.
    ///
    /// # Returns
    ///
    /// The number of records processed.
    ///
    /// # Errors
    ///
    /// `OSError` if the file cannot be read, `ValueError` on a malformed record
    /// (records before it have been applied).
    fn run_trace(&mut self, py: Python<'_>, path: PathBuf) -> PyResult<u64> {
        let inner = &mut self.inner;
        py.allow_threads(|| {
            let file = File::open(&path).map_err(TraceError::Io)?;
            run_trace(inner, BufReader::new(file))
        })
        .map_err(trace_err)
    }

    /// Snapshot of every counter.
    #[getter]
    fn stats(&self) -> PyStats {
        PyStats::from(self.inner.counters())
    }

    /// Cache and stream-buffer contents as a JSON string (MRU first).
    ///
    /// # Errors
    ///
    /// `ValueError` if serialization fails.
    fn dump_state(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.dump_state())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Renders the full text report.
    #[pyo3(signature = (trace_file=None))]
    fn report(&self, trace_file: Option<&str>) -> String {
        let snapshot = self.inner.dump_state();
        Report::new(
            self.inner.config(),
            trace_file.unwrap_or(UNNAMED_TRACE),
            &snapshot,
            self.inner.counters(),
        )
        .to_string()
    }

    fn __repr__(&self) -> String {
        let c = self.inner.config();
        format!(
            "PyHierarchy(block_size={}, l1_size={}, l1_assoc={}, l2_size={}, l2_assoc={}, pref_n={}, pref_m={})",
            c.block_size, c.l1_size, c.l1_assoc, c.l2_size, c.l2_assoc, c.pref_n, c.pref_m
        )
    }
}
