//! Statistics Python binding.
//!
//! Exposes the counter snapshot to Python: one getter per counter, the two
//! miss rates, and `to_dict` for JSON-serializable export in sweep scripts.

use cachesim_core::Counters;
use pyo3::prelude::*;
use pyo3::types::PyDict;

/// Python-exposed statistics: a frozen copy of the hierarchy counters.
#[pyclass]
#[derive(Clone, Debug)]
pub struct PyStats {
    /// Wrapped snapshot.
    pub inner: Counters,
}

#[pymethods]
impl PyStats {
    #[getter]
    fn l1_reads(&self) -> u64 {
        self.inner.l1_reads
    }
    #[getter]
    fn l1_read_misses(&self) -> u64 {
        self.inner.l1_read_misses
    }
    #[getter]
    fn l1_writes(&self) -> u64 {
        self.inner.l1_writes
    }
    #[getter]
    fn l1_write_misses(&self) -> u64 {
        self.inner.l1_write_misses
    }
    #[getter]
    fn l1_writebacks(&self) -> u64 {
        self.inner.l1_writebacks
    }
    #[getter]
    fn l1_prefetches(&self) -> u64 {
        self.inner.l1_prefetches
    }
    #[getter]
    fn l2_reads(&self) -> u64 {
        self.inner.l2_reads
    }
    #[getter]
    fn l2_read_misses(&self) -> u64 {
        self.inner.l2_read_misses
    }
    #[getter]
    fn l2_writes(&self) -> u64 {
        self.inner.l2_writes
    }
    #[getter]
    fn l2_write_misses(&self) -> u64 {
        self.inner.l2_write_misses
    }
    #[getter]
    fn l2_writebacks(&self) -> u64 {
        self.inner.l2_writebacks
    }
    #[getter]
    fn l2_prefetches(&self) -> u64 {
        self.inner.l2_prefetches
    }
    #[getter]
    fn main_memory_traffic(&self) -> u64 {
        self.inner.main_memory_traffic
    }
    #[getter]
    fn l1_miss_rate(&self) -> f64 {
        self.inner.l1_miss_rate()
    }
    #[getter]
    fn l2_miss_rate(&self) -> f64 {
        self.inner.l2_miss_rate()
    }

    /// Export all counters as a Python dict (JSON-serializable).
    fn to_dict(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let d = PyDict::new(py);
        let s = &self.inner;
        d.set_item("l1_reads", s.l1_reads)?;
        d.set_item("l1_read_misses", s.l1_read_misses)?;
        d.set_item("l1_writes", s.l1_writes)?;
        d.set_item("l1_write_misses", s.l1_write_misses)?;
        d.set_item("l1_writebacks", s.l1_writebacks)?;
        d.set_item("l1_prefetches", s.l1_prefetches)?;
        d.set_item("l2_reads", s.l2_reads)?;
        d.set_item("l2_read_misses", s.l2_read_misses)?;
        d.set_item("l2_writes", s.l2_writes)?;
        d.set_item("l2_write_misses", s.l2_write_misses)?;
        d.set_item("l2_writebacks", s.l2_writebacks)?;
        d.set_item("l2_prefetches", s.l2_prefetches)?;
        d.set_item("main_memory_traffic", s.main_memory_traffic)?;

        d.set_item("l1_miss_rate", s.l1_miss_rate())?;
        d.set_item("l2_miss_rate", s.l2_miss_rate())?;

        Ok(d.into())
    }

    fn __repr__(&self) -> String {
        format!(
            "PyStats(l1_reads={}, l1_writes={}, l1_miss_rate={:.4}, main_memory_traffic={})",
            self.inner.l1_reads,
            self.inner.l1_writes,
            self.inner.l1_miss_rate(),
            self.inner.main_memory_traffic
        )
    }
}

impl From<Counters> for PyStats {
    fn from(inner: Counters) -> Self {
        Self { inner }
    }
}
