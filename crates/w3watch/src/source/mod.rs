//! Adapters that supply raw samples.
//!
//! Two flavors exist: a process-snapshot adapter (per-OS-process attributes)
//! and a performance-counter adapter (per-instance counter values for a named
//! category). Both are traits so the collection pipeline can be driven by
//! fakes in tests; the counter engine shipped with the daemon is a stub that
//! reports every category unavailable on hosts without a counter subsystem.

use std::collections::HashMap;

use thiserror::Error;

pub mod counters;
pub mod process;

/// Failure to open a source at build time. A source that cannot be opened
/// under any of its names is disabled for the collector's lifetime.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("counter category `{0}` is not present on this host")]
    MissingCategory(String),
    #[error("counter subsystem unavailable: {0}")]
    Unsupported(String),
}

/// Failure of a live source to produce records for one cycle.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("failed to enumerate instances: {0}")]
    Enumeration(String),
    #[error("counter read failed: {0}")]
    Read(String),
}

/// Outcome of a single optional attribute read. Callers decide whether an
/// unavailable reading drops the record or only omits one measurement.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading<T> {
    Value(T),
    Unavailable,
}

impl<T> Reading<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Unavailable => None,
        }
    }

    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            Reading::Value(v) => v,
            Reading::Unavailable => fallback,
        }
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Reading::Value(v),
            None => Reading::Unavailable,
        }
    }
}

/// One row produced by a counter category for one cycle. Field keys are the
/// logical field names declared in the category's binding table; a counter
/// that could not be read for this instance is simply absent from the map.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    pub instance: String,
    pub fields: HashMap<&'static str, f64>,
}

impl RawRecord {
    pub fn field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }
}

/// One row produced by the process snapshot for one cycle. Every attribute
/// except the pid may fail independently.
#[derive(Debug, Clone)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub username: Reading<String>,
    pub cmdline: Reading<String>,
    pub status: Reading<String>,
    pub cpu_percent: Reading<f64>,
    pub memory_bytes: Reading<u64>,
}

/// Opens counter categories by name. Opening resolves once at collector
/// build time; the returned session is sampled every cycle thereafter.
pub trait CounterEngine {
    fn open(
        &self,
        category: &str,
        instance_filter: Option<&str>,
    ) -> Result<Box<dyn CounterSession>, OpenError>;
}

/// A live handle onto one counter category.
pub trait CounterSession {
    fn sample(&mut self) -> Result<Vec<RawRecord>, SampleError>;
}

/// Enumerates live OS processes with their resource attributes.
pub trait ProcessLister {
    fn snapshot(&mut self) -> Result<Vec<ProcessRecord>, SampleError>;
}
