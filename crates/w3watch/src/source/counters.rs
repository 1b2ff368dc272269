//! Statically declared counter-category bindings.
//!
//! Each category binds logical field names to counter names within that
//! category. The tables are plain constants built into the collector at
//! build time; there is no runtime reflection and no configuration surface
//! for them.

use super::{CounterEngine, CounterSession, OpenError};

// Logical field names, shared between binding tables and emission.
pub const REQUESTS_SEC: &str = "requests_sec";
pub const REQUESTS_EXECUTING: &str = "requests_executing";
pub const REQUESTS_TOTAL: &str = "requests_total";
pub const ERRORS_SEC: &str = "errors_sec";
pub const OUTPUT_CACHE_TURNOVER: &str = "output_cache_turnover";

pub const CPU_PERCENT: &str = "cpu_percent";
pub const WORKING_SET_PRIVATE: &str = "working_set_private";
pub const IO_READ_BYTES_SEC: &str = "io_read_bytes_sec";
pub const IO_WRITE_BYTES_SEC: &str = "io_write_bytes_sec";
pub const ID_PROCESS: &str = "id_process";

pub const GC_TIME_PERCENT: &str = "gc_time_percent";
pub const HEAP_BYTES: &str = "heap_bytes";
pub const GEN0_COLLECTIONS: &str = "gen0_collections";
pub const GEN1_COLLECTIONS: &str = "gen1_collections";
pub const GEN2_COLLECTIONS: &str = "gen2_collections";

/// Binds one logical field to one counter name within a category.
#[derive(Debug, Clone, Copy)]
pub struct FieldBinding {
    pub field: &'static str,
    pub counter: &'static str,
}

const fn bind(field: &'static str, counter: &'static str) -> FieldBinding {
    FieldBinding { field, counter }
}

/// A counter category to open: a primary object name, ordered fallback
/// names for hosts where the category is renamed or versioned, whether the
/// worker-process instance filter applies, and the field binding table.
#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub primary: &'static str,
    pub fallbacks: &'static [&'static str],
    pub filter_by_worker: bool,
    pub fields: &'static [FieldBinding],
}

/// Per-application request traffic. The generic object name is tried first;
/// some hosts only expose the version-qualified one.
pub const ASPNET_APPS: CategorySpec = CategorySpec {
    primary: "ASP.NET Applications",
    fallbacks: &["ASP.NET v4.0.30319"],
    filter_by_worker: false,
    fields: &[
        bind(REQUESTS_SEC, "Requests/Sec"),
        bind(REQUESTS_EXECUTING, "Requests Executing"),
        bind(REQUESTS_TOTAL, "Requests Total"),
        bind(ERRORS_SEC, "Errors Total/Sec"),
        bind(OUTPUT_CACHE_TURNOVER, "Output Cache Turnover Rate"),
    ],
};

/// Worker process resource usage, filtered to the configured worker name.
pub const WORKER_PROCESS: CategorySpec = CategorySpec {
    primary: "Process",
    fallbacks: &["Process V2"],
    filter_by_worker: true,
    fields: &[
        bind(CPU_PERCENT, "% Processor Time"),
        bind(WORKING_SET_PRIVATE, "Working Set - Private"),
        bind(IO_READ_BYTES_SEC, "IO Read Bytes/sec"),
        bind(IO_WRITE_BYTES_SEC, "IO Write Bytes/sec"),
        bind(ID_PROCESS, "ID Process"),
    ],
};

/// Managed heap and GC activity per worker instance.
pub const CLR_MEMORY: CategorySpec = CategorySpec {
    primary: ".NET CLR Memory",
    fallbacks: &[],
    filter_by_worker: true,
    fields: &[
        bind(GC_TIME_PERCENT, "% Time in GC"),
        bind(HEAP_BYTES, "# Bytes in all Heaps"),
        bind(GEN0_COLLECTIONS, "# Gen 0 Collections"),
        bind(GEN1_COLLECTIONS, "# Gen 1 Collections"),
        bind(GEN2_COLLECTIONS, "# Gen 2 Collections"),
    ],
};

/// Counter engine for hosts without a performance-counter subsystem. Every
/// open fails, so all counter sources resolve to Disabled and the collector
/// runs on the process snapshot alone.
pub struct NullCounterEngine;

impl CounterEngine for NullCounterEngine {
    fn open(
        &self,
        _category: &str,
        _instance_filter: Option<&str>,
    ) -> Result<Box<dyn CounterSession>, OpenError> {
        Err(OpenError::Unsupported(
            "no performance counter subsystem on this platform".to_string(),
        ))
    }
}
