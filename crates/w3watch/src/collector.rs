//! Per-cycle collection pipeline.
//!
//! `Collector::build` resolves every configured source exactly once; a
//! source that resolves to Disabled contributes nothing for the run.
//! `collect` then samples each live source, normalizes its records and
//! emits measurements into the sink. Cycles are independent: no state is
//! carried over except the resolved status of each source and the
//! gauge-vector families, which are reset before repopulation. Taking
//! `&mut self` serializes cycles per collector instance.

use thiserror::Error;

use crate::identity;
use crate::metrics::{GaugeVec, Measurement, MetricDescriptor, MetricKind, MetricSink};
use crate::normalize::{normalize, NormalizedRecord};
use crate::resolver::{MetricSource, SourceKind};
use crate::source::counters::{self, CategorySpec, ASPNET_APPS, CLR_MEMORY, WORKER_PROCESS};
use crate::source::{CounterEngine, CounterSession, ProcessLister, Reading, SampleError};

const SNAPSHOT_LABELS: &[&str] = &["pid", "name", "username", "cmdline", "status"];

const PROCESS_CPU: MetricDescriptor = MetricDescriptor::new(
    "w3watch_process_cpu_percent",
    MetricKind::Gauge,
    SNAPSHOT_LABELS,
    "CPU utilization percent per process",
);

const PROCESS_MEMORY_MB: MetricDescriptor = MetricDescriptor::new(
    "w3watch_process_memory_mb",
    MetricKind::Gauge,
    SNAPSHOT_LABELS,
    "Resident memory in MB per process",
);

const WEBAPP_REQUESTS_SEC: MetricDescriptor = MetricDescriptor::new(
    "w3watch_webapp_requests_sec",
    MetricKind::Gauge,
    &["app_path"],
    "Requests per second per application",
);

const WEBAPP_REQUESTS_EXECUTING: MetricDescriptor = MetricDescriptor::new(
    "w3watch_webapp_requests_executing",
    MetricKind::Gauge,
    &["app_path"],
    "Currently executing requests per application",
);

const WEBAPP_REQUESTS_TOTAL: MetricDescriptor = MetricDescriptor::new(
    "w3watch_webapp_requests_total",
    MetricKind::Counter,
    &["app_path"],
    "Total requests processed per application",
);

const WEBAPP_ERRORS_SEC: MetricDescriptor = MetricDescriptor::new(
    "w3watch_webapp_errors_sec",
    MetricKind::Gauge,
    &["app_path"],
    "Errors per second per application",
);

const WEBAPP_OUTPUT_CACHE_TURNOVER: MetricDescriptor = MetricDescriptor::new(
    "w3watch_webapp_output_cache_turnover",
    MetricKind::Gauge,
    &["app_path"],
    "Output cache turnover rate per application",
);

const WORKER_CPU: MetricDescriptor = MetricDescriptor::new(
    "w3watch_worker_cpu_percent",
    MetricKind::Gauge,
    &["process", "pid"],
    "Processor time percent per worker process",
);

const WORKER_MEMORY_PRIVATE: MetricDescriptor = MetricDescriptor::new(
    "w3watch_worker_memory_private_bytes",
    MetricKind::Gauge,
    &["process", "pid"],
    "Private working set bytes per worker process",
);

const WORKER_IO_BYTES_SEC: MetricDescriptor = MetricDescriptor::new(
    "w3watch_worker_io_bytes_sec",
    MetricKind::Gauge,
    &["process", "pid"],
    "Combined read and write IO bytes per second per worker process",
);

const CLR_GC_TIME: MetricDescriptor = MetricDescriptor::new(
    "w3watch_clr_gc_time_percent",
    MetricKind::Gauge,
    &["process"],
    "Percent of time spent in GC per worker instance",
);

const CLR_HEAP_BYTES: MetricDescriptor = MetricDescriptor::new(
    "w3watch_clr_heap_bytes",
    MetricKind::Gauge,
    &["process"],
    "Bytes in all managed heaps per worker instance",
);

const CLR_GEN0_TOTAL: MetricDescriptor = MetricDescriptor::new(
    "w3watch_clr_gen0_collections_total",
    MetricKind::Counter,
    &["process"],
    "Gen 0 garbage collections per worker instance",
);

const CLR_GEN1_TOTAL: MetricDescriptor = MetricDescriptor::new(
    "w3watch_clr_gen1_collections_total",
    MetricKind::Counter,
    &["process"],
    "Gen 1 garbage collections per worker instance",
);

const CLR_GEN2_TOTAL: MetricDescriptor = MetricDescriptor::new(
    "w3watch_clr_gen2_collections_total",
    MetricKind::Counter,
    &["process"],
    "Gen 2 garbage collections per worker instance",
);

/// The only error a cycle surfaces to its caller: the foundational process
/// listing failed, so no records could be produced at all. Every other
/// failure degrades to a warning and a skipped source or measurement.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("process enumeration failed")]
    Enumeration(#[source] SampleError),
}

/// Emission routine to apply to a counter category's normalized records.
#[derive(Debug, Clone, Copy)]
enum CategoryRole {
    AspNetApps,
    WorkerProcess,
    ClrMemory,
}

struct CounterSource {
    spec: &'static CategorySpec,
    role: CategoryRole,
    source: MetricSource<Box<dyn CounterSession>>,
}

pub struct Collector {
    snapshot: MetricSource<Box<dyn ProcessLister>>,
    counters: Vec<CounterSource>,
    process_cpu: GaugeVec,
    process_memory: GaugeVec,
}

impl Collector {
    /// Resolve every source once and build the per-instance descriptor
    /// state. `worker_process` is the instance filter for worker-scoped
    /// counter categories.
    pub fn build(
        engine: &dyn CounterEngine,
        lister: Box<dyn ProcessLister>,
        worker_process: &str,
    ) -> Self {
        let mut snapshot =
            MetricSource::new(SourceKind::ProcessSnapshot, "process_snapshot", &[]);
        let mut handle = Some(lister);
        snapshot.resolve(|_| Ok(handle.take().expect("opened once")));

        let categories: [(&'static CategorySpec, CategoryRole); 3] = [
            (&ASPNET_APPS, CategoryRole::AspNetApps),
            (&WORKER_PROCESS, CategoryRole::WorkerProcess),
            (&CLR_MEMORY, CategoryRole::ClrMemory),
        ];

        let counters = categories
            .into_iter()
            .map(|(spec, role)| {
                let filter = spec.filter_by_worker.then_some(worker_process);
                let mut source =
                    MetricSource::new(SourceKind::CounterCategory, spec.primary, spec.fallbacks);
                source.resolve(|name| engine.open(name, filter));
                CounterSource { spec, role, source }
            })
            .collect();

        Self {
            snapshot,
            counters,
            process_cpu: GaugeVec::new(PROCESS_CPU),
            process_memory: GaugeVec::new(PROCESS_MEMORY_MB),
        }
    }

    /// Run one collection cycle. Counter sources that fail to sample are
    /// skipped for this cycle only; a process enumeration failure aborts
    /// the cycle.
    pub fn collect(&mut self, sink: &mut dyn MetricSink) -> Result<(), CollectError> {
        self.collect_process_snapshot(sink)?;
        for index in 0..self.counters.len() {
            self.collect_counter_source(index, sink);
        }
        Ok(())
    }

    fn collect_process_snapshot(&mut self, sink: &mut dyn MetricSink) -> Result<(), CollectError> {
        let Some(lister) = self.snapshot.live_mut() else {
            return Ok(());
        };
        let records = lister.snapshot().map_err(CollectError::Enumeration)?;

        self.process_cpu.reset();
        self.process_memory.reset();

        for record in records {
            let labels = vec![
                identity::pid_from_os(record.pid),
                record.name,
                record.username.unwrap_or("unknown".to_string()),
                record.cmdline.unwrap_or(String::new()),
                record.status.unwrap_or("unknown".to_string()),
            ];

            if let Reading::Value(cpu) = record.cpu_percent {
                self.process_cpu.set(labels.clone(), cpu);
            }
            if let Reading::Value(bytes) = record.memory_bytes {
                self.process_memory
                    .set(labels, bytes as f64 / 1024.0 / 1024.0);
            }
        }

        self.process_cpu.collect_into(sink);
        self.process_memory.collect_into(sink);
        Ok(())
    }

    fn collect_counter_source(&mut self, index: usize, sink: &mut dyn MetricSink) {
        let state = &mut self.counters[index];
        let Some(session) = state.source.live_mut() else {
            return;
        };

        let records = match session.sample() {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    source = state.spec.primary,
                    "skipping source for this cycle: {err}"
                );
                return;
            }
        };

        for raw in records {
            let Some(record) = normalize(raw, SourceKind::CounterCategory) else {
                continue;
            };
            match state.role {
                CategoryRole::AspNetApps => emit_webapp(&record, sink),
                CategoryRole::WorkerProcess => emit_worker(&record, sink),
                CategoryRole::ClrMemory => emit_clr(&record, sink),
            }
        }
    }
}

fn emit_field(
    record: &NormalizedRecord,
    field: &str,
    desc: &MetricDescriptor,
    labels: &[String],
    sink: &mut dyn MetricSink,
) {
    // a field that failed to read upstream is absent and simply not emitted
    if let Some(value) = record.field(field) {
        sink.push(Measurement::from_descriptor(desc, labels, value));
    }
}

fn emit_webapp(record: &NormalizedRecord, sink: &mut dyn MetricSink) {
    let labels = [record.label.clone()];
    emit_field(record, counters::REQUESTS_SEC, &WEBAPP_REQUESTS_SEC, &labels, sink);
    emit_field(
        record,
        counters::REQUESTS_EXECUTING,
        &WEBAPP_REQUESTS_EXECUTING,
        &labels,
        sink,
    );
    emit_field(record, counters::REQUESTS_TOTAL, &WEBAPP_REQUESTS_TOTAL, &labels, sink);
    emit_field(record, counters::ERRORS_SEC, &WEBAPP_ERRORS_SEC, &labels, sink);
    emit_field(
        record,
        counters::OUTPUT_CACHE_TURNOVER,
        &WEBAPP_OUTPUT_CACHE_TURNOVER,
        &labels,
        sink,
    );
}

fn emit_worker(record: &NormalizedRecord, sink: &mut dyn MetricSink) {
    let pid = record.pid.clone().unwrap_or_default();
    let labels = [record.label.clone(), pid];

    emit_field(record, counters::CPU_PERCENT, &WORKER_CPU, &labels, sink);
    emit_field(
        record,
        counters::WORKING_SET_PRIVATE,
        &WORKER_MEMORY_PRIVATE,
        &labels,
        sink,
    );

    // the IO rate is the sum of two counters; emit only when both read
    if let (Some(read), Some(write)) = (
        record.field(counters::IO_READ_BYTES_SEC),
        record.field(counters::IO_WRITE_BYTES_SEC),
    ) {
        sink.push(Measurement::from_descriptor(
            &WORKER_IO_BYTES_SEC,
            &labels,
            read + write,
        ));
    }
}

fn emit_clr(record: &NormalizedRecord, sink: &mut dyn MetricSink) {
    let labels = [record.label.clone()];
    emit_field(record, counters::GC_TIME_PERCENT, &CLR_GC_TIME, &labels, sink);
    emit_field(record, counters::HEAP_BYTES, &CLR_HEAP_BYTES, &labels, sink);
    emit_field(record, counters::GEN0_COLLECTIONS, &CLR_GEN0_TOTAL, &labels, sink);
    emit_field(record, counters::GEN1_COLLECTIONS, &CLR_GEN1_TOTAL, &labels, sink);
    emit_field(record, counters::GEN2_COLLECTIONS, &CLR_GEN2_TOTAL, &labels, sink);
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};
    use std::rc::Rc;

    use super::*;
    use crate::metrics::VecSink;
    use crate::source::counters::NullCounterEngine;
    use crate::source::{OpenError, ProcessRecord, RawRecord};

    // --- fakes -----------------------------------------------------------

    struct FakeLister {
        cycles: VecDeque<Result<Vec<ProcessRecord>, SampleError>>,
    }

    impl ProcessLister for FakeLister {
        fn snapshot(&mut self) -> Result<Vec<ProcessRecord>, SampleError> {
            self.cycles
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn lister(cycles: Vec<Result<Vec<ProcessRecord>, SampleError>>) -> Box<dyn ProcessLister> {
        Box::new(FakeLister {
            cycles: cycles.into(),
        })
    }

    fn proc_record(pid: u32, name: &str, cpu: f64, memory: u64) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.to_string(),
            username: Reading::Value("svc".to_string()),
            cmdline: Reading::Value(format!("{name} -ap Pool")),
            status: Reading::Value("running".to_string()),
            cpu_percent: Reading::Value(cpu),
            memory_bytes: Reading::Value(memory),
        }
    }

    enum CategoryBehavior {
        Records(Vec<RawRecord>),
        FailEachSample,
    }

    struct FakeSession {
        behavior: Rc<CategoryBehavior>,
    }

    impl CounterSession for FakeSession {
        fn sample(&mut self) -> Result<Vec<RawRecord>, SampleError> {
            match &*self.behavior {
                CategoryBehavior::Records(records) => Ok(records.clone()),
                CategoryBehavior::FailEachSample => {
                    Err(SampleError::Enumeration("instance list failed".to_string()))
                }
            }
        }
    }

    #[derive(Default)]
    struct FakeEngine {
        categories: HashMap<&'static str, Rc<CategoryBehavior>>,
        opens: RefCell<Vec<String>>,
    }

    impl FakeEngine {
        fn with(mut self, category: &'static str, behavior: CategoryBehavior) -> Self {
            self.categories.insert(category, Rc::new(behavior));
            self
        }

        fn open_count(&self, category: &str) -> usize {
            self.opens
                .borrow()
                .iter()
                .filter(|name| *name == category)
                .count()
        }
    }

    impl CounterEngine for FakeEngine {
        fn open(
            &self,
            category: &str,
            _instance_filter: Option<&str>,
        ) -> Result<Box<dyn CounterSession>, OpenError> {
            self.opens.borrow_mut().push(category.to_string());
            match self.categories.get(category) {
                Some(behavior) => Ok(Box::new(FakeSession {
                    behavior: Rc::clone(behavior),
                })),
                None => Err(OpenError::MissingCategory(category.to_string())),
            }
        }
    }

    fn raw(instance: &str, fields: &[(&'static str, f64)]) -> RawRecord {
        RawRecord {
            instance: instance.to_string(),
            fields: fields.iter().copied().collect(),
        }
    }

    // --- process snapshot path --------------------------------------------

    #[test]
    fn snapshot_emits_cpu_and_memory_gauges() {
        let engine = NullCounterEngine;
        let mut collector = Collector::build(
            &engine,
            lister(vec![Ok(vec![proc_record(100, "w3wp", 12.5, 104_857_600)])]),
            "w3wp",
        );

        let mut sink = VecSink::default();
        collector.collect(&mut sink).expect("cycle");

        let cpu = sink.named("w3watch_process_cpu_percent");
        assert_eq!(cpu.len(), 1);
        assert_eq!(cpu[0].value, 12.5);
        assert_eq!(cpu[0].label("pid"), Some("100"));
        assert_eq!(cpu[0].label("name"), Some("w3wp"));

        let memory = sink.named("w3watch_process_memory_mb");
        assert_eq!(memory.len(), 1);
        assert_eq!(memory[0].value, 100.0);
        assert_eq!(memory[0].label("pid"), Some("100"));
    }

    #[test]
    fn unavailable_attribute_reads_fall_back_without_dropping_the_record() {
        let record = ProcessRecord {
            username: Reading::Unavailable,
            cmdline: Reading::Unavailable,
            status: Reading::Unavailable,
            ..proc_record(7, "init", 0.5, 1024)
        };
        let engine = NullCounterEngine;
        let mut collector = Collector::build(&engine, lister(vec![Ok(vec![record])]), "w3wp");

        let mut sink = VecSink::default();
        collector.collect(&mut sink).expect("cycle");

        let cpu = sink.named("w3watch_process_cpu_percent");
        assert_eq!(cpu.len(), 1);
        assert_eq!(cpu[0].label("username"), Some("unknown"));
        assert_eq!(cpu[0].label("cmdline"), Some(""));
        assert_eq!(cpu[0].label("status"), Some("unknown"));
    }

    #[test]
    fn unavailable_measurement_reads_are_omitted_per_field() {
        let record = ProcessRecord {
            cpu_percent: Reading::Unavailable,
            ..proc_record(7, "init", 0.0, 2 * 1024 * 1024)
        };
        let engine = NullCounterEngine;
        let mut collector = Collector::build(&engine, lister(vec![Ok(vec![record])]), "w3wp");

        let mut sink = VecSink::default();
        collector.collect(&mut sink).expect("cycle");

        assert!(sink.named("w3watch_process_cpu_percent").is_empty());
        assert_eq!(sink.named("w3watch_process_memory_mb").len(), 1);
        assert_eq!(sink.named("w3watch_process_memory_mb")[0].value, 2.0);
    }

    #[test]
    fn stale_label_tuples_do_not_leak_into_the_next_cycle() {
        let engine = NullCounterEngine;
        let mut collector = Collector::build(
            &engine,
            lister(vec![
                Ok(vec![
                    proc_record(100, "w3wp", 1.0, 1024),
                    proc_record(200, "w3wp", 2.0, 1024),
                ]),
                Ok(vec![proc_record(100, "w3wp", 3.0, 1024)]),
            ]),
            "w3wp",
        );

        let mut first = VecSink::default();
        collector.collect(&mut first).expect("cycle 1");
        assert_eq!(first.named("w3watch_process_cpu_percent").len(), 2);

        let mut second = VecSink::default();
        collector.collect(&mut second).expect("cycle 2");
        let cpu = second.named("w3watch_process_cpu_percent");
        assert_eq!(cpu.len(), 1);
        assert_eq!(cpu[0].label("pid"), Some("100"));
    }

    #[test]
    fn enumeration_failure_aborts_the_cycle() {
        let engine = NullCounterEngine;
        let mut collector = Collector::build(
            &engine,
            lister(vec![Err(SampleError::Enumeration("no /proc".to_string()))]),
            "w3wp",
        );

        let mut sink = VecSink::default();
        let err = collector.collect(&mut sink);
        assert!(matches!(err, Err(CollectError::Enumeration(_))));
        assert!(sink.measurements.is_empty());
    }

    // --- counter category path ---------------------------------------------

    #[test]
    fn webapp_instances_normalize_and_emit_per_field() {
        let engine = FakeEngine::default().with(
            "ASP.NET Applications",
            CategoryBehavior::Records(vec![
                raw(
                    "_LM_W3SVC_1_ROOT_MyApp",
                    &[
                        (counters::REQUESTS_SEC, 42.0),
                        (counters::REQUESTS_EXECUTING, 3.0),
                        (counters::REQUESTS_TOTAL, 1000.0),
                    ],
                ),
                raw("__Total__", &[(counters::REQUESTS_SEC, 99.0)]),
            ]),
        );

        let mut collector = Collector::build(&engine, lister(vec![]), "w3wp");
        let mut sink = VecSink::default();
        collector.collect(&mut sink).expect("cycle");

        let requests = sink.named("w3watch_webapp_requests_sec");
        assert_eq!(requests.len(), 1, "aggregate instance must be filtered");
        assert_eq!(requests[0].value, 42.0);
        assert_eq!(requests[0].label("app_path"), Some("MyApp"));

        assert_eq!(sink.named("w3watch_webapp_requests_executing")[0].value, 3.0);
        assert_eq!(sink.named("w3watch_webapp_requests_total")[0].value, 1000.0);
        // fields the source did not read this cycle are simply absent
        assert!(sink.named("w3watch_webapp_errors_sec").is_empty());
    }

    #[test]
    fn worker_records_carry_a_derived_pid_label() {
        let engine = FakeEngine::default().with(
            "Process",
            CategoryBehavior::Records(vec![raw(
                "w3wp#1",
                &[
                    (counters::CPU_PERCENT, 7.5),
                    (counters::WORKING_SET_PRIVATE, 1_048_576.0),
                    (counters::IO_READ_BYTES_SEC, 10.0),
                    (counters::IO_WRITE_BYTES_SEC, 5.0),
                    (counters::ID_PROCESS, 4123.0),
                ],
            )]),
        );

        let mut collector = Collector::build(&engine, lister(vec![]), "w3wp");
        let mut sink = VecSink::default();
        collector.collect(&mut sink).expect("cycle");

        let cpu = sink.named("w3watch_worker_cpu_percent");
        assert_eq!(cpu.len(), 1);
        assert_eq!(cpu[0].label("process"), Some("w3wp#1"));
        assert_eq!(cpu[0].label("pid"), Some("4123"));

        let io = sink.named("w3watch_worker_io_bytes_sec");
        assert_eq!(io.len(), 1);
        assert_eq!(io[0].value, 15.0);
    }

    #[test]
    fn io_rate_is_omitted_when_either_half_is_unread() {
        let engine = FakeEngine::default().with(
            "Process",
            CategoryBehavior::Records(vec![raw(
                "w3wp",
                &[
                    (counters::CPU_PERCENT, 1.0),
                    (counters::IO_READ_BYTES_SEC, 10.0),
                    (counters::ID_PROCESS, 1.0),
                ],
            )]),
        );

        let mut collector = Collector::build(&engine, lister(vec![]), "w3wp");
        let mut sink = VecSink::default();
        collector.collect(&mut sink).expect("cycle");

        assert_eq!(sink.named("w3watch_worker_cpu_percent").len(), 1);
        assert!(sink.named("w3watch_worker_io_bytes_sec").is_empty());
    }

    #[test]
    fn clr_global_instance_is_filtered() {
        let engine = FakeEngine::default().with(
            ".NET CLR Memory",
            CategoryBehavior::Records(vec![
                raw(
                    "w3wp",
                    &[
                        (counters::GC_TIME_PERCENT, 2.5),
                        (counters::HEAP_BYTES, 64.0 * 1024.0 * 1024.0),
                        (counters::GEN0_COLLECTIONS, 12.0),
                    ],
                ),
                raw("_Global_", &[(counters::GC_TIME_PERCENT, 50.0)]),
            ]),
        );

        let mut collector = Collector::build(&engine, lister(vec![]), "w3wp");
        let mut sink = VecSink::default();
        collector.collect(&mut sink).expect("cycle");

        let gc = sink.named("w3watch_clr_gc_time_percent");
        assert_eq!(gc.len(), 1);
        assert_eq!(gc[0].label("process"), Some("w3wp"));
        assert_eq!(sink.named("w3watch_clr_gen0_collections_total")[0].value, 12.0);
    }

    // --- resolution and degradation ----------------------------------------

    #[test]
    fn fallback_name_resolves_once_and_is_reused_across_cycles() {
        let engine = FakeEngine::default().with(
            "ASP.NET v4.0.30319",
            CategoryBehavior::Records(vec![raw(
                "_LM_W3SVC_1_ROOT_MyApp",
                &[(counters::REQUESTS_SEC, 1.0)],
            )]),
        );

        let mut collector = Collector::build(&engine, lister(vec![]), "w3wp");
        assert_eq!(engine.open_count("ASP.NET Applications"), 1);
        assert_eq!(engine.open_count("ASP.NET v4.0.30319"), 1);

        for _ in 0..2 {
            let mut sink = VecSink::default();
            collector.collect(&mut sink).expect("cycle");
            assert_eq!(sink.named("w3watch_webapp_requests_sec").len(), 1);
        }

        // sampling cycles never re-attempt resolution
        assert_eq!(engine.open_count("ASP.NET Applications"), 1);
        assert_eq!(engine.open_count("ASP.NET v4.0.30319"), 1);
    }

    #[test]
    fn one_failing_source_does_not_block_the_others() {
        let engine = FakeEngine::default()
            .with("ASP.NET Applications", CategoryBehavior::FailEachSample)
            .with(
                "Process",
                CategoryBehavior::Records(vec![raw(
                    "w3wp",
                    &[(counters::CPU_PERCENT, 9.0), (counters::ID_PROCESS, 77.0)],
                )]),
            );

        let mut collector = Collector::build(&engine, lister(vec![]), "w3wp");
        let mut sink = VecSink::default();
        collector.collect(&mut sink).expect("cycle must still succeed");

        assert!(sink.named("w3watch_webapp_requests_sec").is_empty());
        let cpu = sink.named("w3watch_worker_cpu_percent");
        assert_eq!(cpu.len(), 1);
        assert_eq!(cpu[0].value, 9.0);
    }

    #[test]
    fn all_counter_sources_disabled_still_yields_snapshot_metrics() {
        let engine = NullCounterEngine;
        let mut collector = Collector::build(
            &engine,
            lister(vec![Ok(vec![proc_record(1, "init", 0.1, 1024)])]),
            "w3wp",
        );

        let mut sink = VecSink::default();
        collector.collect(&mut sink).expect("cycle");
        assert_eq!(sink.named("w3watch_process_cpu_percent").len(), 1);
        assert!(sink.named("w3watch_webapp_requests_sec").is_empty());
    }

    // --- declared metric kinds ----------------------------------------------

    #[test]
    fn declared_kinds_match_field_semantics() {
        assert_eq!(WEBAPP_REQUESTS_TOTAL.kind, MetricKind::Counter);
        assert_eq!(CLR_GEN0_TOTAL.kind, MetricKind::Counter);
        assert_eq!(CLR_GEN1_TOTAL.kind, MetricKind::Counter);
        assert_eq!(CLR_GEN2_TOTAL.kind, MetricKind::Counter);

        for desc in [
            PROCESS_CPU,
            PROCESS_MEMORY_MB,
            WEBAPP_REQUESTS_SEC,
            WEBAPP_REQUESTS_EXECUTING,
            WEBAPP_ERRORS_SEC,
            WEBAPP_OUTPUT_CACHE_TURNOVER,
            WORKER_CPU,
            WORKER_MEMORY_PRIVATE,
            WORKER_IO_BYTES_SEC,
            CLR_GC_TIME,
            CLR_HEAP_BYTES,
        ] {
            assert_eq!(desc.kind, MetricKind::Gauge, "{}", desc.name);
        }
    }

    #[test]
    fn emitted_measurements_carry_the_declared_kind() {
        let engine = FakeEngine::default().with(
            "ASP.NET Applications",
            CategoryBehavior::Records(vec![raw(
                "_LM_W3SVC_1_ROOT_MyApp",
                &[
                    (counters::REQUESTS_SEC, 1.0),
                    (counters::REQUESTS_TOTAL, 2.0),
                ],
            )]),
        );

        let mut collector = Collector::build(&engine, lister(vec![]), "w3wp");
        let mut sink = VecSink::default();
        collector.collect(&mut sink).expect("cycle");

        assert_eq!(
            sink.named("w3watch_webapp_requests_sec")[0].kind,
            MetricKind::Gauge
        );
        assert_eq!(
            sink.named("w3watch_webapp_requests_total")[0].kind,
            MetricKind::Counter
        );
    }
}
