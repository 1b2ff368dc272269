//! Measurement types and export sinks.
//!
//! Descriptors are owned per collector instance and built once at build
//! time; there is no process-wide metric registry. Measurements are produced
//! fresh each cycle and handed to a [`MetricSink`], which is the boundary to
//! the exposition layer.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

pub mod encoders;

use encoders::MetricsEncoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Point-in-time value.
    Gauge,
    /// Monotonic total.
    Counter,
}

/// Static description of one measurement type, shared across cycles. The
/// label vocabulary is fixed per descriptor and must not vary between cycles.
#[derive(Debug, Clone, Copy)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub kind: MetricKind,
    pub label_names: &'static [&'static str],
    pub help: &'static str,
}

impl MetricDescriptor {
    pub const fn new(
        name: &'static str,
        kind: MetricKind,
        label_names: &'static [&'static str],
        help: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            label_names,
            help,
        }
    }
}

/// One emitted measurement: a descriptor's name and kind, a label tuple
/// aligned to the descriptor's label names, and a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub name: &'static str,
    pub kind: MetricKind,
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

impl Measurement {
    pub fn from_descriptor(desc: &MetricDescriptor, label_values: &[String], value: f64) -> Self {
        debug_assert_eq!(desc.label_names.len(), label_values.len());
        Self {
            name: desc.name,
            kind: desc.kind,
            labels: desc
                .label_names
                .iter()
                .copied()
                .zip(label_values.iter().cloned())
                .collect(),
            value,
        }
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Receives the measurement stream for one cycle.
pub trait MetricSink {
    fn push(&mut self, measurement: Measurement);
}

/// Snapshot-style gauge family keyed by label tuple.
///
/// The family is reset before each cycle's emission pass, so a label
/// combination absent this cycle does not reappear from a prior one.
pub struct GaugeVec {
    desc: MetricDescriptor,
    series: HashMap<Vec<String>, f64>,
}

impl GaugeVec {
    pub fn new(desc: MetricDescriptor) -> Self {
        debug_assert_eq!(desc.kind, MetricKind::Gauge);
        Self {
            desc,
            series: HashMap::new(),
        }
    }

    /// Drop every label combination registered in prior cycles.
    pub fn reset(&mut self) {
        self.series.clear();
    }

    pub fn set(&mut self, label_values: Vec<String>, value: f64) {
        debug_assert_eq!(label_values.len(), self.desc.label_names.len());
        self.series.insert(label_values, value);
    }

    pub fn collect_into(&self, sink: &mut dyn MetricSink) {
        for (labels, value) in &self.series {
            sink.push(Measurement::from_descriptor(&self.desc, labels, *value));
        }
    }

    pub fn descriptor(&self) -> &MetricDescriptor {
        &self.desc
    }
}

/// In-memory sink, used by tests and available to embedders.
#[derive(Default)]
pub struct VecSink {
    pub measurements: Vec<Measurement>,
}

impl VecSink {
    pub fn named(&self, name: &str) -> Vec<&Measurement> {
        self.measurements.iter().filter(|m| m.name == name).collect()
    }
}

impl MetricSink for VecSink {
    fn push(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
    }
}

/// Sink used by the daemon: encodes each measurement and writes it onto the
/// `metrics` tracing target, which the logging setup routes to the metrics
/// file. The export layer treats each scrape as authoritative per family.
pub struct LogSink {
    encoder: Box<dyn MetricsEncoder + Send + Sync>,
    extra_labels: Vec<(String, String)>,
}

impl LogSink {
    pub fn new(
        encoder: Box<dyn MetricsEncoder + Send + Sync>,
        extra_labels: Vec<(String, String)>,
    ) -> Self {
        Self {
            encoder,
            extra_labels,
        }
    }
}

impl MetricSink for LogSink {
    fn push(&mut self, measurement: Measurement) {
        let mut tags: HashMap<String, String> = measurement
            .labels
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        for (key, value) in &self.extra_labels {
            tags.insert(key.clone(), value.clone());
        }

        let mut fields = HashMap::new();
        fields.insert("value".to_string(), measurement.value.into());

        let line = self
            .encoder
            .encode_metrics(measurement.name, &tags, &fields, current_time());
        tracing::info!(target: "metrics", msg = %line.trim_end());
    }
}

pub fn current_time() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_millis() as i64
}
