//! provides logging helpers
//!
//! Diagnostic events go to stderr. Events on the `metrics` target carry one
//! pre-encoded measurement line in their `msg` field and are routed to a
//! daily-rolling file instead, so the measurement stream and the diagnostic
//! stream never mix.

use std::fmt;
use std::path::Path;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{self, FilterExt};
use tracing_subscriber::fmt::{layer, FormatEvent};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry;

/// Writes the `msg` field of a metrics event as a bare line.
struct MeasurementFormatter;

#[derive(Default)]
struct MessageVisitor {
    line: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "msg" {
            self.line = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "msg" {
            self.line = Some(format!("{value:?}"));
        }
    }
}

impl<S, N> FormatEvent<S, N> for MeasurementFormatter
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        match visitor.line {
            Some(line) => writeln!(writer, "{line}"),
            None => Ok(()),
        }
    }
}

/// Initiate the global tracing subscriber. The returned guard must be held
/// for the lifetime of the process so buffered measurement lines flush.
pub fn init(metrics_file: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    let env_filter = filter::EnvFilter::builder()
        .with_default_directive(filter::LevelFilter::INFO.into())
        .from_env_lossy();

    let fmt_layer = layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(env_filter.and(filter::filter_fn(|metadata| {
            metadata.target() != "metrics"
        })));

    let dir = metrics_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file = metrics_file
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("metrics.log");

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file)
        .max_log_files(3)
        .build(dir)
        .expect("failed to create rolling file appender");

    let (file_writer, file_guard) = tracing_appender::non_blocking(appender);

    let metrics_layer = layer()
        .event_format(MeasurementFormatter)
        .fmt_fields(tracing_subscriber::fmt::format::DefaultFields::new())
        .with_writer(file_writer)
        .with_ansi(false)
        .with_filter(filter::filter_fn(|metadata| metadata.target() == "metrics"));

    registry().with(fmt_layer).with(metrics_layer).init();
    file_guard
}
