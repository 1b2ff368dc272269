use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use w3watch::collector::Collector;
use w3watch::config::{parse_extra_labels, Cli};
use w3watch::logging;
use w3watch::metrics::encoders::create_encoder;
use w3watch::metrics::LogSink;
use w3watch::source::counters::NullCounterEngine;
use w3watch::source::process::SysinfoProcessLister;

/// Sets up global panic hooks.
fn setup_global_hooks() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        default_hook(panic_info);
        tracing::error!("Thread panicked: {}", panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_global_hooks();

    let cli = Cli::parse();
    let _guard = logging::init(&cli.metrics_file);

    tracing::info!("starting w3watch agent {}", env!("CARGO_PKG_VERSION"));

    let encoder = create_encoder(&cli.metrics_format);
    let extra_labels = parse_extra_labels(cli.extra_labels.as_deref());
    let mut sink = LogSink::new(encoder, extra_labels);

    // real counter engines are host specific; the stub disables every
    // counter category so the agent runs on the process snapshot alone
    let engine = NullCounterEngine;
    let lister = SysinfoProcessLister::new();
    let mut collector = Collector::build(&engine, Box::new(lister), &cli.worker_process);

    let mut ticker = tokio::time::interval(Duration::from_secs(cli.collect_interval.max(1)));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = collector.collect(&mut sink) {
                    tracing::warn!("collection cycle failed: {err}");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}
