use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(about = "Web application worker metrics agent", version)]
pub struct Cli {
    #[arg(
        long,
        env = "W3WATCH_METRICS_FILE",
        value_hint = clap::ValueHint::FilePath,
        default_value = "logs/metrics.log",
        help = "Path for the emitted measurement stream, e.g. logs/metrics.log"
    )]
    pub metrics_file: PathBuf,

    #[arg(
        long,
        env = "W3WATCH_METRICS_FORMAT",
        default_value = "influx",
        help = "Measurement format, either 'influx' or 'json'"
    )]
    pub metrics_format: String,

    #[arg(
        long,
        env = "W3WATCH_EXTRA_LABELS",
        help = "Extra labels attached to every measurement, e.g. 'host=web01,env=prod'"
    )]
    pub extra_labels: Option<String>,

    #[arg(
        long,
        default_value = "15",
        help = "Seconds between collection cycles"
    )]
    pub collect_interval: u64,

    #[arg(
        long,
        env = "W3WATCH_WORKER_PROCESS",
        default_value = "w3wp",
        help = "Worker process name used as the counter instance filter"
    )]
    pub worker_process: String,
}

/// Parse a comma-separated `key=value` list. Malformed entries are dropped
/// with a warning rather than failing startup.
pub fn parse_extra_labels(raw: Option<&str>) -> Vec<(String, String)> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Some((key.trim().to_string(), value.trim().to_string()))
            }
            _ => {
                tracing::warn!(entry, "ignoring malformed extra label");
                None
            }
        })
        .collect()
}
