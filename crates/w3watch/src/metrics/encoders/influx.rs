//! InfluxDB line protocol encoder.

use std::collections::HashMap;
use std::fmt::Write as _;

use influxdb_line_protocol::LineProtocolBuilder;

use super::{FieldValue, MetricsEncoder};

// The builder moves through type states as fields are added, so the
// key/value dispatch cannot live in a fn; a macro keeps it in one place.
macro_rules! push_field {
    ($builder:expr, $key:expr, $value:expr) => {
        match $value {
            FieldValue::String(s) => $builder.field($key, s.as_str()),
            FieldValue::Integer(i) => $builder.field($key, *i),
            FieldValue::UnsignedInteger(u) => $builder.field($key, *u),
            FieldValue::Float(f) => $builder.field($key, *f),
            FieldValue::Boolean(b) => $builder.field($key, *b),
        }
    };
}

pub struct InfluxEncoder;

impl InfluxEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InfluxEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsEncoder for InfluxEncoder {
    fn encode_metrics(
        &self,
        measurement: &str,
        tags: &HashMap<String, String>,
        fields: &HashMap<String, FieldValue>,
        timestamp: i64,
    ) -> String {
        let mut builder = LineProtocolBuilder::new().measurement(measurement);

        // tags and fields are sorted for a stable line per input
        let mut tag_entries: Vec<_> = tags.iter().collect();
        tag_entries.sort_by_key(|(k, _)| *k);
        for (key, value) in tag_entries {
            builder = builder.tag(key, value);
        }

        let mut field_entries: Vec<_> = fields.iter().collect();
        field_entries.sort_by_key(|(k, _)| *k);

        // the first field moves the builder into its after-field state;
        // an empty field set is padded so the line stays well formed
        let Some((first_key, first_value)) = field_entries.first() else {
            let bytes = builder
                .field("_empty", true)
                .timestamp(timestamp)
                .close_line()
                .build();
            return bytes_to_line(&bytes);
        };

        let mut with_fields = push_field!(builder, first_key, first_value);
        for (key, value) in field_entries.iter().skip(1) {
            with_fields = push_field!(with_fields, key, value);
        }

        let bytes = with_fields.timestamp(timestamp).close_line().build();
        bytes_to_line(&bytes)
    }
}

fn bytes_to_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            // the builder only produces UTF-8; fall back to a lossless hex
            // rendering rather than dropping the measurement
            let mut out = String::with_capacity(bytes.len() * 2);
            for b in bytes {
                let _ = write!(out, "{b:02x}");
            }
            out
        }
    }
}
