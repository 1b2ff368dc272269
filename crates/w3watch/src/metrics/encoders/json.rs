//! JSON encoder, one object per measurement line.

use std::collections::HashMap;

use serde_json::json;

use super::{FieldValue, MetricsEncoder};

pub struct JsonEncoder;

impl JsonEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsEncoder for JsonEncoder {
    fn encode_metrics(
        &self,
        measurement: &str,
        tags: &HashMap<String, String>,
        fields: &HashMap<String, FieldValue>,
        timestamp: i64,
    ) -> String {
        let json_fields: serde_json::Map<String, serde_json::Value> = fields
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    FieldValue::String(s) => serde_json::Value::String(s.clone()),
                    FieldValue::Integer(i) => serde_json::Value::from(*i),
                    FieldValue::UnsignedInteger(u) => serde_json::Value::from(*u),
                    FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null),
                    FieldValue::Boolean(b) => serde_json::Value::Bool(*b),
                };
                (k.clone(), value)
            })
            .collect();

        let line = json!({
            "measure": measurement,
            "ts": timestamp,
            "tag": tags,
            "field": json_fields,
        });
        line.to_string() + "\n"
    }
}
