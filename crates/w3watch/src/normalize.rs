//! Instance filtering and label normalization.
//!
//! Counter categories report aggregate pseudo-instances (`__Total__` for
//! counter totals, `_Global_` for CLR-wide totals) that would double-count
//! real instances; those records are skipped. ASP.NET application instances
//! arrive as underscore-delimited site paths and are rewritten into a short,
//! stable application label. Process names pass through untouched.

use std::collections::HashMap;

use crate::identity;
use crate::resolver::SourceKind;
use crate::source::counters::ID_PROCESS;
use crate::source::RawRecord;

const TOTAL_MARKER: &str = "__total__";
const GLOBAL_MARKER: &str = "_global_";

const ROOT_SITE_PREFIX: &str = "_LM_W3SVC_1_ROOT_";
const SITE_PREFIX: &str = "_LM_W3SVC_";

/// A raw record after filtering and renaming. `label` is never an aggregate
/// pseudo-instance token; `pid`, when present, is a non-negative decimal
/// string derived from the record's float-encoded process id field.
#[derive(Debug, Clone)]
pub struct NormalizedRecord {
    pub label: String,
    pub pid: Option<String>,
    pub fields: HashMap<&'static str, f64>,
}

impl NormalizedRecord {
    pub fn field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }
}

fn is_aggregate_instance(instance: &str) -> bool {
    let lower = instance.to_ascii_lowercase();
    lower.contains(TOTAL_MARKER) || lower.contains(GLOBAL_MARKER)
}

/// Rewrite a hierarchical ASP.NET instance path into an application label.
/// The root-site prefix strips to just the application name; other sites
/// rewrite to `site_<rest>`. Identities matching neither pattern pass
/// through unchanged rather than erroring.
fn normalize_app_instance(instance: &str) -> String {
    if let Some(rest) = instance.strip_prefix(ROOT_SITE_PREFIX) {
        return rest.to_string();
    }
    if let Some(rest) = instance.strip_prefix(SITE_PREFIX) {
        return format!("site_{rest}");
    }
    instance.to_string()
}

/// Filter and rename one raw record. Returns `None` when the record is an
/// aggregate pseudo-instance that must not appear in output.
pub fn normalize(record: RawRecord, kind: SourceKind) -> Option<NormalizedRecord> {
    if is_aggregate_instance(&record.instance) {
        return None;
    }

    let label = match kind {
        SourceKind::CounterCategory => normalize_app_instance(&record.instance),
        SourceKind::ProcessSnapshot => record.instance.clone(),
    };

    let pid = record.field(ID_PROCESS).and_then(identity::pid_from_counter);

    Some(NormalizedRecord {
        label,
        pid,
        fields: record.fields,
    })
}
