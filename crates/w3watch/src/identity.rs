//! Process identity derivation.
//!
//! Counter categories expose the owning process id as a float-encoded field;
//! the process snapshot reports it as a native integer. Both render as the
//! same base-10 label value so a consumer can treat `pid` uniformly.

/// Render a float-encoded process id as a base-10 string.
///
/// Returns `None` for negative or non-finite inputs; a fractional component
/// is truncated. A pid label is never negative and never fractional.
pub fn pid_from_counter(raw: f64) -> Option<String> {
    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    Some(format!("{}", raw.trunc() as u64))
}

/// Render an OS-reported process id as a base-10 string.
pub fn pid_from_os(pid: u32) -> String {
    pid.to_string()
}
