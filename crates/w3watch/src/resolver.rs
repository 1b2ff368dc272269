//! One-shot source resolution.
//!
//! Each logical source is tried under its primary object name and then each
//! fallback name in order. A source that fails every name is disabled for
//! the collector's lifetime; disabling is a warning, never fatal, and the
//! collector keeps running with whatever did resolve.

use crate::source::OpenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    ProcessSnapshot,
    CounterCategory,
}

/// Resolution state. Transitions exactly once, from `Unresolved` to either
/// `Live` or `Disabled`; a disabled source is never resurrected within a run.
pub enum SourceStatus<H> {
    Unresolved,
    Live(H),
    Disabled,
}

pub struct MetricSource<H> {
    kind: SourceKind,
    primary: &'static str,
    fallbacks: &'static [&'static str],
    status: SourceStatus<H>,
}

impl<H> MetricSource<H> {
    pub fn new(kind: SourceKind, primary: &'static str, fallbacks: &'static [&'static str]) -> Self {
        Self {
            kind,
            primary,
            fallbacks,
            status: SourceStatus::Unresolved,
        }
    }

    /// Try the primary name, then each fallback in order. A repeated call on
    /// an already resolved source is a no-op; names are never re-attempted.
    pub fn resolve(&mut self, mut open: impl FnMut(&str) -> Result<H, OpenError>) {
        if !matches!(self.status, SourceStatus::Unresolved) {
            return;
        }
        for name in std::iter::once(self.primary).chain(self.fallbacks.iter().copied()) {
            match open(name) {
                Ok(handle) => {
                    tracing::debug!(source = name, "resolved metric source");
                    self.status = SourceStatus::Live(handle);
                    return;
                }
                Err(err) => {
                    tracing::warn!(source = name, "failed to open metric source: {err}");
                }
            }
        }
        tracing::warn!(
            source = self.primary,
            "no usable name for metric source, disabling"
        );
        self.status = SourceStatus::Disabled;
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn primary_name(&self) -> &'static str {
        self.primary
    }

    pub fn is_live(&self) -> bool {
        matches!(self.status, SourceStatus::Live(_))
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.status, SourceStatus::Disabled)
    }

    pub fn live_mut(&mut self) -> Option<&mut H> {
        match &mut self.status {
            SourceStatus::Live(handle) => Some(handle),
            _ => None,
        }
    }
}
