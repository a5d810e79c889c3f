//! Per-scan diagnostic collector
//!
//! Non-fatal problems (fallback estimates, unresolved CMS bindings, missing
//! published data) are recorded here so the final snapshot can label partial
//! data. Every entry is mirrored to the `log` facade.

use serde::{Deserialize, Serialize};

/// Class of non-fatal problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// Dimensions or format unreadable; a fallback estimate was used
    EstimationUncertainty,
    /// Owning page or CMS item could not be determined
    ResolutionFailure,
    /// Published-site data could not be fetched
    SourceUnavailable,
}

/// One recorded problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Problem class
    pub kind: DiagnosticKind,
    /// What the problem is about (node id, page id, URL)
    pub subject: String,
    /// Human-readable explanation
    pub message: String,
}

/// Collector scoped to a single scan
#[derive(Debug, Default)]
pub struct ScanLog {
    entries: Vec<Diagnostic>,
}

impl ScanLog {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic
    pub fn record(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            subject: subject.into(),
            message: message.into(),
        };
        match kind {
            DiagnosticKind::EstimationUncertainty => {
                log::debug!("{}: {}", diagnostic.subject, diagnostic.message)
            }
            DiagnosticKind::ResolutionFailure | DiagnosticKind::SourceUnavailable => {
                log::warn!("{}: {}", diagnostic.subject, diagnostic.message)
            }
        }
        self.entries.push(diagnostic);
    }

    /// Recorded diagnostics
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of entries of a given kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Consume the collector
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_log_records_in_order_and_counts_by_kind() {
        let mut log = ScanLog::new();
        log.record(DiagnosticKind::EstimationUncertainty, "n1", "no dimensions");
        log.record(DiagnosticKind::ResolutionFailure, "n2", "collection missing");
        log.record(DiagnosticKind::EstimationUncertainty, "n3", "no markup");

        assert_eq!(log.entries().len(), 3);
        assert_eq!(log.entries()[1].subject, "n2");
        assert_eq!(log.count(DiagnosticKind::EstimationUncertainty), 2);
        assert_eq!(log.count(DiagnosticKind::SourceUnavailable), 0);
    }
}
