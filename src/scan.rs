//! Scan orchestration
//!
//! [`run_analysis`] performs one complete scan. [`ScanCoordinator`] holds the
//! snapshot consumers see and makes sure a scan that was superseded by a
//! newer one never replaces that newer result.

use crate::analyzer::diagnostics::{DiagnosticKind, ScanLog};
use crate::analyzer::published::published_data;
use crate::analyzer::{
    ByteEstimator, PageAnalyzer, ProjectAggregator, ProjectAnalysis, RecommendationEngine,
};
use crate::config::ConfigFile;
use crate::error::WeightError;
use crate::source::AssetSource;
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

/// Run one full scan of `source`
///
/// Only page or node enumeration failures abort the scan. Every other
/// problem is recorded in the snapshot's diagnostics.
///
/// # Examples
///
/// ```
/// use site_weight::config::ConfigFile;
/// use site_weight::scan::run_analysis;
/// use site_weight::source::memory::{InMemorySource, SnapshotPage};
///
/// let source = InMemorySource::new(vec![SnapshotPage::new("home", "Home")]);
/// let analysis = run_analysis(&source, &ConfigFile::default())?;
/// assert_eq!(analysis.total_pages, 1);
/// assert!(analysis.all_recommendations.is_empty());
/// # Ok::<(), site_weight::error::WeightError>(())
/// ```
pub fn run_analysis<S: AssetSource + ?Sized>(
    source: &S,
    config: &ConfigFile,
) -> Result<ProjectAnalysis, WeightError> {
    let estimator = ByteEstimator::new(config.estimator.clone());
    let engine = RecommendationEngine::new(estimator.clone(), config.recommendations.clone());
    let page_analyzer = PageAnalyzer::new(&estimator, &engine);
    let mut log = ScanLog::new();

    let pages = source.pages()?;
    log::info!("scanning {} page(s) in {:?} mode", pages.len(), source.mode());

    let analyses = pages
        .iter()
        .map(|page| page_analyzer.analyze(source, page, &mut log))
        .collect::<Result<Vec<_>, _>>()?;

    let mut analysis = ProjectAggregator::new(&engine, &config.savings, &config.traffic)
        .aggregate(source.mode(), analyses);

    analysis.published_data = match source.published() {
        Ok(site) => site.as_ref().map(published_data),
        Err(err) => {
            log.record(DiagnosticKind::SourceUnavailable, "published site", err.to_string());
            None
        }
    };
    analysis.diagnostics = log.into_entries();

    log::info!(
        "scan complete: {} recommendation(s), {} diagnostic(s)",
        analysis.all_recommendations.len(),
        analysis.diagnostics.len()
    );
    Ok(analysis)
}

/// Handle for one scan started through a [`ScanCoordinator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTicket {
    generation: u64,
    id: Uuid,
}

impl ScanTicket {
    /// Unique id of the scan, for logs
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Position of the scan in request order
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct CoordinatorState {
    issued: u64,
    published: u64,
    latest: Option<Arc<ProjectAnalysis>>,
}

/// Owner of the snapshot shown to consumers
///
/// Snapshots are published as `Arc`s and never mutated afterwards; a new
/// scan always produces a new snapshot.
#[derive(Debug, Default)]
pub struct ScanCoordinator {
    state: Mutex<CoordinatorState>,
}

impl ScanCoordinator {
    /// Create a coordinator with no snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new scan request
    pub fn begin(&self) -> ScanTicket {
        let mut state = self.state.lock();
        state.issued += 1;
        let ticket = ScanTicket {
            generation: state.issued,
            id: Uuid::new_v4(),
        };
        log::debug!("scan {} started (generation {})", ticket.id, ticket.generation);
        ticket
    }

    /// Publish a finished scan
    ///
    /// Returns `false` and drops `analysis` when a scan requested after
    /// `ticket` has already been published.
    pub fn publish(&self, ticket: &ScanTicket, analysis: ProjectAnalysis) -> bool {
        let mut state = self.state.lock();
        if ticket.generation <= state.published {
            log::debug!(
                "discarding stale scan {} (generation {} <= {})",
                ticket.id,
                ticket.generation,
                state.published
            );
            return false;
        }
        state.published = ticket.generation;
        state.latest = Some(Arc::new(analysis));
        true
    }

    /// The last-known-good snapshot
    pub fn latest(&self) -> Option<Arc<ProjectAnalysis>> {
        self.state.lock().latest.clone()
    }

    /// Begin, run and publish a scan in one step
    ///
    /// On failure the previous snapshot stays in place. `Ok(None)` means the
    /// scan completed but a newer one had already been published.
    pub fn run<S: AssetSource + ?Sized>(
        &self,
        source: &S,
        config: &ConfigFile,
    ) -> Result<Option<Arc<ProjectAnalysis>>, WeightError> {
        let ticket = self.begin();
        let analysis = run_analysis(source, config).inspect_err(|err| {
            log::warn!("scan {} failed: {}", ticket.id, err);
        })?;
        if self.publish(&ticket, analysis) {
            Ok(self.latest())
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::asset_types::{Breakpoint, PageRef};
    use crate::analyzer::AnalysisMode;
    use crate::source::memory::{InMemorySource, SnapshotPage};
    use crate::source::{SourceError, SourceNode};

    struct FailingSource;

    impl AssetSource for FailingSource {
        fn mode(&self) -> AnalysisMode {
            AnalysisMode::Canvas
        }

        fn pages(&self) -> Result<Vec<PageRef>, SourceError> {
            Err(SourceError::Enumeration {
                what: "pages".to_string(),
                reason: "host API unavailable".to_string(),
            })
        }

        fn nodes(&self, _: &PageRef, _: Breakpoint) -> Result<Vec<SourceNode>, SourceError> {
            Ok(Vec::new())
        }
    }

    fn one_page() -> InMemorySource {
        InMemorySource::new(vec![SnapshotPage::new("home", "Home")])
    }

    #[test]
    fn test_enumeration_failure_is_fatal() {
        let result = run_analysis(&FailingSource, &ConfigFile::default());
        assert!(matches!(result, Err(WeightError::ScanFailed(_))));
    }

    #[test]
    fn test_unavailable_published_site_is_recorded_not_fatal() {
        let mut source = one_page();
        source.snapshot_mut().published_unavailable = Some("not published yet".to_string());
        let analysis = run_analysis(&source, &ConfigFile::default()).unwrap();
        assert!(analysis.published_data.is_none());
        assert_eq!(analysis.diagnostics.len(), 1);
        assert_eq!(analysis.diagnostics[0].kind, DiagnosticKind::SourceUnavailable);
        assert!(analysis.has_estimated_data());
    }

    #[test]
    fn test_stale_scan_is_discarded() {
        let coordinator = ScanCoordinator::new();
        let config = ConfigFile::default();
        let older = coordinator.begin();
        let newer = coordinator.begin();
        assert!(newer.generation() > older.generation());
        assert_ne!(older.id(), newer.id());

        let mut newer_source = one_page();
        newer_source.snapshot_mut().pages.push(SnapshotPage::new("about", "About"));

        assert!(coordinator.publish(&newer, run_analysis(&newer_source, &config).unwrap()));
        assert!(!coordinator.publish(&older, run_analysis(&one_page(), &config).unwrap()));
        assert_eq!(coordinator.latest().unwrap().total_pages, 2);
    }

    #[test]
    fn test_failed_scan_keeps_previous_snapshot() {
        let coordinator = ScanCoordinator::new();
        let config = ConfigFile::default();
        let first = coordinator.run(&one_page(), &config).unwrap().unwrap();

        assert!(coordinator.run(&FailingSource, &config).is_err());
        let latest = coordinator.latest().unwrap();
        assert!(Arc::ptr_eq(&first, &latest));
    }

    #[test]
    fn test_published_snapshot_is_not_mutated_by_later_scans() {
        let coordinator = ScanCoordinator::new();
        let config = ConfigFile::default();
        let first = coordinator.run(&one_page(), &config).unwrap().unwrap();

        let mut bigger = one_page();
        bigger.snapshot_mut().pages.push(SnapshotPage::new("blog", "Blog"));
        let second = coordinator.run(&bigger, &config).unwrap().unwrap();

        assert_eq!(first.total_pages, 1);
        assert_eq!(second.total_pages, 2);
    }

    #[test]
    fn test_repeated_scans_are_identical() {
        let source = one_page();
        let config = ConfigFile::default();
        assert_eq!(
            run_analysis(&source, &config).unwrap(),
            run_analysis(&source, &config).unwrap()
        );
    }
}
