//! Asset-weight estimation and recommendation engine
//!
//! Turns the nodes an [`AssetSource`](crate::source::AssetSource) reports
//! into per-breakpoint byte estimates and ranked savings recommendations:
//! - Byte heuristics per image format and vector markup ([`estimator`])
//! - Per-breakpoint category totals ([`breakpoint`])
//! - Per-page analysis across mobile, tablet and desktop ([`page`])
//! - Recommendations with cross-page de-duplication ([`recommendations`])
//! - Project aggregation with the savings cap ([`project`])
//! - CMS bandwidth projection and published-site data ([`cms`], [`published`])

pub mod analysis_types;
pub mod asset_types;
pub mod breakpoint;
pub mod cms;
pub mod diagnostics;
pub mod estimator;
pub mod page;
pub mod project;
pub mod published;
pub mod recommendation;
pub mod recommendations;

// Public exports for common analyzer types
pub use analysis_types::{
    AnalysisMode, CappedSavings, CmsImpact, CollectionImpact, CustomAssetKind, CustomCodeAsset,
    CustomCodeReport, PageAnalysis, ProjectAnalysis, PublishedBreakdown, PublishedData,
    SavingsSummary,
};
pub use asset_types::{
    AssetDetails, AssetIdentity, AssetInfo, AssetKind, Breakpoint, Breakpoints, Dimensions,
    ImageFormat, PageRef,
};
pub use breakpoint::{BreakdownData, BreakpointData};
pub use diagnostics::{Diagnostic, DiagnosticKind, ScanLog};
pub use estimator::ByteEstimator;
pub use page::PageAnalyzer;
pub use project::{cap_savings, ProjectAggregator};
pub use recommendation::{Priority, Recommendation, RecommendationKind};
pub use recommendations::RecommendationEngine;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_module_exports_are_accessible() {
        let _: Option<ByteEstimator> = None;
        let _: Option<RecommendationEngine> = None;
        let _: Option<PageAnalyzer<'_>> = None;
        let _: Option<ProjectAggregator<'_>> = None;
        let _: Option<ScanLog> = None;
    }
}
