//! Project-level aggregation and the savings safety cap

use super::analysis_types::{
    AnalysisMode, CappedSavings, PageAnalysis, ProjectAnalysis, SavingsSummary,
};
use super::asset_types::Breakpoints;
use super::breakpoint::BreakpointData;
use super::cms::cms_impact;
use super::recommendations::{deduplicate, total_savings, RecommendationEngine};
use crate::config::{SavingsSettings, TrafficSettings};

/// Clamp raw savings to `cap_ratio` of a total
///
/// The ratio is applied in basis points so common ratios such as 0.9 are
/// exact. Individual recommendations are never rescaled; only the total
/// shown to users is clamped.
///
/// # Examples
///
/// ```
/// use site_weight::analyzer::project::cap_savings;
///
/// const MB: u64 = 1024 * 1024;
/// let savings = cap_savings(950 * MB, 1000 * MB, 0.9);
/// assert_eq!(savings.reported_bytes, 900 * MB);
/// assert!(savings.capped);
/// ```
pub fn cap_savings(raw_bytes: u64, total_bytes: u64, cap_ratio: f64) -> CappedSavings {
    let basis_points = (cap_ratio.clamp(0.0, 1.0) * 10_000.0).round() as u128;
    let cap = (u128::from(total_bytes) * basis_points / 10_000) as u64;
    CappedSavings {
        raw_bytes,
        reported_bytes: raw_bytes.min(cap),
        capped: raw_bytes > cap,
    }
}

/// Merges page analyses into a project snapshot
pub struct ProjectAggregator<'a> {
    engine: &'a RecommendationEngine,
    savings: &'a SavingsSettings,
    traffic: &'a TrafficSettings,
}

impl<'a> ProjectAggregator<'a> {
    /// Create an aggregator
    pub fn new(
        engine: &'a RecommendationEngine,
        savings: &'a SavingsSettings,
        traffic: &'a TrafficSettings,
    ) -> Self {
        Self {
            engine,
            savings,
            traffic,
        }
    }

    /// Aggregate pages in scan order
    ///
    /// Published data and diagnostics are left empty for the caller to fill.
    pub fn aggregate(&self, mode: AnalysisMode, pages: Vec<PageAnalysis>) -> ProjectAnalysis {
        let mut overall = Breakpoints::<BreakpointData>::default();
        for page in &pages {
            for (bp, data) in page.breakpoints.iter() {
                overall.get_mut(bp).absorb(data);
            }
        }

        let all_recommendations = deduplicate(
            pages
                .iter()
                .flat_map(|p| p.recommendations.iter().cloned())
                .collect(),
        );

        let savings = self.savings_summary(&overall, total_savings(&all_recommendations));
        let cms_impact = cms_impact(&pages, self.traffic);

        ProjectAnalysis {
            mode,
            total_pages: pages.len(),
            pages,
            overall_breakpoints: overall,
            all_recommendations,
            savings,
            cms_impact,
            published_data: None,
            diagnostics: Vec::new(),
        }
    }

    fn savings_summary(
        &self,
        overall: &Breakpoints<BreakpointData>,
        overall_raw: u64,
    ) -> SavingsSummary {
        let cap_ratio = self.savings.cap_ratio;
        let breakpoints = Breakpoints::from_fn(|bp| {
            let data = overall.get(bp);
            let raw = total_savings(&deduplicate(self.engine.recommend(bp, &data.assets)));
            let capped = cap_savings(raw, data.total_bytes, cap_ratio);
            if capped.capped {
                log::warn!(
                    "{} savings of {} bytes exceed {:.0}% of {} bytes; reporting {}",
                    bp,
                    raw,
                    cap_ratio * 100.0,
                    data.total_bytes,
                    capped.reported_bytes
                );
            }
            capped
        });

        let heaviest = overall
            .iter()
            .map(|(_, data)| data.total_bytes)
            .max()
            .unwrap_or(0);

        SavingsSummary {
            breakpoints,
            overall: cap_savings(overall_raw, heaviest, cap_ratio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::asset_types::{
        AssetDetails, AssetInfo, Breakpoint, Dimensions, ImageAsset, ImageFormat, PageRef,
    };
    use crate::analyzer::estimator::ByteEstimator;
    use crate::config::{EstimatorSettings, RecommendationSettings};
    use proptest::prelude::*;

    const MB: u64 = 1024 * 1024;

    fn engine() -> RecommendationEngine {
        RecommendationEngine::new(
            ByteEstimator::new(EstimatorSettings::default()),
            RecommendationSettings::default(),
        )
    }

    fn jpeg(node: &str, actual: f64, rendered: f64) -> AssetInfo {
        let dims = Dimensions::new(actual, actual);
        AssetInfo {
            node_id: node.to_string(),
            name: node.to_string(),
            estimated_bytes: crate::analyzer::estimator::raster_bytes(dims, ImageFormat::Jpeg),
            rendered: Some(Dimensions::new(rendered, rendered)),
            visible: true,
            page: None,
            is_manual_estimate: false,
            estimate_note: None,
            unresolved_reason: None,
            details: AssetDetails::Image(ImageAsset {
                actual: Some(dims),
                format: ImageFormat::Jpeg,
                source_url: None,
                image_asset_id: Some(format!("asset-{}", node)),
                background: false,
            }),
        }
    }

    fn page(id: &str, assets: Vec<AssetInfo>, engine: &RecommendationEngine) -> PageAnalysis {
        let assets: Vec<AssetInfo> = assets
            .into_iter()
            .map(|mut a| {
                a.page = Some(PageRef {
                    id: id.to_string(),
                    name: id.to_string(),
                    ..Default::default()
                });
                a
            })
            .collect();
        let breakpoints =
            Breakpoints::from_fn(|_| BreakpointData::from_assets(assets.clone(), 0, 1000));
        let recommendations = deduplicate(
            breakpoints
                .iter()
                .flat_map(|(bp, d)| engine.recommend(bp, &d.assets))
                .collect(),
        );
        PageAnalysis {
            page: PageRef {
                id: id.to_string(),
                name: id.to_string(),
                ..Default::default()
            },
            breakpoints,
            recommendations,
            asset_count: assets.len(),
            unresolved_assets: Vec::new(),
        }
    }

    #[test]
    fn test_cap_clamps_950mb_against_1000mb_to_900mb() {
        let savings = cap_savings(950 * MB, 1000 * MB, 0.9);
        assert_eq!(savings.raw_bytes, 950 * MB);
        assert_eq!(savings.reported_bytes, 900 * MB);
        assert!(savings.capped);
    }

    #[test]
    fn test_cap_leaves_small_savings_alone() {
        let savings = cap_savings(10, 1000, 0.9);
        assert_eq!(savings.reported_bytes, 10);
        assert!(!savings.capped);
        assert_eq!(cap_savings(5, 0, 0.9).reported_bytes, 0);
    }

    #[test]
    fn test_overall_totals_sum_pages() {
        let engine = engine();
        let settings = SavingsSettings::default();
        let traffic = TrafficSettings::default();
        let pages = vec![
            page("home", vec![jpeg("a", 100.0, 100.0)], &engine),
            page("about", vec![jpeg("b", 200.0, 200.0)], &engine),
        ];
        let project = ProjectAggregator::new(&engine, &settings, &traffic)
            .aggregate(AnalysisMode::Canvas, pages);

        assert_eq!(project.total_pages, 2);
        let desktop = project.breakpoint(Breakpoint::Desktop);
        assert_eq!(desktop.total_bytes, 2500 + 10_000 + 2000);
        assert_eq!(desktop.assets.len(), 2);
        assert_eq!(desktop.breakdown.html_css, 2000);
        assert!(project.cms_impact.is_none());
    }

    #[test]
    fn test_shared_asset_on_three_pages_yields_one_recommendation_per_kind() {
        let engine = engine();
        let settings = SavingsSettings::default();
        let traffic = TrafficSettings::default();
        let pages: Vec<_> = ["home", "about", "blog"]
            .iter()
            .map(|id| page(id, vec![jpeg("logo", 2000.0, 400.0)], &engine))
            .collect();
        let project = ProjectAggregator::new(&engine, &settings, &traffic)
            .aggregate(AnalysisMode::Canvas, pages);

        let oversized: Vec<_> = project
            .all_recommendations
            .iter()
            .filter(|r| r.kind == crate::analyzer::recommendation::RecommendationKind::Oversized)
            .collect();
        assert_eq!(oversized.len(), 1);
        assert_eq!(oversized[0].affected_pages.len(), 3);
    }

    #[test]
    fn test_reported_savings_never_exceed_cap() {
        let engine = engine();
        let settings = SavingsSettings::default();
        let traffic = TrafficSettings::default();
        let pages = vec![page("home", vec![jpeg("huge", 8000.0, 100.0)], &engine)];
        let project = ProjectAggregator::new(&engine, &settings, &traffic)
            .aggregate(AnalysisMode::Canvas, pages);

        for (bp, savings) in project.savings.breakpoints.iter() {
            let total = project.breakpoint(bp).total_bytes;
            assert!(savings.reported_bytes as f64 <= 0.9 * total as f64);
        }
        let heaviest = project.breakpoint(Breakpoint::Desktop).total_bytes;
        assert!(project.savings.overall.reported_bytes as f64 <= 0.9 * heaviest as f64);
    }

    proptest! {
        #[test]
        fn prop_cap_invariant(raw in any::<u64>(), total in 0u64..(1u64 << 50), bp in 1u32..=10_000) {
            let ratio = f64::from(bp) / 10_000.0;
            let s = cap_savings(raw, total, ratio);
            prop_assert!(s.reported_bytes <= raw);
            prop_assert!(s.reported_bytes as f64 <= ratio * total as f64 + 1.0);
            prop_assert_eq!(s.capped, s.reported_bytes < raw);
        }
    }
}
