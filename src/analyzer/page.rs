//! Per-page analysis across the three breakpoints

use super::analysis_types::PageAnalysis;
use super::asset_types::{
    AssetDetails, AssetInfo, Breakpoints, CmsAsset, ImageAsset, ImageFormat, PageRef, VectorAsset,
};
use super::breakpoint::BreakpointData;
use super::diagnostics::{DiagnosticKind, ScanLog};
use super::estimator::{raster_bytes, ByteEstimator, Estimate, EstimateRequest};
use super::recommendations::{deduplicate, RecommendationEngine};
use crate::source::{AssetSource, CmsBinding, CmsResolution, NodeKind, SourceError, SourceNode};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Walks one page's nodes at every breakpoint and estimates their weight
pub struct PageAnalyzer<'a> {
    estimator: &'a ByteEstimator,
    engine: &'a RecommendationEngine,
}

/// Per-page memo so CMS bindings resolve once and diagnostics are not repeated per breakpoint
#[derive(Default)]
struct PageState {
    cms: HashMap<String, Result<CmsResolution, SourceError>>,
    noted: HashSet<(DiagnosticKind, String)>,
    unresolved: Vec<AssetInfo>,
}

impl PageState {
    fn note(&mut self, log: &mut ScanLog, kind: DiagnosticKind, subject: &str, message: &str) {
        if self.noted.insert((kind, subject.to_string())) {
            log.record(kind, subject, message);
        }
    }
}

impl<'a> PageAnalyzer<'a> {
    /// Create an analyzer sharing the scan's estimator and engine
    pub fn new(estimator: &'a ByteEstimator, engine: &'a RecommendationEngine) -> Self {
        Self { estimator, engine }
    }

    /// Analyze one page
    ///
    /// Only node enumeration errors are returned; every other problem is
    /// recorded in `log` and replaced by a flagged fallback.
    pub fn analyze<S: AssetSource + ?Sized>(
        &self,
        source: &S,
        page: &PageRef,
        log: &mut ScanLog,
    ) -> Result<PageAnalysis, SourceError> {
        let settings = self.estimator.settings();
        let font_faces: BTreeSet<_> = source.fonts(page).into_iter().collect();
        let font_bytes = (font_faces.len() as u64).saturating_mul(settings.font_face_bytes);

        let mut state = PageState::default();
        let breakpoints = Breakpoints::try_from_fn(|bp| {
            let nodes = source.nodes(page, bp)?;
            let assets: Vec<AssetInfo> = nodes
                .iter()
                .filter(|node| node.visible && node.kind != NodeKind::Other)
                .filter_map(|node| self.asset_for(source, page, node, &mut state, log))
                .collect();
            Ok::<_, SourceError>(BreakpointData::from_assets(
                assets,
                font_bytes,
                settings.base_overhead_bytes,
            ))
        })?;

        let raw: Vec<_> = breakpoints
            .iter()
            .flat_map(|(bp, data)| self.engine.recommend(bp, &data.assets))
            .collect();
        let recommendations = deduplicate(raw);

        let asset_count = breakpoints
            .iter()
            .flat_map(|(_, data)| data.assets.iter().map(|a| a.node_id.as_str()))
            .collect::<HashSet<_>>()
            .len();

        log::debug!(
            "page '{}': {} assets, {} recommendations",
            page.name,
            asset_count,
            recommendations.len()
        );

        Ok(PageAnalysis {
            page: page.clone(),
            breakpoints,
            recommendations,
            asset_count,
            unresolved_assets: state.unresolved,
        })
    }

    /// Build the asset for a visible node; `None` when it must stay out of page totals
    fn asset_for<S: AssetSource + ?Sized>(
        &self,
        source: &S,
        page: &PageRef,
        node: &SourceNode,
        state: &mut PageState,
        log: &mut ScanLog,
    ) -> Option<AssetInfo> {
        if let Some(binding) = &node.cms {
            return self.cms_asset(source, page, node, binding, state, log);
        }

        let (estimate, details) = match node.kind {
            NodeKind::Image | NodeKind::Background => {
                let format = detect_format(node.format.as_deref(), node.source_url.as_deref());
                if format == ImageFormat::Unknown {
                    state.note(
                        log,
                        DiagnosticKind::EstimationUncertainty,
                        &node.id,
                        "image format unknown; assuming average density",
                    );
                }
                let actual = node.actual.filter(|d| d.is_valid());
                if node.actual.is_some() && actual.is_none() {
                    state.note(
                        log,
                        DiagnosticKind::EstimationUncertainty,
                        &node.id,
                        "source dimensions unreadable; estimating from render size",
                    );
                }
                let estimate = self.estimator.estimate(EstimateRequest::Raster {
                    dimensions: actual.or(node.rendered),
                    format,
                });
                let details = AssetDetails::Image(ImageAsset {
                    actual,
                    format,
                    source_url: node.source_url.clone(),
                    image_asset_id: node.image_asset_id.clone(),
                    background: node.kind == NodeKind::Background,
                });
                (estimate, details)
            }
            NodeKind::Vector => {
                let markup_bytes = node.markup.as_ref().map(|m| m.len() as u64);
                let estimate = self.estimator.estimate(EstimateRequest::Vector {
                    markup_bytes,
                    path_count: node.path_count,
                });
                let details = AssetDetails::Vector(VectorAsset {
                    markup_bytes,
                    path_count: node.path_count,
                });
                (estimate, details)
            }
            NodeKind::Other => return None,
        };

        if let Some(note) = &estimate.fallback_note {
            state.note(log, DiagnosticKind::EstimationUncertainty, &node.id, note);
        }

        Some(build_asset(node, page, estimate, details))
    }

    fn cms_asset<S: AssetSource + ?Sized>(
        &self,
        source: &S,
        page: &PageRef,
        node: &SourceNode,
        binding: &CmsBinding,
        state: &mut PageState,
        log: &mut ScanLog,
    ) -> Option<AssetInfo> {
        let resolution = state
            .cms
            .entry(binding.collection_id.clone())
            .or_insert_with(|| source.resolve_cms(binding))
            .clone();

        let resolution = match resolution {
            Ok(resolution) => resolution,
            Err(err) => {
                state.note(
                    log,
                    DiagnosticKind::ResolutionFailure,
                    &node.id,
                    &err.to_string(),
                );
                if !state.unresolved.iter().any(|a| a.node_id == node.id) {
                    let estimate = self.estimator.cms_manual("collection unresolved");
                    let mut asset = build_asset(
                        node,
                        page,
                        estimate,
                        AssetDetails::Cms(CmsAsset {
                            collection_id: binding.collection_id.clone(),
                            collection_name: None,
                            item_id: None,
                            source_url: node.source_url.clone(),
                            actual: None,
                            format: detect_format(
                                node.format.as_deref(),
                                node.source_url.as_deref(),
                            ),
                            item_count: None,
                        }),
                    );
                    asset.page = None;
                    asset.unresolved_reason = Some(err.to_string());
                    state.unresolved.push(asset);
                }
                return None;
            }
        };

        let item = resolution.representative.as_ref();
        let source_url = item
            .and_then(|i| i.source_url.clone())
            .or_else(|| node.source_url.clone());
        let format = detect_format(
            item.and_then(|i| i.format.as_deref()).or(node.format.as_deref()),
            source_url.as_deref(),
        );
        let actual = item
            .filter(|i| i.readable)
            .and_then(|i| i.actual)
            .filter(|d| d.is_valid() && !d.is_degenerate());

        let estimate = match (item, actual) {
            (Some(_), Some(dims)) => Estimate {
                bytes: raster_bytes(dims, format),
                fallback_note: None,
            },
            (None, _) => self.estimator.cms_manual("collection has no readable items"),
            (Some(_), None) => self.estimator.cms_manual("image source unreadable"),
        };
        if let Some(note) = &estimate.fallback_note {
            state.note(log, DiagnosticKind::EstimationUncertainty, &node.id, note);
        }

        Some(build_asset(
            node,
            page,
            estimate,
            AssetDetails::Cms(CmsAsset {
                collection_id: binding.collection_id.clone(),
                collection_name: resolution.collection_name.clone(),
                item_id: item.map(|i| i.id.clone()),
                source_url,
                actual,
                format,
                item_count: resolution.item_count,
            }),
        ))
    }
}

fn build_asset(
    node: &SourceNode,
    page: &PageRef,
    estimate: Estimate,
    details: AssetDetails,
) -> AssetInfo {
    let is_manual_estimate = estimate.is_fallback();
    AssetInfo {
        node_id: node.id.clone(),
        name: if node.name.is_empty() {
            node.id.clone()
        } else {
            node.name.clone()
        },
        estimated_bytes: estimate.bytes,
        rendered: node.rendered,
        visible: node.visible,
        page: Some(page.clone()),
        is_manual_estimate,
        estimate_note: estimate.fallback_note,
        unresolved_reason: None,
        details,
    }
}

/// Format from an explicit tag, falling back to the URL's extension
fn detect_format(tag: Option<&str>, url: Option<&str>) -> ImageFormat {
    tag.map(ImageFormat::detect)
        .filter(|f| *f != ImageFormat::Unknown)
        .or_else(|| url.map(ImageFormat::detect))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::asset_types::{Breakpoint, Dimensions};
    use crate::config::{ConfigFile, EstimatorSettings};
    use crate::source::memory::{InMemorySource, SnapshotCollection, SnapshotNode, SnapshotPage};
    use crate::source::{CmsItem, FontFace};

    fn tools() -> (ByteEstimator, RecommendationEngine) {
        let config = ConfigFile::default();
        let estimator = ByteEstimator::new(config.estimator.clone());
        let engine = RecommendationEngine::new(estimator.clone(), config.recommendations);
        (estimator, engine)
    }

    fn run(source: &InMemorySource) -> (PageAnalysis, ScanLog) {
        let (estimator, engine) = tools();
        let analyzer = PageAnalyzer::new(&estimator, &engine);
        let mut log = ScanLog::new();
        let page = source.pages().unwrap().remove(0);
        let analysis = analyzer.analyze(source, &page, &mut log).unwrap();
        (analysis, log)
    }

    fn image(id: &str, w: f64, h: f64, format: &str) -> SnapshotNode {
        let mut node = SourceNode::new(id, NodeKind::Image);
        node.actual = Some(Dimensions::new(w, h));
        node.rendered = Some(Dimensions::new(w, h));
        node.format = Some(format.to_string());
        SnapshotNode::from(node)
    }

    #[test]
    fn test_empty_page_has_only_base_overhead() {
        let source = InMemorySource::new(vec![SnapshotPage::new("home", "Home")]);
        let (analysis, log) = run(&source);
        let overhead = EstimatorSettings::default().base_overhead_bytes;
        for (_, data) in analysis.breakpoints.iter() {
            assert_eq!(data.total_bytes, overhead);
            assert!(data.assets.is_empty());
        }
        assert_eq!(analysis.asset_count, 0);
        assert!(analysis.recommendations.is_empty());
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_hidden_on_mobile_counts_only_elsewhere() {
        let mut node = image("hero", 100.0, 100.0, "webp");
        node.hidden_at = vec![Breakpoint::Mobile];
        let mut page = SnapshotPage::new("home", "Home");
        page.nodes.push(node);
        let (analysis, _) = run(&InMemorySource::new(vec![page]));

        assert!(analysis.breakpoint(Breakpoint::Mobile).assets.is_empty());
        assert_eq!(analysis.breakpoint(Breakpoint::Tablet).assets.len(), 1);
        assert_eq!(analysis.breakpoint(Breakpoint::Desktop).assets.len(), 1);
        assert_eq!(analysis.asset_count, 1);
    }

    #[test]
    fn test_background_images_fold_into_images_bucket() {
        let mut node = SourceNode::new("bg", NodeKind::Background);
        node.actual = Some(Dimensions::new(200.0, 100.0));
        node.format = Some("jpg".to_string());
        let mut page = SnapshotPage::new("home", "Home");
        page.nodes.push(SnapshotNode::from(node));
        let (analysis, _) = run(&InMemorySource::new(vec![page]));

        let desktop = analysis.breakpoint(Breakpoint::Desktop);
        assert_eq!(desktop.breakdown.images, 5000);
        assert_eq!(desktop.breakdown.svg, 0);
        match &desktop.assets[0].details {
            AssetDetails::Image(image) => assert!(image.background),
            other => panic!("unexpected details {:?}", other),
        }
    }

    #[test]
    fn test_fonts_are_counted_once_per_distinct_face() {
        let mut page = SnapshotPage::new("home", "Home");
        let inter = FontFace {
            family: "Inter".to_string(),
            weight: 400,
            italic: false,
        };
        page.fonts = vec![inter.clone(), inter.clone(), FontFace { weight: 700, ..inter }];
        let (analysis, _) = run(&InMemorySource::new(vec![page]));
        let face = EstimatorSettings::default().font_face_bytes;
        assert_eq!(analysis.breakpoint(Breakpoint::Mobile).breakdown.fonts, 2 * face);
    }

    #[test]
    fn test_vector_uses_markup_length() {
        let markup = "<svg><path d=\"M0 0L10 10\"/></svg>";
        let mut node = SourceNode::new("logo", NodeKind::Vector);
        node.markup = Some(markup.to_string());
        let mut page = SnapshotPage::new("home", "Home");
        page.nodes.push(SnapshotNode::from(node));
        let (analysis, _) = run(&InMemorySource::new(vec![page]));
        assert_eq!(
            analysis.breakpoint(Breakpoint::Tablet).breakdown.svg,
            markup.len() as u64
        );
    }

    #[test]
    fn test_unknown_format_records_uncertainty_once() {
        let mut page = SnapshotPage::new("home", "Home");
        page.nodes.push(image("pic", 100.0, 100.0, "bmp-ish"));
        let (analysis, log) = run(&InMemorySource::new(vec![page]));
        assert_eq!(analysis.breakpoint(Breakpoint::Desktop).assets.len(), 1);
        assert_eq!(log.count(DiagnosticKind::EstimationUncertainty), 1);
    }

    #[test]
    fn test_invalid_source_dimensions_fall_back_to_render_size() {
        let mut node = SourceNode::new("banner", NodeKind::Image);
        node.actual = Some(Dimensions::new(-1.0, -1.0));
        node.rendered = Some(Dimensions::new(1200.0, 1200.0));
        node.format = Some("webp".to_string());
        let mut page = SnapshotPage::new("home", "Home");
        page.nodes.push(SnapshotNode::from(node));
        let (analysis, log) = run(&InMemorySource::new(vec![page]));

        let asset = &analysis.breakpoint(Breakpoint::Desktop).assets[0];
        assert_eq!(asset.estimated_bytes, 216_000);
        assert!(!asset.is_manual_estimate);
        assert_eq!(asset.actual(), None);
        assert_eq!(log.count(DiagnosticKind::EstimationUncertainty), 1);

        // Size rule is skipped, compression still applies
        assert_eq!(analysis.recommendations.len(), 1);
        assert_eq!(
            analysis.recommendations[0].kind,
            crate::analyzer::RecommendationKind::Compression
        );
    }

    #[test]
    fn test_unreadable_cms_image_gets_flagged_manual_estimate() {
        let mut node = SourceNode::new("cms-card", NodeKind::Image);
        node.cms = Some(CmsBinding {
            collection_id: "posts".to_string(),
            field: Some("cover".to_string()),
        });
        let mut page = SnapshotPage::new("blog", "Blog");
        page.nodes.push(SnapshotNode::from(node));
        let mut source = InMemorySource::new(vec![page]);
        source.snapshot_mut().collections.insert(
            "posts".to_string(),
            SnapshotCollection {
                name: Some("Posts".to_string()),
                item_count: Some(40),
                items: vec![CmsItem {
                    id: "p1".to_string(),
                    source_url: Some("https://cdn.example.com/p1.png".to_string()),
                    actual: None,
                    format: None,
                    readable: false,
                }],
            },
        );

        let (analysis, log) = run(&source);
        let asset = &analysis.breakpoint(Breakpoint::Desktop).assets[0];
        assert!(asset.is_cms_asset());
        assert!(asset.is_manual_estimate);
        assert_eq!(
            asset.estimated_bytes,
            EstimatorSettings::default().cms_fallback_bytes
        );
        assert!(asset.estimate_note.as_deref().unwrap().contains("unreadable"));
        assert_eq!(log.count(DiagnosticKind::EstimationUncertainty), 1);
        assert!(analysis.recommendations.is_empty());
    }

    #[test]
    fn test_unresolved_cms_binding_is_excluded_from_totals() {
        let mut node = SourceNode::new("orphan", NodeKind::Image);
        node.cms = Some(CmsBinding {
            collection_id: "missing".to_string(),
            field: None,
        });
        let mut page = SnapshotPage::new("home", "Home");
        page.nodes.push(SnapshotNode::from(node));
        let (analysis, log) = run(&InMemorySource::new(vec![page]));

        let overhead = EstimatorSettings::default().base_overhead_bytes;
        assert_eq!(analysis.breakpoint(Breakpoint::Desktop).total_bytes, overhead);
        assert_eq!(analysis.unresolved_assets.len(), 1);
        assert!(analysis.unresolved_assets[0].unresolved_reason.is_some());
        assert_eq!(log.count(DiagnosticKind::ResolutionFailure), 1);
    }
}
