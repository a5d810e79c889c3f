//! Recommendation generation and project-wide de-duplication

use super::asset_types::{AssetDetails, AssetInfo, Breakpoint, Dimensions, ImageFormat};
use super::estimator::{raster_bytes, ByteEstimator};
use super::recommendation::{Priority, Recommendation, RecommendationKind};
use crate::config::RecommendationSettings;
use crate::fmt::format_bytes;
use std::collections::{BTreeSet, HashMap};

/// Inspects assets and emits savings recommendations
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    estimator: ByteEstimator,
    settings: RecommendationSettings,
}

impl RecommendationEngine {
    /// Create an engine; the estimator supplies the optimal-size heuristics
    pub fn new(estimator: ByteEstimator, settings: RecommendationSettings) -> Self {
        Self {
            estimator,
            settings,
        }
    }

    /// Thresholds in use
    pub fn settings(&self) -> &RecommendationSettings {
        &self.settings
    }

    /// Generate recommendations for the assets observed at one breakpoint
    ///
    /// The result is raw (one record per asset instance and fix) and sorted;
    /// pass it through [`deduplicate`] before summing savings.
    pub fn recommend(&self, breakpoint: Breakpoint, assets: &[AssetInfo]) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for asset in assets {
            // Fallback bytes are guesses; nothing byte-derived can be claimed for them
            if !asset.visible || asset.is_manual_estimate || asset.estimated_bytes == 0 {
                continue;
            }

            let before = recommendations.len();
            match &asset.details {
                AssetDetails::Image(_) | AssetDetails::Cms(_) => {
                    self.raster_recommendations(breakpoint, asset, &mut recommendations);
                }
                AssetDetails::Vector(_) => {
                    self.vector_recommendations(breakpoint, asset, &mut recommendations);
                }
            }
            if recommendations.len() > before {
                log::debug!(
                    "{} recommendation(s) for '{}' at {}",
                    recommendations.len() - before,
                    asset.name,
                    breakpoint
                );
            }
        }

        sort_recommendations(&mut recommendations);
        recommendations
    }

    fn raster_recommendations(
        &self,
        breakpoint: Breakpoint,
        asset: &AssetInfo,
        out: &mut Vec<Recommendation>,
    ) {
        let format = asset.format().unwrap_or_default();
        let mut dimension_or_format_issue = false;

        if let Some(rec) = self.oversized(breakpoint, asset, format) {
            dimension_or_format_issue = true;
            out.push(rec);
        }

        if format.is_legacy() {
            dimension_or_format_issue = true;
            let savings = fraction_of(asset.estimated_bytes, self.settings.modern_format_savings);
            out.extend(self.build(
                breakpoint,
                asset,
                RecommendationKind::Format,
                savings,
                format!(
                    "'{}' is served as {} ({})",
                    asset.name,
                    format,
                    format_bytes(asset.estimated_bytes)
                ),
                format!(
                    "Convert to WebP or AVIF to save about {:.0}%",
                    self.settings.modern_format_savings * 100.0
                ),
                None,
            ));
        }

        if !dimension_or_format_issue
            && asset.estimated_bytes >= self.settings.compression_threshold_bytes
        {
            let savings = fraction_of(asset.estimated_bytes, self.settings.compression_savings);
            out.extend(self.build(
                breakpoint,
                asset,
                RecommendationKind::Compression,
                savings,
                format!(
                    "'{}' weighs {} with no size or format issue",
                    asset.name,
                    format_bytes(asset.estimated_bytes)
                ),
                "Recompress with lossy settings (quality 75-85)".to_string(),
                None,
            ));
        }
    }

    /// Oversampling check; silently skipped when either dimension set is unusable
    fn oversized(
        &self,
        breakpoint: Breakpoint,
        asset: &AssetInfo,
        format: ImageFormat,
    ) -> Option<Recommendation> {
        let rendered = usable(asset.rendered)?;
        let actual = usable(asset.actual())?;

        let optimal = self.estimator.optimal_dimensions(rendered);
        let ratio = self.settings.oversize_ratio;
        if actual.width <= optimal.width * ratio && actual.height <= optimal.height * ratio {
            return None;
        }

        // Never suggest upscaling along either axis
        let target = Dimensions::new(
            optimal.width.min(actual.width).round().max(1.0),
            optimal.height.min(actual.height).round().max(1.0),
        );
        let at_actual = raster_bytes(actual, format);
        let at_optimal = raster_bytes(target, format);
        let savings = at_actual.saturating_sub(at_optimal);

        self.build(
            breakpoint,
            asset,
            RecommendationKind::Oversized,
            savings,
            format!(
                "'{}' is {} but displays at {} on {}",
                asset.name, actual, rendered, breakpoint
            ),
            format!(
                "Resize to {} ({}x the display size)",
                target,
                self.estimator.settings().target_pixel_density
            ),
            Some(target),
        )
    }

    fn vector_recommendations(
        &self,
        breakpoint: Breakpoint,
        asset: &AssetInfo,
        out: &mut Vec<Recommendation>,
    ) {
        if asset.estimated_bytes < self.settings.vector_compression_threshold_bytes {
            return;
        }
        let savings = fraction_of(asset.estimated_bytes, self.settings.compression_savings);
        out.extend(self.build(
            breakpoint,
            asset,
            RecommendationKind::Compression,
            savings,
            format!(
                "SVG '{}' has {} of markup",
                asset.name,
                format_bytes(asset.estimated_bytes)
            ),
            "Minify the markup and simplify paths, or export as an image if it is decorative"
                .to_string(),
            None,
        ));
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        breakpoint: Breakpoint,
        asset: &AssetInfo,
        kind: RecommendationKind,
        savings: u64,
        description: String,
        action: String,
        optimal_dimensions: Option<Dimensions>,
    ) -> Option<Recommendation> {
        let current = asset.estimated_bytes;
        let savings = savings.min(current);
        if savings < self.settings.min_savings_bytes {
            return None;
        }

        let collection_id = match &asset.details {
            AssetDetails::Cms(cms) => Some(cms.collection_id.clone()),
            _ => None,
        };

        Some(Recommendation {
            kind,
            priority: Priority::from_savings(savings, current, &self.settings),
            node_id: asset.node_id.clone(),
            asset_name: asset.name.clone(),
            identity: asset.identity(),
            current_bytes: current,
            potential_savings: savings,
            description,
            action,
            page: asset.page.clone(),
            breakpoint: Some(breakpoint),
            is_cms_asset: asset.is_cms_asset(),
            collection_id,
            optimal_dimensions,
            occurrences: 1,
            affected_pages: asset.page.iter().map(|p| p.id.clone()).collect(),
        })
    }
}

fn usable(dimensions: Option<Dimensions>) -> Option<Dimensions> {
    dimensions.filter(|d| d.is_valid() && !d.is_degenerate())
}

fn fraction_of(bytes: u64, fraction: f64) -> u64 {
    let value = (bytes as f64 * fraction).round();
    if value.is_finite() && value > 0.0 {
        (value as u64).min(bytes)
    } else {
        0
    }
}

/// Sort by priority, then savings, then a stable identity tiebreak
pub fn sort_recommendations(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.potential_savings.cmp(&a.potential_savings))
            .then_with(|| a.node_id.cmp(&b.node_id))
            .then_with(|| {
                let a_page = a.page.as_ref().map(|p| p.id.as_str());
                let b_page = b.page.as_ref().map(|p| p.id.as_str());
                a_page.cmp(&b_page)
            })
            .then_with(|| a.breakpoint.cmp(&b.breakpoint))
            .then_with(|| a.kind.cmp(&b.kind))
    });
}

/// Collapse recommendations for the same physical asset and fix into one
///
/// The kept record is the instance with the largest savings (the first one
/// wins ties); occurrences add up and affected pages are unioned. Applying
/// this twice gives the same result as applying it once.
pub fn deduplicate(recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut index: HashMap<_, usize> = HashMap::new();
    let mut merged: Vec<Recommendation> = Vec::new();
    let mut pages: Vec<BTreeSet<String>> = Vec::new();

    for rec in recommendations {
        match index.get(&rec.dedup_key()) {
            Some(&i) => {
                pages[i].extend(rec.affected_pages.iter().cloned());
                let occurrences = merged[i].occurrences.saturating_add(rec.occurrences);
                if rec.potential_savings > merged[i].potential_savings {
                    merged[i] = rec;
                }
                merged[i].occurrences = occurrences;
            }
            None => {
                index.insert(rec.dedup_key(), merged.len());
                pages.push(rec.affected_pages.iter().cloned().collect());
                merged.push(rec);
            }
        }
    }

    for (rec, page_set) in merged.iter_mut().zip(pages) {
        rec.affected_pages = page_set.into_iter().collect();
    }

    sort_recommendations(&mut merged);
    merged
}

/// Total savings of a recommendation list
pub fn total_savings(recommendations: &[Recommendation]) -> u64 {
    recommendations
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.potential_savings))
}
