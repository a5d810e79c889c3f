//! CMS bandwidth projection

use super::analysis_types::{CmsImpact, CollectionImpact, PageAnalysis};
use super::asset_types::{AssetDetails, AssetIdentity, Breakpoint};
use crate::config::TrafficSettings;
use std::collections::BTreeMap;

#[derive(Default)]
struct CollectionAccumulator {
    name: Option<String>,
    item_count: Option<u64>,
    /// (bytes, seen at desktop, manual) per distinct asset
    assets: BTreeMap<AssetIdentity, (u64, bool, bool)>,
}

/// Project CMS bandwidth across all pages
///
/// Each distinct CMS asset contributes one representative estimate per
/// view: its desktop value when it is visible at desktop, otherwise the
/// largest value seen. Returns `None` when no page uses CMS assets.
pub fn cms_impact(pages: &[PageAnalysis], traffic: &TrafficSettings) -> Option<CmsImpact> {
    let mut collections: BTreeMap<String, CollectionAccumulator> = BTreeMap::new();

    for page in pages {
        for (breakpoint, data) in page.breakpoints.iter() {
            for asset in &data.assets {
                let AssetDetails::Cms(cms) = &asset.details else {
                    continue;
                };
                let acc = collections.entry(cms.collection_id.clone()).or_default();
                acc.name = acc.name.take().or_else(|| cms.collection_name.clone());
                acc.item_count = acc.item_count.max(cms.item_count);

                let at_desktop = breakpoint == Breakpoint::Desktop;
                let entry = acc.assets.entry(asset.identity()).or_insert((
                    asset.estimated_bytes,
                    at_desktop,
                    asset.is_manual_estimate,
                ));
                match (entry.1, at_desktop) {
                    (false, true) => {
                        *entry = (asset.estimated_bytes, true, asset.is_manual_estimate)
                    }
                    (false, false) | (true, true) if asset.estimated_bytes > entry.0 => {
                        *entry = (asset.estimated_bytes, entry.1, asset.is_manual_estimate)
                    }
                    _ => {}
                }
            }
        }
    }

    if collections.is_empty() {
        return None;
    }

    let monthly_pageviews = traffic.monthly_pageviews();
    let collections: Vec<CollectionImpact> = collections
        .into_iter()
        .map(|(collection_id, acc)| {
            let bytes_per_view = acc
                .assets
                .values()
                .fold(0u64, |sum, (bytes, _, _)| sum.saturating_add(*bytes));
            CollectionImpact {
                collection_id,
                collection_name: acc.name,
                item_count: acc.item_count,
                asset_count: acc.assets.len(),
                bytes_per_view,
                manual_estimates: acc.assets.values().filter(|(_, _, manual)| *manual).count(),
                projected_monthly_bytes: bytes_per_view.saturating_mul(monthly_pageviews),
            }
        })
        .collect();

    let total_bytes_per_view = collections
        .iter()
        .fold(0u64, |sum, c| sum.saturating_add(c.bytes_per_view));

    Some(CmsImpact {
        collections,
        total_bytes_per_view,
        monthly_pageviews,
        projected_monthly_bytes: total_bytes_per_view.saturating_mul(monthly_pageviews),
    })
}
