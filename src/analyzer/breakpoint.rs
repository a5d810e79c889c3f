//! Per-breakpoint totals and category breakdown

use super::asset_types::{AssetInfo, AssetKind};
use serde::{Deserialize, Serialize};

/// Byte totals per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownData {
    /// Raster images
    pub images: u64,
    /// Vector graphics
    pub svg: u64,
    /// Web fonts
    pub fonts: u64,
    /// Markup, styles and scripts baseline
    pub html_css: u64,
}

impl BreakdownData {
    /// Sum of all categories
    pub fn total(&self) -> u64 {
        self.images
            .saturating_add(self.svg)
            .saturating_add(self.fonts)
            .saturating_add(self.html_css)
    }

    /// Category-wise sum
    pub fn merged(&self, other: &BreakdownData) -> BreakdownData {
        BreakdownData {
            images: self.images.saturating_add(other.images),
            svg: self.svg.saturating_add(other.svg),
            fonts: self.fonts.saturating_add(other.fonts),
            html_css: self.html_css.saturating_add(other.html_css),
        }
    }
}

/// Everything measured at one breakpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointData {
    /// Estimated bytes transferred
    pub total_bytes: u64,
    /// Category totals
    pub breakdown: BreakdownData,
    /// Visible assets counted at this breakpoint
    pub assets: Vec<AssetInfo>,
}

impl BreakpointData {
    /// Build from visible assets plus the page-level font and baseline costs
    pub fn from_assets(assets: Vec<AssetInfo>, font_bytes: u64, base_overhead: u64) -> Self {
        let mut breakdown = aggregate(&assets);
        breakdown.fonts = breakdown.fonts.saturating_add(font_bytes);
        breakdown.html_css = breakdown.html_css.saturating_add(base_overhead);
        Self {
            total_bytes: breakdown.total(),
            breakdown,
            assets,
        }
    }

    /// Fold another breakpoint's data into this one (used for project totals)
    pub fn absorb(&mut self, other: &BreakpointData) {
        self.breakdown = self.breakdown.merged(&other.breakdown);
        self.total_bytes = self.total_bytes.saturating_add(other.total_bytes);
        self.assets.extend(other.assets.iter().cloned());
    }

    /// Sum of asset estimates only
    pub fn asset_bytes(&self) -> u64 {
        self.assets
            .iter()
            .fold(0u64, |acc, a| acc.saturating_add(a.estimated_bytes))
    }
}

/// Sum asset estimates by category
///
/// Pure and order-independent: any permutation of `assets` yields the same
/// breakdown. Fonts and baseline are page-level and start at zero here.
pub fn aggregate(assets: &[AssetInfo]) -> BreakdownData {
    assets
        .iter()
        .fold(BreakdownData::default(), |mut acc, asset| {
            match asset.kind() {
                AssetKind::Image => acc.images = acc.images.saturating_add(asset.estimated_bytes),
                AssetKind::Svg => acc.svg = acc.svg.saturating_add(asset.estimated_bytes),
            }
            acc
        })
}
