//! Page and project analysis snapshots

use super::asset_types::{AssetInfo, Breakpoint, Breakpoints, PageRef};
use super::breakpoint::BreakpointData;
use super::diagnostics::Diagnostic;
use super::recommendation::Recommendation;
use serde::{Deserialize, Serialize};

/// What drove the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Design tool's in-memory node tree
    #[default]
    Canvas,
    /// Live built site
    Published,
}

/// One page's analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalysis {
    /// The page
    pub page: PageRef,
    /// Per-breakpoint data
    #[serde(flatten)]
    pub breakpoints: Breakpoints<BreakpointData>,
    /// Recommendations for this page, de-duplicated across its breakpoints
    pub recommendations: Vec<Recommendation>,
    /// Distinct asset-bearing nodes across all breakpoints
    pub asset_count: usize,
    /// Assets whose CMS binding could not be resolved; excluded from totals
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_assets: Vec<AssetInfo>,
}

impl PageAnalysis {
    /// Data for one breakpoint
    pub fn breakpoint(&self, breakpoint: Breakpoint) -> &BreakpointData {
        self.breakpoints.get(breakpoint)
    }
}

/// Savings at one breakpoint, before and after the safety cap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CappedSavings {
    /// Sum of de-duplicated recommendation savings
    pub raw_bytes: u64,
    /// Savings shown to users (`raw_bytes` clamped to the cap)
    pub reported_bytes: u64,
    /// Whether the cap was applied
    pub capped: bool,
}

/// Savings summary for the whole project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    /// Per-breakpoint savings
    #[serde(flatten)]
    pub breakpoints: Breakpoints<CappedSavings>,
    /// Savings across all recommendations, capped against the heaviest breakpoint
    pub overall: CappedSavings,
}

/// Bandwidth impact of one CMS collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionImpact {
    /// Collection id
    pub collection_id: String,
    /// Collection display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    /// Items in the collection, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u64>,
    /// Distinct CMS assets bound to this collection
    pub asset_count: usize,
    /// Bytes one view of a page using the collection transfers
    pub bytes_per_view: u64,
    /// Assets whose estimate is a manual fallback
    pub manual_estimates: usize,
    /// `bytes_per_view` projected over the monthly page views
    pub projected_monthly_bytes: u64,
}

/// Bandwidth impact of all CMS collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsImpact {
    /// Per-collection impact, ordered by collection id
    pub collections: Vec<CollectionImpact>,
    /// Sum of per-collection bytes per view
    pub total_bytes_per_view: u64,
    /// Page views per month from the traffic model
    pub monthly_pageviews: u64,
    /// Projected monthly transfer attributable to CMS assets
    pub projected_monthly_bytes: u64,
}

/// Transferred bytes per category on the published site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedBreakdown {
    /// Images
    #[serde(default)]
    pub images: u64,
    /// Stylesheets
    #[serde(default)]
    pub css: u64,
    /// Scripts
    #[serde(default)]
    pub js: u64,
    /// Fonts
    #[serde(default)]
    pub fonts: u64,
    /// Everything else (HTML, media, JSON)
    #[serde(default)]
    pub other: u64,
}

impl PublishedBreakdown {
    /// Sum of all categories
    pub fn total(&self) -> u64 {
        [self.images, self.css, self.js, self.fonts, self.other]
            .into_iter()
            .fold(0u64, u64::saturating_add)
    }

    /// Category-wise sum
    pub fn merged(&self, other: &PublishedBreakdown) -> PublishedBreakdown {
        PublishedBreakdown {
            images: self.images.saturating_add(other.images),
            css: self.css.saturating_add(other.css),
            js: self.js.saturating_add(other.js),
            fonts: self.fonts.saturating_add(other.fonts),
            other: self.other.saturating_add(other.other),
        }
    }
}

/// Category of an asset referenced from custom code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomAssetKind {
    /// Raster or vector image
    Image,
    /// Web font
    Font,
    /// Script
    Script,
    /// Stylesheet
    Style,
    /// Video, JSON, anything else
    Other,
}

/// Asset discovered by scanning injected code rather than the node tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCodeAsset {
    /// Referenced URL
    pub url: String,
    /// Category
    pub kind: CustomAssetKind,
    /// Loaded lazily; counts toward total weight but not first load
    pub lazy: bool,
    /// Transferred bytes, when the published site reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_bytes: Option<u64>,
    /// Injection locations that reference the URL
    pub locations: Vec<String>,
}

/// Custom code assets with first-load split
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCodeReport {
    /// Discovered assets, ordered by URL
    pub assets: Vec<CustomCodeAsset>,
    /// Known bytes of all assets
    pub total_bytes: u64,
    /// Known bytes loaded eagerly
    pub eager_bytes: u64,
    /// Known bytes loaded lazily
    pub lazy_bytes: u64,
    /// Assets without a known size
    pub unknown_size_count: usize,
}

/// Published-site byte breakdown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedData {
    /// Published pages measured
    pub page_count: usize,
    /// Transferred bytes summed over pages
    pub breakdown: PublishedBreakdown,
    /// Sum of `breakdown`
    pub total_bytes: u64,
    /// Assets referenced from custom code
    pub custom_code_assets: CustomCodeReport,
}

/// Snapshot of one completed scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysis {
    /// Canvas or published
    pub mode: AnalysisMode,
    /// Pages in scan order
    pub pages: Vec<PageAnalysis>,
    /// Number of pages
    pub total_pages: usize,
    /// Per-breakpoint totals summed across pages
    pub overall_breakpoints: Breakpoints<BreakpointData>,
    /// Recommendations de-duplicated project-wide
    pub all_recommendations: Vec<Recommendation>,
    /// Savings with the safety cap applied
    pub savings: SavingsSummary,
    /// CMS bandwidth projection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cms_impact: Option<CmsImpact>,
    /// Published-site breakdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_data: Option<PublishedData>,
    /// Non-fatal problems encountered during the scan
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ProjectAnalysis {
    /// Overall data for one breakpoint
    pub fn breakpoint(&self, breakpoint: Breakpoint) -> &BreakpointData {
        self.overall_breakpoints.get(breakpoint)
    }

    /// The `n` heaviest assets at a breakpoint, across all pages
    pub fn largest_assets(&self, breakpoint: Breakpoint, n: usize) -> Vec<&AssetInfo> {
        let mut assets: Vec<&AssetInfo> = self.breakpoint(breakpoint).assets.iter().collect();
        assets.sort_by(|a, b| {
            b.estimated_bytes
                .cmp(&a.estimated_bytes)
                .then_with(|| a.node_id.cmp(&b.node_id))
        });
        assets.truncate(n);
        assets
    }

    /// Whether any reported value is a fallback or partial
    pub fn has_estimated_data(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
