//! Recommendation types

use super::asset_types::{AssetIdentity, Breakpoint, Dimensions, PageRef};
use crate::config::RecommendationSettings;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of fix a recommendation proposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    /// Source is much larger than it is ever displayed
    Oversized,
    /// Legacy raster format with a denser modern replacement
    Format,
    /// Large file that would benefit from lossy recompression or minification
    Compression,
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Oversized => "oversized",
            Self::Format => "format",
            Self::Compression => "compression",
        };
        f.write_str(name)
    }
}

/// Urgency of a recommendation
/// Ordered from lowest to highest priority for correct Ord comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Small savings
    Low,
    /// Moderate savings
    Medium,
    /// Large absolute or relative savings
    High,
}

impl Priority {
    /// Classify savings against the configured thresholds
    ///
    /// Either the absolute savings or the fraction of the asset's current
    /// bytes can lift a recommendation into a higher band.
    pub fn from_savings(savings: u64, current: u64, settings: &RecommendationSettings) -> Self {
        let fraction = if current > 0 {
            savings as f64 / current as f64
        } else {
            0.0
        };

        if savings >= settings.high_savings_bytes || fraction >= settings.high_savings_fraction {
            Priority::High
        } else if savings >= settings.medium_savings_bytes
            || fraction >= settings.medium_savings_fraction
        {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(name)
    }
}

/// Actionable suggestion tied to one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Fix category
    pub kind: RecommendationKind,
    /// Urgency
    pub priority: Priority,
    /// Node the recommendation was raised for
    pub node_id: String,
    /// Asset display name
    pub asset_name: String,
    /// Physical asset identity used for de-duplication
    pub identity: AssetIdentity,
    /// Current estimated bytes of the asset
    pub current_bytes: u64,
    /// Bytes saved by applying the fix (never above `current_bytes`)
    pub potential_savings: u64,
    /// What is wrong
    pub description: String,
    /// What to do about it
    pub action: String,
    /// Page the recorded instance was observed on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageRef>,
    /// Breakpoint the recorded instance was observed at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoint: Option<Breakpoint>,
    /// Asset comes from a CMS collection
    #[serde(default)]
    pub is_cms_asset: bool,
    /// CMS collection, for CMS assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    /// Pixel dimensions the asset should be exported at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal_dimensions: Option<Dimensions>,
    /// Raw instances collapsed into this record
    pub occurrences: u32,
    /// Page ids the asset was observed on
    #[serde(default)]
    pub affected_pages: Vec<String>,
}

impl Recommendation {
    /// Savings as a percentage of the asset's current bytes
    pub fn savings_percent(&self) -> f64 {
        if self.current_bytes == 0 {
            0.0
        } else {
            self.potential_savings as f64 / self.current_bytes as f64 * 100.0
        }
    }

    /// Key under which instances of the same fix for the same asset collapse
    pub fn dedup_key(&self) -> (AssetIdentity, RecommendationKind) {
        (self.identity.clone(), self.kind)
    }
}
