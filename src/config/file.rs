//! Configuration file data structures

use crate::analyzer::asset_types::Breakpoint;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".site-weight.toml";

/// site-weight configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Byte estimation heuristics
    pub estimator: EstimatorSettings,

    /// Recommendation thresholds
    pub recommendations: RecommendationSettings,

    /// Savings reporting
    pub savings: SavingsSettings,

    /// Traffic model for CMS bandwidth projection
    pub traffic: TrafficSettings,

    /// Per-breakpoint weight budget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<WeightBudget>,
}

/// Byte estimation heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EstimatorSettings {
    /// Markup/script/style baseline added to every breakpoint
    pub base_overhead_bytes: u64,
    /// Bytes per distinct font face (family + weight + style)
    pub font_face_bytes: u64,
    /// Raster estimate when dimensions are missing or unreadable
    pub image_fallback_bytes: u64,
    /// Vector estimate when neither markup nor path count is known
    pub vector_fallback_bytes: u64,
    /// Manual estimate for CMS images whose source cannot be read
    pub cms_fallback_bytes: u64,
    /// Bytes per vector path when only a path count is known
    pub vector_bytes_per_path: u64,
    /// Pixel density the "optimal" image size is computed for
    pub target_pixel_density: f64,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            base_overhead_bytes: 50 * 1024,
            font_face_bytes: 25 * 1024,
            image_fallback_bytes: 50 * 1024,
            vector_fallback_bytes: 2 * 1024,
            cms_fallback_bytes: 100 * 1024,
            vector_bytes_per_path: 150,
            target_pixel_density: 2.0,
        }
    }
}

/// Recommendation thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RecommendationSettings {
    /// Source side must exceed the optimal side by this factor to count as oversized
    pub oversize_ratio: f64,
    /// Fraction of bytes saved by moving a legacy raster to WebP/AVIF
    pub modern_format_savings: f64,
    /// Raster size above which recompression is suggested
    pub compression_threshold_bytes: u64,
    /// Vector size above which minification is suggested
    pub vector_compression_threshold_bytes: u64,
    /// Fraction of bytes saved by lossy recompression
    pub compression_savings: f64,
    /// Recommendations saving less than this are dropped
    pub min_savings_bytes: u64,
    /// Absolute savings for high priority
    pub high_savings_bytes: u64,
    /// Fraction of current bytes for high priority
    pub high_savings_fraction: f64,
    /// Absolute savings for medium priority
    pub medium_savings_bytes: u64,
    /// Fraction of current bytes for medium priority
    pub medium_savings_fraction: f64,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            oversize_ratio: 1.5,
            modern_format_savings: 0.3,
            compression_threshold_bytes: 200 * 1024,
            vector_compression_threshold_bytes: 20 * 1024,
            compression_savings: 0.2,
            min_savings_bytes: 1024,
            high_savings_bytes: 100 * 1024,
            high_savings_fraction: 0.5,
            medium_savings_bytes: 25 * 1024,
            medium_savings_fraction: 0.2,
        }
    }
}

/// Savings reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SavingsSettings {
    /// Reported savings never exceed this fraction of a breakpoint's total
    pub cap_ratio: f64,
}

impl Default for SavingsSettings {
    fn default() -> Self {
        Self { cap_ratio: 0.9 }
    }
}

/// Traffic model for CMS bandwidth projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TrafficSettings {
    /// Visits per month
    pub monthly_visits: u64,
    /// Average pages viewed per visit
    pub pages_per_visit: f64,
}

impl Default for TrafficSettings {
    fn default() -> Self {
        Self {
            monthly_visits: 10_000,
            pages_per_visit: 3.0,
        }
    }
}

impl TrafficSettings {
    /// Projected page views per month
    pub fn monthly_pageviews(&self) -> u64 {
        let views = self.monthly_visits as f64 * self.pages_per_visit;
        if views.is_finite() && views > 0.0 {
            views.round() as u64
        } else {
            0
        }
    }
}

/// Per-breakpoint weight budget in KB
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WeightBudget {
    /// Mobile warning threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_warn_kb: Option<u64>,
    /// Mobile hard limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_max_kb: Option<u64>,
    /// Tablet warning threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tablet_warn_kb: Option<u64>,
    /// Tablet hard limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tablet_max_kb: Option<u64>,
    /// Desktop warning threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desktop_warn_kb: Option<u64>,
    /// Desktop hard limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desktop_max_kb: Option<u64>,
}

impl WeightBudget {
    /// `(warn, max)` thresholds in KB for one breakpoint
    pub fn limits(&self, breakpoint: Breakpoint) -> (Option<u64>, Option<u64>) {
        match breakpoint {
            Breakpoint::Mobile => (self.mobile_warn_kb, self.mobile_max_kb),
            Breakpoint::Tablet => (self.tablet_warn_kb, self.tablet_max_kb),
            Breakpoint::Desktop => (self.desktop_warn_kb, self.desktop_max_kb),
        }
    }

    /// Validate that every warning threshold is at or below its max
    pub fn validate(&self) -> Result<()> {
        for breakpoint in Breakpoint::ALL {
            if let (Some(warn), Some(max)) = self.limits(breakpoint) {
                if warn > max {
                    anyhow::bail!(
                        "{} warning threshold ({} KB) cannot exceed max size ({} KB)",
                        breakpoint,
                        warn,
                        max
                    );
                }
            }
        }
        Ok(())
    }
}

impl ConfigFile {
    /// Validate ratio ranges and budget ordering
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("savings.cap-ratio", self.savings.cap_ratio),
            (
                "recommendations.modern-format-savings",
                self.recommendations.modern_format_savings,
            ),
            (
                "recommendations.compression-savings",
                self.recommendations.compression_savings,
            ),
            (
                "recommendations.high-savings-fraction",
                self.recommendations.high_savings_fraction,
            ),
            (
                "recommendations.medium-savings-fraction",
                self.recommendations.medium_savings_fraction,
            ),
        ];
        for (key, value) in ratios {
            if !(value > 0.0 && value <= 1.0) {
                anyhow::bail!("{} must be within (0, 1], got {}", key, value);
            }
        }

        if !(self.estimator.target_pixel_density >= 1.0
            && self.estimator.target_pixel_density.is_finite())
        {
            anyhow::bail!(
                "estimator.target-pixel-density must be at least 1.0, got {}",
                self.estimator.target_pixel_density
            );
        }

        if !(self.recommendations.oversize_ratio >= 1.0
            && self.recommendations.oversize_ratio.is_finite())
        {
            anyhow::bail!(
                "recommendations.oversize-ratio must be at least 1.0, got {}",
                self.recommendations.oversize_ratio
            );
        }

        if !(self.traffic.pages_per_visit >= 0.0 && self.traffic.pages_per_visit.is_finite()) {
            anyhow::bail!(
                "traffic.pages-per-visit must be a non-negative number, got {}",
                self.traffic.pages_per_visit
            );
        }

        if let Some(budget) = &self.budget {
            budget.validate()?;
        }

        Ok(())
    }
}
