//! Dimension-to-byte heuristics
//!
//! Every estimate is a bounded, non-negative integer. Inputs that cannot be
//! read produce a configured floor value plus a note explaining why, so a
//! sum over estimates always stays finite.

use super::asset_types::{Dimensions, ImageFormat};
use crate::config::EstimatorSettings;

/// Fixed cost of an SVG document (root element, viewBox, namespaces)
pub const VECTOR_BASE_BYTES: u64 = 200;

/// What to estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EstimateRequest {
    /// Raster image at the given pixel dimensions
    Raster {
        /// Pixel dimensions the encoded file has
        dimensions: Option<Dimensions>,
        /// Encoding
        format: ImageFormat,
    },
    /// Vector graphic sized by markup complexity
    Vector {
        /// Raw markup length
        markup_bytes: Option<u64>,
        /// Number of paths/shapes
        path_count: Option<u32>,
    },
}

/// Result of an estimate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Estimate {
    /// Estimated bytes
    pub bytes: u64,
    /// Set when `bytes` is a fallback rather than a computed value
    pub fallback_note: Option<String>,
}

impl Estimate {
    fn computed(bytes: u64) -> Self {
        Self {
            bytes,
            fallback_note: None,
        }
    }

    fn fallback(bytes: u64, note: impl Into<String>) -> Self {
        Self {
            bytes,
            fallback_note: Some(note.into()),
        }
    }

    /// Whether the value is a fallback
    pub fn is_fallback(&self) -> bool {
        self.fallback_note.is_some()
    }
}

/// Maps assets to estimated transferred bytes
///
/// # Examples
///
/// ```
/// use site_weight::analyzer::estimator::{ByteEstimator, EstimateRequest};
/// use site_weight::analyzer::asset_types::{Dimensions, ImageFormat};
/// use site_weight::config::EstimatorSettings;
///
/// let estimator = ByteEstimator::new(EstimatorSettings::default());
/// let estimate = estimator.estimate(EstimateRequest::Raster {
///     dimensions: Some(Dimensions::new(1000.0, 1000.0)),
///     format: ImageFormat::Jpeg,
/// });
/// assert_eq!(estimate.bytes, 250_000);
/// assert!(!estimate.is_fallback());
/// ```
#[derive(Debug, Clone)]
pub struct ByteEstimator {
    settings: EstimatorSettings,
}

impl ByteEstimator {
    /// Create an estimator with the given heuristics
    pub fn new(settings: EstimatorSettings) -> Self {
        Self { settings }
    }

    /// Heuristics in use
    pub fn settings(&self) -> &EstimatorSettings {
        &self.settings
    }

    /// Estimate one asset
    pub fn estimate(&self, request: EstimateRequest) -> Estimate {
        match request {
            EstimateRequest::Raster { dimensions, format } => self.raster(dimensions, format),
            EstimateRequest::Vector {
                markup_bytes,
                path_count,
            } => self.vector(markup_bytes, path_count),
        }
    }

    fn raster(&self, dimensions: Option<Dimensions>, format: ImageFormat) -> Estimate {
        match dimensions {
            None => Estimate::fallback(
                self.settings.image_fallback_bytes,
                "image dimensions unavailable; using default estimate",
            ),
            Some(dims) if !dims.is_valid() => Estimate::fallback(
                self.settings.image_fallback_bytes,
                format!("invalid image dimensions {}; using default estimate", dims),
            ),
            Some(dims) => Estimate::computed(raster_bytes(dims, format)),
        }
    }

    fn vector(&self, markup_bytes: Option<u64>, path_count: Option<u32>) -> Estimate {
        // Empty markup carries no size information
        match (markup_bytes.filter(|&b| b > 0), path_count) {
            (Some(bytes), _) => Estimate::computed(bytes),
            (None, Some(paths)) => {
                let path_bytes =
                    u64::from(paths).saturating_mul(self.settings.vector_bytes_per_path);
                Estimate::computed(VECTOR_BASE_BYTES.saturating_add(path_bytes))
            }
            (None, None) => Estimate::fallback(
                self.settings.vector_fallback_bytes,
                "vector markup unavailable; using default estimate",
            ),
        }
    }

    /// Manual estimate for a CMS image whose source cannot be read
    pub fn cms_manual(&self, reason: &str) -> Estimate {
        Estimate::fallback(
            self.settings.cms_fallback_bytes,
            format!("CMS image could not be read ({}); using manual estimate", reason),
        )
    }

    /// Pixel dimensions an image should be served at for the given render size
    pub fn optimal_dimensions(&self, rendered: Dimensions) -> Dimensions {
        let density = self.settings.target_pixel_density;
        let scaled = rendered.scaled(density);
        Dimensions::new(scaled.width.max(1.0), scaled.height.max(1.0))
    }
}

/// Encoded size of a raster image with valid dimensions
///
/// Zero-area images cost nothing; anything else costs at least one byte.
/// Invalid dimensions yield 0, callers decide on fallbacks.
pub fn raster_bytes(dimensions: Dimensions, format: ImageFormat) -> u64 {
    if !dimensions.is_valid() || dimensions.is_degenerate() {
        return 0;
    }
    let bytes = (dimensions.area() * format.bytes_per_pixel()).ceil();
    if bytes.is_finite() {
        (bytes as u64).max(1)
    } else {
        0
    }
}
