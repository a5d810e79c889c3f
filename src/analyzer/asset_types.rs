//! Asset type definitions
//!
//! The common [`AssetInfo`] base carries everything aggregation needs
//! (identity, bytes, visibility, page association). Kind-specific data lives
//! in the tagged [`AssetDetails`] variant so the estimator and the
//! recommendation rules can match exhaustively over kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Viewport class used to simulate responsive rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// 375px wide viewport
    Mobile,
    /// 768px wide viewport
    Tablet,
    /// 1440px wide viewport
    Desktop,
}

impl Breakpoint {
    /// All breakpoints in scan order
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Mobile, Breakpoint::Tablet, Breakpoint::Desktop];

    /// Viewport width in CSS pixels
    pub fn width_px(self) -> u32 {
        match self {
            Breakpoint::Mobile => 375,
            Breakpoint::Tablet => 768,
            Breakpoint::Desktop => 1440,
        }
    }

    /// Lowercase name used in reports and config keys
    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Mobile => "mobile",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per breakpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakpoints<T> {
    /// Mobile value
    pub mobile: T,
    /// Tablet value
    pub tablet: T,
    /// Desktop value
    pub desktop: T,
}

impl<T> Breakpoints<T> {
    /// Build from a function evaluated once per breakpoint, in scan order
    pub fn from_fn(mut f: impl FnMut(Breakpoint) -> T) -> Self {
        Self {
            mobile: f(Breakpoint::Mobile),
            tablet: f(Breakpoint::Tablet),
            desktop: f(Breakpoint::Desktop),
        }
    }

    /// Try to build from a fallible function; stops at the first error
    pub fn try_from_fn<E>(mut f: impl FnMut(Breakpoint) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            mobile: f(Breakpoint::Mobile)?,
            tablet: f(Breakpoint::Tablet)?,
            desktop: f(Breakpoint::Desktop)?,
        })
    }

    /// Value for one breakpoint
    pub fn get(&self, breakpoint: Breakpoint) -> &T {
        match breakpoint {
            Breakpoint::Mobile => &self.mobile,
            Breakpoint::Tablet => &self.tablet,
            Breakpoint::Desktop => &self.desktop,
        }
    }

    /// Mutable value for one breakpoint
    pub fn get_mut(&mut self, breakpoint: Breakpoint) -> &mut T {
        match breakpoint {
            Breakpoint::Mobile => &mut self.mobile,
            Breakpoint::Tablet => &mut self.tablet,
            Breakpoint::Desktop => &mut self.desktop,
        }
    }

    /// Iterate `(breakpoint, value)` pairs in scan order
    pub fn iter(&self) -> impl Iterator<Item = (Breakpoint, &T)> {
        Breakpoint::ALL.into_iter().map(move |bp| (bp, self.get(bp)))
    }
}

/// Largest side length considered when computing pixel areas
pub const MAX_SIDE_PX: f64 = 65_536.0;

/// Width and height in (possibly fractional) pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl Dimensions {
    /// Create new dimensions
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both sides finite and non-negative
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }

    /// Zero width or zero height
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Pixel area with each side clamped to [`MAX_SIDE_PX`]
    ///
    /// Returns 0.0 for invalid dimensions.
    pub fn area(&self) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        self.width.min(MAX_SIDE_PX) * self.height.min(MAX_SIDE_PX)
    }

    /// Scale both sides by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width.round(), self.height.round())
    }
}

/// Raster image encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG
    Jpeg,
    /// PNG
    Png,
    /// GIF
    Gif,
    /// WebP
    Webp,
    /// AVIF
    Avif,
    /// Format could not be determined
    #[default]
    Unknown,
}

impl ImageFormat {
    /// Estimated encoded bytes per pixel at typical web quality
    pub fn bytes_per_pixel(self) -> f64 {
        match self {
            Self::Jpeg => 0.25,
            Self::Png => 0.9,
            Self::Gif => 0.6,
            Self::Webp => 0.15,
            Self::Avif => 0.1,
            Self::Unknown => 0.3,
        }
    }

    /// Formats with a denser modern replacement (WebP/AVIF)
    pub fn is_legacy(self) -> bool {
        matches!(self, Self::Jpeg | Self::Png | Self::Gif)
    }

    /// Parse a format tag, file extension or URL; unrecognized input maps to `Unknown`
    pub fn detect(tag: &str) -> Self {
        let trimmed = tag.split(['?', '#']).next().unwrap_or(tag);
        let ext = trimmed.rsplit('.').next().unwrap_or(trimmed);
        ext.parse().unwrap_or(Self::Unknown)
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "image/jpeg" => Ok(Self::Jpeg),
            "png" | "image/png" => Ok(Self::Png),
            "gif" | "image/gif" => Ok(Self::Gif),
            "webp" | "image/webp" => Ok(Self::Webp),
            "avif" | "image/avif" => Ok(Self::Avif),
            other => Err(format!("Unsupported image format: {}", other)),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Gif => "GIF",
            Self::Webp => "WebP",
            Self::Avif => "AVIF",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Category an asset is counted under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Raster image (including background images and CMS images)
    Image,
    /// Vector graphic
    Svg,
}

/// Page an asset was observed on
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRef {
    /// Host page identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// URL slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Published URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Raster image placed on the canvas (image fill or background image)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    /// Source (intrinsic) dimensions, when readable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Dimensions>,
    /// Encoding
    pub format: ImageFormat,
    /// Source URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Host image-asset id shared by every node using the same upload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_asset_id: Option<String>,
    /// Came from a background-image fill
    #[serde(default)]
    pub background: bool,
}

/// Inline or referenced vector graphic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorAsset {
    /// Raw markup length, when the markup was available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup_bytes: Option<u64>,
    /// Path/shape count reported by the host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_count: Option<u32>,
}

/// Representative image bound to a CMS collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsAsset {
    /// Collection identifier
    pub collection_id: String,
    /// Collection display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    /// Item the representative image was taken from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    /// Representative source URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Representative source dimensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Dimensions>,
    /// Representative encoding
    pub format: ImageFormat,
    /// Number of items in the collection, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u64>,
}

/// Kind-specific asset data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AssetDetails {
    /// Static raster image
    Image(ImageAsset),
    /// Vector graphic
    Vector(VectorAsset),
    /// CMS-bound image
    Cms(CmsAsset),
}

/// One visual element's estimated footprint at one breakpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    /// Stable host node identifier
    pub node_id: String,
    /// Display name
    pub name: String,
    /// Estimated transferred bytes
    pub estimated_bytes: u64,
    /// Intended render dimensions at this breakpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered: Option<Dimensions>,
    /// Visible at this breakpoint
    pub visible: bool,
    /// Owning page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageRef>,
    /// `estimated_bytes` is a fallback, not a computed estimate
    #[serde(default)]
    pub is_manual_estimate: bool,
    /// Why the estimate is unreliable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate_note: Option<String>,
    /// Why the owning page/CMS item could not be determined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unresolved_reason: Option<String>,
    /// Kind-specific data
    pub details: AssetDetails,
}

impl AssetInfo {
    /// Reporting category
    pub fn kind(&self) -> AssetKind {
        match self.details {
            AssetDetails::Image(_) | AssetDetails::Cms(_) => AssetKind::Image,
            AssetDetails::Vector(_) => AssetKind::Svg,
        }
    }

    /// Bound to a CMS collection
    pub fn is_cms_asset(&self) -> bool {
        matches!(self.details, AssetDetails::Cms(_))
    }

    /// Source URL, if the asset has one
    pub fn source_url(&self) -> Option<&str> {
        match &self.details {
            AssetDetails::Image(image) => image.source_url.as_deref(),
            AssetDetails::Cms(cms) => cms.source_url.as_deref(),
            AssetDetails::Vector(_) => None,
        }
    }

    /// Source dimensions for raster kinds
    pub fn actual(&self) -> Option<Dimensions> {
        match &self.details {
            AssetDetails::Image(image) => image.actual,
            AssetDetails::Cms(cms) => cms.actual,
            AssetDetails::Vector(_) => None,
        }
    }

    /// Raster encoding, if any
    pub fn format(&self) -> Option<ImageFormat> {
        match &self.details {
            AssetDetails::Image(image) => Some(image.format),
            AssetDetails::Cms(cms) => Some(cms.format),
            AssetDetails::Vector(_) => None,
        }
    }

    /// Identity used to recognise the same physical asset across pages and breakpoints
    ///
    /// The URL wins whenever one is known, so a file reached with and without
    /// a shared image-asset id still collapses to one key. Static images
    /// without a URL fall back to the image-asset id; everything else to the
    /// node id.
    pub fn identity(&self) -> AssetIdentity {
        let node = || AssetIdentity::Node(self.node_id.clone());
        match &self.details {
            AssetDetails::Cms(cms) => cms
                .source_url
                .clone()
                .map(AssetIdentity::Url)
                .unwrap_or_else(node),
            AssetDetails::Image(image) => {
                if let Some(url) = &image.source_url {
                    AssetIdentity::Url(url.clone())
                } else if let Some(id) = &image.image_asset_id {
                    AssetIdentity::ImageAsset(id.clone())
                } else {
                    node()
                }
            }
            AssetDetails::Vector(_) => node(),
        }
    }
}

/// Key identifying one physical asset
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "camelCase")]
pub enum AssetIdentity {
    /// Host image-asset id
    ImageAsset(String),
    /// Source URL
    Url(String),
    /// Node id
    Node(String),
}

impl fmt::Display for AssetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageAsset(id) => write!(f, "asset:{}", id),
            Self::Url(url) => write!(f, "url:{}", url),
            Self::Node(id) => write!(f, "node:{}", id),
        }
    }
}
