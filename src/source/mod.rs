//! Host access abstraction
//!
//! The engine never talks to a design tool directly. Everything it needs
//! (pages, per-breakpoint nodes, fonts, CMS bindings, published-site data)
//! comes through [`AssetSource`], so hosts, fixtures and the JSON snapshot
//! loader can all drive the same analysis.

pub mod memory;

use crate::analyzer::analysis_types::{AnalysisMode, PublishedBreakdown};
use crate::analyzer::asset_types::{Breakpoint, Dimensions, PageRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub use memory::{InMemorySource, ProjectSnapshot};

/// Errors raised by an [`AssetSource`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Page or node enumeration failed; fatal to the scan
    #[error("failed to enumerate {what}: {reason}")]
    Enumeration {
        /// What was being enumerated
        what: String,
        /// Host-provided reason
        reason: String,
    },

    /// Optional data (published site) could not be fetched
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// A binding (CMS collection, owning page) could not be resolved
    #[error("could not resolve {subject}: {reason}")]
    Unresolved {
        /// What could not be resolved
        subject: String,
        /// Host-provided reason
        reason: String,
    },
}

/// How a node contributes to page weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Image element or image fill
    Image,
    /// Node whose background is an image; counted as an image
    Background,
    /// Vector graphic
    Vector,
    /// Layout or text node without its own asset
    Other,
}

/// Collection binding of a CMS-driven node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsBinding {
    /// Collection identifier
    pub collection_id: String,
    /// Bound field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

fn default_true() -> bool {
    true
}

/// One asset-bearing node as seen at one breakpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
    /// Stable node id
    pub id: String,
    /// Layer name
    #[serde(default)]
    pub name: String,
    /// Node kind
    pub kind: NodeKind,
    /// Visible at this breakpoint
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Render dimensions at this breakpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered: Option<Dimensions>,
    /// Intrinsic source dimensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Dimensions>,
    /// Format tag, extension or MIME type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Vector markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    /// Vector path count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_count: Option<u32>,
    /// Source URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Host image-asset id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_asset_id: Option<String>,
    /// CMS binding, for collection-driven nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cms: Option<CmsBinding>,
}

impl SourceNode {
    /// Minimal node of the given kind; fields are filled in by the caller
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind,
            visible: true,
            rendered: None,
            actual: None,
            format: None,
            markup: None,
            path_count: None,
            source_url: None,
            image_asset_id: None,
            cms: None,
        }
    }
}

/// A web font face used on a page
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontFace {
    /// Font family
    pub family: String,
    /// Weight (400 = regular)
    #[serde(default = "default_weight")]
    pub weight: u16,
    /// Italic face
    #[serde(default)]
    pub italic: bool,
}

fn default_weight() -> u16 {
    400
}

/// One item of a CMS collection used as the representative image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsItem {
    /// Item id
    pub id: String,
    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Image dimensions, when readable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Dimensions>,
    /// Format tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Whether the image could be read at all
    #[serde(default = "default_true")]
    pub readable: bool,
}

/// Result of resolving a CMS binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsResolution {
    /// Collection display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    /// Number of items, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u64>,
    /// Representative item; `None` when the collection is empty or opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representative: Option<CmsItem>,
}

/// Transferred bytes of one published page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedPage {
    /// Page URL
    pub url: String,
    /// Transferred bytes per category
    pub breakdown: PublishedBreakdown,
}

/// Snippet of custom code injected into the published site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectedCode {
    /// Where the code is injected (site head, page body, embed id)
    pub location: String,
    /// Raw code
    pub code: String,
}

/// Data fetched from the published (built) site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedSite {
    /// Per-page transfer breakdowns
    #[serde(default)]
    pub pages: Vec<PublishedPage>,
    /// Transferred sizes of known URLs
    #[serde(default)]
    pub asset_sizes: BTreeMap<String, u64>,
    /// Injected custom code
    #[serde(default)]
    pub injected_code: Vec<InjectedCode>,
}

/// Capability to enumerate a project's pages and asset-bearing nodes
///
/// Enumeration methods (`pages`, `nodes`) are fatal to a scan when they
/// fail; the remaining methods degrade gracefully.
pub trait AssetSource {
    /// Whether data comes from the canvas or a published build
    fn mode(&self) -> AnalysisMode;

    /// Pages in scan order
    fn pages(&self) -> Result<Vec<PageRef>, SourceError>;

    /// Asset-bearing nodes of `page` as rendered at `breakpoint`
    fn nodes(&self, page: &PageRef, breakpoint: Breakpoint)
        -> Result<Vec<SourceNode>, SourceError>;

    /// Font faces used on `page`
    fn fonts(&self, _page: &PageRef) -> Vec<FontFace> {
        Vec::new()
    }

    /// Resolve a CMS binding to its collection and a representative item
    fn resolve_cms(&self, binding: &CmsBinding) -> Result<CmsResolution, SourceError> {
        Err(SourceError::Unresolved {
            subject: format!("collection {}", binding.collection_id),
            reason: "source does not expose CMS data".to_string(),
        })
    }

    /// Published-site data, if a published build exists
    fn published(&self) -> Result<Option<PublishedSite>, SourceError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_node_deserializes_with_defaults() {
        let node: SourceNode =
            serde_json::from_str(r#"{"id": "n1", "kind": "background"}"#).unwrap();
        assert_eq!(node.kind, NodeKind::Background);
        assert!(node.visible);
        assert!(node.rendered.is_none());
        assert!(node.name.is_empty());
    }

    #[test]
    fn test_font_face_defaults_to_regular_weight() {
        let face: FontFace = serde_json::from_str(r#"{"family": "Inter"}"#).unwrap();
        assert_eq!(face.weight, 400);
        assert!(!face.italic);
    }

    #[test]
    fn test_source_error_messages_name_the_subject() {
        let err = SourceError::Enumeration {
            what: "pages".to_string(),
            reason: "host API timeout".to_string(),
        };
        assert_eq!(err.to_string(), "failed to enumerate pages: host API timeout");
    }
}
