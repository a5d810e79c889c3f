//! Snapshot-backed [`AssetSource`]
//!
//! A [`ProjectSnapshot`] is a JSON export of everything a host would answer
//! during a scan. The CLI analyzes snapshot files; tests build them in code.

use super::{
    AssetSource, CmsBinding, CmsItem, CmsResolution, FontFace, PublishedSite, SourceError,
    SourceNode,
};
use crate::analyzer::analysis_types::AnalysisMode;
use crate::analyzer::asset_types::{Breakpoint, Dimensions, PageRef};
use crate::error::WeightError;
use crate::infra::{FileSystem, RealFileSystem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Render-size overrides for individual breakpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakpointOverrides {
    /// Mobile override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<Dimensions>,
    /// Tablet override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<Dimensions>,
    /// Desktop override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<Dimensions>,
}

impl BreakpointOverrides {
    /// Override for one breakpoint
    pub fn get(&self, breakpoint: Breakpoint) -> Option<Dimensions> {
        match breakpoint {
            Breakpoint::Mobile => self.mobile,
            Breakpoint::Tablet => self.tablet,
            Breakpoint::Desktop => self.desktop,
        }
    }

    fn is_empty(&self) -> bool {
        self.mobile.is_none() && self.tablet.is_none() && self.desktop.is_none()
    }
}

/// A node plus how it changes across breakpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNode {
    /// Node as rendered at desktop width
    #[serde(flatten)]
    pub node: SourceNode,
    /// Breakpoints at which the node is hidden
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden_at: Vec<Breakpoint>,
    /// Render sizes that differ from `node.rendered`
    #[serde(default, skip_serializing_if = "BreakpointOverrides::is_empty")]
    pub rendered_at: BreakpointOverrides,
}

impl SnapshotNode {
    /// The node as seen at `breakpoint`
    pub fn at(&self, breakpoint: Breakpoint) -> SourceNode {
        let mut node = self.node.clone();
        if self.hidden_at.contains(&breakpoint) {
            node.visible = false;
        }
        if let Some(rendered) = self.rendered_at.get(breakpoint) {
            node.rendered = Some(rendered);
        }
        node
    }
}

impl From<SourceNode> for SnapshotNode {
    fn from(node: SourceNode) -> Self {
        Self {
            node,
            hidden_at: Vec::new(),
            rendered_at: BreakpointOverrides::default(),
        }
    }
}

/// One page of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPage {
    /// Page identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// URL slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Published URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Asset-bearing nodes
    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,
    /// Font faces used on the page
    #[serde(default)]
    pub fonts: Vec<FontFace>,
}

impl SnapshotPage {
    /// Empty page
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            url: None,
            nodes: Vec::new(),
            fonts: Vec::new(),
        }
    }

    fn page_ref(&self) -> PageRef {
        PageRef {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
            url: self.url.clone(),
        }
    }
}

/// A CMS collection in a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCollection {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Total items; defaults to `items.len()`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u64>,
    /// Sampled items; the first is the representative
    #[serde(default)]
    pub items: Vec<CmsItem>,
}

/// Everything a host would report for one scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    /// Canvas or published
    #[serde(default)]
    pub mode: AnalysisMode,
    /// Pages in scan order
    #[serde(default)]
    pub pages: Vec<SnapshotPage>,
    /// CMS collections keyed by id
    #[serde(default)]
    pub collections: BTreeMap<String, SnapshotCollection>,
    /// Published-site data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<PublishedSite>,
    /// Reason the published site could not be fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_unavailable: Option<String>,
}

impl ProjectSnapshot {
    /// Parse a snapshot from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Read and parse a snapshot file
    pub fn load(path: &Path) -> Result<Self, WeightError> {
        Self::load_with_fs(path, &RealFileSystem)
    }

    /// Read and parse a snapshot file with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(path: &Path, fs: &FS) -> Result<Self, WeightError> {
        let contents = fs.read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                WeightError::SnapshotNotFound {
                    path: path.to_path_buf(),
                    source,
                }
            } else {
                WeightError::Io {
                    context: format!("reading {}", path.display()),
                    source,
                }
            }
        })?;
        let snapshot = Self::from_json(&contents).map_err(|e| WeightError::InvalidSnapshot {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        log::debug!(
            "loaded snapshot {} ({} pages)",
            path.display(),
            snapshot.pages.len()
        );
        Ok(snapshot)
    }
}

/// [`AssetSource`] answering from a [`ProjectSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    snapshot: ProjectSnapshot,
}

impl InMemorySource {
    /// Canvas-mode source over the given pages
    pub fn new(pages: Vec<SnapshotPage>) -> Self {
        Self::from_snapshot(ProjectSnapshot {
            pages,
            ..Default::default()
        })
    }

    /// Source over a full snapshot
    pub fn from_snapshot(snapshot: ProjectSnapshot) -> Self {
        Self { snapshot }
    }

    /// The underlying snapshot
    pub fn snapshot(&self) -> &ProjectSnapshot {
        &self.snapshot
    }

    /// Mutable access, for hosts that update the snapshot between scans
    pub fn snapshot_mut(&mut self) -> &mut ProjectSnapshot {
        &mut self.snapshot
    }

    fn page(&self, page: &PageRef) -> Result<&SnapshotPage, SourceError> {
        self.snapshot
            .pages
            .iter()
            .find(|p| p.id == page.id)
            .ok_or_else(|| SourceError::Enumeration {
                what: format!("nodes of page {}", page.id),
                reason: "page not found".to_string(),
            })
    }
}

impl AssetSource for InMemorySource {
    fn mode(&self) -> AnalysisMode {
        self.snapshot.mode
    }

    fn pages(&self) -> Result<Vec<PageRef>, SourceError> {
        Ok(self.snapshot.pages.iter().map(SnapshotPage::page_ref).collect())
    }

    fn nodes(
        &self,
        page: &PageRef,
        breakpoint: Breakpoint,
    ) -> Result<Vec<SourceNode>, SourceError> {
        Ok(self.page(page)?.nodes.iter().map(|n| n.at(breakpoint)).collect())
    }

    fn fonts(&self, page: &PageRef) -> Vec<FontFace> {
        self.page(page).map(|p| p.fonts.clone()).unwrap_or_default()
    }

    fn resolve_cms(&self, binding: &CmsBinding) -> Result<CmsResolution, SourceError> {
        let collection = self
            .snapshot
            .collections
            .get(&binding.collection_id)
            .ok_or_else(|| SourceError::Unresolved {
                subject: format!("collection {}", binding.collection_id),
                reason: "collection not found".to_string(),
            })?;

        Ok(CmsResolution {
            collection_name: collection.name.clone(),
            item_count: collection
                .item_count
                .or(Some(collection.items.len() as u64)),
            representative: collection.items.first().cloned(),
        })
    }

    fn published(&self) -> Result<Option<PublishedSite>, SourceError> {
        match &self.snapshot.published_unavailable {
            Some(reason) => Err(SourceError::Unavailable(reason.clone())),
            None => Ok(self.snapshot.published.clone()),
        }
    }
}
