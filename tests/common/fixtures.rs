//! Test fixture helpers for building project snapshots

#![allow(dead_code)]

use site_weight::analyzer::{Dimensions, ProjectAnalysis};
use site_weight::config::ConfigFile;
use site_weight::scan::run_analysis;
use site_weight::source::memory::{
    InMemorySource, ProjectSnapshot, SnapshotCollection, SnapshotNode, SnapshotPage,
};
use site_weight::source::{CmsBinding, CmsItem, NodeKind, SourceNode};
use std::path::PathBuf;
use tempfile::TempDir;

/// Raster image node with square actual and rendered sizes
pub fn raster(id: &str, format: &str, actual: f64, rendered: f64) -> SnapshotNode {
    let mut node = SourceNode::new(id, NodeKind::Image);
    node.actual = Some(Dimensions::new(actual, actual));
    node.rendered = Some(Dimensions::new(rendered, rendered));
    node.format = Some(format.to_string());
    SnapshotNode::from(node)
}

/// JPEG image node
pub fn jpeg(id: &str, actual: f64, rendered: f64) -> SnapshotNode {
    raster(id, "jpg", actual, rendered)
}

/// Node that reuses a shared image asset
pub fn shared_image(id: &str, asset_id: &str, format: &str) -> SnapshotNode {
    let mut node = SourceNode::new(id, NodeKind::Image);
    node.image_asset_id = Some(asset_id.to_string());
    node.format = Some(format.to_string());
    node.rendered = Some(Dimensions::new(800.0, 600.0));
    node.actual = Some(Dimensions::new(800.0, 600.0));
    SnapshotNode::from(node)
}

/// Vector node with inline markup
pub fn vector(id: &str, markup: &str) -> SnapshotNode {
    let mut node = SourceNode::new(id, NodeKind::Vector);
    node.markup = Some(markup.to_string());
    SnapshotNode::from(node)
}

/// CMS-bound image node
pub fn cms_image(id: &str, collection: &str) -> SnapshotNode {
    let mut node = SourceNode::new(id, NodeKind::Image);
    node.rendered = Some(Dimensions::new(400.0, 300.0));
    node.cms = Some(CmsBinding {
        collection_id: collection.to_string(),
        field: Some("image".to_string()),
    });
    SnapshotNode::from(node)
}

/// Collection whose only item cannot be read
pub fn unreadable_collection(name: &str) -> SnapshotCollection {
    SnapshotCollection {
        name: Some(name.to_string()),
        item_count: Some(25),
        items: vec![CmsItem {
            id: "item-1".to_string(),
            source_url: Some("https://cdn.example.com/broken.jpg".to_string()),
            actual: None,
            format: None,
            readable: false,
        }],
    }
}

/// Page with the given nodes
pub fn page(id: &str, nodes: Vec<SnapshotNode>) -> SnapshotPage {
    let mut page = SnapshotPage::new(id, id);
    page.nodes = nodes;
    page
}

/// Run a scan over pages with the default config
pub fn analyze(pages: Vec<SnapshotPage>) -> ProjectAnalysis {
    analyze_snapshot(ProjectSnapshot {
        pages,
        ..Default::default()
    })
}

/// Run a scan over a full snapshot with the default config
pub fn analyze_snapshot(snapshot: ProjectSnapshot) -> ProjectAnalysis {
    run_analysis(
        &InMemorySource::from_snapshot(snapshot),
        &ConfigFile::default(),
    )
    .expect("in-memory scan should not fail")
}

/// Write a snapshot to `snapshot.json` in a fresh temp dir
///
/// # Returns
///
/// A tuple of (TempDir, path to snapshot) - the TempDir must be kept alive
pub fn write_snapshot(snapshot: &ProjectSnapshot) -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("snapshot.json");
    std::fs::write(&path, serde_json::to_string_pretty(snapshot)?)?;
    Ok((temp_dir, path))
}
