//! Published-site breakdown and custom code asset discovery
//!
//! Injected code is scanned with regexes for asset references: HTML
//! `src`/`href`/`data-src` attributes, CSS `url(...)`, and quoted absolute
//! URLs ending in a known asset extension (typical of script loaders).

use super::analysis_types::{
    CustomAssetKind, CustomCodeAsset, CustomCodeReport, PublishedBreakdown, PublishedData,
};
use crate::source::{InjectedCode, PublishedSite};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

static ATTR_RE: OnceLock<Regex> = OnceLock::new();
static CSS_URL_RE: OnceLock<Regex> = OnceLock::new();
static QUOTED_URL_RE: OnceLock<Regex> = OnceLock::new();
static LAZY_ATTR_RE: OnceLock<Regex> = OnceLock::new();

/// Sum a published site's per-page breakdowns and scan its custom code
pub fn published_data(site: &PublishedSite) -> PublishedData {
    let breakdown = site
        .pages
        .iter()
        .fold(PublishedBreakdown::default(), |acc, page| acc.merged(&page.breakdown));

    PublishedData {
        page_count: site.pages.len(),
        total_bytes: breakdown.total(),
        breakdown,
        custom_code_assets: scan_custom_code(&site.injected_code, &site.asset_sizes),
    }
}

/// One asset reference found in a snippet
#[derive(Debug, Clone, PartialEq, Eq)]
struct Reference {
    url: String,
    kind: CustomAssetKind,
    lazy: bool,
}

#[derive(Default)]
struct Collected {
    kind: Option<CustomAssetKind>,
    lazy: bool,
    locations: BTreeSet<String>,
}

/// Discover assets referenced from injected code
///
/// URLs referenced more than once collapse to one entry that is lazy only
/// when every reference is lazy. Sizes come from `sizes` when known.
pub fn scan_custom_code(
    snippets: &[InjectedCode],
    sizes: &BTreeMap<String, u64>,
) -> CustomCodeReport {
    let mut collected: BTreeMap<String, Collected> = BTreeMap::new();

    for snippet in snippets {
        for reference in find_references(&snippet.code) {
            let entry = collected.entry(reference.url).or_insert_with(|| Collected {
                lazy: true,
                ..Default::default()
            });
            entry.kind.get_or_insert(reference.kind);
            entry.lazy &= reference.lazy;
            entry.locations.insert(snippet.location.clone());
        }
    }

    let mut report = CustomCodeReport::default();
    for (url, c) in collected {
        let estimated_bytes = sizes.get(&url).copied();
        match estimated_bytes {
            Some(bytes) => {
                report.total_bytes = report.total_bytes.saturating_add(bytes);
                if c.lazy {
                    report.lazy_bytes = report.lazy_bytes.saturating_add(bytes);
                } else {
                    report.eager_bytes = report.eager_bytes.saturating_add(bytes);
                }
            }
            None => report.unknown_size_count += 1,
        }
        report.assets.push(CustomCodeAsset {
            url,
            kind: c.kind.unwrap_or(CustomAssetKind::Other),
            lazy: c.lazy,
            estimated_bytes,
            locations: c.locations.into_iter().collect(),
        });
    }

    log::debug!(
        "custom code: {} assets ({} without size)",
        report.assets.len(),
        report.unknown_size_count
    );
    report
}

fn find_references(code: &str) -> Vec<Reference> {
    let attr_re = ATTR_RE.get_or_init(|| {
        Regex::new(r#"(?i)\b(src|href|data-src|poster)\s*=\s*["']([^"']+)["']"#)
            .expect("attribute regex is valid")
    });
    let css_url_re = CSS_URL_RE.get_or_init(|| {
        Regex::new(r#"(?i)url\(\s*["']?([^"')\s]+)["']?\s*\)"#).expect("css url regex is valid")
    });
    let quoted_url_re = QUOTED_URL_RE.get_or_init(|| {
        Regex::new(
            r#"(?i)["']((?:https?:)?//[^"'\s]+?\.(?:png|jpe?g|gif|webp|avif|svg|ico|woff2?|ttf|otf|eot|m?js|css|mp4|webm|json)(?:\?[^"'\s]*)?)["']"#,
        )
        .expect("quoted url regex is valid")
    });

    // Snippets driving loads from an IntersectionObserver defer everything they reference
    let observer_driven = code.contains("IntersectionObserver");
    let mut refs = Vec::new();
    let mut seen_spans: Vec<(usize, usize)> = Vec::new();

    for cap in attr_re.captures_iter(code) {
        let (Some(whole), Some(attr), Some(url)) = (cap.get(0), cap.get(1), cap.get(2)) else {
            continue;
        };
        let tag = enclosing_tag(code, whole.start(), whole.end());
        let kind = match classify(url.as_str()).or_else(|| classify_tag(tag)) {
            Some(kind) => kind,
            None if attr.as_str().eq_ignore_ascii_case("href") => continue,
            None => CustomAssetKind::Other,
        };
        let lazy = observer_driven
            || attr.as_str().eq_ignore_ascii_case("data-src")
            || is_lazy_tag(tag);
        seen_spans.push((url.start(), url.end()));
        push_reference(&mut refs, url.as_str(), kind, lazy);
    }

    for cap in css_url_re.captures_iter(code) {
        let Some(url) = cap.get(1) else { continue };
        let kind = classify(url.as_str()).unwrap_or(CustomAssetKind::Image);
        seen_spans.push((url.start(), url.end()));
        push_reference(&mut refs, url.as_str(), kind, observer_driven);
    }

    for cap in quoted_url_re.captures_iter(code) {
        let Some(url) = cap.get(1) else { continue };
        if seen_spans
            .iter()
            .any(|&(start, end)| url.start() >= start && url.end() <= end)
        {
            continue;
        }
        let kind = classify(url.as_str()).unwrap_or(CustomAssetKind::Other);
        push_reference(&mut refs, url.as_str(), kind, observer_driven);
    }

    refs
}

fn push_reference(refs: &mut Vec<Reference>, url: &str, kind: CustomAssetKind, lazy: bool) {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if url.is_empty()
        || url.starts_with('#')
        || lower.starts_with("data:")
        || lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
    {
        return;
    }
    refs.push(Reference {
        url: url.to_string(),
        kind,
        lazy,
    });
}

/// The `<...>` tag surrounding a byte range, or empty when outside any tag
fn enclosing_tag(code: &str, start: usize, end: usize) -> &str {
    let Some(open) = code[..start].rfind('<') else {
        return "";
    };
    if code[open..start].contains('>') {
        return "";
    }
    let close = code[end..].find('>').map_or(code.len(), |i| end + i + 1);
    &code[open..close]
}

fn is_lazy_tag(tag: &str) -> bool {
    let lazy_attr_re = LAZY_ATTR_RE.get_or_init(|| {
        Regex::new(r#"(?i)\bloading\s*=\s*["']?lazy\b"#).expect("lazy attribute regex is valid")
    });
    lazy_attr_re.is_match(tag)
}

fn classify_tag(tag: &str) -> Option<CustomAssetKind> {
    let lower = tag.to_ascii_lowercase();
    if lower.starts_with("<script") {
        Some(CustomAssetKind::Script)
    } else if lower.starts_with("<link") && lower.contains("stylesheet") {
        Some(CustomAssetKind::Style)
    } else if lower.starts_with("<img") || lower.starts_with("<source") {
        Some(CustomAssetKind::Image)
    } else {
        None
    }
}

/// Asset kind from a URL's extension
fn classify(url: &str) -> Option<CustomAssetKind> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = file.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" | "jpg" | "jpeg" | "gif" | "webp" | "avif" | "svg" | "ico" => {
            Some(CustomAssetKind::Image)
        }
        "woff" | "woff2" | "ttf" | "otf" | "eot" => Some(CustomAssetKind::Font),
        "js" | "mjs" => Some(CustomAssetKind::Script),
        "css" => Some(CustomAssetKind::Style),
        "mp4" | "webm" | "json" => Some(CustomAssetKind::Other),
        _ => None,
    }
}
