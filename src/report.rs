//! Analysis report formatting
//!
//! Provides console and JSON output formatters for a [`ProjectAnalysis`].

use crate::analyzer::{
    AnalysisMode, Breakpoint, DiagnosticKind, Priority, ProjectAnalysis, Recommendation,
};
use crate::fmt::{format_bytes, percent_of, BULB, CHART, MICROSCOPE, SPARKLES, WARNING};
use console::{style, Color};
use std::fmt::{self, Write as _};

const TOP_ASSETS: usize = 10;
const MAX_DIAGNOSTICS_SHOWN: usize = 10;

/// Display helper for [`Priority`]
pub trait PriorityDisplay {
    /// Get color for terminal output
    fn color(&self) -> Color;

    /// Heading used when grouping recommendations
    fn heading(&self) -> &'static str;
}

impl PriorityDisplay for Priority {
    fn color(&self) -> Color {
        match self {
            Priority::High => Color::Red,
            Priority::Medium => Color::Yellow,
            Priority::Low => Color::Blue,
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Format an analysis for console output
pub fn format_console_report(analysis: &ProjectAnalysis) -> Result<String, fmt::Error> {
    let mut output = String::new();

    let mode = match analysis.mode {
        AnalysisMode::Canvas => "canvas",
        AnalysisMode::Published => "published",
    };
    writeln!(output, "\n{} {}", CHART, style("Site Weight Report").bold())?;
    writeln!(
        output,
        "   {} page(s), {} mode",
        analysis.total_pages,
        style(mode).cyan()
    )?;
    if analysis.has_estimated_data() {
        writeln!(
            output,
            "   {}",
            style("Some values are estimates; see diagnostics below").yellow()
        )?;
    }

    write_breakpoints(&mut output, analysis)?;
    write_largest_assets(&mut output, analysis)?;
    write_recommendations(&mut output, analysis)?;
    write_cms_impact(&mut output, analysis)?;
    write_published(&mut output, analysis)?;
    write_diagnostics(&mut output, analysis)?;

    output.push('\n');
    Ok(output)
}

fn write_breakpoints(output: &mut String, analysis: &ProjectAnalysis) -> fmt::Result {
    writeln!(output, "\n{} Weight by Breakpoint", MICROSCOPE)?;
    writeln!(
        output,
        "   {:<14} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Breakpoint", "Total", "Images", "SVG", "Fonts", "HTML/CSS"
    )?;
    writeln!(output, "   {}", "─".repeat(77))?;

    for bp in Breakpoint::ALL {
        let data = analysis.breakpoint(bp);
        let b = &data.breakdown;
        writeln!(
            output,
            "   {:<14} {:>12} {:>12} {:>12} {:>12} {:>12}",
            format!("{} ({}px)", bp, bp.width_px()),
            style(format_bytes(data.total_bytes)).bold(),
            format_bytes(b.images),
            format_bytes(b.svg),
            format_bytes(b.fonts),
            format_bytes(b.html_css),
        )?;
    }
    Ok(())
}

fn write_largest_assets(output: &mut String, analysis: &ProjectAnalysis) -> fmt::Result {
    let bp = Breakpoint::Desktop;
    let largest = analysis.largest_assets(bp, TOP_ASSETS);
    if largest.is_empty() {
        return Ok(());
    }
    let total = analysis.breakpoint(bp).total_bytes;

    writeln!(output, "\n{} Largest Assets ({})", MICROSCOPE, bp)?;
    for (i, asset) in largest.iter().enumerate() {
        let size_str = format_bytes(asset.estimated_bytes);
        let size = match i {
            0..=2 => style(size_str).red(),
            3..=5 => style(size_str).yellow(),
            _ => style(size_str).dim(),
        };
        let page = asset.page.as_ref().map(|p| p.name.as_str()).unwrap_or("-");
        let marker = if asset.is_manual_estimate { " (estimate)" } else { "" };
        writeln!(
            output,
            "   {:>12} {:>6}  {} {}{}",
            size,
            format!("{:.1}%", percent_of(asset.estimated_bytes, total)),
            style(&asset.name).cyan(),
            style(format!("on {}", page)).dim(),
            style(marker).yellow()
        )?;
    }
    Ok(())
}

fn write_recommendations(output: &mut String, analysis: &ProjectAnalysis) -> fmt::Result {
    if analysis.all_recommendations.is_empty() {
        writeln!(output, "\n{} No optimization opportunities found", SPARKLES)?;
        return Ok(());
    }

    writeln!(output, "\n{} Optimization Opportunities", BULB)?;
    for priority in [Priority::High, Priority::Medium, Priority::Low] {
        let group: Vec<&Recommendation> = analysis
            .all_recommendations
            .iter()
            .filter(|r| r.priority == priority)
            .collect();
        if group.is_empty() {
            continue;
        }
        writeln!(
            output,
            "   {} ({}):",
            style(priority.heading()).fg(priority.color()).bold(),
            group.len()
        )?;
        for rec in group {
            let pages = match rec.affected_pages.len() {
                0 | 1 => String::new(),
                n => format!(" on {} pages", n),
            };
            writeln!(
                output,
                "     [{}] {} (save ~{} / {:.1}%){}",
                rec.kind,
                rec.description,
                format_bytes(rec.potential_savings),
                rec.savings_percent(),
                style(pages).dim()
            )?;
            writeln!(output, "       → {}", style(&rec.action).dim())?;
        }
    }

    writeln!(output, "\n   Potential savings:")?;
    for (bp, savings) in analysis.savings.breakpoints.iter() {
        let note = if savings.capped {
            format!(" (capped from {})", format_bytes(savings.raw_bytes))
        } else {
            String::new()
        };
        writeln!(
            output,
            "     {:<8} {}{}",
            bp,
            style(format_bytes(savings.reported_bytes)).green(),
            style(note).dim()
        )?;
    }
    Ok(())
}

fn write_cms_impact(output: &mut String, analysis: &ProjectAnalysis) -> fmt::Result {
    let Some(cms) = &analysis.cms_impact else {
        return Ok(());
    };

    writeln!(output, "\n{} CMS Bandwidth Impact", CHART)?;
    for c in &cms.collections {
        let name = c.collection_name.as_deref().unwrap_or(&c.collection_id);
        let items = c
            .item_count
            .map(|n| format!(", {} items", n))
            .unwrap_or_default();
        let manual = if c.manual_estimates > 0 {
            format!(", {} estimated", c.manual_estimates)
        } else {
            String::new()
        };
        writeln!(
            output,
            "   {:<24} {:>12}/view  {:>12}/month  {}",
            style(name).cyan(),
            format_bytes(c.bytes_per_view),
            format_bytes(c.projected_monthly_bytes),
            style(format!("{} asset(s){}{}", c.asset_count, items, manual)).dim()
        )?;
    }
    writeln!(
        output,
        "   Total: {} per view, {} per month at {} page views",
        format_bytes(cms.total_bytes_per_view),
        style(format_bytes(cms.projected_monthly_bytes)).bold(),
        cms.monthly_pageviews
    )?;
    Ok(())
}

fn write_published(output: &mut String, analysis: &ProjectAnalysis) -> fmt::Result {
    let Some(published) = &analysis.published_data else {
        return Ok(());
    };
    let b = &published.breakdown;

    writeln!(
        output,
        "\n{} Published Site ({} page(s))",
        CHART, published.page_count
    )?;
    for (label, bytes) in [
        ("Images", b.images),
        ("CSS", b.css),
        ("JavaScript", b.js),
        ("Fonts", b.fonts),
        ("Other", b.other),
    ] {
        writeln!(
            output,
            "   {:<12} {:>12} {:>7}",
            label,
            format_bytes(bytes),
            format!("{:.1}%", percent_of(bytes, published.total_bytes))
        )?;
    }
    writeln!(
        output,
        "   {:<12} {:>12}",
        "Total",
        style(format_bytes(published.total_bytes)).bold()
    )?;

    let custom = &published.custom_code_assets;
    if !custom.assets.is_empty() {
        writeln!(
            output,
            "   Custom code: {} asset(s), {} eager, {} lazy",
            custom.assets.len(),
            format_bytes(custom.eager_bytes),
            format_bytes(custom.lazy_bytes)
        )?;
        if custom.unknown_size_count > 0 {
            writeln!(
                output,
                "   {}",
                style(format!("{} asset(s) with unknown size", custom.unknown_size_count)).dim()
            )?;
        }
    }
    Ok(())
}

fn write_diagnostics(output: &mut String, analysis: &ProjectAnalysis) -> fmt::Result {
    if analysis.diagnostics.is_empty() {
        return Ok(());
    }

    writeln!(
        output,
        "\n{} Diagnostics ({})",
        WARNING,
        analysis.diagnostics.len()
    )?;
    for d in analysis.diagnostics.iter().take(MAX_DIAGNOSTICS_SHOWN) {
        let kind = match d.kind {
            DiagnosticKind::EstimationUncertainty => style("estimate").yellow(),
            DiagnosticKind::ResolutionFailure => style("unresolved").red(),
            DiagnosticKind::SourceUnavailable => style("unavailable").red(),
        };
        writeln!(output, "   {:<12} {}: {}", kind, d.subject, style(&d.message).dim())?;
    }
    if analysis.diagnostics.len() > MAX_DIAGNOSTICS_SHOWN {
        writeln!(
            output,
            "   {}",
            style(format!(
                "... and {} more (use --json for the full list)",
                analysis.diagnostics.len() - MAX_DIAGNOSTICS_SHOWN
            ))
            .dim()
        )?;
    }
    Ok(())
}

/// Format an analysis as pretty-printed JSON
pub fn format_json_report(analysis: &ProjectAnalysis) -> serde_json::Result<String> {
    serde_json::to_string_pretty(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Dimensions;
    use crate::config::ConfigFile;
    use crate::scan::run_analysis;
    use crate::source::memory::{InMemorySource, SnapshotNode, SnapshotPage};
    use crate::source::{NodeKind, SourceNode};

    fn analysis() -> ProjectAnalysis {
        let mut node = SourceNode::new("hero", NodeKind::Image);
        node.name = "Hero photo".to_string();
        node.actual = Some(Dimensions::new(3000.0, 2000.0));
        node.rendered = Some(Dimensions::new(600.0, 400.0));
        node.format = Some("png".to_string());
        let mut page = SnapshotPage::new("home", "Home");
        page.nodes.push(SnapshotNode::from(node));
        run_analysis(&InMemorySource::new(vec![page]), &ConfigFile::default()).unwrap()
    }

    #[test]
    fn test_console_report_lists_breakpoints_assets_and_recommendations() {
        console::set_colors_enabled(false);
        let report = format_console_report(&analysis()).unwrap();
        assert!(report.contains("Site Weight Report"));
        assert!(report.contains("mobile (375px)"));
        assert!(report.contains("desktop (1440px)"));
        assert!(report.contains("Hero photo"));
        assert!(report.contains("[oversized]"));
        assert!(report.contains("[format]"));
        assert!(report.contains("Potential savings"));
        assert!(!report.contains("Diagnostics"));
    }

    #[test]
    fn test_empty_project_reports_no_opportunities() {
        console::set_colors_enabled(false);
        let empty = run_analysis(&InMemorySource::default(), &ConfigFile::default()).unwrap();
        let report = format_console_report(&empty).unwrap();
        assert!(report.contains("No optimization opportunities"));
        assert!(!report.contains("Largest Assets"));
    }

    #[test]
    fn test_json_report_uses_camel_case_fields() {
        let json = format_json_report(&analysis()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["overallBreakpoints"]["desktop"]["totalBytes"].as_u64().unwrap() > 0);
        assert!(value["allRecommendations"][0]["potentialSavings"].is_u64());
        assert_eq!(value["totalPages"], 1);
    }
}
