#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! site-weight library
//!
//! Estimates the transferred bytes of a visual design-tool project at the
//! mobile (375px), tablet (768px) and desktop (1440px) breakpoints and
//! derives ranked, de-duplicated savings recommendations. The CLI analyzes
//! exported snapshots; hosts can implement [`source::AssetSource`] to drive
//! the same engine directly.
//!
//! # Basic Example
//!
//! Scanning an in-memory project:
//!
//! ```
//! use site_weight::analyzer::{Breakpoint, Dimensions, RecommendationKind};
//! use site_weight::config::ConfigFile;
//! use site_weight::scan::run_analysis;
//! use site_weight::source::memory::{InMemorySource, SnapshotNode, SnapshotPage};
//! use site_weight::source::{NodeKind, SourceNode};
//!
//! let mut hero = SourceNode::new("hero", NodeKind::Image);
//! hero.actual = Some(Dimensions::new(2000.0, 2000.0));
//! hero.rendered = Some(Dimensions::new(400.0, 400.0));
//! hero.format = Some("jpg".to_string());
//!
//! let mut home = SnapshotPage::new("home", "Home");
//! home.nodes.push(SnapshotNode::from(hero));
//!
//! let analysis = run_analysis(&InMemorySource::new(vec![home]), &ConfigFile::default())?;
//! assert!(analysis.breakpoint(Breakpoint::Mobile).total_bytes > 0);
//! assert!(analysis
//!     .all_recommendations
//!     .iter()
//!     .any(|r| r.kind == RecommendationKind::Oversized));
//! # Ok::<(), site_weight::error::WeightError>(())
//! ```
//!
//! # Advanced Example: Weight Budgets
//!
//! ```
//! use site_weight::analyzer::Breakpoint;
//! use site_weight::budget::{BudgetChecker, BudgetStatus};
//! use site_weight::config::WeightBudget;
//!
//! let budget = WeightBudget {
//!     mobile_warn_kb: Some(800),
//!     mobile_max_kb: Some(1000),
//!     ..Default::default()
//! };
//! assert!(budget.validate().is_ok());
//!
//! let checker = BudgetChecker::new(budget);
//! let result = checker.check(Breakpoint::Mobile, 1200 * 1024);
//! assert_eq!(result.status, BudgetStatus::OverBudget);
//! ```

/// Weight estimation, aggregation and recommendations
pub mod analyzer;
/// Per-breakpoint weight budgets
pub mod budget;
/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file management
pub mod config;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem access
pub mod infra;
/// Console and JSON reports
pub mod report;
/// Scan orchestration
pub mod scan;
/// Host access abstraction and the snapshot adapter
pub mod source;
