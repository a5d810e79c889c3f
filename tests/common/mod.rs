//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - Assertion helpers for savings and size comparisons
//! - Project snapshot builders
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::{assertions::*, fixtures::*};
//!
//! fn test_cap() {
//!     let analysis = analyze(vec![page("home", vec![jpeg("hero", 2000.0, 400.0)])]);
//!     assert_savings_capped(&analysis, 0.9);
//! }
//! ```

pub mod assertions;
pub mod fixtures;
