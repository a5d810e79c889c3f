//! Enhanced error types with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes and recovery actions
//! - Documentation references
//! - Proper exit codes for CI/CD
//!
//! # Examples
//!
//! ```
//! use site_weight::config::ConfigFile;
//! use site_weight::error::WeightError;
//! use site_weight::scan::run_analysis;
//! use site_weight::source::InMemorySource;
//!
//! let source = InMemorySource::default();
//! match run_analysis(&source, &ConfigFile::default()) {
//!     Ok(analysis) => assert_eq!(analysis.total_pages, 0),
//!     Err(e @ WeightError::ScanFailed(_)) => {
//!         eprintln!("scan failed: {}", e);
//!         std::process::exit(e.exit_code());
//!     }
//!     Err(e) => panic!("unexpected error: {}", e),
//! }
//! ```

use crate::analyzer::asset_types::Breakpoint;
use crate::source::SourceError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced at the crate boundary
#[derive(Error, Debug)]
pub enum WeightError {
    /// Page or node enumeration failed; no snapshot was produced
    #[error("project scan failed")]
    ScanFailed(#[from] SourceError),

    /// Snapshot file does not exist
    #[error("Snapshot file not found: {path}")]
    SnapshotNotFound {
        /// Path to the snapshot
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Snapshot file is not a valid project snapshot
    #[error("Invalid snapshot {path}: {reason}")]
    InvalidSnapshot {
        /// Path to the snapshot
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// A breakpoint exceeds its configured maximum weight
    #[error("{breakpoint} weight ({actual} bytes) exceeds maximum ({max_allowed} bytes)")]
    BudgetExceeded {
        /// Breakpoint over budget
        breakpoint: Breakpoint,
        /// Estimated total
        actual: u64,
        /// Maximum allowed total
        max_allowed: u64,
        /// Percentage over budget
        percentage_over: f64,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl WeightError {
    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_weight::analyzer::Breakpoint;
    /// use site_weight::error::WeightError;
    ///
    /// let error = WeightError::BudgetExceeded {
    ///     breakpoint: Breakpoint::Mobile,
    ///     actual: 1_500_000,
    ///     max_allowed: 1_000_000,
    ///     percentage_over: 50.0,
    /// };
    ///
    /// assert!(error.suggestion().unwrap().contains("50.0%"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ScanFailed(SourceError::Enumeration { .. }) => Some(
                "The host could not list pages or nodes. Retry once the project has finished loading"
                    .to_string(),
            ),
            Self::ScanFailed(_) => {
                Some("Check that the project snapshot is complete and retry".to_string())
            }
            Self::SnapshotNotFound { path, .. } => Some(format!(
                "Export a project snapshot to {} or pass the correct path",
                path.display()
            )),
            Self::InvalidSnapshot { .. } => Some(
                "Snapshots are JSON objects with a \"pages\" array; see the snapshot format section"
                    .to_string(),
            ),
            Self::BudgetExceeded {
                breakpoint,
                percentage_over,
                ..
            } => Some(format!(
                "{} is {:.1}% over budget. Consider:\n  \
                     - Applying the high-priority recommendations first\n  \
                     - Serving images at their rendered size\n  \
                     - Converting legacy formats to WebP or AVIF",
                breakpoint, percentage_over
            )),
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Get documentation reference for this error.
    pub fn docs_url(&self) -> Option<&str> {
        match self {
            Self::SnapshotNotFound { .. } | Self::InvalidSnapshot { .. } => {
                Some("README.md#snapshot-format")
            }
            Self::BudgetExceeded { .. } => Some("README.md#weight-budgets"),
            _ => None,
        }
    }

    /// Get appropriate exit code for this error.
    ///
    /// Returns Unix-style exit codes following sysexits.h conventions.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_weight::analyzer::Breakpoint;
    /// use site_weight::error::WeightError;
    ///
    /// let budget_error = WeightError::BudgetExceeded {
    ///     breakpoint: Breakpoint::Desktop,
    ///     actual: 1500,
    ///     max_allowed: 1000,
    ///     percentage_over: 50.0,
    /// };
    /// assert_eq!(budget_error.exit_code(), 1); // CI should fail
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ScanFailed(_) => 69,               // EX_UNAVAILABLE
            Self::SnapshotNotFound { .. } => 66,     // EX_NOINPUT
            Self::InvalidSnapshot { .. } => 65,      // EX_DATAERR
            Self::BudgetExceeded { .. } => 1,        // Generic error (CI should fail)
            Self::Io { .. } => 74,                   // EX_IOERR
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with suggestions and documentation links
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        // Error chain (caused by)
        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(weight_error) = error.downcast_ref::<WeightError>() {
            if let Some(suggestion) = weight_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }

            if let Some(docs) = weight_error.docs_url() {
                output.push_str(&format!("{} {}\n", style("docs:").blue(), docs));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(weight_error) = error.downcast_ref::<WeightError>() {
            weight_error.exit_code()
        } else {
            1 // Generic error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_errors() -> Vec<WeightError> {
        vec![
            WeightError::ScanFailed(SourceError::Enumeration {
                what: "pages".to_string(),
                reason: "timeout".to_string(),
            }),
            WeightError::ScanFailed(SourceError::Unavailable("offline".to_string())),
            WeightError::SnapshotNotFound {
                path: PathBuf::from("snapshot.json"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            },
            WeightError::InvalidSnapshot {
                path: PathBuf::from("snapshot.json"),
                reason: "expected value at line 1".to_string(),
            },
            WeightError::BudgetExceeded {
                breakpoint: Breakpoint::Mobile,
                actual: 100,
                max_allowed: 50,
                percentage_over: 100.0,
            },
            WeightError::Io {
                context: "reading snapshot.json".to_string(),
                source: std::io::Error::other("test"),
            },
        ]
    }

    #[test]
    fn test_all_error_variants_have_exit_codes() {
        for err in all_errors() {
            let exit_code = err.exit_code();
            assert!(exit_code > 0, "Error {:?} should have non-zero exit code", err);
            assert!(exit_code < 256, "Exit code should fit in a byte");
        }
    }

    #[test]
    fn test_all_error_variants_have_suggestions() {
        for err in &all_errors() {
            let suggestion = err.suggestion();
            assert!(suggestion.is_some(), "Error {:?} should have a suggestion", err);
            assert!(!suggestion.unwrap().is_empty());
        }
    }

    #[test]
    fn test_snapshot_not_found_names_the_path() {
        let err = WeightError::SnapshotNotFound {
            path: PathBuf::from("exports/site.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.exit_code(), 66);
        assert!(err.suggestion().unwrap().contains("exports/site.json"));
        assert_eq!(err.docs_url(), Some("README.md#snapshot-format"));
    }

    #[test]
    fn test_budget_exceeded_message_names_breakpoint() {
        let err = WeightError::BudgetExceeded {
            breakpoint: Breakpoint::Tablet,
            actual: 2_000_000,
            max_allowed: 1_000_000,
            percentage_over: 100.0,
        };
        assert!(err.to_string().starts_with("tablet weight"));
        assert!(err.suggestion().unwrap().contains("100.0% over budget"));
    }

    #[test]
    fn test_formatter_renders_chain_and_help() {
        let err = anyhow::Error::new(WeightError::ScanFailed(SourceError::Enumeration {
            what: "pages".to_string(),
            reason: "host API timeout".to_string(),
        }));
        let formatted = ErrorFormatter::format(&err);
        assert!(formatted.contains("project scan failed"));
        assert!(formatted.contains("host API timeout"));
        assert!(formatted.contains("help:"));
        assert_eq!(ErrorFormatter::exit_code(&err), 69);
    }

    #[test]
    fn test_formatter_defaults_to_exit_code_one() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(ErrorFormatter::exit_code(&err), 1);
    }
}
