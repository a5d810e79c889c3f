//! Per-breakpoint weight budgets for CI
//!
//! Each breakpoint may carry a warning threshold (reported, exit 0) and a
//! hard maximum (exit 1 when exceeded under `analyze --check`).

use crate::analyzer::{Breakpoint, ProjectAnalysis};
use crate::config::WeightBudget;
use crate::error::WeightError;
use console::style;

/// Status of one breakpoint's budget check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// Within every configured threshold
    Pass,
    /// Between warning and max
    Warning,
    /// Over max
    OverBudget,
}

/// Result of checking one breakpoint
#[derive(Debug, Clone)]
pub struct BudgetResult {
    /// Breakpoint checked
    pub breakpoint: Breakpoint,
    /// Budget status
    pub status: BudgetStatus,
    /// Estimated total in bytes
    pub actual_bytes: u64,
    /// Warning threshold if set
    pub warn_kb: Option<u64>,
    /// Maximum allowed total if set
    pub max_kb: Option<u64>,
    /// Human-readable message
    pub message: String,
}

impl BudgetResult {
    fn size_kb(&self) -> f64 {
        self.actual_bytes as f64 / 1024.0
    }

    /// Typed error for an over-budget result
    pub fn to_error(&self) -> Option<WeightError> {
        let max_kb = self.max_kb?;
        if self.status != BudgetStatus::OverBudget {
            return None;
        }
        let max_allowed = max_kb.saturating_mul(1024);
        Some(WeightError::BudgetExceeded {
            breakpoint: self.breakpoint,
            actual: self.actual_bytes,
            max_allowed,
            percentage_over: (self.actual_bytes as f64 / max_allowed.max(1) as f64 - 1.0) * 100.0,
        })
    }

    /// Print colored status line
    pub fn print(&self) {
        let status_icon = match self.status {
            BudgetStatus::Pass => style("✅").green(),
            BudgetStatus::Warning => style("⚠️").yellow(),
            BudgetStatus::OverBudget => style("❌").red(),
        };
        let size_str = match self.status {
            BudgetStatus::Pass => style(format!("{:.2} KB", self.size_kb())).green(),
            BudgetStatus::Warning => style(format!("{:.2} KB", self.size_kb())).yellow(),
            BudgetStatus::OverBudget => style(format!("{:.2} KB", self.size_kb())).red(),
        };

        println!(
            "{} {:<8} {}  {}",
            status_icon,
            self.breakpoint,
            size_str,
            style(&self.message).dim()
        );
    }
}

/// Checks breakpoint totals against a [`WeightBudget`]
pub struct BudgetChecker {
    budget: WeightBudget,
}

impl BudgetChecker {
    /// Create a new budget checker
    pub fn new(budget: WeightBudget) -> Self {
        Self { budget }
    }

    /// Check one breakpoint total
    ///
    /// # Examples
    ///
    /// ```
    /// use site_weight::analyzer::Breakpoint;
    /// use site_weight::budget::{BudgetChecker, BudgetStatus};
    /// use site_weight::config::WeightBudget;
    ///
    /// let checker = BudgetChecker::new(WeightBudget {
    ///     mobile_warn_kb: Some(500),
    ///     mobile_max_kb: Some(1000),
    ///     ..Default::default()
    /// });
    /// let result = checker.check(Breakpoint::Mobile, 600 * 1024);
    /// assert_eq!(result.status, BudgetStatus::Warning);
    /// ```
    pub fn check(&self, breakpoint: Breakpoint, actual_bytes: u64) -> BudgetResult {
        let (warn_kb, max_kb) = self.budget.limits(breakpoint);
        let size_kb = actual_bytes as f64 / 1024.0;

        // max > warn
        let (status, message) = match (warn_kb, max_kb) {
            (_, Some(max)) if size_kb > max as f64 => (
                BudgetStatus::OverBudget,
                format!("FAILED: {:.0} KB over max of {} KB", size_kb - max as f64, max),
            ),
            (Some(warn), _) if size_kb > warn as f64 => (
                BudgetStatus::Warning,
                format!("{:.0} KB over warning threshold of {} KB", size_kb - warn as f64, warn),
            ),
            (None, None) => (BudgetStatus::Pass, "No budget set".to_string()),
            _ => (BudgetStatus::Pass, "Within budget".to_string()),
        };

        BudgetResult {
            breakpoint,
            status,
            actual_bytes,
            warn_kb,
            max_kb,
            message,
        }
    }

    /// Check every breakpoint of an analysis
    pub fn check_analysis(&self, analysis: &ProjectAnalysis) -> Vec<BudgetResult> {
        Breakpoint::ALL
            .iter()
            .map(|&bp| self.check(bp, analysis.breakpoint(bp).total_bytes))
            .collect()
    }
}

/// First over-budget breakpoint as an error, if any
pub fn first_violation(results: &[BudgetResult]) -> Option<WeightError> {
    results.iter().find_map(BudgetResult::to_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget() -> WeightBudget {
        WeightBudget {
            mobile_warn_kb: Some(800),
            mobile_max_kb: Some(1000),
            desktop_max_kb: Some(2000),
            ..Default::default()
        }
    }

    #[test]
    fn test_under_warning_passes() {
        let result = BudgetChecker::new(budget()).check(Breakpoint::Mobile, 400 * 1024);
        assert_eq!(result.status, BudgetStatus::Pass);
        assert!(result.to_error().is_none());
    }

    #[test]
    fn test_between_warn_and_max_is_warning() {
        let result = BudgetChecker::new(budget()).check(Breakpoint::Mobile, 900 * 1024);
        assert_eq!(result.status, BudgetStatus::Warning);
        assert!(result.message.contains("100 KB over warning"));
        assert!(result.to_error().is_none());
    }

    #[test]
    fn test_exactly_at_max_passes_max_check() {
        let result = BudgetChecker::new(budget()).check(Breakpoint::Desktop, 2000 * 1024);
        assert_eq!(result.status, BudgetStatus::Pass);
    }

    #[test]
    fn test_over_max_maps_to_budget_error() {
        let result = BudgetChecker::new(budget()).check(Breakpoint::Mobile, 1500 * 1024);
        assert_eq!(result.status, BudgetStatus::OverBudget);
        match result.to_error() {
            Some(WeightError::BudgetExceeded {
                breakpoint,
                max_allowed,
                percentage_over,
                ..
            }) => {
                assert_eq!(breakpoint, Breakpoint::Mobile);
                assert_eq!(max_allowed, 1000 * 1024);
                assert!((percentage_over - 50.0).abs() < 1e-9);
            }
            other => panic!("expected BudgetExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_unconfigured_breakpoint_always_passes() {
        let result = BudgetChecker::new(budget()).check(Breakpoint::Tablet, u64::MAX / 2);
        assert_eq!(result.status, BudgetStatus::Pass);
        assert_eq!(result.message, "No budget set");
    }

    #[test]
    fn test_first_violation_picks_over_budget_breakpoint() {
        let checker = BudgetChecker::new(budget());
        let results = vec![
            checker.check(Breakpoint::Mobile, 100 * 1024),
            checker.check(Breakpoint::Desktop, 3000 * 1024),
        ];
        assert!(matches!(
            first_violation(&results),
            Some(WeightError::BudgetExceeded {
                breakpoint: Breakpoint::Desktop,
                ..
            })
        ));
    }
}
