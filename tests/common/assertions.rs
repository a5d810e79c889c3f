//! Test assertion helpers
//!
//! Provides utilities for robust assertions on analysis snapshots, where
//! byte values come from floating-point heuristics.

use site_weight::analyzer::{Breakpoint, ProjectAnalysis};

/// Assert that two floating-point values are approximately equal
#[allow(dead_code)]
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff < epsilon,
        "Float values not approximately equal:\n  actual: {}\n  expected: {}\n  diff: {} (epsilon: {})",
        actual, expected, diff, epsilon
    );
}

/// Assert that a size value is within tolerance of expected
#[allow(dead_code)]
pub fn assert_size_within(actual_bytes: u64, expected_bytes: u64, tolerance_bytes: u64) {
    let diff = actual_bytes.abs_diff(expected_bytes);

    assert!(
        diff <= tolerance_bytes,
        "Size outside tolerance:\n  actual: {} bytes ({:.2} KB)\n  expected: {} bytes ({:.2} KB)\n  diff: {} bytes (tolerance: {} bytes)",
        actual_bytes, actual_bytes as f64 / 1024.0,
        expected_bytes, expected_bytes as f64 / 1024.0,
        diff, tolerance_bytes
    );
}

/// Assert that every reported savings total respects the cap
#[allow(dead_code)]
pub fn assert_savings_capped(analysis: &ProjectAnalysis, cap_ratio: f64) {
    for bp in Breakpoint::ALL {
        let total = analysis.breakpoint(bp).total_bytes;
        let savings = analysis.savings.breakpoints.get(bp);
        assert!(
            savings.reported_bytes as f64 <= cap_ratio * total as f64,
            "{} savings {} exceed {} of total {}",
            bp,
            savings.reported_bytes,
            cap_ratio,
            total
        );
    }
}

/// Assert that no recommendation claims more than the asset weighs
#[allow(dead_code)]
pub fn assert_recommendations_bounded(analysis: &ProjectAnalysis) {
    for rec in &analysis.all_recommendations {
        assert!(
            rec.potential_savings <= rec.current_bytes,
            "{} recommendation for {} saves {} of {} bytes",
            rec.kind,
            rec.node_id,
            rec.potential_savings,
            rec.current_bytes
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq_pass() {
        assert_approx_eq(0.75, 0.7501, 0.01);
    }

    #[test]
    #[should_panic(expected = "Float values not approximately equal")]
    fn test_assert_approx_eq_fail() {
        assert_approx_eq(0.75, 0.80, 0.01);
    }

    #[test]
    #[should_panic(expected = "Size outside tolerance")]
    fn test_assert_size_within_fail() {
        assert_size_within(1024000, 1030000, 1024);
    }
}
