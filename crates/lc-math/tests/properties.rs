//! Property-based tests for lc-math numerical functions.
//!
//! Uses proptest to verify mathematical properties hold across many random inputs.

use lc_math::{
    approx_eq, first_differences, fraction_index, guarded_ratio, sorted_ascending, stable_sum,
    window_max, RATIO_FLOOR,
};
use proptest::prelude::*;

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

// ============================================================================
// guarded_ratio properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Above the floor the guard is invisible.
    #[test]
    fn guarded_ratio_matches_division(num in -1e6..1e6f64, den in 1e-6..1e6f64) {
        let r = guarded_ratio(num, den);
        prop_assert!(approx_eq(r, num / den, TOL), "guarded {} != {}", r, num / den);
    }

    /// Never produces an infinity for finite inputs.
    #[test]
    fn guarded_ratio_always_finite(num in -1e6..1e6f64, den in -1.0..1.0f64) {
        let r = guarded_ratio(num, den);
        prop_assert!(r.is_finite(), "ratio({}, {}) = {}", num, den, r);
    }

    /// Floor-sized denominators bound the magnitude.
    #[test]
    fn guarded_ratio_bounded(num in -10.0..10.0f64, den in -1.0..RATIO_FLOOR) {
        let r = guarded_ratio(num, den);
        prop_assert!(r.abs() <= num.abs() / RATIO_FLOOR + TOL);
    }
}

// ============================================================================
// sorting and differences
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Differences of a sorted list are never negative.
    #[test]
    fn sorted_differences_non_negative(values in prop::collection::vec(-1e3..1e3f64, 0..200)) {
        let sorted = sorted_ascending(&values);
        let diffs = first_differences(&sorted);
        prop_assert_eq!(diffs.len(), values.len().saturating_sub(1));
        for d in diffs {
            prop_assert!(d >= 0.0);
        }
    }

    /// Telescoping: the differences sum back to last - first.
    #[test]
    fn differences_telescope(values in prop::collection::vec(-1e3..1e3f64, 2..200)) {
        let sorted = sorted_ascending(&values);
        let diffs = first_differences(&sorted);
        let total = stable_sum(diffs.iter().copied());
        let span = sorted[sorted.len() - 1] - sorted[0];
        prop_assert!(approx_eq(total, span, 1e-7), "{} != {}", total, span);
    }

    /// A window max is an element of the window and dominates it.
    #[test]
    fn window_max_dominates(
        values in prop::collection::vec(-1e3..1e3f64, 1..100),
        lo in 0usize..120,
        width in 0usize..50,
    ) {
        let hi = lo + width;
        match window_max(&values, lo, hi) {
            Some(m) => {
                let hi = hi.min(values.len() - 1);
                prop_assert!(values[lo..=hi].iter().all(|v| *v <= m));
                prop_assert!(values[lo..=hi].contains(&m));
            }
            None => prop_assert!(lo >= values.len()),
        }
    }

    /// Fraction indices are always valid positions.
    #[test]
    fn fraction_index_in_bounds(n in 1usize..10_000, fraction in 0.0..2.0f64) {
        prop_assert!(fraction_index(n, fraction) < n);
    }
}
