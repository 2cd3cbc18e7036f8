//! Helpers over ordered samples: sorting, differences, windows.

/// Return an ascending copy of `values`.
///
/// Uses IEEE total ordering so NaN never panics the sort; NaNs end up last.
pub fn sorted_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// First differences `d[i] = values[i + 1] - values[i]`.
///
/// Length is `values.len() - 1`, or zero for fewer than two values.
pub fn first_differences(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Maximum of `values[lo..=hi]` with both bounds clamped to the slice.
///
/// Returns `None` when the clamped range is empty.
pub fn window_max(values: &[f64], lo: usize, hi: usize) -> Option<f64> {
    if values.is_empty() || lo >= values.len() {
        return None;
    }
    let hi = hi.min(values.len() - 1);
    if lo > hi {
        return None;
    }
    values[lo..=hi].iter().copied().reduce(f64::max)
}

/// Index that a population fraction maps to in a sorted list of `n`
/// elements: `floor(fraction * n)`, clamped to `[0, n - 1]`.
pub fn fraction_index(n: usize, fraction: f64) -> usize {
    if n == 0 {
        return 0;
    }
    let raw = (fraction.max(0.0) * n as f64).floor() as usize;
    raw.min(n - 1)
}

/// Number of elements a population fraction covers, at least one.
pub fn fraction_len(n: usize, fraction: f64) -> usize {
    ((fraction.max(0.0) * n as f64).ceil() as usize).max(1)
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(super::stable::stable_sum(values.iter().copied()) / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_ascending_orders_values() {
        let out = sorted_ascending(&[3.0, 1.0, 2.0]);
        assert_eq!(out, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn sorted_ascending_puts_nan_last() {
        let out = sorted_ascending(&[f64::NAN, 1.0]);
        assert_eq!(out[0], 1.0);
        assert!(out[1].is_nan());
    }

    #[test]
    fn first_differences_basic() {
        let d = first_differences(&[0.1, 0.1, 5.0]);
        assert_eq!(d.len(), 2);
        assert_eq!(d[0], 0.0);
        assert!((d[1] - 4.9).abs() < 1e-12);
    }

    #[test]
    fn first_differences_short_input() {
        assert!(first_differences(&[]).is_empty());
        assert!(first_differences(&[1.0]).is_empty());
    }

    #[test]
    fn window_max_clamps() {
        let v = [1.0, 5.0, 2.0];
        assert_eq!(window_max(&v, 0, 10), Some(5.0));
        assert_eq!(window_max(&v, 2, 2), Some(2.0));
        assert_eq!(window_max(&v, 3, 4), None);
        assert_eq!(window_max(&v, 2, 1), None);
        assert_eq!(window_max(&[], 0, 0), None);
    }

    #[test]
    fn fraction_index_clamps() {
        assert_eq!(fraction_index(100, 0.25), 25);
        assert_eq!(fraction_index(7, 0.05), 0);
        assert_eq!(fraction_index(10, 2.0), 9);
        assert_eq!(fraction_index(0, 0.5), 0);
    }

    #[test]
    fn fraction_len_at_least_one() {
        assert_eq!(fraction_len(7, 0.05), 1);
        assert_eq!(fraction_len(1000, 0.25), 250);
        assert_eq!(fraction_len(0, 0.5), 1);
    }

    #[test]
    fn mean_basic() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 3.0]), Some(2.0));
    }
}
