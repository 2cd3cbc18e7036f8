//! Numerically guarded primitives for return ratios.

/// Positive floor used in place of zero for running cost and loot totals.
///
/// Keeps `loot / cost` defined for a cycle that never saw a shot.
pub const RATIO_FLOOR: f64 = 1e-8;

/// Divide `num` by `den`, clamping the denominator to at least [`RATIO_FLOOR`].
///
/// Denominators in this domain are costs, which are never meaningfully
/// negative; anything below the floor (including zero and negatives) is
/// treated as the floor. NaN inputs propagate.
pub fn guarded_ratio(num: f64, den: f64) -> f64 {
    if num.is_nan() || den.is_nan() {
        return f64::NAN;
    }
    num / den.max(RATIO_FLOOR)
}

/// Ratio expressed as a percentage (`100 * num / den`), same guarding as
/// [`guarded_ratio`].
pub fn guarded_percent(num: f64, den: f64) -> f64 {
    guarded_ratio(num, den) * 100.0
}

/// Returns true when `value` is indistinguishable from the floor, i.e. no
/// real quantity was ever accumulated on top of it.
pub fn is_floor(value: f64) -> bool {
    value.abs() <= RATIO_FLOOR * 2.0
}

/// Approximate equality with an absolute tolerance that scales with the
/// magnitude of the operands.
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

/// Kahan-compensated sum.
///
/// Long hunts sum tens of thousands of sub-PEC values; naive summation
/// drifts in the last digits that summary percentages are printed with.
pub fn stable_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0;
    let mut compensation = 0.0;
    for v in values {
        let y = v - compensation;
        let t = sum + y;
        compensation = (t - sum) - y;
        sum = t;
    }
    sum
}
