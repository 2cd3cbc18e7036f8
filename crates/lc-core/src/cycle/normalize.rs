//! Efficiency/looter compensation.

use serde::{Deserialize, Serialize};

/// Base share of the return that does not depend on the setup.
const BASE_FACTOR: f64 = 0.86;
/// Share of the return scaled by efficiency (0-100).
const EFFICIENCY_WEIGHT: f64 = 0.07;
/// Share of the return scaled by the looter bonus (0-100).
const LOOTER_WEIGHT: f64 = 0.07;

/// Rescales loot to the 100/100 reference setup.
///
/// The realized return is modelled as
/// `0.86 + 0.07 * efficiency/100 + 0.07 * looter/100` of the reference
/// return, so the factor lies in `[0.86, 1.0]` for valid percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyNormalizer {
    pub efficiency: f64,
    pub looter: f64,
}

impl Default for EfficiencyNormalizer {
    fn default() -> Self {
        EfficiencyNormalizer {
            efficiency: 100.0,
            looter: 100.0,
        }
    }
}

impl EfficiencyNormalizer {
    pub fn new(efficiency: f64, looter: f64) -> Self {
        EfficiencyNormalizer { efficiency, looter }
    }

    /// Fraction of the reference return realized with this setup.
    pub fn factor(&self) -> f64 {
        BASE_FACTOR
            + EFFICIENCY_WEIGHT * (self.efficiency / 100.0)
            + LOOTER_WEIGHT * (self.looter / 100.0)
    }

    pub fn normalize(&self, raw: f64) -> f64 {
        raw / self.factor()
    }

    /// Inverse of [`normalize`](Self::normalize): reference loot to realized loot.
    pub fn apply(&self, reference: f64) -> f64 {
        reference * self.factor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc_math::approx_eq;

    #[test]
    fn reference_setup_is_identity() {
        let n = EfficiencyNormalizer::default();
        assert!(approx_eq(n.factor(), 1.0, 1e-12));
        assert_eq!(n.normalize(3.25), 3.25);
    }

    #[test]
    fn factor_bounds() {
        assert!(approx_eq(EfficiencyNormalizer::new(0.0, 0.0).factor(), 0.86, 1e-12));
        assert!(approx_eq(EfficiencyNormalizer::new(80.0, 50.0).factor(), 0.951, 1e-12));
    }

    #[test]
    fn normalization_is_pure_scaling() {
        let n = EfficiencyNormalizer::new(62.5, 17.0);
        let unit = n.normalize(1.0);
        for x in [0.0, 0.01, 1.0, 42.0, -0.8] {
            assert!(approx_eq(n.normalize(x), x * unit, 1e-12));
        }
    }

    #[test]
    fn apply_inverts_normalize() {
        let n = EfficiencyNormalizer::new(80.0, 50.0);
        assert!(approx_eq(n.apply(n.normalize(7.3)), 7.3, 1e-12));
    }
}
