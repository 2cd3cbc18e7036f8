//! Bonus attribution among the scrap samples of one kill cycle.
//!
//! Which scrap drop carries the bonus payout is not observable in the log.
//! The attribution is a policy, selected in configuration.

use lc_config::BonusPolicy;

/// Decides how much of a cycle's scrap loot is bonus payout.
pub trait ShrapnelResolver {
    /// `samples` are the scrap values of one cycle in log order.
    fn resolve(&self, samples: &[f64]) -> f64;
}

impl ShrapnelResolver for BonusPolicy {
    fn resolve(&self, samples: &[f64]) -> f64 {
        match self {
            BonusPolicy::SecondSample => match samples {
                [_, bonus] => *bonus,
                _ => 0.0,
            },
            BonusPolicy::None => 0.0,
        }
    }
}

/// Adapts a closure into a resolver.
pub struct FnResolver<F>(pub F);

impl<F> ShrapnelResolver for FnResolver<F>
where
    F: Fn(&[f64]) -> f64,
{
    fn resolve(&self, samples: &[f64]) -> f64 {
        (self.0)(samples)
    }
}
