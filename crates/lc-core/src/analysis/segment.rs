//! Tier recovery from the sorted multiplier distribution.
//!
//! Loot is drawn from a small set of discrete multiplier tiers, each with
//! some spread. Sorted, the multipliers form plateaus separated by jumps.
//! For each configured tier guess the segmenter estimates the local
//! spacing of the sorted values around the guessed position, then walks
//! outward until a difference exceeds `gap_factor` times that spacing.
//!
//! The groups returned always partition the sorted list: values skipped
//! before a tier become a fragment group, and whatever is left after the
//! last configured tier becomes a tail group.

use crate::logging::{event_names, Stage};
use lc_common::{Error, Result};
use lc_config::{SegmenterSettings, TierGuess};
use lc_math::{
    first_differences, fraction_index, fraction_len, mean, sorted_ascending, window_max,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a group was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Found around a configured tier guess.
    Tier,
    /// Values between the previous group and a tier found below its guess.
    Fragment,
    /// Values after the last configured tier.
    Tail,
}

/// A contiguous slice `[start, end]` of the sorted multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionGroup {
    pub kind: GroupKind,
    /// Index of the tier guess, for `Tier` groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<usize>,
    /// First index, inclusive.
    pub start: usize,
    /// Last index, inclusive.
    pub end: usize,
    pub count: usize,
    /// `count / total`.
    pub share: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Gap threshold used to delimit a `Tier` group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl DistributionGroup {
    fn new(kind: GroupKind, sorted: &[f64], start: usize, end: usize) -> Self {
        let values = &sorted[start..=end];
        DistributionGroup {
            kind,
            tier: None,
            start,
            end,
            count: values.len(),
            share: values.len() as f64 / sorted.len() as f64,
            min: values[0],
            max: values[values.len() - 1],
            mean: mean(values).unwrap_or(values[0]),
            threshold: None,
        }
    }

    /// The group's values within the sorted list it was computed from.
    pub fn values<'a>(&self, sorted: &'a [f64]) -> &'a [f64] {
        &sorted[self.start..=self.end]
    }
}

/// Result of segmenting one distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    pub total: usize,
    pub groups: Vec<DistributionGroup>,
}

impl Segmentation {
    pub fn tiers(&self) -> impl Iterator<Item = &DistributionGroup> {
        self.groups.iter().filter(|g| g.kind == GroupKind::Tier)
    }
}

/// Splits a multiplier distribution into tiers.
#[derive(Debug, Clone, Default)]
pub struct DistributionSegmenter {
    settings: SegmenterSettings,
}

impl DistributionSegmenter {
    pub fn new(settings: SegmenterSettings) -> Self {
        DistributionSegmenter { settings }
    }

    pub fn settings(&self) -> &SegmenterSettings {
        &self.settings
    }

    /// Segment `values` (any order).
    pub fn segment(&self, values: &[f64]) -> Result<Segmentation> {
        if values.is_empty() {
            return Err(Error::Segmentation("no multipliers to segment".to_string()));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::Segmentation(format!("non-finite multiplier {bad}")));
        }

        let sorted = sorted_ascending(values);
        let n = sorted.len();
        if n == 1 {
            let mut group = DistributionGroup::new(GroupKind::Tier, &sorted, 0, 0);
            group.tier = Some(0);
            return Ok(Segmentation {
                total: 1,
                groups: vec![group],
            });
        }

        let diffs = first_differences(&sorted);
        let mut groups = Vec::new();
        let mut start = 0;

        for (index, guess) in self.settings.tiers.iter().enumerate() {
            // A single remaining value has no difference to search.
            if start + 1 >= n {
                break;
            }
            let found = self.find_tier(&diffs, start, guess);

            if found.start > start {
                groups.push(DistributionGroup::new(
                    GroupKind::Fragment,
                    &sorted,
                    start,
                    found.start - 1,
                ));
            }
            let mut group = DistributionGroup::new(GroupKind::Tier, &sorted, found.start, found.end);
            group.tier = Some(index);
            group.threshold = Some(found.threshold);
            debug!(
                event = event_names::SEGMENT_TIER_FOUND,
                stage = %Stage::Segment,
                tier = index,
                start = group.start,
                end = group.end,
                mean = group.mean,
                share = group.share,
                "tier found"
            );
            groups.push(group);
            start = found.end + 1;
        }

        if start < n {
            groups.push(DistributionGroup::new(GroupKind::Tail, &sorted, start, n - 1));
        }

        Ok(Segmentation { total: n, groups })
    }

    /// Locate one tier at or after `start`. Requires `start < diffs.len()`.
    fn find_tier(&self, diffs: &[f64], start: usize, guess: &TierGuess) -> FoundTier {
        let n = diffs.len() + 1;
        let last_diff = diffs.len() - 1;

        let center = fraction_index(n, guess.center).max(start).min(last_diff);
        let half = fraction_len(n, guess.window) / 2;
        let lo = center.saturating_sub(half).max(start);
        let hi = (center + half).min(last_diff);
        let local = window_max(diffs, lo, hi).unwrap_or(0.0);
        let threshold = (self.settings.gap_factor * local).max(self.settings.min_gap);

        // d[i] separates sorted[i] from sorted[i + 1].
        let end = (center..=last_diff)
            .find(|&i| diffs[i] > threshold)
            .unwrap_or(n - 1);
        let tier_start = (start..center)
            .rev()
            .find(|&i| diffs[i] > threshold)
            .map(|i| i + 1)
            .unwrap_or(start);

        FoundTier {
            start: tier_start,
            end,
            threshold,
        }
    }
}

struct FoundTier {
    start: usize,
    end: usize,
    threshold: f64,
}
