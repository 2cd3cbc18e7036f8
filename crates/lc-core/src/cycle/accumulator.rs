//! The kill cycle state machine.

use super::{EfficiencyNormalizer, KillCycle, ShrapnelResolver};
use crate::dataset::Dataset;
use crate::events::{Event, EventKind};
use crate::logging::{event_names, Stage};
use chrono::NaiveDateTime;
use lc_config::{AccumulatorSettings, BonusPolicy, RunParams};
use lc_math::{guarded_ratio, RATIO_FLOOR};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::convert::Infallible;
use tracing::{debug, trace};

/// Which half of a cycle the stream is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Shots are being fired (or nothing has happened yet).
    AwaitingCost,
    /// The last relevant event was a loot receipt.
    AwaitingLoot,
}

/// Per-run scalars the accumulator needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostParams {
    /// Cost of one shot in PED.
    pub ped_per_shot: f64,
    pub efficiency: f64,
    pub looter: f64,
}

impl CostParams {
    /// Reference efficiency and looter (100/100).
    pub fn new(ped_per_shot: f64) -> Self {
        CostParams {
            ped_per_shot,
            efficiency: 100.0,
            looter: 100.0,
        }
    }

    pub fn normalizer(&self) -> EfficiencyNormalizer {
        EfficiencyNormalizer::new(self.efficiency, self.looter)
    }
}

impl From<&RunParams> for CostParams {
    fn from(params: &RunParams) -> Self {
        CostParams {
            ped_per_shot: params.ped_per_shot,
            efficiency: params.efficiency,
            looter: params.looter,
        }
    }
}

/// Counters reported once the stream is exhausted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulatorStats {
    pub shots_fired: u64,
    pub cycles_emitted: u64,
    /// Cycles whose return ratio reached the spurious threshold.
    pub discarded_ratio: u64,
    /// Cycles with more scrap samples than allowed.
    pub discarded_scrap: u64,
    /// Whether loot was pending when the stream ended (not emitted).
    pub trailing_partial: bool,
}

/// Folds an ordered event stream into [`KillCycle`]s.
pub struct KillCycleAccumulator<S = BonusPolicy> {
    settings: AccumulatorSettings,
    cost: CostParams,
    normalizer: EfficiencyNormalizer,
    resolver: S,
    phase: Phase,
    current_cost: f64,
    current_loot: f64,
    scrap_samples: Vec<f64>,
    stats: AccumulatorStats,
}

impl KillCycleAccumulator<BonusPolicy> {
    /// Accumulator using the configured bonus policy.
    pub fn from_settings(settings: &AccumulatorSettings, cost: CostParams) -> Self {
        let policy = settings.bonus_policy;
        KillCycleAccumulator::new(settings.clone(), cost, policy)
    }
}

impl<S: ShrapnelResolver> KillCycleAccumulator<S> {
    pub fn new(settings: AccumulatorSettings, cost: CostParams, resolver: S) -> Self {
        KillCycleAccumulator {
            normalizer: cost.normalizer(),
            settings,
            cost,
            resolver,
            phase: Phase::AwaitingCost,
            current_cost: RATIO_FLOOR,
            current_loot: RATIO_FLOOR,
            scrap_samples: Vec::new(),
            stats: AccumulatorStats::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn shots_fired(&self) -> u64 {
        self.stats.shots_fired
    }

    /// Feed one event. Returns the cycle finalized by it, if any.
    pub fn push(&mut self, event: &Event) -> Option<KillCycle> {
        match &event.kind {
            EventKind::EnhancerBroke { value, .. } => {
                self.current_loot -= value;
                None
            }
            EventKind::LootReceived { item, count, value } => {
                self.phase = Phase::AwaitingLoot;
                self.record_loot(item, *count, *value);
                None
            }
            kind if kind.is_shot() => {
                let finalized = match self.phase {
                    Phase::AwaitingLoot => self.finalize(event.timestamp),
                    Phase::AwaitingCost => None,
                };
                if self.settings.charge_misses || kind.is_landed_shot() {
                    self.current_cost += self.cost.ped_per_shot;
                }
                self.stats.shots_fired += 1;
                self.phase = Phase::AwaitingCost;
                finalized
            }
            _ => None,
        }
    }

    fn record_loot(&mut self, item: &str, count: u64, value: f64) {
        if self.settings.ignore_items.contains(item) {
            trace!(item, "ignored loot item");
            return;
        }

        let is_scrap = item == self.settings.scrap_item;
        // Scrap is valued from its count; the logged value is rounded.
        let mut value = if is_scrap {
            count as f64 / self.settings.scrap_units_per_ped
        } else {
            value
        };
        if self.settings.normalize {
            value = self.normalizer.normalize(value);
        }
        if is_scrap {
            self.scrap_samples.push(value);
        }
        self.current_loot += value;
    }

    fn finalize(&mut self, timestamp: NaiveDateTime) -> Option<KillCycle> {
        let ratio = guarded_ratio(self.current_loot, self.current_cost);
        let samples = self.scrap_samples.len();

        let cycle = if ratio >= self.settings.spurious_ratio {
            self.stats.discarded_ratio += 1;
            debug!(
                event = event_names::CYCLE_DISCARDED,
                stage = %Stage::Accumulate,
                reason = "ratio",
                ratio,
                %timestamp,
                "discarded spurious cycle"
            );
            None
        } else if samples > self.settings.max_scrap_samples {
            self.stats.discarded_scrap += 1;
            debug!(
                event = event_names::CYCLE_DISCARDED,
                stage = %Stage::Accumulate,
                reason = "scrap_samples",
                samples,
                %timestamp,
                "discarded spurious cycle"
            );
            None
        } else {
            self.stats.cycles_emitted += 1;
            let cycle = KillCycle {
                cost: self.current_cost,
                loot: self.current_loot,
                bonus_shrap: self.resolver.resolve(&self.scrap_samples),
                timestamp,
                shrap_count: samples,
            };
            trace!(
                event = event_names::CYCLE_FINALIZED,
                cost = cycle.cost,
                loot = cycle.loot,
                bonus = cycle.bonus_shrap,
                "cycle finalized"
            );
            Some(cycle)
        };

        self.current_cost = RATIO_FLOOR;
        self.current_loot = RATIO_FLOOR;
        self.scrap_samples.clear();
        cycle
    }

    /// End of stream. A pending partial cycle is dropped.
    pub fn finish(mut self) -> AccumulatorStats {
        self.stats.trailing_partial = self.phase == Phase::AwaitingLoot;
        self.stats
    }
}

/// Run a fresh accumulator over `events` and collect the result.
pub fn fold_events<I>(
    events: I,
    settings: &AccumulatorSettings,
    cost: CostParams,
) -> (Dataset, AccumulatorStats)
where
    I: IntoIterator,
    I::Item: Borrow<Event>,
{
    let infallible = events.into_iter().map(Ok::<_, Infallible>);
    match try_fold_events(infallible, settings, cost) {
        Ok(folded) => folded,
        Err(never) => match never {},
    }
}

/// Like [`fold_events`] over a fallible stream; stops at the first error.
pub fn try_fold_events<I, T, E>(
    events: I,
    settings: &AccumulatorSettings,
    cost: CostParams,
) -> Result<(Dataset, AccumulatorStats), E>
where
    I: IntoIterator<Item = Result<T, E>>,
    T: Borrow<Event>,
{
    let mut acc = KillCycleAccumulator::from_settings(settings, cost);
    let mut dataset = Dataset::new(cost);
    for event in events {
        let item = event?;
        let event: &Event = item.borrow();
        dataset.observe_timestamp(event.timestamp);
        if let Some(cycle) = acc.push(event) {
            dataset.cycles.push(cycle);
        }
    }
    let stats = acc.finish();
    dataset.shots_fired = stats.shots_fired;
    Ok((dataset, stats))
}
