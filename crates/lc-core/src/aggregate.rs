//! Whole-log counters: combat, skills, enhancers, loot and team drops.
//!
//! Unlike the accumulator this needs no shot cost; every recognized event
//! is simply tallied.

use crate::events::{Event, EventKind, ReductionKind};
use lc_config::AccumulatorSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outgoing attacks and what happened to the player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlayerCombat {
    pub hits: u64,
    pub damage: f64,
    pub critical_hits: u64,
    pub critical_damage: f64,
    pub misses: u64,
    pub evades: u64,
    pub dodges: u64,
    pub deflects: u64,
    pub heals: u64,
    pub heal_points: f64,
    pub deaths: u64,
    pub critical_reduced: f64,
    pub critical_reduced_pierce: f64,
}

/// Attacks made by the target, and how it avoided the player's shots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetCombat {
    pub hits: u64,
    pub damage: f64,
    pub critical_hits: u64,
    pub critical_damage: f64,
    pub critical_pierce: u64,
    pub critical_pierce_damage: f64,
    pub misses: u64,
    pub evades: u64,
    pub dodges: u64,
    pub jams: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootTally {
    pub count: u64,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub events: u64,
    pub skills: BTreeMap<String, f64>,
    pub player: PlayerCombat,
    pub target: TargetCombat,
    /// Broken enhancers by name.
    pub enhancers: BTreeMap<String, u64>,
    pub loot: BTreeMap<String, LootTally>,
    pub loot_total: f64,
    /// Team drops: avatar -> item -> count.
    pub team: BTreeMap<String, BTreeMap<String, u64>>,
}

impl AggregateStats {
    /// Tally every event in `events`.
    pub fn fold<'a, I>(events: I, settings: &AccumulatorSettings) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut stats = AggregateStats::default();
        for event in events {
            stats.record(event, settings);
        }
        stats
    }

    pub fn record(&mut self, event: &Event, settings: &AccumulatorSettings) {
        self.events += 1;
        let player = &mut self.player;
        let target = &mut self.target;
        match &event.kind {
            EventKind::ShotHit { damage } => {
                player.hits += 1;
                player.damage += damage;
            }
            EventKind::ShotCritical { damage } => {
                player.critical_hits += 1;
                player.critical_damage += damage;
            }
            EventKind::ShotMiss => player.misses += 1,
            EventKind::Healed { points } => {
                player.heals += 1;
                player.heal_points += points;
            }
            EventKind::PlayerEvaded => player.evades += 1,
            EventKind::PlayerDodged => player.dodges += 1,
            EventKind::DamageDeflected => player.deflects += 1,
            EventKind::PlayerKilled { .. } => player.deaths += 1,
            EventKind::DamageReduced { reduction, points } => match reduction {
                ReductionKind::Critical => player.critical_reduced += points,
                ReductionKind::ArmorPiercing => player.critical_reduced_pierce += points,
            },

            EventKind::DamageTaken { points } => {
                target.hits += 1;
                target.damage += points;
            }
            EventKind::TargetCritical { points } => {
                target.critical_hits += 1;
                target.critical_damage += points;
            }
            EventKind::TargetArmorPierce { points } => {
                target.critical_pierce += 1;
                target.critical_pierce_damage += points;
            }
            EventKind::TargetMissed => target.misses += 1,
            EventKind::TargetEvaded => target.evades += 1,
            EventKind::TargetDodged => target.dodges += 1,
            EventKind::TargetJammed => target.jams += 1,

            EventKind::SkillGained { skill, amount } => {
                *self.skills.entry(skill.clone()).or_default() += amount;
            }
            EventKind::EnhancerBroke { enhancer, .. } => {
                *self.enhancers.entry(enhancer.clone()).or_default() += 1;
            }
            EventKind::LootReceived { item, count, value } => {
                let value = if *item == settings.scrap_item {
                    *count as f64 / settings.scrap_units_per_ped
                } else {
                    *value
                };
                let tally = self.loot.entry(item.clone()).or_default();
                tally.count += count;
                tally.value += value;
                self.loot_total += value;
            }
            EventKind::TeamLoot {
                avatar,
                item,
                count,
            } => {
                *self
                    .team
                    .entry(avatar.clone())
                    .or_default()
                    .entry(item.clone())
                    .or_default() += count;
            }
            EventKind::Other => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::classify_line;

    fn fold(lines: &[&str]) -> AggregateStats {
        let events: Vec<Event> = lines.iter().filter_map(|l| classify_line(l)).collect();
        AggregateStats::fold(&events, &AccumulatorSettings::default())
    }

    #[test]
    fn combat_counters() {
        let stats = fold(&[
            "2021-09-04 10:00:00 [System] [] You inflicted 10.5 points of damage",
            "2021-09-04 10:00:01 [System] [] You inflicted 4.5 points of damage",
            "2021-09-04 10:00:02 [System] [] Critical hit - Additional damage! You inflicted 30.0 points of damage",
            "2021-09-04 10:00:03 [System] [] You took 5.5 points of damage",
            "2021-09-04 10:00:04 [System] [] The target Dodged your attack",
            "2021-09-04 10:00:05 [System] [] You Evaded the attack",
        ]);
        assert_eq!(stats.events, 6);
        assert_eq!(stats.player.hits, 2);
        assert!((stats.player.damage - 15.0).abs() < 1e-12);
        assert_eq!(stats.player.critical_hits, 1);
        assert_eq!(stats.target.hits, 1);
        assert_eq!(stats.target.dodges, 1);
        assert_eq!(stats.player.evades, 1);
    }

    #[test]
    fn loot_values_scrap_exactly() {
        let stats = fold(&[
            "2021-09-04 10:00:00 [System] [] You received Shrapnel x (2541) Value: 0.25 PED",
            "2021-09-04 10:00:01 [System] [] You received Shrapnel x (1000) Value: 0.10 PED",
            "2021-09-04 10:00:02 [System] [] You received Animal Hide x (3) Value: 0.0300 PED",
        ]);
        let scrap = &stats.loot["Shrapnel"];
        assert_eq!(scrap.count, 3541);
        assert!((scrap.value - 0.3541).abs() < 1e-12);
        assert!((stats.loot_total - 0.3841).abs() < 1e-12);
    }

    #[test]
    fn team_skills_and_enhancers() {
        let stats = fold(&[
            "2021-09-04 10:00:00 [Team] [] Alli Golden received Shrapnel (9373)",
            "2021-09-04 10:00:01 [Team] [] Alli Golden received a Thunderbird Shin Guards (M,L)",
            "2021-09-04 10:00:02 [Team] [] Alli Golden received Shrapnel (7)",
            "2021-09-04 10:00:03 [System] [] You have gained 0.5 Agility",
            "2021-09-04 10:00:04 [System] [] You have gained 0.25 Agility",
            "2021-09-04 10:00:05 [System] [] Your enhancer Weapon Damage Enhancer 1 on your LP-50 broke. You have 2 enhancers remaining on the item. You received 0.8000 PED Shrapnel.",
        ]);
        let alli = &stats.team["Alli Golden"];
        assert_eq!(alli["Shrapnel"], 9380);
        assert_eq!(alli["Thunderbird Shin Guards (M,L)"], 1);
        assert!((stats.skills["Agility"] - 0.75).abs() < 1e-12);
        assert_eq!(stats.enhancers["Weapon Damage Enhancer 1"], 1);
    }
}
