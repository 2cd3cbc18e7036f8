//! Typed chat-log events.
//!
//! A raw line `"<timestamp> [<channel>] [<actor>] <message>"` becomes an
//! [`Event`] via [`classify_line`]. Lines that do not have this shape are
//! not events and never reach the accumulator.

mod classify;
mod reader;

pub use classify::{classify_line, classify_message, TIMESTAMP_FORMAT};
pub use reader::LogReader;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Chat channel a line was posted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    System,
    Team,
    Globals,
    Local,
    Other(String),
}

impl Channel {
    pub fn parse(name: &str) -> Self {
        match name {
            "System" => Channel::System,
            "Team" => Channel::Team,
            "Globals" => Channel::Globals,
            "Local" => Channel::Local,
            other => Channel::Other(other.to_string()),
        }
    }
}

/// Which kind of incoming damage a reduction applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionKind {
    Critical,
    ArmorPiercing,
}

/// Message kinds recognized in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    // Outgoing shots
    ShotHit { damage: f64 },
    ShotCritical { damage: f64 },
    ShotMiss,
    TargetEvaded,
    TargetDodged,
    TargetJammed,

    // Loot
    LootReceived { item: String, count: u64, value: f64 },
    EnhancerBroke {
        enhancer: String,
        item: String,
        remaining: u32,
        value: f64,
    },

    // Player
    Healed { points: f64 },
    SkillGained { skill: String, amount: f64 },
    PlayerEvaded,
    PlayerDodged,
    DamageDeflected,
    PlayerKilled { maturity: String, by: String },
    DamageReduced { reduction: ReductionKind, points: f64 },

    // Incoming attacks
    DamageTaken { points: f64 },
    TargetCritical { points: f64 },
    TargetArmorPierce { points: f64 },
    TargetMissed,

    // Team channel
    TeamLoot { avatar: String, item: String, count: u64 },

    /// Well-formed line with a message no pattern recognizes.
    Other,
}

impl EventKind {
    /// Shots fired at the target, landed or not. These open kill cycles.
    pub fn is_shot(&self) -> bool {
        matches!(
            self,
            EventKind::ShotHit { .. }
                | EventKind::ShotCritical { .. }
                | EventKind::ShotMiss
                | EventKind::TargetEvaded
                | EventKind::TargetDodged
                | EventKind::TargetJammed
        )
    }

    /// Shots that landed on the target.
    pub fn is_landed_shot(&self) -> bool {
        matches!(
            self,
            EventKind::ShotHit { .. } | EventKind::ShotCritical { .. }
        )
    }
}

/// One classified log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: NaiveDateTime,
    pub channel: Channel,
    pub actor: String,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    pub fn new(timestamp: NaiveDateTime, channel: Channel, kind: EventKind) -> Self {
        Event {
            timestamp,
            channel,
            actor: String::new(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_parse() {
        assert_eq!(Channel::parse("System"), Channel::System);
        assert_eq!(Channel::parse("Team"), Channel::Team);
        assert_eq!(
            Channel::parse("Rookie"),
            Channel::Other("Rookie".to_string())
        );
    }

    #[test]
    fn shot_predicates() {
        assert!(EventKind::ShotMiss.is_shot());
        assert!(!EventKind::ShotMiss.is_landed_shot());
        assert!(EventKind::ShotCritical { damage: 1.0 }.is_landed_shot());
        assert!(!EventKind::TargetMissed.is_shot());
        assert!(!EventKind::DamageTaken { points: 2.0 }.is_shot());
    }
}
