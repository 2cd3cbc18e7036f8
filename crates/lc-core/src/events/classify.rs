//! Regex-driven line classification.
//!
//! Patterns are anchored at the start of the message and tried in table
//! order; the first match wins.

use super::{Channel, Event, EventKind, ReductionKind};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Timestamp layout at the start of every log line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static RE_BASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?) \[(.*?)\] \[(.*?)\] (.*)$").expect("base pattern"));

type Build = fn(&Captures<'_>) -> Option<EventKind>;

fn num<T: std::str::FromStr>(caps: &Captures<'_>, i: usize) -> Option<T> {
    caps.get(i)?.as_str().parse().ok()
}

fn text(caps: &Captures<'_>, i: usize) -> Option<String> {
    Some(caps.get(i)?.as_str().to_string())
}

/// Ordered `[System]` message patterns.
static SYSTEM_PATTERNS: Lazy<Vec<(Regex, Build)>> = Lazy::new(|| {
    let table: [(&str, Build); 21] = [
        (r"^You inflicted (\d+(?:\.\d+)?) points of damage", |c| {
            Some(EventKind::ShotHit { damage: num(c, 1)? })
        }),
        (
            r"^Critical hit - Additional damage! You inflicted (\d+(?:\.\d+)?) points of damage",
            |c| Some(EventKind::ShotCritical { damage: num(c, 1)? }),
        ),
        (r"^You missed", |_| Some(EventKind::ShotMiss)),
        (r"^The target Evaded your attack", |_| {
            Some(EventKind::TargetEvaded)
        }),
        (r"^The target Dodged your attack", |_| {
            Some(EventKind::TargetDodged)
        }),
        (r"^The target Jammed your attack", |_| {
            Some(EventKind::TargetJammed)
        }),
        (
            r"^You received (.*) x \((\d+)\) Value: (\d+(?:\.\d+)?) PED",
            |c| {
                Some(EventKind::LootReceived {
                    item: text(c, 1)?,
                    count: num(c, 2)?,
                    value: num(c, 3)?,
                })
            },
        ),
        (
            r"^Your enhancer (.*) on your (.*) broke\. You have (\d+) enhancers remaining on the item\. You received (\d+(?:\.\d+)?) PED Shrapnel\.",
            |c| {
                Some(EventKind::EnhancerBroke {
                    enhancer: text(c, 1)?,
                    item: text(c, 2)?,
                    remaining: num(c, 3)?,
                    value: num(c, 4)?,
                })
            },
        ),
        (r"^You healed yourself (\d+(?:\.\d+)?) points", |c| {
            Some(EventKind::Healed { points: num(c, 1)? })
        }),
        (
            r"^You have gained (\d+(?:\.\d+)?) experience in your (.*) skill",
            |c| {
                Some(EventKind::SkillGained {
                    amount: num(c, 1)?,
                    skill: text(c, 2)?,
                })
            },
        ),
        (r"^You have gained (\d+(?:\.\d+)?) (.*)", |c| {
            Some(EventKind::SkillGained {
                amount: num(c, 1)?,
                skill: text(c, 2)?,
            })
        }),
        (r"^You Evaded the attack", |_| Some(EventKind::PlayerEvaded)),
        (r"^You Dodged the attack", |_| Some(EventKind::PlayerDodged)),
        (r"^Damage deflected!", |_| Some(EventKind::DamageDeflected)),
        (r"^You were killed by the ([^\s]+) (.*)", |c| {
            Some(EventKind::PlayerKilled {
                maturity: text(c, 1)?,
                by: text(c, 2)?,
            })
        }),
        (
            r"^Reduced (\d+(?:\.\d+)?) points of armor piercing damage",
            |c| {
                Some(EventKind::DamageReduced {
                    reduction: ReductionKind::ArmorPiercing,
                    points: num(c, 1)?,
                })
            },
        ),
        (r"^Reduced (\d+(?:\.\d+)?) points of critical damage", |c| {
            Some(EventKind::DamageReduced {
                reduction: ReductionKind::Critical,
                points: num(c, 1)?,
            })
        }),
        (
            r"^Critical hit - Armor penetration! You took (\d+(?:\.\d+)?) points of damage",
            |c| Some(EventKind::TargetArmorPierce { points: num(c, 1)? }),
        ),
        (
            r"^Critical hit - Additional damage! You took (\d+(?:\.\d+)?) points of damage",
            |c| Some(EventKind::TargetCritical { points: num(c, 1)? }),
        ),
        (r"^The attack missed you", |_| Some(EventKind::TargetMissed)),
        (r"^You took (\d+(?:\.\d+)?) points of damage", |c| {
            Some(EventKind::DamageTaken { points: num(c, 1)? })
        }),
    ];
    compile(&table)
});

/// Ordered `[Team]` message patterns. Counted drops before single items.
static TEAM_PATTERNS: Lazy<Vec<(Regex, Build)>> = Lazy::new(|| {
    let table: [(&str, Build); 2] = [
        (r"^(.*) received (.*) \((\d+)\)", |c| {
            Some(EventKind::TeamLoot {
                avatar: text(c, 1)?,
                item: text(c, 2)?,
                count: num(c, 3)?,
            })
        }),
        (r"^(.*) received a (.*)", |c| {
            Some(EventKind::TeamLoot {
                avatar: text(c, 1)?,
                item: text(c, 2)?,
                count: 1,
            })
        }),
    ];
    compile(&table)
});

fn compile(table: &[(&str, Build)]) -> Vec<(Regex, Build)> {
    table
        .iter()
        .map(|(pattern, build)| (Regex::new(pattern).expect("static pattern"), *build))
        .collect()
}

fn first_match(patterns: &[(Regex, Build)], message: &str) -> Option<EventKind> {
    patterns.iter().find_map(|(re, build)| build(&re.captures(message)?))
}

/// Classify the message part of a line posted to `channel`.
pub fn classify_message(channel: &Channel, message: &str) -> EventKind {
    let kind = match channel {
        Channel::System => first_match(&SYSTEM_PATTERNS, message),
        Channel::Team => first_match(&TEAM_PATTERNS, message),
        _ => None,
    };
    kind.unwrap_or(EventKind::Other)
}

/// Parse one raw log line. `None` for lines without the base shape or
/// with an unparseable timestamp.
pub fn classify_line(line: &str) -> Option<Event> {
    let line = line.trim_end_matches(['\r', '\n']);
    let caps = RE_BASE.captures(line)?;
    let timestamp = NaiveDateTime::parse_from_str(caps.get(1)?.as_str(), TIMESTAMP_FORMAT).ok()?;
    let channel = Channel::parse(caps.get(2)?.as_str());
    let actor = caps.get(3)?.as_str().to_string();
    let kind = classify_message(&channel, caps.get(4)?.as_str());
    Some(Event {
        timestamp,
        channel,
        actor,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sys(message: &str) -> EventKind {
        classify_line(&format!("2021-09-04 19:23:11 [System] [] {message}"))
            .expect("well-formed line")
            .kind
    }

    #[test]
    fn base_shape_fields() {
        let event = classify_line("2021-09-04 19:23:11 [Team] [Alli Golden] Alli Golden received Shrapnel (9373)\r\n")
            .unwrap();
        assert_eq!(event.channel, Channel::Team);
        assert_eq!(event.actor, "Alli Golden");
        assert_eq!(event.timestamp.to_string(), "2021-09-04 19:23:11");
        assert_eq!(
            event.kind,
            EventKind::TeamLoot {
                avatar: "Alli Golden".into(),
                item: "Shrapnel".into(),
                count: 9373
            }
        );
    }

    #[test]
    fn malformed_lines_are_not_events() {
        assert!(classify_line("").is_none());
        assert!(classify_line("garbage without brackets").is_none());
        assert!(classify_line("yesterday [System] [] You missed").is_none());
    }

    #[test]
    fn shots() {
        assert_eq!(
            sys("You inflicted 127.9 points of damage"),
            EventKind::ShotHit { damage: 127.9 }
        );
        assert_eq!(
            sys("Critical hit - Additional damage! You inflicted 301.2 points of damage"),
            EventKind::ShotCritical { damage: 301.2 }
        );
        assert_eq!(sys("You missed"), EventKind::ShotMiss);
        assert_eq!(sys("The target Evaded your attack"), EventKind::TargetEvaded);
        assert_eq!(sys("The target Dodged your attack"), EventKind::TargetDodged);
        assert_eq!(sys("The target Jammed your attack"), EventKind::TargetJammed);
    }

    #[test]
    fn loot_and_enhancer() {
        assert_eq!(
            sys("You received Shrapnel x (2541) Value: 0.2541 PED"),
            EventKind::LootReceived {
                item: "Shrapnel".into(),
                count: 2541,
                value: 0.2541
            }
        );
        assert_eq!(
            sys("Your enhancer Weapon Damage Enhancer 1 on your ArMatrix LP-50 (L) broke. You have 18 enhancers remaining on the item. You received 0.8000 PED Shrapnel."),
            EventKind::EnhancerBroke {
                enhancer: "Weapon Damage Enhancer 1".into(),
                item: "ArMatrix LP-50 (L)".into(),
                remaining: 18,
                value: 0.8
            }
        );
    }

    #[test]
    fn incoming_damage_is_not_confused_with_outgoing() {
        assert_eq!(
            sys("Critical hit - Additional damage! You took 131.7 points of damage"),
            EventKind::TargetCritical { points: 131.7 }
        );
        assert_eq!(
            sys("Critical hit - Armor penetration! You took 48.1 points of damage"),
            EventKind::TargetArmorPierce { points: 48.1 }
        );
        assert_eq!(
            sys("You took 5.5 points of damage"),
            EventKind::DamageTaken { points: 5.5 }
        );
        assert_eq!(sys("The attack missed you"), EventKind::TargetMissed);
    }

    #[test]
    fn skills_prefer_experience_form() {
        assert_eq!(
            sys("You have gained 0.0310 experience in your Laser Weaponry Technology skill"),
            EventKind::SkillGained {
                skill: "Laser Weaponry Technology".into(),
                amount: 0.031
            }
        );
        assert_eq!(
            sys("You have gained 0.2739 Serendipity"),
            EventKind::SkillGained {
                skill: "Serendipity".into(),
                amount: 0.2739
            }
        );
    }

    #[test]
    fn player_events() {
        assert_eq!(
            sys("You were killed by the unrelenting Vanguard Coordinator"),
            EventKind::PlayerKilled {
                maturity: "unrelenting".into(),
                by: "Vanguard Coordinator".into()
            }
        );
        assert_eq!(
            sys("Reduced 5.2 points of critical damage"),
            EventKind::DamageReduced {
                reduction: ReductionKind::Critical,
                points: 5.2
            }
        );
        assert_eq!(sys("Damage deflected!"), EventKind::DamageDeflected);
        assert_eq!(
            sys("You healed yourself 42.0 points"),
            EventKind::Healed { points: 42.0 }
        );
    }

    #[test]
    fn team_single_item() {
        let event = classify_line(
            "2021-09-04 19:23:11 [Team] [] Alli Golden received a Thunderbird Shin Guards (M,L)",
        )
        .unwrap();
        assert_eq!(
            event.kind,
            EventKind::TeamLoot {
                avatar: "Alli Golden".into(),
                item: "Thunderbird Shin Guards (M,L)".into(),
                count: 1
            }
        );
    }

    #[test]
    fn unknown_messages_are_other() {
        assert_eq!(sys("Item(s) repaired successfully"), EventKind::Other);
        let event = classify_line(
            "2021-09-04 19:23:11 [Globals] [] Harry killed a creature (Atrox) with a value of 139 PED!",
        )
        .unwrap();
        assert_eq!(event.kind, EventKind::Other);
    }
}
