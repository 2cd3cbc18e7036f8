//! Markdown and one-line renderings of command results.
//!
//! JSON output is produced directly from the serde types; these renderers
//! cover `--format md` and `--format summary`.

use crate::aggregate::AggregateStats;
use crate::analysis::{GroupKind, Segmentation, Summary};
use crate::dataset::ExportRow;
use crate::ingest::FileReport;
use crate::simulate::Simulation;

fn line(out: &mut String, text: impl AsRef<str>) {
    out.push_str(text.as_ref());
    out.push('\n');
}

/// One line: kills, cost, loot and return.
pub fn summary_line(summary: &Summary) -> String {
    format!(
        "kills={} cost={:.2} PED loot={:.2} PED return={:.2}%",
        summary.kills,
        summary.total_cost,
        summary.total_loot,
        summary.total_return_percent()
    )
}

fn files_table(out: &mut String, files: &[FileReport]) {
    line(out, "| Log | Cost source | PED/shot | Eff | Looter | Lines | Skipped |");
    line(out, "|---|---|---:|---:|---:|---:|---:|");
    for f in files {
        line(
            out,
            format!(
                "| {} | {} | {:.4} | {} | {} | {} | {} |",
                f.path.display(),
                f.cost_source,
                f.ped_per_shot,
                f.efficiency,
                f.looter,
                f.lines_total,
                f.lines_skipped
            ),
        );
    }
}

fn summary_section(out: &mut String, summary: &Summary) {
    line(out, "## Returns");
    line(out, "");
    line(out, format!("- Kills: {}", summary.kills));
    line(out, format!("- Shots fired: {}", summary.shots_fired));
    line(out, format!("- Total cost: {:.4} PED", summary.total_cost));
    line(out, format!("- Total loot: {:.4} PED", summary.total_loot));
    line(
        out,
        format!("- Total return: {:.2}%", summary.total_return_percent()),
    );
    line(
        out,
        format!("- Average cost per kill: {:.4} PED", summary.avg_cost_per_kill),
    );
    line(
        out,
        format!(
            "- Bonus scrap: {:.4} PED over {} kills ({:.2}% of loot)",
            summary.bonus_shrap_total,
            summary.cycles_with_bonus,
            summary.bonus_shrap_share * 100.0
        ),
    );
    line(out, "");
    line(out, "| Multiplier | Kills | Cost | Loot | Return | Share of loot |");
    line(out, "|---|---:|---:|---:|---:|---:|");
    for band in &summary.bands {
        line(
            out,
            format!(
                "| {} | {} | {:.4} | {:.4} | {:.2}% | {:.2}% |",
                band.label(),
                band.count,
                band.cost,
                band.loot,
                band.return_ratio * 100.0,
                band.share_of_loot * 100.0
            ),
        );
    }
}

fn segmentation_section(out: &mut String, segmentation: &Segmentation) {
    line(out, "## Tiers");
    line(out, "");
    line(out, "| Group | Kills | Share | Min | Max | Mean |");
    line(out, "|---|---:|---:|---:|---:|---:|");
    for group in &segmentation.groups {
        let name = match (group.kind, group.tier) {
            (GroupKind::Tier, Some(i)) => format!("tier {}", i + 1),
            (GroupKind::Tier, None) => "tier".to_string(),
            (GroupKind::Fragment, _) => "fragment".to_string(),
            (GroupKind::Tail, _) => "tail".to_string(),
        };
        line(
            out,
            format!(
                "| {} | {} | {:.2}% | {:.4} | {:.4} | {:.4} |",
                name,
                group.count,
                group.share * 100.0,
                group.min,
                group.max,
                group.mean
            ),
        );
    }
}

pub fn analysis_markdown(
    summary: &Summary,
    segmentation: Option<&Segmentation>,
    files: &[FileReport],
) -> String {
    let mut out = String::new();
    line(&mut out, "# Kill cycle analysis");
    line(&mut out, "");
    files_table(&mut out, files);
    line(&mut out, "");
    summary_section(&mut out, summary);
    if let Some(segmentation) = segmentation {
        line(&mut out, "");
        segmentation_section(&mut out, segmentation);
    }
    out
}

pub fn segmentation_markdown(segmentation: &Segmentation) -> String {
    let mut out = String::new();
    segmentation_section(&mut out, segmentation);
    out
}

pub fn segmentation_line(segmentation: &Segmentation) -> String {
    let means: Vec<String> = segmentation
        .tiers()
        .map(|g| format!("{:.3}", g.mean))
        .collect();
    format!(
        "kills={} tiers={} means=[{}]",
        segmentation.total,
        segmentation.tiers().count(),
        means.join(", ")
    )
}

pub fn export_markdown(rows: &[ExportRow]) -> String {
    let mut out = String::new();
    line(
        &mut out,
        "| Timestamp | Elapsed (s) | Cost | Loot | Multiplier | Bonus scrap |",
    );
    line(&mut out, "|---|---:|---:|---:|---:|---:|");
    for row in rows {
        line(
            &mut out,
            format!(
                "| {} | {} | {:.4} | {:.4} | {:.4} | {:.4} |",
                row.timestamp, row.elapsed_secs, row.cost, row.loot, row.multiplier, row.bonus_shrap
            ),
        );
    }
    out
}

pub fn aggregate_line(stats: &AggregateStats) -> String {
    format!(
        "events={} hits={} damage={:.1} loot={:.2} PED deaths={}",
        stats.events,
        stats.player.hits + stats.player.critical_hits,
        stats.player.damage + stats.player.critical_damage,
        stats.loot_total,
        stats.player.deaths
    )
}

pub fn aggregate_markdown(stats: &AggregateStats) -> String {
    let mut out = String::new();
    let you = &stats.player;
    let target = &stats.target;

    line(&mut out, "# Aggregate statistics");
    line(&mut out, "");
    line(&mut out, "## Combat");
    line(&mut out, "");
    line(&mut out, "| | You | Target |");
    line(&mut out, "|---|---:|---:|");
    for (name, a, b) in [
        ("Hits", you.hits, target.hits),
        ("Critical hits", you.critical_hits, target.critical_hits),
        ("Misses", you.misses, target.misses),
        ("Evades", you.evades, target.evades),
        ("Dodges", you.dodges, target.dodges),
    ] {
        line(&mut out, format!("| {name} | {a} | {b} |"));
    }
    line(
        &mut out,
        format!("| Damage | {:.1} | {:.1} |", you.damage, target.damage),
    );
    line(
        &mut out,
        format!(
            "| Critical damage | {:.1} | {:.1} |",
            you.critical_damage, target.critical_damage
        ),
    );
    line(&mut out, "");
    line(
        &mut out,
        format!(
            "Deflects {}, deaths {}, heals {} ({:.1} points), jams {}, armor pierces taken {} ({:.1}).",
            you.deflects,
            you.deaths,
            you.heals,
            you.heal_points,
            target.jams,
            target.critical_pierce,
            target.critical_pierce_damage
        ),
    );

    if !stats.skills.is_empty() {
        line(&mut out, "");
        line(&mut out, "## Skills");
        line(&mut out, "");
        line(&mut out, "| Skill | Gained |");
        line(&mut out, "|---|---:|");
        for (skill, amount) in &stats.skills {
            line(&mut out, format!("| {skill} | {amount:.4} |"));
        }
    }

    line(&mut out, "");
    line(&mut out, "## Loot");
    line(&mut out, "");
    line(&mut out, "| Item | Count | Value (PED) |");
    line(&mut out, "|---|---:|---:|");
    for (item, tally) in &stats.loot {
        line(
            &mut out,
            format!("| {} | {} | {:.4} |", item, tally.count, tally.value),
        );
    }
    line(
        &mut out,
        format!("| **Total** | | {:.4} |", stats.loot_total),
    );

    if !stats.enhancers.is_empty() {
        line(&mut out, "");
        line(&mut out, "## Broken enhancers");
        line(&mut out, "");
        for (name, count) in &stats.enhancers {
            line(&mut out, format!("- {name}: {count}"));
        }
    }

    if !stats.team.is_empty() {
        line(&mut out, "");
        line(&mut out, "## Team loot");
        for (avatar, items) in &stats.team {
            line(&mut out, "");
            line(&mut out, format!("### {avatar}"));
            line(&mut out, "");
            for (item, count) in items {
                line(&mut out, format!("- {item}: {count}"));
            }
        }
    }
    out
}

pub fn simulation_markdown(
    simulation: &Simulation,
    summary: &Summary,
    segmentation: &Segmentation,
) -> String {
    let mut out = String::new();
    line(&mut out, "# Simulated hunt");
    line(&mut out, "");
    line(
        &mut out,
        format!(
            "Efficiency {}, looter {}. Expected return {:.2}%, observed {:.2}%.",
            simulation.dataset.efficiency,
            simulation.dataset.looter_bonus,
            simulation.expected_return * 100.0,
            summary.total_return_percent()
        ),
    );
    line(&mut out, "");
    summary_section(&mut out, summary);
    line(&mut out, "");
    segmentation_section(&mut out, segmentation);
    out
}
