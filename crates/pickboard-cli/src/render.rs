// Plain-text rendering of app updates for the terminal.

use std::fmt::Write as _;

use pickboard_app::command::HELP_LINES;
use pickboard_app::protocol::AppUpdate;
use pickboard_football::draft::board::BoardView;
use pickboard_football::draft::player::{Player, PlayerStatus};
use pickboard_football::draft::roster::RosterShape;
use pickboard_football::valuation::byes::ByeConflict;
use pickboard_football::valuation::needs::NeedVector;
use pickboard_football::valuation::recommend::{Recommendation, Recommendations};
use pickboard_football::valuation::slots::FilledSlots;

/// Render one update as the text printed to stdout.
pub fn render(update: &AppUpdate) -> String {
    match update {
        AppUpdate::Notice(text) => text.clone(),
        AppUpdate::Error(text) => format!("error: {text}"),
        AppUpdate::Board { rows, view, query } => render_board(rows, view, query),
        AppUpdate::Roster {
            claimed,
            roster,
            filled,
        } => render_roster(claimed, roster, filled),
        AppUpdate::Needs {
            roster,
            filled,
            needs,
        } => render_needs(roster, filled, needs),
        AppUpdate::Recommendations(recs) => render_recommendations(recs),
        AppUpdate::ByeConflicts(conflicts) => render_bye_conflicts(conflicts),
        AppUpdate::Pool {
            value_by_position,
            available_by_position,
        } => {
            let mut out = String::from("Remaining pool\n");
            for pv in value_by_position {
                let count = available_by_position.get(&pv.position).copied().unwrap_or(0);
                let _ = writeln!(
                    out,
                    "  {:<5} {:>3} players  {:>8.1} value",
                    pv.position.label(),
                    count,
                    pv.value
                );
            }
            out.trim_end().to_string()
        }
        AppUpdate::StatusLog(changes) => {
            if changes.is_empty() {
                return "No status changes this session".to_string();
            }
            let mut out = String::new();
            for c in changes {
                let when = c.timestamp.as_deref().unwrap_or("-");
                let _ = writeln!(
                    out,
                    "{when}  {}: {} -> {}",
                    c.player_name, c.from_status, c.to_status
                );
            }
            out.trim_end().to_string()
        }
        AppUpdate::Help => {
            let width = HELP_LINES.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
            HELP_LINES
                .iter()
                .map(|(usage, what)| format!("  {usage:<width$}  {what}"))
                .collect::<Vec<_>>()
                .join("\n")
        }
        AppUpdate::Exported(path) => format!("Session saved to {}", path.display()),
    }
}

fn status_mark(status: PlayerStatus) -> &'static str {
    match status {
        PlayerStatus::Available => " ",
        PlayerStatus::DraftedByOther => "x",
        PlayerStatus::ClaimedByUser => "*",
    }
}

fn render_board(rows: &[Player], view: &BoardView, query: &str) -> String {
    let mut out = format!(
        "Board: {} players, sorted by {} {}",
        rows.len(),
        view.sort_key,
        view.direction
    );
    if !query.is_empty() {
        let _ = write!(out, ", matching \"{query}\"");
    }
    out.push('\n');

    for p in rows {
        let adp = p.adp.map(|a| format!("{a:.1}")).unwrap_or_else(|| "-".into());
        let _ = write!(
            out,
            "{} {:<24} {:<4} {:<4} {:>6.1} {:>6}",
            status_mark(p.status),
            p.name,
            p.position.label(),
            p.team,
            p.value,
            adp
        );
        if view.show_bye {
            let bye = p.bye_week.map(|b| b.to_string()).unwrap_or_else(|| "-".into());
            let _ = write!(out, "  bye {bye:>2}");
        }
        if let Some(note) = &p.injury_note {
            let _ = write!(out, "  [{note}]");
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn render_roster(claimed: &[Player], roster: &RosterShape, filled: &FilledSlots) -> String {
    let mut out = format!("My roster ({} players)\n", claimed.len());
    for (position, required) in roster.fixed_requirements() {
        let _ = writeln!(
            out,
            "  {:<5} {}/{}",
            position.label(),
            filled.get(&position),
            required
        );
    }
    let _ = writeln!(out, "  {:<5} {}/{}", "FLEX", filled.flex, roster.flex_slots);
    for p in claimed {
        let _ = writeln!(out, "  - {} ({}, {})", p.name, p.position, p.team);
    }
    out.trim_end().to_string()
}

fn render_needs(roster: &RosterShape, filled: &FilledSlots, needs: &NeedVector) -> String {
    if needs.total() == 0 {
        return "All starting slots filled".to_string();
    }
    let mut out = format!(
        "Open starting slots: {} of {}\n",
        needs.total(),
        roster.starter_count()
    );
    for position in needs.open_positions() {
        let _ = writeln!(
            out,
            "  {:<5} need {} ({}/{} filled)",
            position.label(),
            needs.get(position),
            filled.get(position),
            roster.required(position)
        );
    }
    if needs.flex > 0 {
        let _ = writeln!(
            out,
            "  {:<5} need {} ({}/{} filled)",
            "FLEX", needs.flex, filled.flex, roster.flex_slots
        );
    }
    out.trim_end().to_string()
}

fn render_pick(label: &str, pick: &Option<Recommendation>) -> String {
    match pick {
        Some(rec) => format!(
            "{label:<9} {} ({}, {})  score {:.2}",
            rec.player.name, rec.player.position, rec.player.team, rec.score
        ),
        None => format!("{label:<9} -"),
    }
}

fn render_recommendations(recs: &Recommendations) -> String {
    format!(
        "{}\n{}",
        render_pick("Greedy:", &recs.greedy),
        render_pick("Balanced:", &recs.balanced)
    )
}

fn render_bye_conflicts(conflicts: &[ByeConflict]) -> String {
    if conflicts.is_empty() {
        return "No bye-week conflicts".to_string();
    }
    conflicts
        .iter()
        .map(|c| format!("Bye week {}: {} {}s", c.bye_week, c.count, c.position.label()))
        .collect::<Vec<_>>()
        .join("\n")
}
