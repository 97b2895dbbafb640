// Bye-week conflicts on the user's roster.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::draft::player::{Player, Position};

/// Two or more claimed players at one position sharing a bye week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ByeConflict {
    pub position: Position,
    pub bye_week: u32,
    pub count: u32,
}

/// Group every claimed player with a bye by (position, week) and keep the
/// groups of two or more, ordered by week and then position label.
///
/// Bench players count too; the roster shape is not consulted.
pub fn find_bye_conflicts(players: &[Player]) -> Vec<ByeConflict> {
    let mut groups: BTreeMap<(u32, &str), (&Position, u32)> = BTreeMap::new();
    for player in players.iter().filter(|p| p.is_claimed()) {
        let Some(week) = player.bye_week else {
            continue;
        };
        let entry = groups
            .entry((week, player.position.label()))
            .or_insert((&player.position, 0));
        entry.1 += 1;
    }

    groups
        .into_iter()
        .filter(|(_, (_, count))| *count >= 2)
        .map(|((bye_week, _), (position, count))| ByeConflict {
            position: position.clone(),
            bye_week,
            count,
        })
        .collect()
}
