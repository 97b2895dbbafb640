// Summary statistics over what is still available.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::draft::player::{Player, Position, FIXED_POSITIONS};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionValue {
    pub position: Position,
    pub value: f64,
}

/// Available players per position, unsupported positions included.
pub fn available_by_position(players: &[Player]) -> BTreeMap<Position, usize> {
    let mut counts = BTreeMap::new();
    for player in players.iter().filter(|p| p.is_available()) {
        *counts.entry(player.position.clone()).or_insert(0) += 1;
    }
    counts
}

/// Summed value of available players at each fixed position, in display
/// order. Positions with nobody left report zero.
pub fn pool_value_by_position(players: &[Player]) -> Vec<PositionValue> {
    FIXED_POSITIONS
        .into_iter()
        .map(|position| {
            let value = players
                .iter()
                .filter(|p| p.is_available() && p.position == position)
                .map(|p| p.value)
                .sum();
            PositionValue { position, value }
        })
        .collect()
}
