// Scarcity-adjusted scoring for available players.
//
// A player's score is their value plus a bonus that grows as their position
// thins out, is damped when the roster already has that position covered, and
// gets a small lift while flex slots are open.

use std::collections::HashMap;

use crate::draft::player::{Player, Position};
use crate::draft::roster::FlexEligibility;
use crate::valuation::needs::NeedVector;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Need weight while the player's position still has an open starter slot.
pub const NEED_WEIGHT_OPEN: f64 = 1.0;

/// Need weight once the position is covered, or for unsupported positions.
pub const NEED_WEIGHT_FILLED: f64 = 0.4;

/// Boost applied to flex-eligible players while flex slots are open.
pub const FLEX_BOOST: f64 = 0.5;

/// Scale of the flex boost relative to the scarcity term.
pub const FLEX_BOOST_SCALE: f64 = 0.1;

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score one available player against the rest of the pool.
///
/// ```text
/// score = value + weight * need_weight * (1 / (1 + available_at_pos) + flex_boost * 0.1)
/// ```
pub fn score_available(
    player: &Player,
    players: &[Player],
    flex: &FlexEligibility,
    needs: &NeedVector,
    scarcity_weight: f64,
) -> f64 {
    let available_at_pos = players
        .iter()
        .filter(|p| p.is_available() && p.position == player.position)
        .count();
    score_with_count(player, available_at_pos, flex, needs, scarcity_weight)
}

fn score_with_count(
    player: &Player,
    available_at_pos: usize,
    flex: &FlexEligibility,
    needs: &NeedVector,
    scarcity_weight: f64,
) -> f64 {
    let need_weight = if needs.get(&player.position) > 0 {
        NEED_WEIGHT_OPEN
    } else {
        NEED_WEIGHT_FILLED
    };
    let scarcity = 1.0 / (1.0 + available_at_pos as f64);
    let flex_boost = if flex.contains(&player.position) && needs.flex > 0 {
        FLEX_BOOST
    } else {
        0.0
    };
    player.value + scarcity_weight * need_weight * (scarcity + flex_boost * FLEX_BOOST_SCALE)
}

// ---------------------------------------------------------------------------
// Batch scoring
// ---------------------------------------------------------------------------

/// Scores a whole pool with the per-position available counts taken once.
///
/// Produces exactly the numbers [`score_available`] would.
pub struct ScarcityBoard<'a> {
    available: HashMap<&'a Position, usize>,
    flex: &'a FlexEligibility,
    needs: &'a NeedVector,
    scarcity_weight: f64,
}

impl<'a> ScarcityBoard<'a> {
    pub fn new(
        players: &'a [Player],
        flex: &'a FlexEligibility,
        needs: &'a NeedVector,
        scarcity_weight: f64,
    ) -> Self {
        let mut available = HashMap::new();
        for player in players.iter().filter(|p| p.is_available()) {
            *available.entry(&player.position).or_insert(0) += 1;
        }
        ScarcityBoard {
            available,
            flex,
            needs,
            scarcity_weight,
        }
    }

    /// Available players at `position`.
    pub fn available_at(&self, position: &Position) -> usize {
        self.available.get(position).copied().unwrap_or(0)
    }

    pub fn score(&self, player: &Player) -> f64 {
        score_with_count(
            player,
            self.available_at(&player.position),
            self.flex,
            self.needs,
            self.scarcity_weight,
        )
    }
}
