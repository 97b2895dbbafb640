// Roster needs, scarcity scoring, recommendations, and bye conflicts.
//
// Everything here is a pure function of the pool, the roster shape, the flex
// eligibility set, and the scarcity weight. Nothing is cached between calls.

pub mod byes;
pub mod needs;
pub mod pool_stats;
pub mod recommend;
pub mod scarcity;
pub mod slots;

use serde::Serialize;

use crate::draft::player::Player;
use crate::draft::roster::{FlexEligibility, RosterShape};

use byes::{find_bye_conflicts, ByeConflict};
use needs::{compute_needs, NeedVector};
use pool_stats::{pool_value_by_position, PositionValue};
use recommend::{recommend, Recommendations};
use slots::{compute_filled_slots, FilledSlots};

/// Everything derived from one state of the draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftReport {
    pub filled: FilledSlots,
    pub needs: NeedVector,
    pub recommendations: Recommendations,
    pub bye_conflicts: Vec<ByeConflict>,
    pub pool_value: Vec<PositionValue>,
    pub available_count: usize,
    pub claimed_count: usize,
}

/// Recompute the full report from scratch.
pub fn analyze(
    players: &[Player],
    roster: &RosterShape,
    flex: &FlexEligibility,
    scarcity_weight: f64,
) -> DraftReport {
    let filled = compute_filled_slots(players, roster, flex);
    let needs = compute_needs(&filled, roster);
    DraftReport {
        recommendations: recommend(players, roster, flex, scarcity_weight),
        bye_conflicts: find_bye_conflicts(players),
        pool_value: pool_value_by_position(players),
        available_count: players.iter().filter(|p| p.is_available()).count(),
        claimed_count: players.iter().filter(|p| p.is_claimed()).count(),
        filled,
        needs,
    }
}
