// Next-pick recommendations.
//
// Two views over the full available pool (never the filtered board):
// "greedy" takes the best raw value, "balanced" takes the best scarcity score.
// Ties go to the player earliest in the pool.

use serde::Serialize;

use super::needs::compute_needs;
use super::scarcity::ScarcityBoard;
use super::slots::compute_filled_slots;
use crate::draft::player::Player;
use crate::draft::roster::{FlexEligibility, RosterShape};

/// A suggested pick and the number that earned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub player: Player,
    /// Raw value for the greedy pick, scarcity score for the balanced pick.
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recommendations {
    pub greedy: Option<Recommendation>,
    pub balanced: Option<Recommendation>,
}

/// Highest-value available player.
pub fn greedy_pick(players: &[Player]) -> Option<&Player> {
    first_max_by(players.iter().filter(|p| p.is_available()), |p| p.value).map(|(p, _)| p)
}

/// Highest-scoring available player given the user's current roster.
pub fn balanced_pick<'a>(
    players: &'a [Player],
    roster: &RosterShape,
    flex: &FlexEligibility,
    scarcity_weight: f64,
) -> Option<&'a Player> {
    balanced_with_score(players, roster, flex, scarcity_weight).map(|(p, _)| p)
}

/// Both picks with their scores.
pub fn recommend(
    players: &[Player],
    roster: &RosterShape,
    flex: &FlexEligibility,
    scarcity_weight: f64,
) -> Recommendations {
    let greedy = greedy_pick(players).map(|p| Recommendation {
        player: p.clone(),
        score: p.value,
    });
    let balanced = balanced_with_score(players, roster, flex, scarcity_weight).map(
        |(p, score)| Recommendation {
            player: p.clone(),
            score,
        },
    );
    Recommendations { greedy, balanced }
}

fn balanced_with_score<'a>(
    players: &'a [Player],
    roster: &RosterShape,
    flex: &FlexEligibility,
    scarcity_weight: f64,
) -> Option<(&'a Player, f64)> {
    let filled = compute_filled_slots(players, roster, flex);
    let needs = compute_needs(&filled, roster);
    let board = ScarcityBoard::new(players, flex, &needs, scarcity_weight);
    first_max_by(players.iter().filter(|p| p.is_available()), |p| board.score(p))
}

/// Maximum by `key`, keeping the first of equal maxima.
fn first_max_by<'a, I, F>(players: I, key: F) -> Option<(&'a Player, f64)>
where
    I: Iterator<Item = &'a Player>,
    F: Fn(&Player) -> f64,
{
    let mut best: Option<(&Player, f64)> = None;
    for player in players {
        let score = key(player);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((player, score)),
        }
    }
    best
}
