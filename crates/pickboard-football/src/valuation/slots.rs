// Partition the user's claimed players into fixed and flex roster slots.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::draft::player::{Player, Position, FIXED_POSITIONS};
use crate::draft::roster::{FlexEligibility, RosterShape};

/// Slots the user's claimed players currently fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilledSlots {
    /// One entry per fixed position, never above that position's requirement.
    pub fixed: BTreeMap<Position, u32>,
    /// Never above the roster's flex slot count.
    pub flex: u32,
}

impl Default for FilledSlots {
    fn default() -> Self {
        FilledSlots {
            fixed: FIXED_POSITIONS.into_iter().map(|pos| (pos, 0)).collect(),
            flex: 0,
        }
    }
}

impl FilledSlots {
    /// Filled count at `position`. Zero for unsupported positions.
    pub fn get(&self, position: &Position) -> u32 {
        self.fixed.get(position).copied().unwrap_or(0)
    }
}

/// Walk the claimed players in pool order and fill slots.
///
/// Fixed slots fill first, capped at the requirement. A flex-eligible player
/// then draws a flex slot only when the claimed count at its position
/// (counting in pool order, up to and including that player) exceeds the
/// fixed requirement. Players at unsupported positions fill nothing.
pub fn compute_filled_slots(
    players: &[Player],
    roster: &RosterShape,
    flex: &FlexEligibility,
) -> FilledSlots {
    let mut filled = FilledSlots::default();
    let claimed = || players.iter().filter(|p| p.is_claimed() && p.position.is_fixed());

    for player in claimed() {
        let required = roster.required(&player.position);
        let count = filled.fixed.entry(player.position.clone()).or_insert(0);
        if *count < required {
            *count += 1;
        }
    }

    let mut seen: HashMap<&Position, u32> = HashMap::new();
    for player in claimed() {
        let count = seen.entry(&player.position).or_insert(0);
        *count += 1;
        if filled.flex >= roster.flex_slots {
            break;
        }
        if flex.contains(&player.position) && *count > roster.required(&player.position) {
            filled.flex += 1;
        }
    }

    filled
}
