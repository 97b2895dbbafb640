// Remaining roster needs: what the user still has to draft.

use std::collections::BTreeMap;

use serde::Serialize;

use super::slots::FilledSlots;
use crate::draft::player::{Position, FIXED_POSITIONS};
use crate::draft::roster::RosterShape;

/// Unfilled slots per fixed position plus unfilled flex slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeedVector {
    pub fixed: BTreeMap<Position, u32>,
    pub flex: u32,
}

impl NeedVector {
    /// Open slots at `position`. Zero for unsupported positions.
    pub fn get(&self, position: &Position) -> u32 {
        self.fixed.get(position).copied().unwrap_or(0)
    }

    /// All open starter slots, fixed and flex. Saturates at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.fixed
            .values()
            .fold(self.flex, |acc, need| acc.saturating_add(*need))
    }

    /// Positions that still need a starter, in display order.
    pub fn open_positions(&self) -> Vec<&Position> {
        self.fixed
            .iter()
            .filter(|(_, need)| **need > 0)
            .map(|(pos, _)| pos)
            .collect()
    }
}

/// `required - filled` per slot, floored at zero.
pub fn compute_needs(filled: &FilledSlots, roster: &RosterShape) -> NeedVector {
    let fixed = FIXED_POSITIONS
        .into_iter()
        .map(|pos| {
            let need = roster.required(&pos).saturating_sub(filled.get(&pos));
            (pos, need)
        })
        .collect();

    NeedVector {
        fixed,
        flex: roster.flex_slots.saturating_sub(filled.flex),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roster_needs_everything() {
        let roster = RosterShape::default();
        let needs = compute_needs(&FilledSlots::default(), &roster);
        assert_eq!(needs.get(&Position::Quarterback), 2);
        assert_eq!(needs.get(&Position::WideReceiver), 3);
        assert_eq!(needs.flex, 2);
        assert_eq!(needs.total(), roster.starter_count());
    }

    #[test]
    fn total_saturates_on_huge_roster() {
        let mut roster = RosterShape::empty();
        roster.set("QB", u32::MAX);
        roster.set("RB", u32::MAX);
        let needs = compute_needs(&FilledSlots::default(), &roster);
        assert_eq!(needs.get(&Position::Quarterback), u32::MAX);
        assert_eq!(needs.total(), u32::MAX);
    }

    #[test]
    fn needs_never_go_negative() {
        let mut filled = FilledSlots::default();
        filled.fixed.insert(Position::Kicker, 3);
        filled.flex = 5;
        let needs = compute_needs(&filled, &RosterShape::default());
        assert_eq!(needs.get(&Position::Kicker), 0);
        assert_eq!(needs.flex, 0);
    }

    #[test]
    fn open_positions_skip_filled() {
        let roster = RosterShape {
            qb: 1,
            k: 1,
            ..RosterShape::empty()
        };
        let mut filled = FilledSlots::default();
        filled.fixed.insert(Position::Quarterback, 1);
        let needs = compute_needs(&filled, &roster);
        assert_eq!(needs.open_positions(), vec![&Position::Kicker]);
        assert_eq!(needs.get(&Position::Other("LB".into())), 0);
    }
}
