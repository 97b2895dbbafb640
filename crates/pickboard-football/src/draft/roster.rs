// Roster shape and flex eligibility.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::player::{Position, FIXED_POSITIONS};

/// Starter requirements for the user's team.
///
/// Serialized with the position labels as keys (`QB`, `RB`, ..., `FLEX`,
/// `BENCH`). Missing keys default to zero and unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterShape {
    #[serde(rename = "QB", default)]
    pub qb: u32,
    #[serde(rename = "RB", default)]
    pub rb: u32,
    #[serde(rename = "WR", default)]
    pub wr: u32,
    #[serde(rename = "TE", default)]
    pub te: u32,
    #[serde(rename = "DST", default)]
    pub dst: u32,
    #[serde(rename = "K", default)]
    pub k: u32,
    #[serde(rename = "FLEX", alias = "flexSlots", default)]
    pub flex_slots: u32,
    /// Informational only; never used in any calculation.
    #[serde(rename = "BENCH", alias = "benchSlots", default)]
    pub bench_slots: u32,
}

impl Default for RosterShape {
    /// Two-quarterback league with two flex spots.
    fn default() -> Self {
        RosterShape {
            qb: 2,
            rb: 2,
            wr: 3,
            te: 1,
            dst: 1,
            k: 1,
            flex_slots: 2,
            bench_slots: 6,
        }
    }
}

impl RosterShape {
    /// A roster with no slots at all.
    pub fn empty() -> Self {
        RosterShape {
            qb: 0,
            rb: 0,
            wr: 0,
            te: 0,
            dst: 0,
            k: 0,
            flex_slots: 0,
            bench_slots: 0,
        }
    }

    /// Build a roster from a config table such as league.toml `[league.roster]`.
    ///
    /// Keys absent from the table are zero. Unrecognized keys are ignored.
    pub fn from_config_map(roster_config: &HashMap<String, u32>) -> Self {
        let mut shape = RosterShape::empty();
        for (key, &count) in roster_config {
            shape.set(key, count);
        }
        shape
    }

    /// Required starters at `position`. Zero for unsupported positions.
    pub fn required(&self, position: &Position) -> u32 {
        match position {
            Position::Quarterback => self.qb,
            Position::RunningBack => self.rb,
            Position::WideReceiver => self.wr,
            Position::TightEnd => self.te,
            Position::Defense => self.dst,
            Position::Kicker => self.k,
            Position::Other(_) => 0,
        }
    }

    /// Set one count by key. Recognized keys are the fixed position labels,
    /// `FLEX`/`flexSlots`, and `BENCH`/`benchSlots`, case-insensitive.
    /// Returns `false` (and changes nothing) for any other key.
    pub fn set(&mut self, key: &str, count: u32) -> bool {
        let slot = match key.trim().to_uppercase().as_str() {
            "QB" => &mut self.qb,
            "RB" => &mut self.rb,
            "WR" => &mut self.wr,
            "TE" => &mut self.te,
            "DST" => &mut self.dst,
            "K" => &mut self.k,
            "FLEX" | "FLEXSLOTS" => &mut self.flex_slots,
            "BENCH" | "BENCHSLOTS" => &mut self.bench_slots,
            _ => return false,
        };
        *slot = count;
        true
    }

    /// `(position, required)` for every fixed position, in display order.
    pub fn fixed_requirements(&self) -> Vec<(Position, u32)> {
        FIXED_POSITIONS
            .into_iter()
            .map(|pos| {
                let required = self.required(&pos);
                (pos, required)
            })
            .collect()
    }

    /// Total starters: fixed slots plus flex slots. Bench is excluded.
    /// Saturates at `u32::MAX`.
    pub fn starter_count(&self) -> u32 {
        [self.qb, self.rb, self.wr, self.te, self.dst, self.k, self.flex_slots]
            .into_iter()
            .fold(0u32, u32::saturating_add)
    }
}

/// The set of positions that may fill a flex slot.
///
/// Only fixed positions can be members; `contains` is always `false` for
/// unsupported positions. The set iterates in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Position>", into = "Vec<Position>")]
pub struct FlexEligibility(BTreeSet<Position>);

impl Default for FlexEligibility {
    /// RB / WR / TE.
    fn default() -> Self {
        FlexEligibility::new([
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
        ])
    }
}

impl FlexEligibility {
    pub fn new(positions: impl IntoIterator<Item = Position>) -> Self {
        FlexEligibility(positions.into_iter().filter(Position::is_fixed).collect())
    }

    /// Build from labels such as league.toml `flex_eligible`. Labels that are
    /// not fixed positions are dropped.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        FlexEligibility::new(labels.iter().filter_map(|l| Position::parse_fixed(l.as_ref())))
    }

    pub fn contains(&self, position: &Position) -> bool {
        position.is_fixed() && self.0.contains(position)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Eligible position labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(Position::label).collect()
    }
}

impl From<Vec<Position>> for FlexEligibility {
    fn from(positions: Vec<Position>) -> Self {
        FlexEligibility::new(positions)
    }
}

impl From<FlexEligibility> for Vec<Position> {
    fn from(flex: FlexEligibility) -> Self {
        flex.0.into_iter().collect()
    }
}
