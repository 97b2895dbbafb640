// The draft board: search, filter, and sort over the pool for display.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::search::{search, MIN_QUERY_CHARS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Value,
    Adp,
    Name,
    #[serde(rename = "pos", alias = "position")]
    Position,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "value" => Some(SortKey::Value),
            "adp" => Some(SortKey::Adp),
            "name" => Some(SortKey::Name),
            "pos" | "position" => Some(SortKey::Position),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Value => "value",
            SortKey::Adp => "adp",
            SortKey::Name => "name",
            SortKey::Position => "pos",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display preferences for the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardView {
    pub sort_key: SortKey,
    pub direction: SortDirection,
    /// Hide players taken by other teams. The user's own picks stay visible.
    pub hide_drafted: bool,
    pub show_bye: bool,
}

impl Default for BoardView {
    fn default() -> Self {
        BoardView {
            sort_key: SortKey::Value,
            direction: SortDirection::Desc,
            hide_drafted: true,
            show_bye: true,
        }
    }
}

/// Players to show on the board.
///
/// A query of at least [`MIN_QUERY_CHARS`] characters narrows the pool to
/// search hits; shorter queries show everyone. The sort is stable, so equal
/// keys keep pool order in both directions.
pub fn board<'a>(players: &'a [Player], query: &str, view: &BoardView) -> Vec<&'a Player> {
    let mut rows: Vec<&Player> = if query.trim().chars().count() >= MIN_QUERY_CHARS {
        search(players, query)
    } else {
        players.iter().collect()
    };

    if view.hide_drafted {
        rows.retain(|p| !p.is_drafted_by_other());
    }

    rows.sort_by(|a, b| {
        let ord = compare(a, b, view.sort_key);
        match view.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    rows
}

fn compare(a: &Player, b: &Player, key: SortKey) -> Ordering {
    match key {
        SortKey::Value => a.value.total_cmp(&b.value),
        // Missing ADP sorts as negative infinity.
        SortKey::Adp => a
            .adp
            .unwrap_or(f64::NEG_INFINITY)
            .total_cmp(&b.adp.unwrap_or(f64::NEG_INFINITY)),
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Position => a.position.label().cmp(b.position.label()),
    }
}
