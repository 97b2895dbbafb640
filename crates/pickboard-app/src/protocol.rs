// Messages between the front end and the app event loop.

use std::collections::BTreeMap;
use std::path::PathBuf;

use pickboard_core::db::StatusChange;
use pickboard_football::draft::board::{BoardView, SortDirection, SortKey};
use pickboard_football::draft::player::{Player, Position};
use pickboard_football::draft::roster::RosterShape;
use pickboard_football::valuation::byes::ByeConflict;
use pickboard_football::valuation::needs::NeedVector;
use pickboard_football::valuation::pool_stats::PositionValue;
use pickboard_football::valuation::recommend::Recommendations;
use pickboard_football::valuation::slots::FilledSlots;

// ---------------------------------------------------------------------------
// Front end -> app
// ---------------------------------------------------------------------------

/// Status change requested for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Put the player on the user's roster.
    Claim,
    /// Return the player to the pool.
    Unclaim,
    /// Mark the player taken by another team.
    Draft,
    /// Flip the "taken" checkbox.
    Toggle,
}

impl PlayerAction {
    pub fn verb(&self) -> &'static str {
        match self {
            PlayerAction::Claim => "claim",
            PlayerAction::Unclaim => "unclaim",
            PlayerAction::Draft => "draft",
            PlayerAction::Toggle => "toggle",
        }
    }
}

/// Commands sent from the front end to the app event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Change one player's status. `query` is an id, a name, or a search.
    Player { action: PlayerAction, query: String },
    /// Add a hand-entered player to the top of the pool.
    AddPlayer(Player),
    /// Update roster counts, e.g. `[("QB", 1), ("FLEX", 2)]`.
    SetRoster(Vec<(String, u32)>),
    /// Replace the flex-eligible positions.
    SetFlex(Vec<String>),
    SetScarcityWeight(f64),
    Sort {
        key: SortKey,
        direction: Option<SortDirection>,
    },
    HideDrafted(bool),
    ShowBye(bool),
    /// Set the board search text. Empty clears it.
    Search(String),
    ShowBoard,
    ShowRoster,
    ShowRecommendations,
    ShowByeConflicts,
    ShowPool,
    ShowNeeds,
    ShowStatusLog,
    ImportCsv(PathBuf),
    /// Write the session to a file. `None` uses the dated default name.
    Export(Option<PathBuf>),
    Restore(PathBuf),
    /// Every player back to available.
    ResetStatuses,
    RemoveDrafted,
    Help,
    Quit,
}

// ---------------------------------------------------------------------------
// App -> front end
// ---------------------------------------------------------------------------

/// Updates pushed from the app event loop to the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum AppUpdate {
    /// Something happened; show it to the user.
    Notice(String),
    /// A command failed. State is unchanged.
    Error(String),
    Board {
        rows: Vec<Player>,
        view: BoardView,
        query: String,
    },
    Roster {
        claimed: Vec<Player>,
        roster: RosterShape,
        filled: FilledSlots,
    },
    Needs {
        roster: RosterShape,
        filled: FilledSlots,
        needs: NeedVector,
    },
    Recommendations(Recommendations),
    ByeConflicts(Vec<ByeConflict>),
    Pool {
        value_by_position: Vec<PositionValue>,
        available_by_position: BTreeMap<Position, usize>,
    },
    StatusLog(Vec<StatusChange>),
    Help,
    Exported(PathBuf),
}
