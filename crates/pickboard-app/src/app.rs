// Application state and orchestration logic.
//
// The event loop owns the one mutable session: the player pool, roster shape,
// flex eligibility, board preferences, and scarcity weight. Each command
// mutates that state, the draft report is recomputed from scratch, the session
// is written to the local cache, and updates go back to the front end.

use std::path::PathBuf;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use pickboard_core::config::{Config, MAX_SCARCITY_WEIGHT, MIN_SCARCITY_WEIGHT};
use pickboard_core::db::{Database, StatusChange};
use pickboard_football::draft::board::{board, BoardView, SortDirection, SortKey};
use pickboard_football::draft::player::Player;
use pickboard_football::draft::pool::{Pool, StatusTransition};
use pickboard_football::draft::roster::{FlexEligibility, RosterShape};
use pickboard_football::import::load_players;
use pickboard_football::search::search;
use pickboard_football::valuation::pool_stats::available_by_position;
use pickboard_football::valuation::{analyze, DraftReport};

use crate::protocol::{AppUpdate, PlayerAction, UserCommand};
use crate::snapshot::{
    default_export_file_name, read_snapshot, write_snapshot, Snapshot, SNAPSHOT_VERSION,
};

/// Key under which the latest session snapshot is cached.
pub const SNAPSHOT_CACHE_KEY: &str = "current_snapshot";

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub pool: Pool,
    pub roster: RosterShape,
    pub flex: FlexEligibility,
    pub view: BoardView,
    pub scarcity_weight: f64,
    /// Current board search text.
    pub query: String,
    /// Local cache. `None` when the database could not be opened; the session
    /// then runs without persistence.
    pub db: Option<Database>,
    /// Identifies this run in the status log.
    pub session_id: String,
}

impl AppState {
    /// Build the initial state from config defaults and an ingested pool.
    pub fn new(config: Config, players: Vec<Player>, db: Option<Database>, session_id: String) -> Self {
        let roster = RosterShape::from_config_map(&config.league.roster);
        let flex = FlexEligibility::from_labels(&config.league.flex_eligible);
        let board_defaults = &config.strategy.board;
        let view = BoardView {
            sort_key: SortKey::parse(&board_defaults.sort_key).unwrap_or_default(),
            direction: SortDirection::parse(&board_defaults.sort_direction).unwrap_or_default(),
            hide_drafted: board_defaults.hide_drafted,
            show_bye: board_defaults.show_bye,
        };
        let scarcity_weight = config.strategy.scarcity_weight;

        AppState {
            config,
            pool: Pool::new(players),
            roster,
            flex,
            view,
            scarcity_weight,
            query: String::new(),
            db,
            session_id,
        }
    }

    /// Recompute every derived value for the current state.
    pub fn report(&self) -> DraftReport {
        analyze(
            self.pool.players(),
            &self.roster,
            &self.flex,
            self.scarcity_weight,
        )
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            players: self.pool.players().to_vec(),
            roster: self.roster.clone(),
            sort_key: self.view.sort_key,
            sort_direction: self.view.direction,
            hide_drafted: self.view.hide_drafted,
            show_bye: self.view.show_bye,
            scarcity_weight: self.scarcity_weight,
            flex_eligible: self.flex.clone(),
            version: SNAPSHOT_VERSION,
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.pool = Pool::new(snapshot.players);
        self.roster = snapshot.roster;
        self.flex = snapshot.flex_eligible;
        self.view = BoardView {
            sort_key: snapshot.sort_key,
            direction: snapshot.sort_direction,
            hide_drafted: snapshot.hide_drafted,
            show_bye: snapshot.show_bye,
        };
        self.scarcity_weight = snapshot.scarcity_weight;
        self.query.clear();
    }

    /// Find a player id by exact id, then exact name (any case), then the
    /// best search hit.
    pub fn resolve_player(&self, query: &str) -> Option<String> {
        let query = query.trim();
        let players = self.pool.players();
        players
            .iter()
            .find(|p| p.id == query)
            .or_else(|| players.iter().find(|p| p.name.eq_ignore_ascii_case(query)))
            .or_else(|| search(players, query).into_iter().next())
            .map(|p| p.id.clone())
    }

    // -----------------------------------------------------------------------
    // Command handling
    // -----------------------------------------------------------------------

    /// Apply one command and return the updates to show.
    ///
    /// A failed command yields a single `AppUpdate::Error` and leaves the
    /// state unchanged.
    pub fn handle_command(&mut self, cmd: UserCommand) -> Vec<AppUpdate> {
        match cmd {
            UserCommand::Player { action, query } => self.handle_player_action(action, &query),
            UserCommand::AddPlayer(player) => {
                let name = player.name.clone();
                match self.pool.add_custom_player(player) {
                    Ok(id) => {
                        info!("Added player {} as {}", name, id);
                        self.after_change(format!("Added {name} ({id})"))
                    }
                    Err(e) => vec![AppUpdate::Error(e.to_string())],
                }
            }
            UserCommand::SetRoster(pairs) => {
                let mut ignored = Vec::new();
                for (key, count) in pairs {
                    if !self.roster.set(&key, count) {
                        ignored.push(key);
                    }
                }
                if !ignored.is_empty() {
                    warn!("Ignored unknown roster keys: {:?}", ignored);
                }
                let mut updates = self.after_change(roster_notice(&self.roster, &ignored));
                updates.push(self.needs_update());
                updates
            }
            UserCommand::SetFlex(labels) => {
                self.flex = FlexEligibility::from_labels(&labels);
                let notice = if self.flex.is_empty() {
                    info!("Flex slots disabled: no eligible positions");
                    "No positions are flex-eligible".to_string()
                } else {
                    let eligible = self.flex.labels().join(", ");
                    info!("Flex-eligible positions: {}", eligible);
                    format!("Flex-eligible: {eligible}")
                };
                self.after_change(notice)
            }
            UserCommand::SetScarcityWeight(weight) => {
                if !(MIN_SCARCITY_WEIGHT..=MAX_SCARCITY_WEIGHT).contains(&weight) {
                    return vec![AppUpdate::Error(format!(
                        "scarcity weight must be between {MIN_SCARCITY_WEIGHT} and {MAX_SCARCITY_WEIGHT}"
                    ))];
                }
                self.scarcity_weight = weight;
                self.after_change(format!("Scarcity weight set to {weight}"))
            }
            UserCommand::Sort { key, direction } => {
                self.view.sort_key = key;
                if let Some(direction) = direction {
                    self.view.direction = direction;
                }
                self.persist();
                vec![self.board_update()]
            }
            UserCommand::HideDrafted(hide) => {
                self.view.hide_drafted = hide;
                self.persist();
                vec![self.board_update()]
            }
            UserCommand::ShowBye(show) => {
                self.view.show_bye = show;
                self.persist();
                vec![self.board_update()]
            }
            UserCommand::Search(query) => {
                self.query = query.trim().to_string();
                vec![self.board_update()]
            }
            UserCommand::ShowBoard => vec![self.board_update()],
            UserCommand::ShowRoster => {
                let report = self.report();
                vec![AppUpdate::Roster {
                    claimed: self.pool.claimed().into_iter().cloned().collect(),
                    roster: self.roster.clone(),
                    filled: report.filled,
                }]
            }
            UserCommand::ShowRecommendations => {
                vec![AppUpdate::Recommendations(self.report().recommendations)]
            }
            UserCommand::ShowByeConflicts => {
                vec![AppUpdate::ByeConflicts(self.report().bye_conflicts)]
            }
            UserCommand::ShowPool => vec![AppUpdate::Pool {
                value_by_position: self.report().pool_value,
                available_by_position: available_by_position(self.pool.players()),
            }],
            UserCommand::ShowNeeds => vec![self.needs_update()],
            UserCommand::ShowStatusLog => match &self.db {
                Some(db) => match db.load_status_log(&self.session_id) {
                    Ok(log) => vec![AppUpdate::StatusLog(log)],
                    Err(e) => vec![AppUpdate::Error(format!("failed to read status log: {e:#}"))],
                },
                None => vec![AppUpdate::Error(
                    "status log unavailable: no local cache".to_string(),
                )],
            },
            UserCommand::ImportCsv(path) => match load_players(&path) {
                Ok(players) => {
                    let count = players.len();
                    self.pool = Pool::new(players);
                    self.query.clear();
                    self.after_change(format!("Imported {count} players from {}", path.display()))
                }
                Err(e) => vec![AppUpdate::Error(e.to_string())],
            },
            UserCommand::Export(path) => {
                let path = path.unwrap_or_else(|| PathBuf::from(default_export_file_name()));
                match write_snapshot(&path, &self.snapshot()) {
                    Ok(()) => {
                        info!("Exported session to {}", path.display());
                        vec![AppUpdate::Exported(path)]
                    }
                    Err(e) => vec![AppUpdate::Error(e.to_string())],
                }
            }
            UserCommand::Restore(path) => match read_snapshot(&path, &self.snapshot()) {
                Ok(snapshot) => {
                    let count = snapshot.players.len();
                    self.apply_snapshot(snapshot);
                    info!("Restored session from {}", path.display());
                    self.after_change(format!("Restored {count} players from {}", path.display()))
                }
                Err(e) => vec![AppUpdate::Error(e.to_string())],
            },
            UserCommand::ResetStatuses => {
                let changed = self.pool.clear_statuses();
                self.log_transitions(&changed);
                self.after_change(format!("Reset {} players to available", changed.len()))
            }
            UserCommand::RemoveDrafted => {
                let removed = self.pool.remove_drafted();
                self.after_change(format!("Removed {removed} drafted players"))
            }
            UserCommand::Help => vec![AppUpdate::Help],
            // Handled by the event loop.
            UserCommand::Quit => Vec::new(),
        }
    }

    fn handle_player_action(&mut self, action: PlayerAction, query: &str) -> Vec<AppUpdate> {
        let Some(id) = self.resolve_player(query) else {
            return vec![AppUpdate::Error(format!("no player matches `{query}`"))];
        };
        let result = match action {
            PlayerAction::Claim => self.pool.claim(&id),
            PlayerAction::Unclaim => self.pool.unclaim(&id),
            PlayerAction::Draft => self.pool.mark_drafted(&id),
            PlayerAction::Toggle => self.pool.toggle_drafted(&id),
        };
        match result {
            Ok(transition) => {
                info!(
                    "{}: {} {} -> {}",
                    action.verb(),
                    transition.player_name,
                    transition.from,
                    transition.to
                );
                self.log_transitions(std::slice::from_ref(&transition));
                self.after_change(format!(
                    "{}: {} -> {}",
                    transition.player_name, transition.from, transition.to
                ))
            }
            Err(e) => vec![AppUpdate::Error(e.to_string())],
        }
    }

    /// Updates sent after any change that can move the recommendations.
    fn after_change(&self, notice: String) -> Vec<AppUpdate> {
        self.persist();
        let report = self.report();
        let mut updates = vec![
            AppUpdate::Notice(notice),
            AppUpdate::Recommendations(report.recommendations),
        ];
        if !report.bye_conflicts.is_empty() {
            updates.push(AppUpdate::ByeConflicts(report.bye_conflicts));
        }
        updates
    }

    fn board_update(&self) -> AppUpdate {
        AppUpdate::Board {
            rows: board(self.pool.players(), &self.query, &self.view)
                .into_iter()
                .cloned()
                .collect(),
            view: self.view,
            query: self.query.clone(),
        }
    }

    fn needs_update(&self) -> AppUpdate {
        let report = self.report();
        AppUpdate::Needs {
            roster: self.roster.clone(),
            filled: report.filled,
            needs: report.needs,
        }
    }

    // -----------------------------------------------------------------------
    // Local cache
    // -----------------------------------------------------------------------

    /// Write the session to the local cache. Failures are logged, never fatal.
    pub fn persist(&self) {
        let Some(db) = &self.db else {
            return;
        };
        let result = serde_json::to_value(self.snapshot())
            .context("failed to serialize session snapshot")
            .and_then(|value| db.save_state(SNAPSHOT_CACHE_KEY, &value));
        match result {
            Ok(()) => debug!("Session cached ({} players)", self.pool.len()),
            Err(e) => warn!("Failed to cache session: {:#}", e),
        }
    }

    fn log_transitions(&self, transitions: &[StatusTransition]) {
        let Some(db) = &self.db else {
            return;
        };
        for t in transitions.iter().filter(|t| t.from != t.to) {
            let change = StatusChange {
                player_id: t.player_id.clone(),
                player_name: t.player_name.clone(),
                from_status: t.from.as_str().to_string(),
                to_status: t.to.as_str().to_string(),
                timestamp: None,
            };
            if let Err(e) = db.record_status_change(&change, &self.session_id) {
                warn!("Failed to record status change to DB: {:#}", e);
            }
        }
    }
}

fn roster_notice(roster: &RosterShape, ignored: &[String]) -> String {
    let mut notice = format!(
        "Roster: QB {} RB {} WR {} TE {} DST {} K {} FLEX {} BENCH {}",
        roster.qb,
        roster.rb,
        roster.wr,
        roster.te,
        roster.dst,
        roster.k,
        roster.flex_slots,
        roster.bench_slots
    );
    if !ignored.is_empty() {
        notice.push_str(&format!(" (ignored: {})", ignored.join(", ")));
    }
    notice
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens for user commands and Ctrl-C using `tokio::select!` and pushes
/// updates through `update_tx`. Exits on `Quit`, on interrupt, or when
/// either channel closes. The session is cached once more on the way out.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    update_tx: mpsc::Sender<AppUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    'events: loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        for update in state.handle_command(cmd) {
                            if update_tx.send(update).await.is_err() {
                                info!("Update channel closed, shutting down");
                                break 'events;
                            }
                        }
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            _ = &mut interrupt => {
                info!("Interrupt received, shutting down");
                break;
            }
        }
    }

    state.persist();
    info!("Application event loop exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Session recovery
// ---------------------------------------------------------------------------

/// Restore the last cached session, if any.
///
/// Returns `Ok(false)` when there is no cache or nothing cached. A cached
/// snapshot that no longer parses is an error; the caller decides whether to
/// start fresh.
pub fn restore_from_cache(state: &mut AppState) -> anyhow::Result<bool> {
    let Some(db) = &state.db else {
        return Ok(false);
    };
    let Some(value) = db.load_state(SNAPSHOT_CACHE_KEY)? else {
        info!("No cached session, starting fresh");
        return Ok(false);
    };

    let snapshot = Snapshot::from_value(value, &state.snapshot())
        .context("cached session snapshot is invalid")?;
    let claimed = snapshot.players.iter().filter(|p| p.is_claimed()).count();
    info!(
        "Session recovery: restored {} players ({} claimed) from cache",
        snapshot.players.len(),
        claimed
    );
    state.apply_snapshot(snapshot);
    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
