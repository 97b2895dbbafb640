// End-to-end tests for the app event loop.
//
// Commands go in over the command channel exactly as the CLI sends them
// (parsed from text), and the updates coming back are checked.

use std::path::PathBuf;

use pickboard_app::app::{self, restore_from_cache, AppState};
use pickboard_app::command::parse_command;
use pickboard_app::protocol::{AppUpdate, UserCommand};
use pickboard_core::config::{ensure_config_files, load_config_from, Config};
use pickboard_core::db::Database;
use pickboard_football::draft::player::PlayerStatus;
use pickboard_football::sample::sample_pool;

use tokio::sync::mpsc;

// ===========================================================================
// Test helpers
// ===========================================================================

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Default config as written on first run.
fn default_config(dir: &std::path::Path) -> Config {
    ensure_config_files(dir).unwrap();
    load_config_from(dir).unwrap()
}

fn memory_state(name: &str) -> AppState {
    let dir = scratch_dir(name);
    let db = Database::open(":memory:").unwrap();
    AppState::new(default_config(&dir), sample_pool(), Some(db), "session_it".into())
}

async fn send_line(cmd_tx: &mpsc::Sender<UserCommand>, line: &str) {
    let cmd = parse_command(line).unwrap_or_else(|e| panic!("`{line}` did not parse: {e}"));
    cmd_tx.send(cmd).await.unwrap();
}

// ===========================================================================
// Event loop
// ===========================================================================

#[tokio::test]
async fn claim_produces_notice_then_recommendations() {
    let state = memory_state("pickboard_it_claim");
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (update_tx, mut update_rx) = mpsc::channel(64);
    let handle = tokio::spawn(app::run(cmd_rx, update_tx, state));

    send_line(&cmd_tx, "claim Christian McCaffrey").await;

    match update_rx.recv().await.unwrap() {
        AppUpdate::Notice(text) => assert!(text.contains("Christian McCaffrey")),
        other => panic!("expected notice, got {other:?}"),
    }
    match update_rx.recv().await.unwrap() {
        AppUpdate::Recommendations(recs) => {
            let greedy = recs.greedy.expect("greedy pick");
            assert_eq!(greedy.player.name, "Josh Allen");
            assert!(recs.balanced.is_some());
        }
        other => panic!("expected recommendations, got {other:?}"),
    }

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn failed_command_does_not_stop_the_loop() {
    let state = memory_state("pickboard_it_errors");
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (update_tx, mut update_rx) = mpsc::channel(64);
    let handle = tokio::spawn(app::run(cmd_rx, update_tx, state));

    send_line(&cmd_tx, "weight 75").await;
    assert!(matches!(update_rx.recv().await.unwrap(), AppUpdate::Error(_)));

    send_line(&cmd_tx, "claim nobody-by-that-name").await;
    assert!(matches!(update_rx.recv().await.unwrap(), AppUpdate::Error(_)));

    send_line(&cmd_tx, "board").await;
    match update_rx.recv().await.unwrap() {
        AppUpdate::Board { rows, .. } => assert_eq!(rows.len(), 20),
        other => panic!("expected board, got {other:?}"),
    }

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn bye_conflicts_arrive_with_the_second_claim() {
    let state = memory_state("pickboard_it_byes");
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (update_tx, mut update_rx) = mpsc::channel(64);
    let handle = tokio::spawn(app::run(cmd_rx, update_tx, state));

    send_line(&cmd_tx, "claim Justin Jefferson").await;
    // Notice + recommendations, no conflicts yet.
    update_rx.recv().await.unwrap();
    update_rx.recv().await.unwrap();

    send_line(&cmd_tx, "claim Travis Kelce").await;
    send_line(&cmd_tx, "claim Patrick Mahomes").await;
    send_line(&cmd_tx, "byes").await;
    drop(cmd_tx);

    let mut last_conflicts = None;
    while let Some(update) = update_rx.recv().await {
        if let AppUpdate::ByeConflicts(conflicts) = update {
            last_conflicts = Some(conflicts);
        }
    }
    handle.await.unwrap().unwrap();

    // Jefferson (WR), Kelce (TE), Mahomes (QB) share week 6 but no position.
    assert_eq!(last_conflicts, Some(Vec::new()));
}

#[tokio::test]
async fn closing_the_command_channel_ends_the_loop() {
    let state = memory_state("pickboard_it_close");
    let (cmd_tx, cmd_rx) = mpsc::channel::<UserCommand>(16);
    let (update_tx, _update_rx) = mpsc::channel(64);
    let handle = tokio::spawn(app::run(cmd_rx, update_tx, state));

    drop(cmd_tx);
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn quit_yields_no_updates() {
    let state = memory_state("pickboard_it_quit");
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (update_tx, mut update_rx) = mpsc::channel(64);
    let handle = tokio::spawn(app::run(cmd_rx, update_tx, state));

    send_line(&cmd_tx, "quit").await;
    handle.await.unwrap().unwrap();
    assert!(update_rx.recv().await.is_none());
}

// ===========================================================================
// Session cache across runs
// ===========================================================================

#[tokio::test]
async fn session_survives_restart() {
    let dir = scratch_dir("pickboard_it_restart");
    let db_path = dir.join("pickboard.db").display().to_string();
    let config = default_config(&dir);

    // First run: claim a player, draft another, change the weight.
    {
        let db = Database::open(&db_path).unwrap();
        let state = AppState::new(config.clone(), sample_pool(), Some(db), "run_one".into());
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (update_tx, mut update_rx) = mpsc::channel(64);
        let handle = tokio::spawn(app::run(cmd_rx, update_tx, state));

        send_line(&cmd_tx, "claim CeeDee Lamb").await;
        send_line(&cmd_tx, "draft Justin Jefferson").await;
        send_line(&cmd_tx, "weight 10").await;
        send_line(&cmd_tx, "sort adp asc").await;
        send_line(&cmd_tx, "quit").await;
        handle.await.unwrap().unwrap();
        while update_rx.recv().await.is_some() {}
    }

    // Second run starts from the sample pool and recovers the cache.
    let db = Database::open(&db_path).unwrap();
    let mut state = AppState::new(config, sample_pool(), Some(db), "run_two".into());
    assert!(restore_from_cache(&mut state).unwrap());

    assert_eq!(state.scarcity_weight, 10.0);
    assert_eq!(state.view.sort_key.as_str(), "adp");
    let status_of = |name: &str| {
        state
            .pool
            .players()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.status)
    };
    assert_eq!(status_of("CeeDee Lamb"), Some(PlayerStatus::ClaimedByUser));
    assert_eq!(status_of("Justin Jefferson"), Some(PlayerStatus::DraftedByOther));
    assert_eq!(status_of("Josh Allen"), Some(PlayerStatus::Available));

    // The status log is per session.
    let db = state.db.as_ref().unwrap();
    assert_eq!(db.load_status_log("run_one").unwrap().len(), 2);
    assert!(db.load_status_log("run_two").unwrap().is_empty());

    drop(state);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn corrupt_cache_is_reported() {
    let dir = scratch_dir("pickboard_it_corrupt");
    let db = Database::open(":memory:").unwrap();
    db.save_state(app::SNAPSHOT_CACHE_KEY, &serde_json::json!({"roster": {}}))
        .unwrap();

    let mut state = AppState::new(default_config(&dir), sample_pool(), Some(db), "s".into());
    assert!(restore_from_cache(&mut state).is_err());
    // State is untouched.
    assert_eq!(state.pool.len(), 20);

    let _ = std::fs::remove_dir_all(&dir);
}
