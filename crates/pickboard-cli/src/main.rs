// pickboard entry point.
//
// Startup sequence:
// 1. Parse arguments, initialize tracing (log to file, not terminal)
// 2. Load config, writing defaults on first run
// 3. Open the session cache (best effort)
// 4. Load the player pool
// 5. Build AppState, restore a snapshot or the cached session
// 6. Spawn the app loop and the stdin reader
// 7. Print updates until the app loop exits

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use pickboard_app::app::{self, restore_from_cache, AppState};
use pickboard_app::protocol::UserCommand;
use pickboard_app::snapshot::read_snapshot;
use pickboard_cli::input::{block_on_with_grace, forward_lines};
use pickboard_cli::render::render;
use pickboard_core::config::{ensure_config_files, load_config_from};
use pickboard_core::db::Database;
use pickboard_core::paths::resolve_db_path;
use pickboard_football::import::{load_configured_pool, load_players};
use pickboard_football::sample::sample_pool;

/// How long runtime shutdown waits on blocking tasks (the stdin reader).
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "pickboard")]
#[command(about = "Draft-day board with roster needs and scarcity-aware picks")]
#[command(version)]
struct Cli {
    /// Directory holding league.toml and strategy.toml
    #[arg(long, env = "PICKBOARD_CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    /// Directory for the session cache (default: per-user data directory)
    #[arg(long, env = "PICKBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Load the player pool from this CSV instead of the configured one
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Start from a saved session file
    #[arg(long, conflicts_with = "csv")]
    snapshot: Option<PathBuf>,

    /// Discard the cached session and status log
    #[arg(long)]
    fresh: bool,

    /// Directory for pickboard.log
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    block_on_with_grace(run(cli), SHUTDOWN_GRACE)?
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // 1. Tracing
    init_tracing(&cli.log_dir)?;
    info!("pickboard starting up");

    // 2. Config
    let created = ensure_config_files(&cli.config_dir)
        .with_context(|| format!("failed to prepare config in {}", cli.config_dir.display()))?;
    for path in &created {
        println!("Wrote default config {}", path.display());
    }
    let config = load_config_from(&cli.config_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, scarcity weight {}",
        config.league.name, config.strategy.scarcity_weight
    );

    // 3. Session cache
    let db = open_cache(&config.db_path, cli.data_dir.as_deref());
    if cli.fresh {
        if let Some(db) = &db {
            db.clear_all().context("failed to clear the session cache")?;
            info!("Session cache cleared (--fresh)");
        }
    }
    let resume = !cli.fresh && cli.csv.is_none() && cli.snapshot.is_none();
    let session_id = session_id_for(db.as_ref(), resume);
    info!("Session id {}", session_id);

    // 4. Player pool
    let players = match &cli.csv {
        Some(path) => load_players(path)
            .with_context(|| format!("failed to import {}", path.display()))?,
        None => match load_configured_pool(&config).context("failed to load configured pool")? {
            Some(players) => players,
            None => {
                info!("No player CSV configured, using the sample pool");
                sample_pool()
            }
        },
    };

    // 5. App state
    let mut state = AppState::new(config, players, db, session_id);
    if let Some(path) = &cli.snapshot {
        let snapshot = read_snapshot(path, &state.snapshot())
            .with_context(|| format!("failed to restore {}", path.display()))?;
        state.apply_snapshot(snapshot);
        info!("Session restored from {}", path.display());
    } else if resume {
        match restore_from_cache(&mut state) {
            Ok(true) => {
                let changes = state
                    .db
                    .as_ref()
                    .map(|db| db.status_change_count(&state.session_id))
                    .transpose()
                    .unwrap_or_else(|e| {
                        warn!("Failed to count status changes: {:#}", e);
                        None
                    })
                    .unwrap_or(0);
                println!("Resumed the previous session ({changes} status changes so far)");
            }
            Ok(false) => {}
            Err(e) => {
                warn!("Session recovery failed, starting fresh: {:#}", e);
                println!("Could not resume the previous session; starting fresh");
            }
        }
    }
    println!(
        "{} players loaded. Type `help` for commands.",
        state.pool.len()
    );

    // 6. Channels and tasks
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (update_tx, mut update_rx) = mpsc::channel(256);

    cmd_tx
        .send(UserCommand::ShowRecommendations)
        .await
        .context("app loop closed before startup")?;

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, update_tx, state).await {
            error!("Application loop error: {:#}", e);
        }
    });

    let input_handle = tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        let result = forward_lines(stdin, cmd_tx, |line, e| {
            eprintln!("error: {e} (in `{line}`)");
        })
        .await;
        if let Err(e) = result {
            error!("Input reader error: {:#}", e);
        }
    });

    // 7. Print until the app loop drops its sender
    while let Some(update) = update_rx.recv().await {
        println!("{}", render(&update));
    }

    input_handle.abort();
    let _ = tokio::time::timeout(Duration::from_secs(5), app_handle).await;

    info!("pickboard shut down cleanly");
    Ok(())
}

/// Open the SQLite cache. Failure is logged and the session runs uncached.
fn open_cache(configured: &str, data_dir: Option<&Path>) -> Option<Database> {
    let path = resolve_db_path(configured, data_dir);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!("Cannot create data directory {}: {}", parent.display(), e);
        }
    }
    let path_text = path.display().to_string();
    match Database::open(&path_text) {
        Ok(db) => Some(db),
        Err(e) => {
            warn!("Running without a session cache: {:#}", e);
            println!("Session cache unavailable; changes will not be remembered");
            None
        }
    }
}

/// Reuse the stored session id when resuming, otherwise start a new one.
fn session_id_for(db: Option<&Database>, resume: bool) -> String {
    let Some(db) = db else {
        return Database::generate_session_id();
    };
    if resume {
        match db.get_session_id() {
            Ok(Some(id)) => return id,
            Ok(None) => {}
            Err(e) => warn!("Failed to read session id: {:#}", e),
        }
    }
    let id = Database::generate_session_id();
    if let Err(e) = db.set_session_id(&id) {
        warn!("Failed to store session id: {:#}", e);
    }
    id
}

/// Initialize tracing to log to a file (not the terminal, which carries the
/// command loop).
fn init_tracing(log_dir: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_file = std::fs::File::create(log_dir.join("pickboard.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pickboard=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
