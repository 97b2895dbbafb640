// Configuration loading and parsing (league.toml, strategy.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_LEAGUE_TOML: &str = include_str!("../defaults/league.toml");
pub const DEFAULT_STRATEGY_TOML: &str = include_str!("../defaults/strategy.toml");

/// Position labels that may appear in `flex_eligible`.
pub const FIXED_POSITION_LABELS: &[&str] = &["QB", "RB", "WR", "TE", "DST", "K"];

pub const MIN_SCARCITY_WEIGHT: f64 = 0.0;
pub const MAX_SCARCITY_WEIGHT: f64 = 60.0;

const SORT_KEYS: &[&str] = &["value", "adp", "name", "pos"];
const SORT_DIRECTIONS: &[&str] = &["asc", "desc"];

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub strategy: StrategyConfig,
    pub db_path: String,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Raw roster table, e.g. `{"QB": 2, "RB": 2, "FLEX": 2, "BENCH": 6}`.
    /// Unrecognized keys are carried through and ignored by the roster model.
    pub roster: HashMap<String, u32>,
    #[serde(default = "default_flex_eligible")]
    pub flex_eligible: Vec<String>,
}

fn default_flex_eligible() -> Vec<String> {
    vec!["RB".into(), "WR".into(), "TE".into()]
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    scoring: ScoringSection,
    board: BoardDefaults,
    database: DatabaseSection,
    #[serde(default)]
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
struct ScoringSection {
    scarcity_weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

/// The public strategy config assembled from the strategy.toml sections.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub scarcity_weight: f64,
    pub board: BoardDefaults,
}

/// Initial board preferences. A restored session overrides these.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardDefaults {
    pub sort_key: String,
    pub sort_direction: String,
    pub hide_drafted: bool,
    pub show_bye: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataPaths {
    /// Player pool CSV. `None` means the bundled sample pool.
    #[serde(default)]
    pub players: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `league.toml` and `strategy.toml`
/// inside `config_dir`.
///
/// This does not write defaults; call `ensure_config_files()` first.
pub fn load_config_from(config_dir: &Path) -> Result<Config, ConfigError> {
    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;
    let league = league_file.league;

    // --- strategy.toml (required) ---
    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    let strategy = StrategyConfig {
        scarcity_weight: strategy_file.scoring.scarcity_weight,
        board: strategy_file.board,
    };

    let config = Config {
        league,
        strategy,
        db_path: strategy_file.database.path,
        data_paths: strategy_file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Write any missing config file in `config_dir` from the embedded defaults.
/// Existing files are never overwritten. Returns the files that were created.
pub fn ensure_config_files(config_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut written = Vec::new();

    for (file_name, content) in [
        ("league.toml", DEFAULT_LEAGUE_TOML),
        ("strategy.toml", DEFAULT_STRATEGY_TOML),
    ] {
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                std::io::Write::write_all(&mut dest, content.as_bytes()).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                info!("Wrote default config {}", target.display());
                written.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!("Keeping existing config {}", target.display());
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(written)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let weight = config.strategy.scarcity_weight;
    if !weight.is_finite() || !(MIN_SCARCITY_WEIGHT..=MAX_SCARCITY_WEIGHT).contains(&weight) {
        return Err(ConfigError::ValidationError {
            field: "scoring.scarcity_weight".into(),
            message: format!(
                "must be between {MIN_SCARCITY_WEIGHT} and {MAX_SCARCITY_WEIGHT} inclusive, got {weight}"
            ),
        });
    }

    for label in &config.league.flex_eligible {
        let upper = label.trim().to_uppercase();
        if !FIXED_POSITION_LABELS.contains(&upper.as_str()) {
            return Err(ConfigError::ValidationError {
                field: "league.flex_eligible".into(),
                message: format!(
                    "unknown position `{label}`, expected one of {}",
                    FIXED_POSITION_LABELS.join(", ")
                ),
            });
        }
    }

    let board = &config.strategy.board;
    if !SORT_KEYS.contains(&board.sort_key.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "board.sort_key".into(),
            message: format!("must be one of {}, got `{}`", SORT_KEYS.join(", "), board.sort_key),
        });
    }
    if !SORT_DIRECTIONS.contains(&board.sort_direction.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "board.sort_direction".into(),
            message: format!("must be asc or desc, got `{}`", board.sort_direction),
        });
    }

    if config.db_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "database.path".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
