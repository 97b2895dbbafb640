// Versioned session snapshots: export, import, and the local cache format.
//
// Import is forgiving. Only `players` is required; any other field that is
// missing or has the wrong type keeps the value from the running session.

use std::path::Path;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use pickboard_core::config::{MAX_SCARCITY_WEIGHT, MIN_SCARCITY_WEIGHT};
use pickboard_football::draft::board::{SortDirection, SortKey};
use pickboard_football::draft::player::Player;
use pickboard_football::draft::pool::Pool;
use pickboard_football::draft::roster::{FlexEligibility, RosterShape};

/// Snapshot format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to access snapshot file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid snapshot: expected a JSON object")]
    NotAnObject,

    #[error("invalid snapshot: missing `players`")]
    MissingPlayers,

    #[error("invalid snapshot: `players` is malformed: {0}")]
    InvalidPlayers(serde_json::Error),

    #[error("invalid snapshot: duplicate player id `{0}`")]
    DuplicatePlayerId(String),

    #[error("unsupported snapshot version {0} (newest supported is {SNAPSHOT_VERSION})")]
    UnsupportedVersion(u64),
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything needed to resume a draft session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub roster: RosterShape,
    pub sort_key: SortKey,
    #[serde(rename = "sortDir")]
    pub sort_direction: SortDirection,
    pub hide_drafted: bool,
    pub show_bye: bool,
    #[serde(rename = "scarcityAlpha")]
    pub scarcity_weight: f64,
    pub flex_eligible: FlexEligibility,
    pub version: u32,
}

impl Snapshot {
    /// Parse snapshot JSON text. Fields other than `players` fall back to
    /// `current` when missing or mistyped.
    pub fn from_json_str(text: &str, current: &Snapshot) -> Result<Snapshot, SnapshotError> {
        let value: Value = serde_json::from_str(text)?;
        Snapshot::from_value(value, current)
    }

    /// Like [`Snapshot::from_json_str`] for an already parsed value.
    pub fn from_value(value: Value, current: &Snapshot) -> Result<Snapshot, SnapshotError> {
        let Value::Object(mut obj) = value else {
            return Err(SnapshotError::NotAnObject);
        };

        if let Some(version) = obj.get("version").and_then(Value::as_u64) {
            if version > u64::from(SNAPSHOT_VERSION) {
                return Err(SnapshotError::UnsupportedVersion(version));
            }
        }

        let players_value = match obj.remove("players") {
            Some(Value::Null) | None => return Err(SnapshotError::MissingPlayers),
            Some(v) => v,
        };
        let players: Vec<Player> =
            serde_json::from_value(players_value).map_err(SnapshotError::InvalidPlayers)?;
        if let Some(dup) = Pool::new(players.clone()).first_duplicate_id() {
            return Err(SnapshotError::DuplicatePlayerId(dup.to_string()));
        }

        let scarcity_weight = optional_field::<f64>(&obj, "scarcityAlpha")
            .filter(|w| {
                let ok = w.is_finite() && (MIN_SCARCITY_WEIGHT..=MAX_SCARCITY_WEIGHT).contains(w);
                if !ok {
                    warn!("snapshot scarcityAlpha {} out of range, keeping current", w);
                }
                ok
            })
            .unwrap_or(current.scarcity_weight);

        Ok(Snapshot {
            players,
            roster: optional_field(&obj, "roster").unwrap_or_else(|| current.roster.clone()),
            sort_key: optional_field(&obj, "sortKey").unwrap_or(current.sort_key),
            sort_direction: optional_field(&obj, "sortDir").unwrap_or(current.sort_direction),
            hide_drafted: optional_field(&obj, "hideDrafted").unwrap_or(current.hide_drafted),
            show_bye: optional_field(&obj, "showBye").unwrap_or(current.show_bye),
            scarcity_weight,
            flex_eligible: optional_field(&obj, "flexEligible")
                .unwrap_or_else(|| current.flex_eligible.clone()),
            version: SNAPSHOT_VERSION,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read `key` from the snapshot object. Missing or `null` is `None`; a value
/// of the wrong type is logged and also `None`.
fn optional_field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => match serde_json::from_value(v.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("ignoring snapshot field `{}`: {}", key, e);
                None
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// `draft-session-YYYY-MM-DD.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("draft-session-{}.json", date.format("%Y-%m-%d"))
}

/// Export file name for today's UTC date.
pub fn default_export_file_name() -> String {
    export_file_name(chrono::Utc::now().date_naive())
}

pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let text = snapshot.to_json_pretty()?;
    std::fs::write(path, text).map_err(|e| SnapshotError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

pub fn read_snapshot(path: &Path, current: &Snapshot) -> Result<Snapshot, SnapshotError> {
    let text = std::fs::read_to_string(path).map_err(|e| SnapshotError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Snapshot::from_json_str(&text, current)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
