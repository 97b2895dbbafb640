// Player records, positions, and draft status.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Team code used for players added by hand without a team.
pub const FREE_AGENT_TEAM: &str = "FA";

/// Football positions.
///
/// The six fixed positions are the only ones a roster can require. Any other
/// label survives import as `Other` so the player stays on the board, but it
/// never fills a roster slot (fixed or flex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Defense,
    Kicker,
    Other(String),
}

/// Fixed positions in display order.
pub const FIXED_POSITIONS: [Position; 6] = [
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
    Position::Defense,
    Position::Kicker,
];

impl Position {
    /// Parse a position label. Case and surrounding whitespace are ignored.
    /// Unrecognized labels become `Position::Other` with the uppercased text.
    pub fn parse(s: &str) -> Self {
        let upper = s.trim().to_uppercase();
        match upper.as_str() {
            "QB" => Position::Quarterback,
            "RB" => Position::RunningBack,
            "WR" => Position::WideReceiver,
            "TE" => Position::TightEnd,
            "DST" => Position::Defense,
            "K" => Position::Kicker,
            _ => Position::Other(upper),
        }
    }

    /// Parse a label, returning `None` unless it names a fixed position.
    pub fn parse_fixed(s: &str) -> Option<Self> {
        let pos = Self::parse(s);
        pos.is_fixed().then_some(pos)
    }

    /// Return the display label for this position.
    pub fn label(&self) -> &str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Defense => "DST",
            Position::Kicker => "K",
            Position::Other(label) => label,
        }
    }

    /// Whether this is one of the six roster positions.
    pub fn is_fixed(&self) -> bool {
        !matches!(self, Position::Other(_))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<String> for Position {
    fn from(s: String) -> Self {
        Position::parse(&s)
    }
}

impl From<Position> for String {
    fn from(pos: Position) -> Self {
        pos.label().to_string()
    }
}

/// Where a player stands in the draft. Any status may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerStatus {
    #[default]
    #[serde(rename = "available")]
    Available,
    /// Taken by another team.
    #[serde(rename = "drafted", alias = "draftedByOther")]
    DraftedByOther,
    /// Taken by the user.
    #[serde(rename = "claimed", alias = "claimedByUser")]
    ClaimedByUser,
}

impl PlayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerStatus::Available => "available",
            PlayerStatus::DraftedByOther => "drafted",
            PlayerStatus::ClaimedByUser => "claimed",
        }
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A player in the draft pool.
///
/// Field names on the wire follow the session file format (`pos`, `bye`,
/// `injury`); the longer names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(rename = "pos", alias = "position")]
    pub position: Position,
    #[serde(default)]
    pub team: String,
    #[serde(rename = "bye", alias = "byeWeek", default, deserialize_with = "positive_bye")]
    pub bye_week: Option<u32>,
    /// Composite rating supplied by the user. Higher is better.
    #[serde(default, deserialize_with = "lenient_value")]
    pub value: f64,
    /// Average draft position. Lower is earlier.
    #[serde(default)]
    pub adp: Option<f64>,
    #[serde(rename = "injury", alias = "injuryNote", default, deserialize_with = "non_empty")]
    pub injury_note: Option<String>,
    #[serde(default)]
    pub status: PlayerStatus,
}

impl Player {
    /// Create an available player with no bye, ADP, or injury note.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        team: impl Into<String>,
        value: f64,
    ) -> Self {
        Player {
            id: id.into(),
            name: name.into(),
            position,
            team: team.into(),
            bye_week: None,
            value,
            adp: None,
            injury_note: None,
            status: PlayerStatus::Available,
        }
    }

    pub fn with_bye(mut self, bye_week: u32) -> Self {
        self.bye_week = (bye_week > 0).then_some(bye_week);
        self
    }

    pub fn with_adp(mut self, adp: f64) -> Self {
        self.adp = Some(adp);
        self
    }

    pub fn with_injury(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.injury_note = (!note.trim().is_empty()).then_some(note);
        self
    }

    pub fn with_status(mut self, status: PlayerStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_available(&self) -> bool {
        self.status == PlayerStatus::Available
    }

    pub fn is_claimed(&self) -> bool {
        self.status == PlayerStatus::ClaimedByUser
    }

    pub fn is_drafted_by_other(&self) -> bool {
        self.status == PlayerStatus::DraftedByOther
    }
}

/// Session files written by older builds store "no bye" as `null` or `0`.
fn positive_bye<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<u32> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|&week| week > 0))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// A value that is missing, non-numeric, or non-finite reads as 0.
/// Negative values are clamped to 0.
fn lenient_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawValue> = Option::deserialize(deserializer)?;
    let value = match raw {
        Some(RawValue::Number(v)) => v,
        Some(RawValue::Text(text)) => text.trim().parse().unwrap_or(0.0),
        Some(RawValue::Other(_)) | None => 0.0,
    };
    Ok(if value.is_finite() { value.max(0.0) } else { 0.0 })
}

/// Blank injury notes are stored as `""`; treat them as absent.
fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Build an id for a hand-added player: `{name}-{team}-{suffix}` where the
/// suffix is five base-36 characters derived from `salt`.
pub fn custom_player_id(name: &str, team: &str, salt: u64) -> String {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = salt;
    let mut suffix = String::with_capacity(5);
    for _ in 0..5 {
        suffix.push(ALPHABET[(n % 36) as usize] as char);
        n /= 36;
    }
    format!("{name}-{team}-{suffix}")
}
