// Player pool import from CSV.
//
// Expected header: name,pos,team,bye,value,adp,injury (the longer names
// position/byeWeek/injuryNote are accepted too). Numbers that are blank or
// unparseable fall back to defaults; rows without a name are skipped.

use std::io::Read;
use std::path::Path;

use pickboard_core::config::Config;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::draft::player::{Player, PlayerStatus, Position};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} has no `{column}` column")]
    MissingColumn { path: String, column: &'static str },
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

/// Every field is optional text so one bad cell never drops the whole row.
#[derive(Debug, Default, Deserialize)]
struct RawPlayerRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "position")]
    pos: Option<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default, alias = "byeWeek")]
    bye: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    adp: Option<String>,
    #[serde(default, alias = "injuryNote")]
    injury: Option<String>,
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_number(field: &Option<String>) -> Option<f64> {
    non_blank(field)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn parse_bye(field: &Option<String>) -> Option<u32> {
    parse_number(field)
        .filter(|n| *n >= 1.0 && n.fract() == 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32)
}

fn parse_value(name: &str, field: &Option<String>) -> f64 {
    match parse_number(field) {
        Some(v) if v < 0.0 => {
            warn!("player '{}': negative value {} clamped to 0", name, v);
            0.0
        }
        Some(v) => v,
        None => {
            if non_blank(field).is_some() {
                debug!("player '{}': unparseable value, using 0", name);
            }
            0.0
        }
    }
}

impl RawPlayerRow {
    fn into_player(self, row_index: usize) -> Option<Player> {
        let Some(name) = non_blank(&self.name).map(str::to_string) else {
            warn!("skipping CSV row {}: empty name", row_index + 1);
            return None;
        };
        let team = non_blank(&self.team).unwrap_or_default().to_uppercase();
        let position = Position::parse(non_blank(&self.pos).unwrap_or_default());
        if !position.is_fixed() {
            warn!(
                "player '{}': unsupported position '{}' will not fill roster slots",
                name,
                position.label()
            );
        }

        Some(Player {
            id: format!("{name}-{team}-{row_index}"),
            bye_week: parse_bye(&self.bye),
            value: parse_value(&name, &self.value),
            adp: parse_number(&self.adp),
            injury_note: non_blank(&self.injury).map(str::to_string),
            status: PlayerStatus::Available,
            name,
            position,
            team,
        })
    }
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_players_from_reader<R: Read>(rdr: R, source: &str) -> Result<Vec<Player>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr);

    let csv_err = |e: csv::Error| ImportError::Csv {
        path: source.to_string(),
        source: e,
    };

    let headers = reader.headers().map_err(csv_err)?;
    if !headers.iter().any(|h| h == "name") {
        return Err(ImportError::MissingColumn {
            path: source.to_string(),
            column: "name",
        });
    }

    let mut players = Vec::new();
    for (row_index, result) in reader.deserialize::<RawPlayerRow>().enumerate() {
        match result {
            Ok(raw) => {
                if let Some(player) = raw.into_player(row_index) {
                    players.push(player);
                }
            }
            Err(e) => {
                warn!("skipping malformed CSV row {}: {}", row_index + 1, e);
            }
        }
    }
    Ok(players)
}

// ---------------------------------------------------------------------------
// Public loaders
// ---------------------------------------------------------------------------

/// Parse players from CSV text already in memory.
pub fn parse_players_csv(text: &str) -> Result<Vec<Player>, ImportError> {
    load_players_from_reader(text.trim().as_bytes(), "<inline>")
}

/// Load players from a CSV file.
pub fn load_players(path: &Path) -> Result<Vec<Player>, ImportError> {
    let file = std::fs::File::open(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let players = load_players_from_reader(file, &path.display().to_string())?;
    info!("Loaded {} players from {}", players.len(), path.display());
    Ok(players)
}

/// Load the pool named by `[data_paths] players`, if one is configured.
pub fn load_configured_pool(config: &Config) -> Result<Option<Vec<Player>>, ImportError> {
    match &config.data_paths.players {
        Some(path) => load_players(Path::new(path)).map(Some),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_row_is_parsed() {
        let csv_data = "\
name,pos,team,bye,value,adp,injury
Josh Allen,qb,buf,13,98,4,Questionable";
        let players = parse_players_csv(csv_data).unwrap();
        assert_eq!(players.len(), 1);
        let p = &players[0];
        assert_eq!(p.id, "Josh Allen-BUF-0");
        assert_eq!(p.position, Position::Quarterback);
        assert_eq!(p.team, "BUF");
        assert_eq!(p.bye_week, Some(13));
        assert_eq!(p.value, 98.0);
        assert_eq!(p.adp, Some(4.0));
        assert_eq!(p.injury_note.as_deref(), Some("Questionable"));
        assert_eq!(p.status, PlayerStatus::Available);
    }

    #[test]
    fn blank_and_bad_numbers_use_defaults() {
        let csv_data = "\
name,pos,team,bye,value,adp,injury
Nobody,WR,FA,,abc,,
Zero Bye,RB,SF,0,12.5,n/a,";
        let players = parse_players_csv(csv_data).unwrap();
        assert_eq!(players[0].bye_week, None);
        assert_eq!(players[0].value, 0.0);
        assert_eq!(players[0].adp, None);
        assert_eq!(players[0].injury_note, None);
        assert_eq!(players[1].bye_week, None);
        assert_eq!(players[1].value, 12.5);
        assert_eq!(players[1].adp, None);
    }

    #[test]
    fn empty_name_rows_are_skipped_but_keep_row_index() {
        let csv_data = "\
name,pos,team,bye,value,adp,injury
,QB,BUF,13,98,4,
Jalen Hurts,QB,PHI,10,95,5,";
        let players = parse_players_csv(csv_data).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, "Jalen Hurts-PHI-1");
    }

    #[test]
    fn long_column_names_are_accepted() {
        let csv_data = "\
name,position,team,byeWeek,value,adp,injuryNote
Travis Kelce,TE,KC,6,80,22,ankle";
        let players = parse_players_csv(csv_data).unwrap();
        assert_eq!(players[0].position, Position::TightEnd);
        assert_eq!(players[0].bye_week, Some(6));
        assert_eq!(players[0].injury_note.as_deref(), Some("ankle"));
    }

    #[test]
    fn negative_value_is_clamped() {
        let csv_data = "\
name,pos,team,bye,value,adp,injury
Bust,RB,NYG,11,-5,,";
        let players = parse_players_csv(csv_data).unwrap();
        assert_eq!(players[0].value, 0.0);
    }

    #[test]
    fn unknown_position_is_kept() {
        let csv_data = "\
name,pos,team,bye,value,adp,injury
Fred Warner,lb,SF,9,40,,";
        let players = parse_players_csv(csv_data).unwrap();
        assert_eq!(players[0].position, Position::Other("LB".into()));
    }

    #[test]
    fn short_rows_are_tolerated() {
        let csv_data = "\
name,pos,team,bye,value,adp,injury
Short Row,K,CIN";
        let players = parse_players_csv(csv_data).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].value, 0.0);
    }

    #[test]
    fn missing_name_column_is_an_error() {
        let err = parse_players_csv("player,pos\nX,QB").unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn { column: "name", .. }));
    }

    #[test]
    fn header_only_returns_empty_vec() {
        let players = parse_players_csv("name,pos,team,bye,value,adp,injury").unwrap();
        assert!(players.is_empty());
    }

    #[test]
    fn load_players_reports_missing_file() {
        let path = std::env::temp_dir().join("pickboard_no_such_players.csv");
        let err = load_players(&path).unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
    }

    #[test]
    fn load_players_reads_file() {
        let dir = std::env::temp_dir().join("pickboard_import_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("players.csv");
        std::fs::write(&path, "name,pos,team\nEvan McPherson,K,CIN\n").unwrap();

        let players = load_players(&path).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].position, Position::Kicker);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
