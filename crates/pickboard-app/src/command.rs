// Line-oriented command parsing for the interactive front end.

use std::path::PathBuf;

use thiserror::Error;

use pickboard_football::draft::board::{SortDirection, SortKey};
use pickboard_football::draft::player::Player;
use pickboard_football::import::parse_players_csv;

use crate::protocol::{PlayerAction, UserCommand};

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),

    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("`{command}`: invalid {what} `{value}`")]
    InvalidArgument {
        command: &'static str,
        what: &'static str,
        value: String,
    },
}

/// One-line summaries shown by `help`.
pub const HELP_LINES: &[(&str, &str)] = &[
    ("claim <player>", "put a player on your roster"),
    ("unclaim <player>", "return a player to the pool"),
    ("draft <player>", "mark a player taken by another team"),
    ("toggle <player>", "flip the taken checkbox"),
    ("add name,pos,team,bye,value,adp", "add a player by hand"),
    ("roster KEY=n ...", "set roster counts (QB RB WR TE DST K FLEX BENCH)"),
    ("flex POS,POS,...", "set flex-eligible positions"),
    ("weight <0-60>", "set the scarcity weight"),
    ("sort <value|adp|name|pos> [asc|desc]", "sort the board"),
    ("hide <on|off>", "hide players taken by other teams"),
    ("bye <on|off>", "show bye weeks on the board"),
    ("search [text]", "filter the board (empty clears)"),
    ("board", "show the board"),
    ("mine", "show your roster"),
    ("recs", "show the greedy and balanced picks"),
    ("byes", "show bye-week conflicts"),
    ("pool", "show remaining value by position"),
    ("needs", "show open roster slots"),
    ("log", "show status changes this session"),
    ("import <file.csv>", "replace the pool from a CSV file"),
    ("export [file.json]", "save the session"),
    ("restore <file.json>", "load a saved session"),
    ("reset", "mark every player available"),
    ("remove-drafted", "drop players taken by other teams"),
    ("help", "show this list"),
    ("quit", "exit"),
];

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<UserCommand, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    if verb.is_empty() {
        return Err(CommandError::Empty);
    }

    let cmd = match verb.to_lowercase().as_str() {
        "claim" => player_command(PlayerAction::Claim, "claim", rest)?,
        "unclaim" => player_command(PlayerAction::Unclaim, "unclaim", rest)?,
        "draft" => player_command(PlayerAction::Draft, "draft", rest)?,
        "toggle" => player_command(PlayerAction::Toggle, "toggle", rest)?,
        "add" => UserCommand::AddPlayer(parse_new_player(rest)?),
        "roster" => UserCommand::SetRoster(parse_roster_pairs(rest)?),
        "flex" => UserCommand::SetFlex(parse_flex(rest)?),
        "weight" => UserCommand::SetScarcityWeight(parse_weight(rest)?),
        "sort" => parse_sort(rest)?,
        "hide" => UserCommand::HideDrafted(parse_switch("hide", rest)?),
        "bye" => UserCommand::ShowBye(parse_switch("bye", rest)?),
        "search" | "find" => UserCommand::Search(rest.to_string()),
        "board" | "ls" => UserCommand::ShowBoard,
        "mine" => UserCommand::ShowRoster,
        "recs" => UserCommand::ShowRecommendations,
        "byes" => UserCommand::ShowByeConflicts,
        "pool" => UserCommand::ShowPool,
        "needs" => UserCommand::ShowNeeds,
        "log" => UserCommand::ShowStatusLog,
        "import" => UserCommand::ImportCsv(required_path("import", rest)?),
        "export" => UserCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "restore" => UserCommand::Restore(required_path("restore", rest)?),
        "reset" => UserCommand::ResetStatuses,
        "remove-drafted" => UserCommand::RemoveDrafted,
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" | "q" => UserCommand::Quit,
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };
    Ok(cmd)
}

fn player_command(
    action: PlayerAction,
    command: &'static str,
    rest: &str,
) -> Result<UserCommand, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            what: "a player id or name",
        });
    }
    Ok(UserCommand::Player {
        action,
        query: rest.to_string(),
    })
}

/// `name,pos,team,bye,value,adp` with the same defaults as a CSV row.
fn parse_new_player(rest: &str) -> Result<Player, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command: "add",
            what: "name,pos,team,bye,value,adp",
        });
    }
    let text = format!("name,pos,team,bye,value,adp\n{rest}");
    let players = parse_players_csv(&text).map_err(|_| CommandError::InvalidArgument {
        command: "add",
        what: "player",
        value: rest.to_string(),
    })?;
    players
        .into_iter()
        .next()
        .ok_or_else(|| CommandError::InvalidArgument {
            command: "add",
            what: "player name",
            value: rest.to_string(),
        })
}

fn parse_roster_pairs(rest: &str) -> Result<Vec<(String, u32)>, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command: "roster",
            what: "KEY=n pairs",
        });
    }
    rest.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let invalid = || CommandError::InvalidArgument {
                command: "roster",
                what: "KEY=n pair",
                value: pair.to_string(),
            };
            let (key, count) = pair.split_once('=').ok_or_else(invalid)?;
            let count: u32 = count.trim().parse().map_err(|_| invalid())?;
            Ok((key.trim().to_string(), count))
        })
        .collect()
}

fn parse_flex(rest: &str) -> Result<Vec<String>, CommandError> {
    let labels: Vec<String> = rest
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if labels.is_empty() {
        return Err(CommandError::MissingArgument {
            command: "flex",
            what: "a list of positions",
        });
    }
    Ok(labels)
}

fn parse_weight(rest: &str) -> Result<f64, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command: "weight",
            what: "a number",
        });
    }
    rest.parse::<f64>()
        .ok()
        .filter(|w| w.is_finite())
        .ok_or_else(|| CommandError::InvalidArgument {
            command: "weight",
            what: "number",
            value: rest.to_string(),
        })
}

fn parse_sort(rest: &str) -> Result<UserCommand, CommandError> {
    let mut parts = rest.split_whitespace();
    let key_text = parts.next().ok_or(CommandError::MissingArgument {
        command: "sort",
        what: "a sort key",
    })?;
    let key = SortKey::parse(key_text).ok_or_else(|| CommandError::InvalidArgument {
        command: "sort",
        what: "sort key",
        value: key_text.to_string(),
    })?;
    let direction = match parts.next() {
        Some(dir) => Some(SortDirection::parse(dir).ok_or_else(|| {
            CommandError::InvalidArgument {
                command: "sort",
                what: "direction",
                value: dir.to_string(),
            }
        })?),
        None => None,
    };
    Ok(UserCommand::Sort { key, direction })
}

fn parse_switch(command: &'static str, rest: &str) -> Result<bool, CommandError> {
    match rest.to_lowercase().as_str() {
        "on" | "yes" | "true" => Ok(true),
        "off" | "no" | "false" => Ok(false),
        "" => Err(CommandError::MissingArgument {
            command,
            what: "on or off",
        }),
        _ => Err(CommandError::InvalidArgument {
            command,
            what: "switch",
            value: rest.to_string(),
        }),
    }
}

fn required_path(command: &'static str, rest: &str) -> Result<PathBuf, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            what: "a file path",
        });
    }
    Ok(PathBuf::from(rest))
}
