// Built-in demo pool used when no player CSV is configured.

use tracing::warn;

use crate::draft::player::Player;
use crate::import::parse_players_csv;

/// Twenty well-known players across every position.
pub const SAMPLE_CSV: &str = include_str!("../data/sample_players.csv");

/// The demo pool, all players available.
pub fn sample_pool() -> Vec<Player> {
    match parse_players_csv(SAMPLE_CSV) {
        Ok(players) => players,
        Err(e) => {
            warn!("built-in sample pool failed to parse: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::player::Position;

    #[test]
    fn sample_pool_has_twenty_available_players() {
        let pool = sample_pool();
        assert_eq!(pool.len(), 20);
        assert!(pool.iter().all(Player::is_available));
        assert!(pool.iter().all(|p| p.position.is_fixed()));
    }

    #[test]
    fn sample_ids_follow_row_order() {
        let pool = sample_pool();
        assert_eq!(pool[0].id, "Josh Allen-BUF-0");
        assert_eq!(pool[3].name, "Christian McCaffrey");
        assert_eq!(pool[3].position, Position::RunningBack);
        assert_eq!(pool[19].id, "Evan McPherson-CIN-19");
    }
}
