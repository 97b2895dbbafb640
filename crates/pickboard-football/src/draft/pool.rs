// The player pool and its user-driven status transitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::{custom_player_id, Player, PlayerStatus, FREE_AGENT_TEAM};

#[derive(Debug, Error, PartialEq)]
pub enum PoolError {
    #[error("no player with id `{0}`")]
    UnknownPlayer(String),

    #[error("a player with id `{0}` already exists")]
    DuplicateId(String),

    #[error("player name must not be empty")]
    EmptyName,
}

/// A status transition that was applied to the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransition {
    pub player_id: String,
    pub player_name: String,
    pub from: PlayerStatus,
    pub to: PlayerStatus,
}

/// Ordered player pool. Order is insertion order and only matters for
/// tie-breaking and default display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pool {
    players: Vec<Player>,
}

impl Pool {
    /// Wrap an ingested player list. Ids are assumed unique.
    pub fn new(players: Vec<Player>) -> Self {
        Pool { players }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// The user's claimed players in pool order.
    pub fn claimed(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_claimed()).collect()
    }

    /// Move a player to `status`. Every transition is allowed, including a
    /// no-op to the current status.
    pub fn set_status(
        &mut self,
        id: &str,
        status: PlayerStatus,
    ) -> Result<StatusTransition, PoolError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PoolError::UnknownPlayer(id.to_string()))?;

        let from = player.status;
        player.status = status;
        Ok(StatusTransition {
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            from,
            to: status,
        })
    }

    pub fn claim(&mut self, id: &str) -> Result<StatusTransition, PoolError> {
        self.set_status(id, PlayerStatus::ClaimedByUser)
    }

    pub fn unclaim(&mut self, id: &str) -> Result<StatusTransition, PoolError> {
        self.set_status(id, PlayerStatus::Available)
    }

    pub fn mark_drafted(&mut self, id: &str) -> Result<StatusTransition, PoolError> {
        self.set_status(id, PlayerStatus::DraftedByOther)
    }

    /// The "taken?" checkbox: available becomes drafted, anything taken
    /// (by another team or by the user) goes back to available.
    pub fn toggle_drafted(&mut self, id: &str) -> Result<StatusTransition, PoolError> {
        let current = self
            .get(id)
            .map(|p| p.status)
            .ok_or_else(|| PoolError::UnknownPlayer(id.to_string()))?;
        let next = match current {
            PlayerStatus::Available => PlayerStatus::DraftedByOther,
            PlayerStatus::DraftedByOther | PlayerStatus::ClaimedByUser => PlayerStatus::Available,
        };
        self.set_status(id, next)
    }

    /// Reset every player to available. Returns the players that changed.
    pub fn clear_statuses(&mut self) -> Vec<StatusTransition> {
        let mut changed = Vec::new();
        for player in &mut self.players {
            if player.status != PlayerStatus::Available {
                changed.push(StatusTransition {
                    player_id: player.id.clone(),
                    player_name: player.name.clone(),
                    from: player.status,
                    to: PlayerStatus::Available,
                });
                player.status = PlayerStatus::Available;
            }
        }
        changed
    }

    /// Drop every player drafted by another team. Claimed players stay.
    /// Returns how many were removed.
    pub fn remove_drafted(&mut self) -> usize {
        let before = self.players.len();
        self.players.retain(|p| !p.is_drafted_by_other());
        before - self.players.len()
    }

    /// Add a hand-entered player at the top of the pool.
    pub fn add_player(&mut self, player: Player) -> Result<(), PoolError> {
        if player.name.trim().is_empty() {
            return Err(PoolError::EmptyName);
        }
        if self.get(&player.id).is_some() {
            return Err(PoolError::DuplicateId(player.id));
        }
        self.players.insert(0, player);
        Ok(())
    }

    /// Add a hand-entered player, assigning a fresh id and the free-agent
    /// team code when no team is given. Returns the new id.
    pub fn add_custom_player(&mut self, mut player: Player) -> Result<String, PoolError> {
        player.name = player.name.trim().to_string();
        player.team = player.team.trim().to_uppercase();
        if player.team.is_empty() {
            player.team = FREE_AGENT_TEAM.to_string();
        }
        let salt = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
        player.id = self.unused_custom_id(&player.name, &player.team, salt);
        let id = player.id.clone();
        self.add_player(player)?;
        Ok(id)
    }

    /// An id for a new hand-entered player that is not yet used in the pool.
    pub fn unused_custom_id(&self, name: &str, team: &str, salt: u64) -> String {
        let mut salt = salt;
        loop {
            let id = custom_player_id(name, team, salt);
            if self.get(&id).is_none() {
                return id;
            }
            salt = salt.wrapping_add(1);
        }
    }

    /// First id that appears more than once, if any.
    pub fn first_duplicate_id(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.players
            .iter()
            .find(|p| !seen.insert(p.id.as_str()))
            .map(|p| p.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::player::Position;

    fn pool() -> Pool {
        Pool::new(vec![
            Player::new("a", "Alpha", Position::RunningBack, "SF", 90.0),
            Player::new("b", "Bravo", Position::WideReceiver, "DAL", 80.0),
            Player::new("c", "Charlie", Position::Kicker, "CIN", 8.0),
        ])
    }

    #[test]
    fn set_status_reports_transition() {
        let mut pool = pool();
        let t = pool.claim("a").unwrap();
        assert_eq!(t.from, PlayerStatus::Available);
        assert_eq!(t.to, PlayerStatus::ClaimedByUser);
        assert_eq!(t.player_name, "Alpha");
        assert!(pool.get("a").unwrap().is_claimed());
    }

    #[test]
    fn unknown_id_is_an_error() {
        let mut pool = pool();
        assert_eq!(
            pool.claim("zzz"),
            Err(PoolError::UnknownPlayer("zzz".into()))
        );
        assert_eq!(
            pool.toggle_drafted("zzz"),
            Err(PoolError::UnknownPlayer("zzz".into()))
        );
    }

    #[test]
    fn every_transition_is_allowed() {
        let mut pool = pool();
        let statuses = [
            PlayerStatus::Available,
            PlayerStatus::DraftedByOther,
            PlayerStatus::ClaimedByUser,
        ];
        for from in statuses {
            for to in statuses {
                pool.set_status("b", from).unwrap();
                let t = pool.set_status("b", to).unwrap();
                assert_eq!(t.from, from);
                assert_eq!(pool.get("b").unwrap().status, to);
            }
        }
    }

    #[test]
    fn toggle_drafted_cycles() {
        let mut pool = pool();
        pool.toggle_drafted("a").unwrap();
        assert!(pool.get("a").unwrap().is_drafted_by_other());
        pool.toggle_drafted("a").unwrap();
        assert!(pool.get("a").unwrap().is_available());

        pool.claim("a").unwrap();
        pool.toggle_drafted("a").unwrap();
        assert!(pool.get("a").unwrap().is_available());
    }

    #[test]
    fn clear_and_remove_drafted() {
        let mut pool = pool();
        pool.claim("a").unwrap();
        pool.mark_drafted("b").unwrap();

        let mut copy = pool.clone();
        assert_eq!(copy.clear_statuses().len(), 2);
        assert!(copy.players().iter().all(Player::is_available));

        assert_eq!(pool.remove_drafted(), 1);
        assert_eq!(pool.len(), 2);
        assert!(pool.get("b").is_none());
        assert!(pool.get("a").unwrap().is_claimed());
    }

    #[test]
    fn add_player_prepends_and_rejects_duplicates() {
        let mut pool = pool();
        let rookie = Player::new("r", "Rookie", Position::TightEnd, "FA", 40.0);
        pool.add_player(rookie.clone()).unwrap();
        assert_eq!(pool.players()[0].id, "r");

        assert_eq!(pool.add_player(rookie), Err(PoolError::DuplicateId("r".into())));

        let blank = Player::new("x", "  ", Position::TightEnd, "FA", 1.0);
        assert_eq!(pool.add_player(blank), Err(PoolError::EmptyName));
    }

    #[test]
    fn unused_custom_id_skips_taken_ids() {
        let mut pool = pool();
        let first = pool.unused_custom_id("Rookie", "FA", 7);
        pool.add_player(Player::new(first.clone(), "Rookie", Position::WideReceiver, "FA", 1.0))
            .unwrap();
        let second = pool.unused_custom_id("Rookie", "FA", 7);
        assert_ne!(first, second);
    }

    #[test]
    fn add_custom_player_assigns_id_and_team() {
        let mut pool = pool();
        let id = pool
            .add_custom_player(Player::new("", " Sleeper ", Position::WideReceiver, "", 12.0))
            .unwrap();
        let added = &pool.players()[0];
        assert_eq!(added.id, id);
        assert_eq!(added.name, "Sleeper");
        assert_eq!(added.team, FREE_AGENT_TEAM);
        assert!(id.starts_with("Sleeper-FA-"));

        let err = pool.add_custom_player(Player::new("", "", Position::Kicker, "SF", 1.0));
        assert_eq!(err, Err(PoolError::EmptyName));
    }

    #[test]
    fn duplicate_ids_are_detected() {
        let mut players = pool().players().to_vec();
        assert!(Pool::new(players.clone()).first_duplicate_id().is_none());
        players.push(Player::new("a", "Alpha again", Position::RunningBack, "SF", 1.0));
        assert_eq!(Pool::new(players).first_duplicate_id(), Some("a"));
    }
}
