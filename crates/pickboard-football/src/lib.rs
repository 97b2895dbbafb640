// Football draft engine: the player pool, roster needs, scarcity-adjusted
// recommendations, and bye-week conflicts.

pub mod draft;
pub mod import;
pub mod sample;
pub mod search;
pub mod valuation;

pub use draft::player::{Player, PlayerStatus, Position};
pub use draft::pool::{Pool, PoolError};
pub use draft::roster::{FlexEligibility, RosterShape};
