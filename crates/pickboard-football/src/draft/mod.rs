// Draft-day data: players, the pool, the user's roster shape, and the board.

pub mod board;
pub mod player;
pub mod pool;
pub mod roster;
