// Shared infrastructure: configuration files, the SQLite session cache, and
// per-user paths.

pub mod config;
pub mod db;
pub mod paths;
