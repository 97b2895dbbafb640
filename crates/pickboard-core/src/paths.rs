// Per-user directory discovery.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Platform data directory for pickboard (e.g. `~/.local/share/pickboard`).
/// `None` when no home directory can be determined.
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pickboard").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Resolve the configured database path.
///
/// `":memory:"` and absolute paths are used as-is. Relative paths are placed
/// under `data_dir` when given, else under the platform data directory, else
/// left relative to the working directory.
pub fn resolve_db_path(configured: &str, data_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(configured);
    if configured == ":memory:" || path.is_absolute() {
        return path.to_path_buf();
    }
    match data_dir.map(Path::to_path_buf).or_else(default_data_dir) {
        Some(dir) => dir.join(path),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_path_is_untouched() {
        assert_eq!(resolve_db_path(":memory:", None), PathBuf::from(":memory:"));
    }

    #[test]
    fn relative_path_goes_under_data_dir() {
        let dir = std::env::temp_dir().join("pickboard_data");
        assert_eq!(
            resolve_db_path("pickboard.db", Some(&dir)),
            dir.join("pickboard.db")
        );
    }

    #[test]
    fn absolute_path_is_untouched() {
        let abs = std::env::temp_dir().join("elsewhere.db");
        let abs_str = abs.to_string_lossy().to_string();
        let other = std::env::temp_dir().join("ignored");
        assert_eq!(resolve_db_path(&abs_str, Some(&other)), abs);
    }
}
