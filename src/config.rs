//! Where the command database lives.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the default database location.
pub const DB_ENV_VAR: &str = "OBC_COMMANDS_DB";

const DEFAULT_DIR: &str = ".obc-commands";
const DEFAULT_FILE: &str = "commands.db";

/// Resolves the database path: explicit flag, then `OBC_COMMANDS_DB`, then
/// `~/.obc-commands/commands.db`, then `./commands.db`.
pub fn resolve_db_path(flag: Option<PathBuf>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }

    if let Some(path) = std::env::var_os(DB_ENV_VAR).filter(|v| !v.is_empty()) {
        return PathBuf::from(path);
    }

    dirs::home_dir()
        .map(|mut path| {
            path.push(DEFAULT_DIR);
            path.push(DEFAULT_FILE);
            path
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE))
}

/// Creates the parent directory of `db_path` if it doesn't exist.
pub fn ensure_parent_dir(db_path: &Path) -> std::io::Result<()> {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
