//! Data directory resolution.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable that overrides the default data directory.
pub const DATA_DIR_ENV: &str = "TASA_DATA_DIR";

/// Returns the default directory series files live in.
///
/// Resolution order:
/// - `$TASA_DATA_DIR` when set and non-empty
/// - the platform data directory (`~/.local/share/tasa/` on Linux,
///   `~/Library/Application Support/tasa/` on macOS)
/// - `~/.tasa/` when no platform location can be determined
#[must_use]
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("", "", "tasa").map_or_else(dirs_fallback, |proj_dirs| {
        proj_dirs.data_dir().to_path_buf()
    })
}

/// Fallback for determining home directory.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".tasa")
}
