//! Filesystem locations used by the client.

use std::path::{Path, PathBuf};

/// Directory name under the platform data directory.
pub const APP_DIR_NAME: &str = "bike-rental";

/// File holding the persisted auth tokens.
pub const TOKEN_FILE_NAME: &str = "tokens.json";

/// Returns the default data directory.
///
/// This is `bike-rental` under the platform data directory
/// (`~/.local/share` on Linux, `~/Library/Application Support` on macOS,
/// `%APPDATA%` on Windows), or `./.bike-rental` when the platform has none.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(format!(".{APP_DIR_NAME}")),
        |dir| dir.join(APP_DIR_NAME),
    )
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or any path when no home directory is known,
/// are returned unchanged.
///
/// # Examples
///
/// ```
/// use bike_rental::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/var/lib/bikes"), PathBuf::from("/var/lib/bikes"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path {
        "~" => "",
        p => match p.strip_prefix("~/") {
            Some(rest) => rest,
            None => return PathBuf::from(p),
        },
    };
    dirs::home_dir().map_or_else(|| PathBuf::from(path), |home| home.join(rest))
}

/// Location of the token file inside `data_dir`.
#[must_use]
pub fn token_file(data_dir: &Path) -> PathBuf {
    data_dir.join(TOKEN_FILE_NAME)
}
