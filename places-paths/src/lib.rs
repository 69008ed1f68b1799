//! XDG Base Directory paths for places.
//!
//! The client keeps its configuration and its persisted session under
//! XDG paths on every platform, the same way `gh` or `kubectl` do.

use std::path::PathBuf;

/// Directory name used under the XDG roots.
const APP_DIR: &str = "places";

/// Get the places config directory.
///
/// Returns `$XDG_CONFIG_HOME/places` if set, otherwise `~/.config/places`.
/// The user `config.toml` lives here.
///
/// # Examples
///
/// ```
/// use places_paths::config_dir;
///
/// let config = config_dir();
/// let file = config.join("config.toml");
/// ```
pub fn config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// Get the places data directory.
///
/// Returns `$XDG_DATA_HOME/places` if set, otherwise `~/.local/share/places`.
/// The persisted session slot is written here.
///
/// # Examples
///
/// ```
/// use places_paths::data_dir;
///
/// let data = data_dir();
/// let slot = data.join("user_data.json");
/// ```
pub fn data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share")
}

fn xdg_dir(env_key: &str, home_relative: &str) -> PathBuf {
    match std::env::var(env_key) {
        Ok(root) if !root.is_empty() => PathBuf::from(root).join(APP_DIR),
        _ => match dirs::home_dir() {
            Some(home) => home.join(home_relative).join(APP_DIR),
            None => PathBuf::from(home_relative).join(APP_DIR),
        },
    }
}
