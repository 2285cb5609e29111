//! Default locations for the settings file, the preference file and logs.

use std::env;
use std::path::{Path, PathBuf};

/// Application directory name under the XDG base directories.
const APP_DIR: &str = "sitelang";

/// What: Resolve an XDG base directory.
///
/// Inputs:
/// - `xdg`: Value of the XDG variable, if set
/// - `home`: Value of `$HOME`, if set
/// - `home_default`: Segments appended to `$HOME` when `xdg` is unset or blank
///
/// Output:
/// - Resolved base directory; `.` stands in for a missing `$HOME`
fn base_dir(xdg: Option<&str>, home: Option<&str>, home_default: &[&str]) -> PathBuf {
    if let Some(p) = xdg
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let mut base = PathBuf::from(home.unwrap_or("."));
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// Resolve `var` from the environment, defaulting to `$HOME` + `home_default`.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    let xdg = env::var(var).ok();
    let home = env::var("HOME").ok();
    base_dir(xdg.as_deref(), home.as_deref(), home_default)
}

/// `$XDG_CONFIG_HOME/sitelang` (or `~/.config/sitelang`).
#[must_use]
pub fn config_dir() -> PathBuf {
    xdg_base_dir("XDG_CONFIG_HOME", &[".config"]).join(APP_DIR)
}

/// `$XDG_STATE_HOME/sitelang` (or `~/.local/state/sitelang`).
#[must_use]
pub fn state_dir() -> PathBuf {
    xdg_base_dir("XDG_STATE_HOME", &[".local", "state"]).join(APP_DIR)
}

/// Settings file if one exists at the default location.
#[must_use]
pub fn resolve_settings_path() -> Option<PathBuf> {
    Some(config_dir().join("settings.conf")).filter(|p| p.is_file())
}

/// Default preference file.
#[must_use]
pub fn preferences_path() -> PathBuf {
    state_dir().join("preferences.conf")
}

/// What: Logs directory, created on demand.
///
/// Output:
/// - `Some(dir)` when it exists or could be created
#[must_use]
pub fn logs_dir() -> Option<PathBuf> {
    let dir = state_dir().join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Directory containing `path`, or `.` for bare file names.
#[must_use]
pub fn parent_or_current(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
