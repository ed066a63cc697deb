//! Per-user data directory resolution.
//!
//! - Windows: `%APPDATA%\quotes`, else `<home>\AppData\Roaming\quotes`
//! - macOS: `<home>/Library/Application Support/quotes`
//! - Linux and others: `$XDG_DATA_HOME/quotes`, else `<home>/.local/share/quotes`
//!
//! `QUOTE_ME_DATA_DIR` overrides all of the above.

use std::path::{Path, PathBuf};

use crate::config::env_vars;

/// Directory name appended to the platform data root
pub const APP_DIR_NAME: &str = "quotes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Anything that is not Windows or macOS follows the XDG convention
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            _ => Self::Linux,
        }
    }
}

/// Resolve the data directory without touching the filesystem.
///
/// `env` looks up an environment variable; empty values count as unset.
pub fn resolve_data_dir<F>(platform: Platform, env: F, home: &Path) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(dir) = lookup(env_vars::DATA_DIR) {
        return PathBuf::from(dir);
    }

    match platform {
        Platform::Windows => lookup(env_vars::APPDATA)
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join("AppData").join("Roaming"))
            .join(APP_DIR_NAME),
        Platform::MacOs => home
            .join("Library")
            .join("Application Support")
            .join(APP_DIR_NAME),
        Platform::Linux => lookup(env_vars::XDG_DATA_HOME)
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".local").join("share"))
            .join(APP_DIR_NAME),
    }
}

/// Resolve the data directory for this host and process environment
pub fn data_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    resolve_data_dir(Platform::current(), |key| std::env::var(key).ok(), &home)
}

/// Create the directory (and parents) if it does not exist yet
pub fn ensure_data_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        log::info!("Created data directory {}", dir.display());
    }
    Ok(())
}
