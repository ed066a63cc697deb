use anyhow::Context;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable names - single source of truth
pub mod env_vars {
    /// Explicit data directory, overrides the platform convention
    pub const DATA_DIR: &str = "QUOTE_ME_DATA_DIR";
    pub const APPDATA: &str = "APPDATA";
    pub const XDG_DATA_HOME: &str = "XDG_DATA_HOME";
    pub const PORT: &str = "PORT";
    /// Set to "true" or "1" to proxy non-API requests to the front-end dev server
    pub const DEV_MODE: &str = "QUOTE_ME_DEV";
    pub const DEV_SERVER_URL: &str = "QUOTE_ME_DEV_SERVER_URL";
    /// Directory holding the built front-end (index.html and assets)
    pub const FRONTEND_DIST: &str = "QUOTE_ME_FRONTEND_DIST";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 3000;
    pub const DEV_SERVER_URL: &str = "http://localhost:5173";
    pub const FRONTEND_DIST: &str = "web/dist";
}

/// Returns the absolute path to the quote-me crate directory.
/// Uses CARGO_MANIFEST_DIR at compile time, so the bundled front-end is found
/// regardless of the working directory at runtime.
pub fn backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Locate the front-end bundle: explicit override, then `./web/dist`, then the
/// copy next to the crate sources.
pub fn frontend_dist_dir() -> Option<PathBuf> {
    if let Ok(dir) = env::var(env_vars::FRONTEND_DIST) {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir));
        }
    }

    [
        PathBuf::from(defaults::FRONTEND_DIST),
        backend_dir().join(defaults::FRONTEND_DIST),
    ]
    .into_iter()
    .find(|p| p.join("index.html").exists())
}

fn flag_enabled(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1")
}

/// Settings for the `web` command
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub dev_mode: bool,
    pub dev_server_url: String,
    pub frontend_dist: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match env::var(env_vars::PORT) {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a valid port number, got '{}'", env_vars::PORT, raw))?,
            Err(_) => defaults::PORT,
        };

        let dev_mode = env::var(env_vars::DEV_MODE)
            .map(|v| flag_enabled(&v))
            .unwrap_or(false);

        let dev_server_url = env::var(env_vars::DEV_SERVER_URL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| defaults::DEV_SERVER_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            port,
            dev_mode,
            dev_server_url,
            frontend_dist: frontend_dist_dir(),
        })
    }

    /// Static directory to serve, if any. Always `None` in dev mode.
    pub fn static_dir(&self) -> Option<&Path> {
        if self.dev_mode {
            None
        } else {
            self.frontend_dist.as_deref()
        }
    }
}
