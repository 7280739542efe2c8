use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::MirrorError;

/// What the orchestrator does after a clone fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failed clone.
    #[default]
    Abort,
    /// Attempt every repo and report failures at the end.
    Continue,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "abort"),
            FailurePolicy::Continue => write!(f, "continue"),
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(FailurePolicy::Abort),
            "continue" => Ok(FailurePolicy::Continue),
            _ => Err(format!("unknown failure policy: {s}")),
        }
    }
}

/// gmirror configuration, optionally stored at `~/.gmirror/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Git executable used for cloning.
    #[serde(default = "default_git_program")]
    pub git_program: String,

    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// User-Agent sent with catalog requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_git_program() -> String {
    "git".to_string()
}

fn default_user_agent() -> String {
    format!("gmirror/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            git_program: default_git_program(),
            on_failure: FailurePolicy::Abort,
            user_agent: default_user_agent(),
        }
    }
}

impl MirrorConfig {
    /// Returns the gmirror home directory (`~/.gmirror/`).
    pub fn home_dir() -> Result<PathBuf, MirrorError> {
        let base = dirs::home_dir().ok_or_else(|| MirrorError::Config {
            message: "could not determine home directory".into(),
        })?;
        Ok(base.join(".gmirror"))
    }

    /// Returns the path to the config file.
    pub fn config_path() -> Result<PathBuf, MirrorError> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load config from the default location, or return defaults if not found.
    pub fn load() -> Result<Self, MirrorError> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, MirrorError> {
        let content = std::fs::read_to_string(path).map_err(|e| MirrorError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| MirrorError::Config {
            message: format!("{}: {e}", path.display()),
        })
    }
}

/// Per-host mirror root: `<dest>/<host>` (with `:<port>` for explicit ports).
pub fn host_dest_dir(dest: &Path, url: &Url) -> Result<PathBuf, MirrorError> {
    let host = url.host_str().ok_or_else(|| MirrorError::InvalidUrl {
        url: url.to_string(),
        message: "URL has no host".into(),
    })?;
    let dir = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    Ok(dest.join(dir))
}
