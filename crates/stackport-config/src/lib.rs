//! Profile discovery and layered client configuration
//!
//! A [`Profile`] can come from three places, lowest precedence first:
//!
//! 1. a YAML profile file (see [`find_profile_file`])
//! 2. `STACKPORT_*` environment variables
//! 3. explicit overrides, typically command-line flags
//!
//! [`resolve_client_config`] merges them and produces a validated
//! [`stackport::ClientConfig`].

pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use stackport::ClientConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const ENV_CONFIG_PATH: &str = "STACKPORT_CONFIG_PATH";
pub const ENV_API_URL: &str = "STACKPORT_API_URL";
pub const ENV_ACCESS_TOKEN: &str = "STACKPORT_ACCESS_TOKEN";
pub const ENV_USER_AGENT: &str = "STACKPORT_USER_AGENT";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "STACKPORT_REQUEST_TIMEOUT_MS";

const LOCAL_CANDIDATES: [&str; 2] = ["stackport.yaml", ".stackport.yaml"];

/// Partial client settings from a single source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub api_url: Option<String>,
    pub access_token: Option<String>,
    pub user_agent: Option<String>,
    pub request_timeout_ms: Option<u64>,
}

impl Profile {
    /// Read the `STACKPORT_*` variables; unset or empty ones stay `None`
    pub fn from_env() -> Result<Self> {
        let request_timeout_ms = match non_empty_env(ENV_REQUEST_TIMEOUT_MS) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidTimeout {
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            api_url: non_empty_env(ENV_API_URL),
            access_token: non_empty_env(ENV_ACCESS_TOKEN),
            user_agent: non_empty_env(ENV_USER_AGENT),
            request_timeout_ms,
        })
    }

    /// Layer `other` on top of `self`; fields set in `other` win
    pub fn merge(self, other: Profile) -> Profile {
        Profile {
            api_url: other.api_url.or(self.api_url),
            access_token: other.access_token.or(self.access_token),
            user_agent: other.user_agent.or(self.user_agent),
            request_timeout_ms: other.request_timeout_ms.or(self.request_timeout_ms),
        }
    }

    /// Turn a merged profile into a validated client configuration
    pub fn into_client_config(self) -> Result<ClientConfig> {
        let api_url = self.api_url.ok_or(ConfigError::MissingApiUrl)?;
        let mut config = ClientConfig::new(api_url);

        if let Some(token) = self.access_token {
            config = config.with_access_token(token);
        }
        if let Some(ua) = self.user_agent {
            config = config.with_user_agent(ua);
        }
        if let Some(ms) = self.request_timeout_ms {
            if ms == 0 {
                return Err(ConfigError::InvalidTimeout {
                    value: ms.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            config = config.with_request_timeout(Duration::from_millis(ms));
        }

        config.validate()?;
        Ok(config)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Directory holding the global profile (`~/.config/stackport` on Linux)
pub fn global_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stackport"))
}

/// Locate the profile file, if any.
///
/// Search order:
/// 1. `STACKPORT_CONFIG_PATH` (must exist when set)
/// 2. current directory: `stackport.yaml`, `.stackport.yaml`
/// 3. `<config_dir>/stackport/config.yaml`
pub fn find_profile_file() -> Result<Option<PathBuf>> {
    if let Some(explicit) = non_empty_env(ENV_CONFIG_PATH) {
        let path = PathBuf::from(explicit);
        if !path.is_file() {
            return Err(ConfigError::ExplicitPathMissing(path));
        }
        return Ok(Some(path));
    }

    let current_dir = std::env::current_dir()?;
    Ok(search_profile(&current_dir, global_config_dir().as_deref()))
}

fn search_profile(current_dir: &Path, global_dir: Option<&Path>) -> Option<PathBuf> {
    let local = LOCAL_CANDIDATES
        .iter()
        .map(|name| current_dir.join(name))
        .find(|path| path.is_file());
    if local.is_some() {
        return local;
    }

    global_dir
        .map(|dir| dir.join("config.yaml"))
        .filter(|path| path.is_file())
}

/// Parse a YAML profile. An empty file is an empty profile.
pub fn load_profile(path: &Path) -> Result<Profile> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Profile::default());
    }
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge profile file, environment and `overrides` into a client config
pub fn resolve_client_config(overrides: Profile) -> Result<ClientConfig> {
    let file = match find_profile_file()? {
        Some(path) => {
            debug!(path = %path.display(), "loading profile");
            load_profile(&path)?
        }
        None => Profile::default(),
    };

    file.merge(Profile::from_env()?)
        .merge(overrides)
        .into_client_config()
}
