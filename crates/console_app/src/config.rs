//! RON configuration for the console host.
//!
//! A missing file yields the defaults; a file that exists but does not parse
//! is an error naming the path.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use console_core::ConsoleSettings;
use console_engine::{CredentialProvider, Endpoints, EnvCredential, FetchSettings, StaticCredential};
use console_logging::LogDestination;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "console.ron";
pub const DEFAULT_TOKEN_VAR: &str = "CONSOLE_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Where the bearer token comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialSource {
    Static(String),
    Env(String),
}

impl Default for CredentialSource {
    fn default() -> Self {
        CredentialSource::Env(DEFAULT_TOKEN_VAR.to_string())
    }
}

impl CredentialSource {
    pub fn provider(&self) -> Arc<dyn CredentialProvider> {
        match self {
            CredentialSource::Static(token) => Arc::new(StaticCredential::new(token.clone())),
            CredentialSource::Env(var) => Arc::new(EnvCredential::new(var.clone())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

/// Where a loaded configuration came from, reported once logging is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    File,
    Defaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub endpoints: Endpoints,
    pub console: ConsoleSettings,
    pub credential: CredentialSource,
    /// Shown after logout so the operator knows where to sign in again.
    pub login_url: Option<String>,
    pub log: LogTarget,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            base_url: fetch.base_url,
            connect_timeout_ms: duration_ms(fetch.connect_timeout),
            request_timeout_ms: duration_ms(fetch.request_timeout),
            endpoints: fetch.endpoints,
            console: ConsoleSettings::default(),
            credential: CredentialSource::default(),
            login_url: None,
            log: LogTarget::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<(Self, ConfigOrigin), ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok((Self::default(), ConfigOrigin::Defaults));
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok((config, ConfigOrigin::File))
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            endpoints: self.endpoints.clone(),
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
