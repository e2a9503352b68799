// src/config.rs
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::csv_report::DEFAULT_OUTPUT_DIR;
use crate::punch_loader::DEFAULT_PUNCHES_PATH;
use crate::roster_client::{
    RosterClientConfig, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_DELAY_SECS,
    DEFAULT_ROSTER_ATTEMPTS, DEFAULT_ROSTER_URL,
};

pub const ENV_PREFIX: &str = "ATTENDANCE_";
pub const DEFAULT_LOGS_DIR: &str = "logs";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment configuration: {0}")]
    Env(#[from] envy::Error),
    #[error("Roster URL '{url}' is not a valid URL")]
    InvalidRosterUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Roster URL must use http or https, not '{scheme}'")]
    UnsupportedScheme { scheme: String },
}

/// Run configuration, read from `ATTENDANCE_*` environment variables.
/// Every field has a default so an empty environment is valid.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_roster_url")]
    pub roster_url: String,
    #[serde(default = "default_punches_path")]
    pub punches_path: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,
    #[serde(default = "default_roster_attempts")]
    pub roster_attempts: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub roster_retry_delay_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub roster_timeout_secs: u64,
}

fn default_roster_url() -> String {
    DEFAULT_ROSTER_URL.to_string()
}
fn default_punches_path() -> PathBuf {
    PathBuf::from(DEFAULT_PUNCHES_PATH)
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}
fn default_logs_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOGS_DIR)
}
fn default_roster_attempts() -> u32 {
    DEFAULT_ROSTER_ATTEMPTS
}
fn default_retry_delay_secs() -> u64 {
    DEFAULT_RETRY_DELAY_SECS
}
fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<AppConfig>()?)
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, AppConfig>(vars)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.roster_url).map_err(|e| ConfigError::InvalidRosterUrl {
            url: self.roster_url.clone(),
            source: e,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::UnsupportedScheme {
                scheme: other.to_string(),
            }),
        }
    }

    pub fn roster_client_config(&self) -> RosterClientConfig {
        RosterClientConfig {
            url: self.roster_url.clone(),
            attempts: self.roster_attempts,
            retry_delay: Duration::from_secs(self.roster_retry_delay_secs),
            request_timeout: Duration::from_secs(self.roster_timeout_secs),
        }
    }
}
