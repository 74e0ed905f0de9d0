use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use usersearch_core::UserSummary;
use usersearch_engine::{CoordinatorSettings, LookupSettings};

use crate::logging::LogDestination;

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
    #[error("invalid avatar base url {0:?}: {1}")]
    AvatarBase(String, url::ParseError),
}

/// Command line arguments; flags override values from the config file.
#[derive(Debug, Default, Parser)]
#[command(name = "usersearch", about = "Interactive user search against a search endpoint")]
pub struct Cli {
    /// Path to a RON config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Search endpoint URL.
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Debounce quiet period in milliseconds.
    #[arg(long)]
    pub quiet_period_ms: Option<u64>,
    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

/// One user of the offline directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

impl From<DirectoryEntry> for UserSummary {
    fn from(entry: DirectoryEntry) -> Self {
        UserSummary {
            name: entry.name,
            handle: entry.handle,
            account_id: entry.account_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: String,
    pub query_param: String,
    pub quiet_period_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
    /// Avatar images live at `{avatar_base}{account_id}`.
    pub avatar_base: Option<String>,
    pub log_destination: LogDestination,
    pub verbose: bool,
    /// When set, searches run against this list instead of the endpoint.
    pub local_directory: Option<Vec<DirectoryEntry>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let lookup = LookupSettings::default();
        Self {
            endpoint: lookup.endpoint,
            query_param: lookup.query_param,
            quiet_period_ms: CoordinatorSettings::default().quiet_period.as_millis() as u64,
            connect_timeout_ms: lookup.connect_timeout.as_millis() as u64,
            request_timeout_ms: lookup.request_timeout.as_millis() as u64,
            max_bytes: lookup.max_bytes,
            avatar_base: None,
            log_destination: LogDestination::default(),
            verbose: false,
            local_directory: None,
        }
    }
}

impl AppConfig {
    pub fn from_ron(path: &Path, content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the config file named on the command line (if any) and applies flag overrides.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                Self::from_ron(path, &content)?
            }
            None => Self::default(),
        };

        if let Some(endpoint) = &cli.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(quiet_period_ms) = cli.quiet_period_ms {
            config.quiet_period_ms = quiet_period_ms;
        }
        config.verbose |= cli.verbose;
        Ok(config)
    }

    pub fn lookup_settings(&self) -> LookupSettings {
        LookupSettings {
            endpoint: self.endpoint.clone(),
            query_param: self.query_param.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_bytes,
            ..LookupSettings::default()
        }
    }

    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            quiet_period: Duration::from_millis(self.quiet_period_ms),
        }
    }

    pub fn avatar_base(&self) -> Result<Option<Url>, ConfigError> {
        self.avatar_base
            .as_deref()
            .map(|raw| Url::parse(raw).map_err(|err| ConfigError::AvatarBase(raw.to_string(), err)))
            .transpose()
    }

    pub fn directory(&self) -> Option<Vec<UserSummary>> {
        self.local_directory
            .clone()
            .map(|entries| entries.into_iter().map(UserSummary::from).collect())
    }
}
