//! Application configuration.
//!
//! Read from `suc_status.toml` in the working directory, or from the file
//! named by `SUC_STATUS_CONFIG`. A missing file means all defaults.
//!
//! ```toml
//! [client]
//! api_url = "https://suc.example.org"
//! request_timeout_secs = 30
//!
//! [checkin]
//! auto_select = true
//! stall_labeling = "pair_per_two_stalls"
//! standard = "reset"
//! interruption = "last_checkin"
//! charging_status = "reset"
//! reporter_cookie = "data/reporter.toml"
//! geolocation_timeout_secs = 10
//!
//! [toast]
//! anchors = { top = true, left = true }
//! clear_on_scroll = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use suc_status_checkin::form::FormConfig;
use suc_status_checkin::geolocation::DEFAULT_GEOLOCATION_TIMEOUT;
use suc_status_checkin::reporter::DEFAULT_COOKIE_PATH;
use suc_status_checkin::toast::Anchors;
use suc_status_client::ClientConfig;
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SUC_STATUS_CONFIG";

/// Config file used when [`CONFIG_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "suc_status.toml";

/// Errors loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for this configuration.
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

/// `[checkin]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckinSection {
    /// Form behaviour.
    #[serde(flatten)]
    pub form: FormConfig,
    /// Where the last-used reporter id is kept.
    pub reporter_cookie: PathBuf,
    /// Time allowed for a position fix.
    pub geolocation_timeout_secs: u64,
}

impl Default for CheckinSection {
    fn default() -> Self {
        Self {
            form: FormConfig::default(),
            reporter_cookie: PathBuf::from(DEFAULT_COOKIE_PATH),
            geolocation_timeout_secs: DEFAULT_GEOLOCATION_TIMEOUT.as_secs(),
        }
    }
}

impl CheckinSection {
    /// Time allowed for a position fix.
    #[must_use]
    pub const fn geolocation_timeout(&self) -> Duration {
        Duration::from_secs(self.geolocation_timeout_secs)
    }
}

/// `[toast]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToastSection {
    /// Initial anchor flags.
    pub anchors: Anchors,
    /// Clear the screen when the view scrolls back to the top.
    pub clear_on_scroll: bool,
}

impl Default for ToastSection {
    fn default() -> Self {
        Self {
            anchors: Anchors::TOP_LEFT,
            clear_on_scroll: false,
        }
    }
}

/// Whole application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `[client]`
    pub client: ClientConfig,
    /// `[checkin]`
    pub checkin: CheckinSection,
    /// `[toast]`
    pub toast: ToastSection,
}

impl AppConfig {
    /// Loads the configuration from `path`, or from [`CONFIG_ENV`] /
    /// [`DEFAULT_CONFIG_PATH`] when `None`, then applies environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map_or_else(
            || {
                std::env::var_os(CONFIG_ENV)
                    .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
            },
            Path::to_path_buf,
        );

        let mut config = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        config.client = config.client.with_env_overrides();
        Ok(config)
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the document is malformed.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::de::from_str(s)
    }
}
