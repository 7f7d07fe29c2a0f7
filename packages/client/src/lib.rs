#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP client for the SuperCharger status API.
//!
//! [`ApiClient`] talks to the status backend over plain JSON REST. The
//! collaborator traits [`StationDirectory`], [`ReportApi`] and
//! [`StatsApi`] are what the check-in and statistics crates depend on,
//! so they can be driven by the real client or by in-memory fakes.
//!
//! Station lookups that must never fail into caller state go through
//! [`lookup::search`] and [`lookup::search_by_coordinates`], which log
//! errors and fall back to an empty candidate list.

pub mod api;
pub mod config;
pub mod lookup;
pub mod query;

use async_trait::async_trait;
use suc_status_station_models::{
    CountrySummary, HistoryEntry, OverviewRow, Report, Station, StationStats, StationSummary,
};
use thiserror::Error;

pub use api::ApiClient;
pub use config::ClientConfig;

/// Errors from API client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP {status} {status_text}{}", message_suffix(.message.as_deref()))]
    Status {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase (e.g. `"Bad Request"`).
        status_text: String,
        /// `message` field of the error body, if the backend sent one.
        message: Option<String>,
    },

    /// Response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured base URL cannot be used.
    #[error("Invalid API URL '{url}': {message}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },
}

fn message_suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl ClientError {
    /// Text suitable for a user-facing notification: the server-provided
    /// message when present, otherwise the transport status text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            Self::Status { status_text, .. } => status_text.clone(),
            Self::Http(e) => e
                .status()
                .and_then(|s| s.canonical_reason())
                .map_or_else(|| e.to_string(), str::to_string),
            Self::Json(e) => e.to_string(),
            Self::InvalidUrl { message, .. } => message.clone(),
        }
    }
}

/// Remote station directory.
#[async_trait]
pub trait StationDirectory: Send + Sync {
    /// Fuzzy-matches `query` (title text or `"lat,lng"`) against the
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn lookup(&self, query: &str) -> Result<Vec<Station>, ClientError>;
}

/// Endpoint accepting check-in reports.
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// Posts `report` to the endpoint matching its kind. One call is
    /// exactly one network request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or is rejected.
    async fn submit(&self, report: &Report) -> Result<(), ClientError>;
}

/// Read-only statistics and history endpoints.
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// `GET /stats`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn country_summaries(&self) -> Result<Vec<CountrySummary>, ClientError>;

    /// `GET /stats/country/{country}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn country_stations(&self, country: &str) -> Result<Vec<StationSummary>, ClientError>;

    /// `GET /stats/superCharger/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn station_stats(&self, location_id: &str) -> Result<StationStats, ClientError>;

    /// `GET /checkin?limit=N&filter=...`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn history(&self, limit: u32, filter: &str) -> Result<Vec<HistoryEntry>, ClientError>;

    /// `GET /overview`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn overview(&self) -> Result<Vec<OverviewRow>, ClientError>;
}
