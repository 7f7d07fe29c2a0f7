#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Wire types for the SuperCharger status API.
//!
//! These types mirror the JSON exchanged with the status backend: station
//! directory lookups, the three check-in report payloads, check-in
//! history, and the statistics/overview endpoints. Field names are
//! `camelCase` on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// `strftime` pattern the backend accepts for submitted times
/// (e.g. `2016-07-28T11:05:00.000Z`).
pub const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Formats a UTC timestamp in the backend's submission format.
#[must_use]
pub fn format_api_time(time: &DateTime<Utc>) -> String {
    time.format(API_TIME_FORMAT).to_string()
}

/// Serde adapter that writes timestamps with [`API_TIME_FORMAT`] and reads
/// any RFC 3339 timestamp.
pub mod api_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes `time` using [`super::API_TIME_FORMAT`].
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_api_time(time))
    }

    /// Deserializes an RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid RFC 3339 timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        DateTime::<Utc>::deserialize(deserializer)
    }
}

// ---------------------------------------------------------------------------
// Stations
// ---------------------------------------------------------------------------

/// Health classification attached to a check-in.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ProblemKind {
    /// Station operating normally.
    #[default]
    None,
    /// Stalls deliver reduced power.
    LimitedPower,
    /// Some stalls are out of order.
    PartialFailure,
    /// The whole station is out of order.
    CompleteFailure,
    /// Access to the station is disrupted (roadworks, closures).
    TrafficDisruption,
}

impl ProblemKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::None,
            Self::LimitedPower,
            Self::PartialFailure,
            Self::CompleteFailure,
            Self::TrafficDisruption,
        ]
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "No problem",
            Self::LimitedPower => "Limited power",
            Self::PartialFailure => "Partial failure",
            Self::CompleteFailure => "Complete failure",
            Self::TrafficDisruption => "Traffic disruption",
        }
    }

    /// Whether this classification reports an actual problem.
    #[must_use]
    pub const fn is_problem(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Summary of the most recent check-in the backend knows for a station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LastCheckin {
    /// Reported problem, if any.
    pub problem: Option<ProblemKind>,
    /// Stall labels that were reported as affected.
    pub affected_stalls: Vec<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// A charging station as returned by the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Backend location identifier (e.g. `"zurichsupercharger"`).
    pub location_id: String,
    /// Display title.
    pub title: String,
    /// Country name.
    #[serde(default)]
    pub country: Option<String>,
    /// Declared stall count. Absent when the directory import could not
    /// parse a capacity.
    #[serde(default)]
    pub stalls: Option<u32>,
    /// Last-known check-in summary.
    #[serde(default)]
    pub checkin: Option<LastCheckin>,
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)?;
        if let Some(country) = &self.country {
            write!(f, " ({country})")?;
        }
        if let Some(stalls) = self.stalls {
            write!(f, " - {stalls} stalls")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Which kind of report a check-in form submits.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportKind {
    /// Full check-in: occupancy counters plus problem classification.
    #[default]
    Standard,
    /// Interruption-only report: problem classification and affected
    /// stalls.
    Interruption,
    /// Simple charging-status report: stall/charging/blocked/waiting
    /// counters.
    ChargingStatus,
}

impl ReportKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Standard, Self::Interruption, Self::ChargingStatus]
    }

    /// Endpoint path the report is posted to.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Standard => "/checkin",
            Self::Interruption => "/checkinInterruption",
            Self::ChargingStatus => "/charging",
        }
    }
}

/// Payload for `POST /checkin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardCheckin {
    /// Station location identifier.
    pub location_id: String,
    /// Station title.
    pub title: String,
    /// Observation time, minute precision.
    #[serde(with = "api_time")]
    pub time: DateTime<Utc>,
    /// Reporter identifier (may be empty).
    pub tff_user_id: String,
    /// Vehicles blocking a stall without charging.
    pub blocked: u32,
    /// Vehicles waiting for a stall.
    pub waiting: u32,
    /// Problem classification.
    pub problem: ProblemKind,
    /// Affected stall labels.
    pub affected_stalls: Vec<String>,
    /// Free-text notes.
    pub notes: String,
}

/// Payload for `POST /checkinInterruption`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterruptionReport {
    /// Station location identifier.
    pub location_id: String,
    /// Station title.
    pub title: String,
    /// Observation time, minute precision.
    #[serde(with = "api_time")]
    pub time: DateTime<Utc>,
    /// Reporter identifier (may be empty).
    pub tff_user_id: String,
    /// Problem classification. Never [`ProblemKind::None`].
    pub problem: ProblemKind,
    /// Affected stall labels.
    pub affected_stalls: Vec<String>,
    /// Free-text notes.
    pub notes: String,
}

/// Payload for `POST /charging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingStatusReport {
    /// Station location identifier.
    pub location_id: String,
    /// Station title.
    pub title: String,
    /// Observation time, minute precision.
    #[serde(with = "api_time")]
    pub time: DateTime<Utc>,
    /// Declared stall count of the station.
    pub stalls: u32,
    /// Vehicles charging.
    pub charging: u32,
    /// Vehicles blocking a stall without charging.
    pub blocked: u32,
    /// Vehicles waiting for a stall.
    pub waiting: u32,
}

/// A report ready for submission, tagged by endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// `POST /checkin`
    Standard(StandardCheckin),
    /// `POST /checkinInterruption`
    Interruption(InterruptionReport),
    /// `POST /charging`
    ChargingStatus(ChargingStatusReport),
}

impl Report {
    /// Which kind of report this is.
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        match self {
            Self::Standard(_) => ReportKind::Standard,
            Self::Interruption(_) => ReportKind::Interruption,
            Self::ChargingStatus(_) => ReportKind::ChargingStatus,
        }
    }

    /// Location identifier of the reported station.
    #[must_use]
    pub fn location_id(&self) -> &str {
        match self {
            Self::Standard(r) => &r.location_id,
            Self::Interruption(r) => &r.location_id,
            Self::ChargingStatus(r) => &r.location_id,
        }
    }

    /// Observation time of the report.
    #[must_use]
    pub const fn time(&self) -> &DateTime<Utc> {
        match self {
            Self::Standard(r) => &r.time,
            Self::Interruption(r) => &r.time,
            Self::ChargingStatus(r) => &r.time,
        }
    }
}

/// Error body returned by the backend on a rejected request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiMessage {
    /// Human-readable reason.
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Station snapshot embedded in a history entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryStation {
    /// Station location identifier.
    pub location_id: String,
    /// Station title.
    pub title: String,
    /// Country name.
    pub country: Option<String>,
    /// Declared stall count.
    pub stalls: Option<u32>,
}

/// Observation part of a history entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryCheckin {
    /// Observation time.
    pub time: Option<DateTime<Utc>>,
    /// Vehicles charging.
    pub charging: Option<u32>,
    /// Vehicles blocking a stall.
    pub blocked: Option<u32>,
    /// Vehicles waiting.
    pub waiting: Option<u32>,
    /// Problem classification.
    pub problem: Option<ProblemKind>,
    /// Affected stall labels.
    pub affected_stalls: Vec<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Who submitted a history entry and when.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Submitter {
    /// Submission time (server clock).
    pub time: Option<DateTime<Utc>>,
    /// Reporter identifier.
    pub tff_user_id: Option<String>,
}

/// A historical check-in as returned by `GET /checkin`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    /// Station the check-in refers to.
    pub suc: HistoryStation,
    /// The observation.
    pub checkin: HistoryCheckin,
    /// Submission metadata.
    pub submitter: Submitter,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// A row of `GET /stats`: one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySummary {
    /// Country name, also the path parameter for drilling in.
    pub country: String,
    /// Number of stations with check-ins.
    #[serde(default)]
    pub super_chargers: Option<u32>,
    /// Number of check-ins.
    #[serde(default)]
    pub checkins: Option<u64>,
}

/// A row of `GET /stats/country/{country}`: one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSummary {
    /// Station location identifier.
    pub location_id: String,
    /// Station title.
    pub title: String,
    /// Country name.
    #[serde(default)]
    pub country: Option<String>,
    /// Declared stall count.
    #[serde(default)]
    pub stalls: Option<u32>,
    /// Number of check-ins.
    #[serde(default)]
    pub checkins: Option<u64>,
}

/// One sample of a station's time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Observation time.
    pub time: DateTime<Utc>,
    /// Declared stall count at that time.
    #[serde(default)]
    pub stalls: Option<u32>,
    /// Vehicles charging.
    #[serde(default)]
    pub charging: Option<u32>,
    /// Vehicles blocking a stall.
    #[serde(default)]
    pub blocked: Option<u32>,
    /// Vehicles waiting.
    #[serde(default)]
    pub waiting: Option<u32>,
}

/// Response of `GET /stats/superCharger/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationStats {
    /// Station title.
    pub title: String,
    /// Country the station belongs to.
    pub country: String,
    /// Time series, oldest first.
    #[serde(default)]
    pub items: Vec<TimeSeriesPoint>,
}

/// A row of `GET /overview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewRow {
    /// Station location identifier.
    pub location_id: String,
    /// Station title.
    pub title: String,
    /// Country name.
    #[serde(default)]
    pub country: Option<String>,
    /// Declared stall count.
    #[serde(default)]
    pub stalls: Option<u32>,
    /// Time of the latest check-in.
    #[serde(default)]
    pub last_checkin: Option<DateTime<Utc>>,
    /// Latest problem classification.
    #[serde(default)]
    pub problem: Option<ProblemKind>,
}
