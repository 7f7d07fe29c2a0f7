use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone as _, Utc};
use suc_status_client::{ClientError, StatsApi};
use suc_status_station_models::{
    CountrySummary, HistoryEntry, OverviewRow, StationStats, StationSummary, TimeSeriesPoint,
};

pub fn unavailable() -> ClientError {
    ClientError::Status {
        status: 503,
        status_text: "Service Unavailable".to_string(),
        message: None,
    }
}

pub fn point(hour: u32, stalls: u32, charging: Option<u32>) -> TimeSeriesPoint {
    TimeSeriesPoint {
        time: Utc.with_ymd_and_hms(2016, 7, 28, hour, 0, 0).unwrap(),
        stalls: Some(stalls),
        charging,
        blocked: Some(0),
        waiting: Some(1),
    }
}

pub fn station_summary(id: &str, country: &str) -> StationSummary {
    StationSummary {
        location_id: id.to_string(),
        title: id.to_uppercase(),
        country: Some(country.to_string()),
        stalls: Some(8),
        checkins: Some(3),
    }
}

/// In-memory statistics backend. Missing entries answer with a 503.
#[derive(Default)]
pub struct FakeStats {
    pub countries: Option<Vec<CountrySummary>>,
    pub stations: BTreeMap<String, Vec<StationSummary>>,
    pub station_stats: BTreeMap<String, StationStats>,
    pub history: Option<Vec<HistoryEntry>>,
    pub overview: Option<Vec<OverviewRow>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeStats {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StatsApi for FakeStats {
    async fn country_summaries(&self) -> Result<Vec<CountrySummary>, ClientError> {
        self.record("/stats".to_string());
        self.countries.clone().ok_or_else(unavailable)
    }

    async fn country_stations(&self, country: &str) -> Result<Vec<StationSummary>, ClientError> {
        self.record(format!("/stats/country/{country}"));
        self.stations.get(country).cloned().ok_or_else(unavailable)
    }

    async fn station_stats(&self, location_id: &str) -> Result<StationStats, ClientError> {
        self.record(format!("/stats/superCharger/{location_id}"));
        self.station_stats
            .get(location_id)
            .cloned()
            .ok_or_else(unavailable)
    }

    async fn history(&self, limit: u32, filter: &str) -> Result<Vec<HistoryEntry>, ClientError> {
        self.record(format!("/checkin?limit={limit}&filter={filter}"));
        self.history.clone().ok_or_else(unavailable)
    }

    async fn overview(&self) -> Result<Vec<OverviewRow>, ClientError> {
        self.record("/overview".to_string());
        self.overview.clone().ok_or_else(unavailable)
    }
}
