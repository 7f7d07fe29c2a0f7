//! Hierarchical statistics navigation.
//!
//! The view is driven by path parameters rather than explicit
//! transitions: every [`StatsNavigator::navigate`] re-derives the state
//! from the parameters it is given.
//!
//! | parameters          | fetch                          | state             |
//! |---------------------|--------------------------------|-------------------|
//! | none                | `GET /stats`                   | `AllCountries`    |
//! | country             | `GET /stats/country/{c}`       | `CountrySelected` |
//! | station (± country) | `GET /stats/superCharger/{id}` | `StationSelected` |

use strum_macros::{AsRefStr, Display};
use suc_status_client::{ClientError, StatsApi};
use suc_status_station_models::{CountrySummary, StationStats, StationSummary};

use crate::chart::ChartTable;

const STATS_ROOT: &str = "stats";

/// Path parameters of the statistics view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationParams {
    /// Country to drill into.
    pub country: Option<String>,
    /// Station location id to drill into.
    pub station: Option<String>,
}

impl NavigationParams {
    /// Parses `/stats`, `/stats/{country}` or `/stats/{country}/{station}`.
    /// Returns `None` for any other path.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let mut segments = path.trim_matches('/').split('/');
        if segments.next()? != STATS_ROOT {
            return None;
        }
        let mut next = || {
            segments
                .next()
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let params = Self {
            country: next(),
            station: next(),
        };
        if segments.next().is_some() {
            return None;
        }
        Some(params)
    }
}

/// How deep the view is drilled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum NavigationState {
    /// Country summary list.
    #[default]
    AllCountries,
    /// One country's stations.
    CountrySelected,
    /// One station's time series.
    StationSelected,
}

/// Holds the statistics view's selection and the data loaded for it.
#[derive(Debug, Clone, Default)]
pub struct StatsNavigator {
    state: NavigationState,
    country: Option<String>,
    station: Option<String>,
    countries: Vec<CountrySummary>,
    stations: Vec<StationSummary>,
    station_stats: Option<StationStats>,
    chart: Option<ChartTable>,
}

impl StatsNavigator {
    /// Creates a navigator with nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> NavigationState {
        self.state
    }

    /// Held country.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Held station id.
    #[must_use]
    pub fn station(&self) -> Option<&str> {
        self.station.as_deref()
    }

    /// Last loaded country summaries.
    #[must_use]
    pub fn countries(&self) -> &[CountrySummary] {
        &self.countries
    }

    /// Last loaded station list of the held country.
    #[must_use]
    pub fn stations(&self) -> &[StationSummary] {
        &self.stations
    }

    /// Last loaded station detail.
    #[must_use]
    pub const fn station_stats(&self) -> Option<&StationStats> {
        self.station_stats.as_ref()
    }

    /// Chart table of the selected station.
    #[must_use]
    pub const fn chart(&self) -> Option<&ChartTable> {
        self.chart.as_ref()
    }

    /// Re-evaluates the view for `params`.
    ///
    /// # Errors
    ///
    /// Returns the [`ClientError`] of the primary fetch. The state and all
    /// previously loaded data are left untouched in that case.
    pub async fn navigate(
        &mut self,
        params: &NavigationParams,
        api: &dyn StatsApi,
    ) -> Result<NavigationState, ClientError> {
        let result = match (&params.station, &params.country) {
            (Some(station), _) => self.show_station(station, api).await,
            (None, Some(country)) => self.show_country(country, api).await,
            (None, None) => self.show_all(api).await,
        };
        if let Err(e) = &result {
            log::error!("Failed to load statistics for {params:?}: {e}");
        }
        result.map(|()| self.state)
    }

    /// The path mirroring the current state.
    #[must_use]
    pub fn path(&self) -> String {
        match (self.state, &self.country, &self.station) {
            (NavigationState::StationSelected, Some(country), Some(station)) => {
                format!("/{STATS_ROOT}/{country}/{station}")
            }
            (
                NavigationState::CountrySelected | NavigationState::StationSelected,
                Some(country),
                _,
            ) => format!("/{STATS_ROOT}/{country}"),
            _ => format!("/{STATS_ROOT}"),
        }
    }

    async fn show_all(&mut self, api: &dyn StatsApi) -> Result<(), ClientError> {
        self.countries = api.country_summaries().await?;
        log::debug!("Loaded {} country summaries", self.countries.len());
        self.state = NavigationState::AllCountries;
        self.country = None;
        self.clear_station();
        self.stations.clear();
        Ok(())
    }

    async fn show_country(&mut self, country: &str, api: &dyn StatsApi) -> Result<(), ClientError> {
        self.stations = api.country_stations(country).await?;
        log::debug!("Loaded {} station(s) for {country}", self.stations.len());
        self.state = NavigationState::CountrySelected;
        self.country = Some(country.to_string());
        self.clear_station();
        Ok(())
    }

    async fn show_station(&mut self, station: &str, api: &dyn StatsApi) -> Result<(), ClientError> {
        let stats = api.station_stats(station).await?;
        log::debug!("Loaded {} sample(s) for {station}", stats.items.len());

        if self.country.as_deref() != Some(stats.country.as_str()) {
            log::info!(
                "Station {station} belongs to {}, switching country",
                stats.country
            );
            self.country = Some(stats.country.clone());
            match api.country_stations(&stats.country).await {
                Ok(stations) => self.stations = stations,
                Err(e) => {
                    log::error!("Failed to load stations for {}: {e}", stats.country);
                    self.stations.clear();
                }
            }
        }

        self.state = NavigationState::StationSelected;
        self.station = Some(station.to_string());
        self.chart = Some(ChartTable::from_points(&stats.items));
        self.station_stats = Some(stats);
        Ok(())
    }

    fn clear_station(&mut self) {
        self.station = None;
        self.station_stats = None;
        self.chart = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeStats, point, station_summary};

    fn backend() -> FakeStats {
        let mut api = FakeStats {
            countries: Some(vec![CountrySummary {
                country: "Switzerland".to_string(),
                super_chargers: Some(20),
                checkins: Some(400),
            }]),
            ..FakeStats::default()
        };
        api.stations.insert(
            "Switzerland".to_string(),
            vec![station_summary("dietikon", "Switzerland")],
        );
        api.stations.insert(
            "Germany".to_string(),
            vec![station_summary("ulm", "Germany")],
        );
        api.station_stats.insert(
            "ulm".to_string(),
            StationStats {
                title: "Ulm".to_string(),
                country: "Germany".to_string(),
                items: vec![point(10, 12, Some(4))],
            },
        );
        api
    }

    fn params(country: Option<&str>, station: Option<&str>) -> NavigationParams {
        NavigationParams {
            country: country.map(str::to_string),
            station: station.map(str::to_string),
        }
    }

    #[test]
    fn parses_stats_paths() {
        assert_eq!(NavigationParams::from_path("/stats"), Some(params(None, None)));
        assert_eq!(
            NavigationParams::from_path("/stats/Germany/"),
            Some(params(Some("Germany"), None))
        );
        assert_eq!(
            NavigationParams::from_path("/stats/Germany/ulm"),
            Some(params(Some("Germany"), Some("ulm")))
        );
        assert_eq!(NavigationParams::from_path("/history"), None);
        assert_eq!(NavigationParams::from_path("/stats/a/b/c"), None);
    }

    #[tokio::test]
    async fn root_loads_country_summaries() {
        let api = backend();
        let mut nav = StatsNavigator::new();
        let state = nav.navigate(&params(None, None), &api).await.unwrap();
        assert_eq!(state, NavigationState::AllCountries);
        assert_eq!(nav.countries().len(), 1);
        assert_eq!(nav.path(), "/stats");
    }

    #[tokio::test]
    async fn country_drill_down_clears_station() {
        let api = backend();
        let mut nav = StatsNavigator::new();
        nav.navigate(&params(Some("Germany"), Some("ulm")), &api)
            .await
            .unwrap();
        let state = nav
            .navigate(&params(Some("Switzerland"), None), &api)
            .await
            .unwrap();

        assert_eq!(state, NavigationState::CountrySelected);
        assert_eq!(nav.country(), Some("Switzerland"));
        assert_eq!(nav.station(), None);
        assert!(nav.chart().is_none());
        assert_eq!(nav.stations()[0].location_id, "dietikon");
        assert_eq!(nav.path(), "/stats/Switzerland");
    }

    #[tokio::test]
    async fn station_from_another_country_switches_country() {
        let api = backend();
        let mut nav = StatsNavigator::new();
        nav.navigate(&params(Some("Switzerland"), None), &api)
            .await
            .unwrap();

        let state = nav
            .navigate(&params(Some("Switzerland"), Some("ulm")), &api)
            .await
            .unwrap();
        assert_eq!(state, NavigationState::StationSelected);
        assert_eq!(nav.country(), Some("Germany"));
        assert_eq!(nav.stations()[0].location_id, "ulm");
        assert_eq!(nav.chart().unwrap().rows().len(), 1);
        assert_eq!(nav.path(), "/stats/Germany/ulm");
        assert_eq!(
            api.calls(),
            vec![
                "/stats/country/Switzerland",
                "/stats/superCharger/ulm",
                "/stats/country/Germany",
            ]
        );
    }

    #[tokio::test]
    async fn station_in_held_country_skips_station_list_reload() {
        let api = backend();
        let mut nav = StatsNavigator::new();
        nav.navigate(&params(Some("Germany"), None), &api)
            .await
            .unwrap();
        nav.navigate(&params(Some("Germany"), Some("ulm")), &api)
            .await
            .unwrap();
        assert_eq!(
            api.calls(),
            vec!["/stats/country/Germany", "/stats/superCharger/ulm"]
        );
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_view() {
        let api = backend();
        let mut nav = StatsNavigator::new();
        nav.navigate(&params(Some("Germany"), Some("ulm")), &api)
            .await
            .unwrap();

        assert!(
            nav.navigate(&params(Some("Germany"), Some("gone")), &api)
                .await
                .is_err()
        );
        assert_eq!(nav.state(), NavigationState::StationSelected);
        assert_eq!(nav.station(), Some("ulm"));
        assert!(nav.chart().is_some());

        assert!(nav.navigate(&params(Some("France"), None), &api).await.is_err());
        assert_eq!(nav.path(), "/stats/Germany/ulm");
    }
}
