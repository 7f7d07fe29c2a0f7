//! Infallible station lookups.
//!
//! Failures are logged and surface as an empty candidate list so that a
//! lookup can never corrupt the caller's selection state. Callers that
//! care about ordering track request identity themselves.

use suc_status_station_models::Station;

use crate::StationDirectory;
use crate::query::{LookupQuery, format_coordinates};

/// Searches the directory for `text`.
///
/// Queries the directory would ignore (fewer than
/// [`crate::query::MIN_QUERY_LEN`] characters) short-circuit without a
/// request.
pub async fn search(directory: &dyn StationDirectory, text: &str) -> Vec<Station> {
    let query = LookupQuery::parse(text);
    if !query.is_searchable() {
        log::debug!("Skipping lookup for short query '{text}'");
        return Vec::new();
    }

    let query = query.to_query_string();
    match directory.lookup(&query).await {
        Ok(stations) => {
            log::debug!("Lookup '{query}' returned {} station(s)", stations.len());
            stations
        }
        Err(e) => {
            log::error!("Lookup '{query}' failed: {e}");
            Vec::new()
        }
    }
}

/// Searches the directory for stations near a position.
pub async fn search_by_coordinates(
    directory: &dyn StationDirectory,
    latitude: f64,
    longitude: f64,
) -> Vec<Station> {
    search(directory, &format_coordinates(latitude, longitude)).await
}
