//! Recent check-ins and the station overview.

use suc_status_client::{ClientError, StatsApi};
use suc_status_station_models::{HistoryEntry, OverviewRow};

/// Number of check-ins requested per history load.
pub const DEFAULT_HISTORY_LIMIT: u32 = 500;

/// Filterable list of recent check-ins.
#[derive(Debug, Clone)]
pub struct HistoryView {
    filter: String,
    limit: u32,
    entries: Vec<HistoryEntry>,
}

impl Default for HistoryView {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistoryView {
    /// Creates an empty view loading up to `limit` entries.
    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self {
            filter: String::new(),
            limit,
            entries: Vec::new(),
        }
    }

    /// Current filter text.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Maximum number of entries per load.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Last loaded entries.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Updates the filter, returning whether it changed and the view
    /// therefore needs a reload.
    pub fn set_filter(&mut self, filter: &str) -> bool {
        if self.filter == filter {
            return false;
        }
        filter.clone_into(&mut self.filter);
        true
    }

    /// Fetches the entries for the current filter. On failure the
    /// previous entries are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn load(&mut self, api: &dyn StatsApi) -> Result<usize, ClientError> {
        match api.history(self.limit, &self.filter).await {
            Ok(entries) => {
                log::debug!(
                    "Loaded {} history entries for filter '{}'",
                    entries.len(),
                    self.filter
                );
                self.entries = entries;
                Ok(self.entries.len())
            }
            Err(e) => {
                log::error!("Failed to load history: {e}");
                Err(e)
            }
        }
    }
}

/// Fetches the station overview, optionally keeping only stations whose
/// latest check-in reports a problem.
///
/// # Errors
///
/// Returns [`ClientError`] if the request fails.
pub async fn load_overview(
    api: &dyn StatsApi,
    problems_only: bool,
) -> Result<Vec<OverviewRow>, ClientError> {
    let rows = api.overview().await.inspect_err(|e| {
        log::error!("Failed to load overview: {e}");
    })?;
    if !problems_only {
        return Ok(rows);
    }
    Ok(rows
        .into_iter()
        .filter(|row| row.problem.is_some_and(|p| p.is_problem()))
        .collect())
}
