//! Station selection state machine.
//!
//! ```text
//! Idle --begin_locate--> Locating --position_acquired--> Searching
//!                           |                               |
//!                           +--position_failed--> Idle      +--single match + auto_select--> Selected
//!                                                           +--pick--> Selected
//! any --search/clear--> Searching/Idle (leaving Selected emits Cleared)
//! ```
//!
//! Every lookup is identified by a [`LookupTicket`] carrying a monotonic
//! sequence number. Results for anything but the latest ticket are
//! discarded, so a slow response to an old query can never replace the
//! candidates (or the selection) of a newer one.

use std::sync::Arc;
use std::time::Duration;

use suc_status_client::{StationDirectory, lookup, query::format_coordinates};
use suc_status_station_models::Station;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::geolocation::{GeolocationError, Geolocator, Position, locate_with_timeout};

/// Errors from selector transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// No geolocation capability is available.
    #[error("Geolocation is not available")]
    GeolocationUnavailable,

    /// A position fix was requested but failed.
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
}

/// Identity of one lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    seq: u64,
    query: String,
}

impl LookupTicket {
    /// Monotonic sequence number.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// Query text sent to the directory.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Current selector state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectorState {
    /// Nothing in progress, nothing selected.
    #[default]
    Idle,
    /// Waiting for a position fix.
    Locating,
    /// Waiting for, or showing, lookup candidates.
    Searching {
        /// Candidates of the latest applied lookup.
        candidates: Vec<Station>,
    },
    /// A station is selected.
    Selected(Station),
}

/// Selection changes the check-in form reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorEvent {
    /// A station became selected.
    Selected(Station),
    /// The previous selection was dropped.
    Cleared,
}

/// Result of applying lookup results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The ticket was superseded; nothing changed.
    Stale,
    /// Candidates are waiting for an explicit pick.
    Candidates(usize),
    /// The single candidate was selected automatically.
    AutoSelected(Station),
}

/// Binds search text, geolocation and lookup results into one selection.
#[derive(Debug, Clone)]
pub struct StationSelector {
    state: SelectorState,
    search_text: String,
    auto_select: bool,
    next_seq: u64,
    latest_seq: Option<u64>,
    focus_results: bool,
}

impl StationSelector {
    /// Creates an idle selector. With `auto_select`, an unambiguous lookup
    /// selects its only candidate.
    #[must_use]
    pub const fn new(auto_select: bool) -> Self {
        Self {
            state: SelectorState::Idle,
            search_text: String::new(),
            auto_select,
            next_seq: 0,
            latest_seq: None,
            focus_results: false,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SelectorState {
        &self.state
    }

    /// Current search text.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Selected station, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<&Station> {
        match &self.state {
            SelectorState::Selected(station) => Some(station),
            _ => None,
        }
    }

    /// Candidates of the latest applied lookup.
    #[must_use]
    pub fn candidates(&self) -> &[Station] {
        match &self.state {
            SelectorState::Searching { candidates } => candidates,
            _ => &[],
        }
    }

    /// Returns and resets the request to move focus to the result list,
    /// raised when a position fix fills in the search text.
    pub const fn take_focus_request(&mut self) -> bool {
        std::mem::replace(&mut self.focus_results, false)
    }

    /// Starts acquiring a position.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::GeolocationUnavailable`] (state unchanged)
    /// if `available` is false.
    pub fn begin_locate(
        &mut self,
        available: bool,
    ) -> Result<Option<SelectorEvent>, SelectorError> {
        if !available {
            log::error!("Geolocation not available");
            return Err(SelectorError::GeolocationUnavailable);
        }
        log::info!("Locating...");
        self.latest_seq = None;
        Ok(self.transition(SelectorState::Locating))
    }

    /// Fills the search text with the position and starts a lookup.
    /// Ignored (returns `None`) unless the selector is still locating.
    pub fn position_acquired(&mut self, position: Position) -> Option<LookupTicket> {
        if self.state != SelectorState::Locating {
            log::debug!("Ignoring position fix outside of Locating: {position:?}");
            return None;
        }
        log::info!("Position acquired: {position:?}");
        self.search_text = format_coordinates(position.latitude, position.longitude);
        self.focus_results = true;
        self.state = SelectorState::Searching {
            candidates: Vec::new(),
        };
        Some(self.issue_ticket())
    }

    /// Returns to idle after a failed position fix.
    pub fn position_failed(&mut self) {
        if self.state == SelectorState::Locating {
            self.state = SelectorState::Idle;
        }
    }

    /// Starts a new search for `text`, superseding any in-flight lookup.
    pub fn search(&mut self, text: &str) -> (LookupTicket, Option<SelectorEvent>) {
        log::debug!("Search text changed to '{text}'");
        self.search_text = text.to_string();
        let event = self.transition(SelectorState::Searching {
            candidates: Vec::new(),
        });
        (self.issue_ticket(), event)
    }

    /// Applies lookup results for `ticket`.
    pub fn apply_results(&mut self, ticket: &LookupTicket, stations: Vec<Station>) -> ApplyOutcome {
        let searching = matches!(self.state, SelectorState::Searching { .. });
        if !searching || self.latest_seq != Some(ticket.seq) {
            log::debug!(
                "Discarding stale lookup #{} for '{}' ({} result(s))",
                ticket.seq,
                ticket.query,
                stations.len()
            );
            return ApplyOutcome::Stale;
        }

        self.latest_seq = None;
        if self.auto_select && stations.len() == 1 {
            let station = stations[0].clone();
            log::info!("Auto-selecting only match: {}", station.location_id);
            self.state = SelectorState::Selected(station.clone());
            return ApplyOutcome::AutoSelected(station);
        }

        let count = stations.len();
        self.state = SelectorState::Searching {
            candidates: stations,
        };
        ApplyOutcome::Candidates(count)
    }

    /// Selects `station` explicitly. Always allowed.
    pub fn pick(&mut self, station: Station) -> SelectorEvent {
        log::info!("Item changed to {}", station.location_id);
        self.latest_seq = None;
        self.search_text.clone_from(&station.title);
        self.state = SelectorState::Selected(station.clone());
        SelectorEvent::Selected(station)
    }

    /// Drops the selection and search text.
    pub fn clear(&mut self) -> Option<SelectorEvent> {
        self.search_text.clear();
        self.latest_seq = None;
        self.transition(SelectorState::Idle)
    }

    /// Acquires a position and looks up stations around it.
    ///
    /// Returns the selection events raised along the way together with the
    /// outcome. Events are reported even when locating fails: a `Cleared`
    /// when a previous selection is dropped, and a `Selected` when the
    /// lookup auto-selects its only match.
    ///
    /// The outcome is [`SelectorError::GeolocationUnavailable`] without a
    /// `geolocator`, or [`SelectorError::Geolocation`] if no fix arrives
    /// within `timeout` (the selector is back in `Idle`).
    pub async fn locate(
        &mut self,
        geolocator: Option<&dyn Geolocator>,
        directory: &dyn StationDirectory,
        timeout: Duration,
    ) -> (Vec<SelectorEvent>, Result<(), SelectorError>) {
        let mut events = Vec::new();
        let Some(geolocator) = geolocator else {
            return (events, self.begin_locate(false).map(|_| ()));
        };
        match self.begin_locate(true) {
            Ok(event) => events.extend(event),
            Err(e) => return (events, Err(e)),
        }

        let position = match locate_with_timeout(geolocator, timeout).await {
            Ok(position) => position,
            Err(e) => {
                log::error!("Failed to get position: {e}");
                self.position_failed();
                return (events, Err(e.into()));
            }
        };

        if let Some(ticket) = self.position_acquired(position) {
            let stations = lookup::search(directory, ticket.query()).await;
            events.extend(self.apply_and_report(&ticket, stations));
        }
        (events, Ok(()))
    }

    /// Searches for `text` and applies the results.
    pub async fn run_search(
        &mut self,
        text: &str,
        directory: &dyn StationDirectory,
    ) -> Vec<SelectorEvent> {
        let (ticket, cleared) = self.search(text);
        let mut events: Vec<SelectorEvent> = cleared.into_iter().collect();
        let stations = lookup::search(directory, ticket.query()).await;
        events.extend(self.apply_and_report(&ticket, stations));
        events
    }

    fn apply_and_report(
        &mut self,
        ticket: &LookupTicket,
        stations: Vec<Station>,
    ) -> Option<SelectorEvent> {
        match self.apply_results(ticket, stations) {
            ApplyOutcome::AutoSelected(station) => Some(SelectorEvent::Selected(station)),
            ApplyOutcome::Stale | ApplyOutcome::Candidates(_) => None,
        }
    }

    fn transition(&mut self, next: SelectorState) -> Option<SelectorEvent> {
        let was_selected = matches!(self.state, SelectorState::Selected(_));
        self.state = next;
        was_selected.then_some(SelectorEvent::Cleared)
    }

    fn issue_ticket(&mut self) -> LookupTicket {
        self.next_seq += 1;
        self.latest_seq = Some(self.next_seq);
        LookupTicket {
            seq: self.next_seq,
            query: self.search_text.clone(),
        }
    }
}

/// Lookup results delivered by a [`LookupDispatcher`].
#[derive(Debug)]
pub struct LookupResponse {
    /// Ticket the lookup was issued for.
    pub ticket: LookupTicket,
    /// Candidates (empty on failure).
    pub stations: Vec<Station>,
}

/// Runs lookups on background tasks, aborting whichever lookup a newer
/// dispatch supersedes.
pub struct LookupDispatcher {
    directory: Arc<dyn StationDirectory>,
    tx: mpsc::UnboundedSender<LookupResponse>,
    in_flight: Option<JoinHandle<()>>,
}

impl LookupDispatcher {
    /// Creates a dispatcher and the receiver its responses arrive on.
    #[must_use]
    pub fn new(
        directory: Arc<dyn StationDirectory>,
    ) -> (Self, mpsc::UnboundedReceiver<LookupResponse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                directory,
                tx,
                in_flight: None,
            },
            rx,
        )
    }

    /// Spawns the lookup for `ticket`, cancelling the previous one.
    pub fn dispatch(&mut self, ticket: LookupTicket) {
        self.cancel();

        let directory = Arc::clone(&self.directory);
        let tx = self.tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let stations = lookup::search(directory.as_ref(), ticket.query()).await;
            if tx.send(LookupResponse { ticket, stations }).is_err() {
                log::debug!("Lookup receiver dropped");
            }
        }));
    }

    /// Aborts the in-flight lookup, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl Drop for LookupDispatcher {
    fn drop(&mut self) {
        self.cancel();
    }
}
