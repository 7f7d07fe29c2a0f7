//! Check-in form: selection, record state and submission.
//!
//! A [`CheckinFormController`] owns one form instance. It reacts to the
//! [`StationSelector`]'s selection events by reinitializing the
//! [`CheckinRecord`] according to the form's [`CarryOverPolicy`], builds
//! the tagged [`Report`] for its [`ReportKind`], and guards submission
//! with a `submitting` flag so at most one report is in flight.

use std::time::Duration;

use chrono::{
    DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike, Utc,
};
use serde::Deserialize;
use strum_macros::{AsRefStr, Display};
use suc_status_client::{ClientError, ReportApi, StationDirectory};
use suc_status_station_models::{
    ChargingStatusReport, InterruptionReport, ProblemKind, Report, ReportKind, StandardCheckin,
    Station,
};
use thiserror::Error;

use crate::geolocation::{Geolocator, Position};
use crate::reporter::ReporterCookie;
use crate::selector::{ApplyOutcome, LookupTicket, SelectorError, SelectorEvent, StationSelector};
use crate::stalls::{StallLabeling, StallsSelector};
use crate::toast::{ToastSink, Toaster};

/// Toast shown after a successful submission.
pub const SUBMITTED_TEXT: &str = "Submitted, thank you.";

/// Prefix of the toast shown after a failed submission.
pub const FAILED_PREFIX: &str = "Failed to submit: ";

/// How far into the future an observation time may lie.
pub const MAX_FUTURE_SKEW: TimeDelta = TimeDelta::hours(1);

/// Errors from the check-in form.
#[derive(Debug, Error)]
pub enum FormError {
    /// Submission requires a selected station.
    #[error("No station selected")]
    NoStation,

    /// A previous submission has not completed yet.
    #[error("A submission is already in progress")]
    AlreadySubmitting,

    /// The observation time lies too far in the future.
    #[error("Time {time} is more than an hour in the future")]
    FutureTime {
        /// The rejected observation time.
        time: DateTime<Utc>,
    },

    /// The local wall-clock time does not exist in the time zone (DST gap).
    #[error("Local time {time} does not exist in this time zone")]
    InvalidLocalTime {
        /// The rejected local time.
        time: NaiveDateTime,
    },

    /// An interruption report needs a problem other than `none`.
    #[error("An interruption report requires a problem")]
    MissingProblem,

    /// A charging-status report needs the station's capacity.
    #[error("Station has no declared stall count")]
    MissingCapacity,

    /// A counter exceeds the station's capacity.
    #[error("{field} ({count}) must not exceed the number of stalls ({stalls})")]
    CountExceedsStalls {
        /// Name of the offending counter.
        field: &'static str,
        /// Its value.
        count: u32,
        /// The station's capacity.
        stalls: u32,
    },

    /// Station selection failed.
    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// The backend rejected the report or could not be reached.
    #[error("Failed to submit: {0}")]
    Submit(#[source] ClientError),
}

/// Whether a newly selected station prefills the form from its last
/// check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CarryOverPolicy {
    /// Problem, notes and affected stalls come from the station's last
    /// check-in (defaults when absent).
    LastCheckin,
    /// Counters zeroed, problem `none`, notes and stalls empty.
    Reset,
}

/// Behaviour of the check-in forms, read from the `[checkin]` config
/// section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Select a lookup's only candidate without asking.
    pub auto_select: bool,
    /// Capacity-to-label mapping for affected stalls.
    pub stall_labeling: StallLabeling,
    /// Policy for [`ReportKind::Standard`].
    pub standard: CarryOverPolicy,
    /// Policy for [`ReportKind::Interruption`].
    pub interruption: CarryOverPolicy,
    /// Policy for [`ReportKind::ChargingStatus`].
    pub charging_status: CarryOverPolicy,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            auto_select: true,
            stall_labeling: StallLabeling::default(),
            standard: CarryOverPolicy::Reset,
            interruption: CarryOverPolicy::LastCheckin,
            charging_status: CarryOverPolicy::Reset,
        }
    }
}

impl FormConfig {
    /// Carry-over policy for forms of `kind`.
    #[must_use]
    pub const fn policy_for(&self, kind: ReportKind) -> CarryOverPolicy {
        match kind {
            ReportKind::Standard => self.standard,
            ReportKind::Interruption => self.interruption,
            ReportKind::ChargingStatus => self.charging_status,
        }
    }
}

/// Editable state of one check-in. Affected stalls live in the form's
/// [`StallsSelector`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckinRecord {
    station: Option<Station>,
    /// Observation date; today when unset.
    pub date: Option<NaiveDate>,
    /// Observation time of day; now when unset.
    pub time: Option<NaiveTime>,
    /// Reporter identifier, may be empty.
    pub reporter_id: String,
    /// Vehicles blocking a stall without charging.
    pub blocked: u32,
    /// Vehicles waiting for a stall.
    pub waiting: u32,
    /// Vehicles charging.
    pub charging: u32,
    /// Problem classification.
    pub problem: ProblemKind,
    /// Free-text notes.
    pub notes: String,
}

impl CheckinRecord {
    /// The station being reported on.
    #[must_use]
    pub const fn station(&self) -> Option<&Station> {
        self.station.as_ref()
    }

    /// Clears everything reported about a station. The observation date and
    /// time and the reporter id are kept.
    fn reset(&mut self) {
        *self = Self {
            date: self.date,
            time: self.time,
            reporter_id: std::mem::take(&mut self.reporter_id),
            ..Self::default()
        };
    }
}

/// Merges a date and a time of day, dropping seconds and sub-seconds.
#[must_use]
pub fn merge_timestamp(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    let minute = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(NaiveTime::MIN);
    date.and_time(minute)
}

/// A validated report whose form is marked as submitting.
#[derive(Debug, Clone)]
pub struct Submission {
    report: Report,
}

impl Submission {
    /// The report to post.
    #[must_use]
    pub const fn report(&self) -> &Report {
        &self.report
    }

    /// Posts the report. One call is one request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the backend rejects the report or cannot
    /// be reached.
    pub async fn send(&self, api: &dyn ReportApi) -> Result<(), ClientError> {
        log::info!(
            "Submitting {} report for {} observed at {}",
            self.report.kind(),
            self.report.location_id(),
            self.report.time()
        );
        api.submit(&self.report).await
    }
}

/// One check-in form instance.
#[derive(Debug)]
pub struct CheckinFormController {
    kind: ReportKind,
    config: FormConfig,
    selector: StationSelector,
    stalls: StallsSelector,
    record: CheckinRecord,
    submitting: bool,
    cookie: Option<ReporterCookie>,
}

impl CheckinFormController {
    /// Creates an empty form submitting reports of `kind`.
    #[must_use]
    pub fn new(kind: ReportKind, config: FormConfig) -> Self {
        Self {
            kind,
            selector: StationSelector::new(config.auto_select),
            stalls: StallsSelector::new(config.stall_labeling),
            config,
            record: CheckinRecord::default(),
            submitting: false,
            cookie: None,
        }
    }

    /// Prefills the reporter id from `cookie` and remembers it there after
    /// every successful submission.
    #[must_use]
    pub fn with_cookie(mut self, cookie: ReporterCookie) -> Self {
        match cookie.load() {
            Ok(Some(id)) => self.record.reporter_id = id,
            Ok(None) => {}
            Err(e) => log::warn!("Ignoring reporter cookie {}: {e}", cookie.path().display()),
        }
        self.cookie = Some(cookie);
        self
    }

    /// Report kind this form submits.
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        self.kind
    }

    /// Form behaviour.
    #[must_use]
    pub const fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Station selection state.
    #[must_use]
    pub const fn selector(&self) -> &StationSelector {
        &self.selector
    }

    /// Affected-stalls selection.
    #[must_use]
    pub const fn stalls(&self) -> &StallsSelector {
        &self.stalls
    }

    /// Affected-stalls selection, for toggling.
    pub const fn stalls_mut(&mut self) -> &mut StallsSelector {
        &mut self.stalls
    }

    /// Current record.
    #[must_use]
    pub const fn record(&self) -> &CheckinRecord {
        &self.record
    }

    /// Current record, for editing.
    pub const fn record_mut(&mut self) -> &mut CheckinRecord {
        &mut self.record
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the submit action should be enabled.
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        self.record.station.is_some() && !self.submitting
    }

    // -- selection ----------------------------------------------------------

    /// Starts acquiring a position.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Selector`] if geolocation is unavailable.
    pub fn begin_locate(&mut self, available: bool) -> Result<(), FormError> {
        let event = self.selector.begin_locate(available)?;
        self.handle_event(event);
        Ok(())
    }

    /// Feeds a position fix to the selector.
    pub fn position_acquired(&mut self, position: Position) -> Option<LookupTicket> {
        self.selector.position_acquired(position)
    }

    /// Reports a failed position fix.
    pub fn position_failed(&mut self) {
        self.selector.position_failed();
    }

    /// Starts a new search, dropping any selected station.
    pub fn search(&mut self, text: &str) -> LookupTicket {
        let (ticket, event) = self.selector.search(text);
        self.handle_event(event);
        ticket
    }

    /// Applies lookup results for `ticket`.
    pub fn apply_results(&mut self, ticket: &LookupTicket, stations: Vec<Station>) -> ApplyOutcome {
        let outcome = self.selector.apply_results(ticket, stations);
        if let ApplyOutcome::AutoSelected(station) = &outcome {
            self.on_station_selected(station.clone());
        }
        outcome
    }

    /// Selects `station` explicitly.
    pub fn select_station(&mut self, station: Station) {
        let event = self.selector.pick(station);
        self.handle_event(Some(event));
    }

    /// Drops the selected station and the search text.
    pub fn clear_station(&mut self) {
        let event = self.selector.clear();
        self.handle_event(event);
        self.reset_record();
    }

    /// Locates the user and looks up nearby stations. A previously selected
    /// station is dropped even when no position can be acquired.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Selector`] if no position could be acquired.
    pub async fn locate(
        &mut self,
        geolocator: Option<&dyn Geolocator>,
        directory: &dyn StationDirectory,
        timeout: Duration,
    ) -> Result<(), FormError> {
        let (events, result) = self.selector.locate(geolocator, directory, timeout).await;
        for event in events {
            self.handle_event(Some(event));
        }
        result.map_err(FormError::from)
    }

    /// Searches for `text` and applies the results.
    pub async fn run_search(&mut self, text: &str, directory: &dyn StationDirectory) {
        for event in self.selector.run_search(text, directory).await {
            self.handle_event(Some(event));
        }
    }

    fn handle_event(&mut self, event: Option<SelectorEvent>) {
        match event {
            Some(SelectorEvent::Selected(station)) => self.on_station_selected(station),
            Some(SelectorEvent::Cleared) => self.reset_record(),
            None => {}
        }
    }

    fn on_station_selected(&mut self, station: Station) {
        let policy = self.config.policy_for(self.kind);
        log::debug!(
            "Initializing {} form for {} ({policy})",
            self.kind,
            station.location_id
        );

        self.record.reset();
        self.stalls.reset_for_capacity(station.stalls);
        if policy == CarryOverPolicy::LastCheckin
            && let Some(last) = &station.checkin
        {
            self.record.problem = last.problem.unwrap_or_default();
            self.record.notes = last.notes.clone().unwrap_or_default();
            self.stalls.set_selected(&last.affected_stalls);
        }
        self.record.station = Some(station);
    }

    fn reset_record(&mut self) {
        self.record.reset();
        self.stalls.reset_for_capacity(None);
    }

    // -- submission ---------------------------------------------------------

    /// Validates the record against the local time zone and marks the form
    /// as submitting.
    ///
    /// # Errors
    ///
    /// See [`Self::prepare_submission_in`].
    pub fn prepare_submission(&mut self, now: DateTime<Utc>) -> Result<Submission, FormError> {
        self.prepare_submission_in(&Local, now)
    }

    /// Validates the record, interpreting its date and time in `tz`, and
    /// marks the form as submitting.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::AlreadySubmitting`] while a submission is in
    /// flight, [`FormError::NoStation`] without a station, and the
    /// validation errors of the report kind otherwise.
    pub fn prepare_submission_in<Tz: TimeZone>(
        &mut self,
        tz: &Tz,
        now: DateTime<Utc>,
    ) -> Result<Submission, FormError> {
        if self.submitting {
            log::warn!("Ignoring submit while a submission is in flight");
            return Err(FormError::AlreadySubmitting);
        }
        let station = self.record.station.as_ref().ok_or(FormError::NoStation)?;

        let local_now = now.with_timezone(tz).naive_local();
        let merged = merge_timestamp(
            self.record.date.unwrap_or_else(|| local_now.date()),
            self.record.time.unwrap_or_else(|| local_now.time()),
        );
        let time = tz
            .from_local_datetime(&merged)
            .earliest()
            .ok_or(FormError::InvalidLocalTime { time: merged })?
            .with_timezone(&Utc);
        if time > now + MAX_FUTURE_SKEW {
            return Err(FormError::FutureTime { time });
        }

        let record = &self.record;
        let report = match self.kind {
            ReportKind::Standard => Report::Standard(StandardCheckin {
                location_id: station.location_id.clone(),
                title: station.title.clone(),
                time,
                tff_user_id: record.reporter_id.clone(),
                blocked: record.blocked,
                waiting: record.waiting,
                problem: record.problem,
                affected_stalls: self.stalls.selected(),
                notes: record.notes.clone(),
            }),
            ReportKind::Interruption => {
                if !record.problem.is_problem() {
                    return Err(FormError::MissingProblem);
                }
                Report::Interruption(InterruptionReport {
                    location_id: station.location_id.clone(),
                    title: station.title.clone(),
                    time,
                    tff_user_id: record.reporter_id.clone(),
                    problem: record.problem,
                    affected_stalls: self.stalls.selected(),
                    notes: record.notes.clone(),
                })
            }
            ReportKind::ChargingStatus => {
                let stalls = station.stalls.ok_or(FormError::MissingCapacity)?;
                for (field, count) in [("charging", record.charging), ("blocked", record.blocked)] {
                    if count > stalls {
                        return Err(FormError::CountExceedsStalls {
                            field,
                            count,
                            stalls,
                        });
                    }
                }
                Report::ChargingStatus(ChargingStatusReport {
                    location_id: station.location_id.clone(),
                    title: station.title.clone(),
                    time,
                    stalls,
                    charging: record.charging,
                    blocked: record.blocked,
                    waiting: record.waiting,
                })
            }
        };

        self.submitting = true;
        Ok(Submission { report })
    }

    /// Finishes a submission: resets the form on success, keeps it for a
    /// retry on failure. Either way a toast is shown and the view scrolls
    /// to the top.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Submit`] carrying the transport error.
    pub fn complete<S: ToastSink>(
        &mut self,
        result: Result<(), ClientError>,
        toaster: &mut Toaster<S>,
    ) -> Result<(), FormError> {
        self.submitting = false;
        match result {
            Ok(()) => {
                log::info!("Submission accepted");
                self.remember_reporter();
                self.clear_station();
                toaster.show_simple_toast(SUBMITTED_TEXT);
                toaster.scroll_to_top();
                Ok(())
            }
            Err(e) => {
                log::error!("Submission failed: {e}");
                toaster.show_simple_toast(&format!("{FAILED_PREFIX}{}", e.user_message()));
                toaster.scroll_to_top();
                Err(FormError::Submit(e))
            }
        }
    }

    /// Prepares, sends and completes a submission.
    ///
    /// # Errors
    ///
    /// Returns the validation error, or [`FormError::Submit`] if the
    /// backend rejected the report.
    pub async fn submit<S: ToastSink>(
        &mut self,
        api: &dyn ReportApi,
        toaster: &mut Toaster<S>,
        now: DateTime<Utc>,
    ) -> Result<(), FormError> {
        let submission = self.prepare_submission(now)?;
        let result = submission.send(api).await;
        self.complete(result, toaster)
    }

    fn remember_reporter(&self) {
        if let Some(cookie) = &self.cookie
            && let Err(e) = cookie.save(&self.record.reporter_id)
        {
            log::warn!("Failed to save reporter id: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use suc_status_station_models::LastCheckin;

    use super::*;
    use crate::selector::tests::{NoFix, TableDirectory, station};
    use crate::toast::ToastPositionResolver;
    use crate::toast::tests::RecordingSink;

    #[derive(Default)]
    struct RecordingApi {
        reports: Mutex<Vec<Report>>,
        reject_with: Option<String>,
    }

    #[async_trait]
    impl ReportApi for RecordingApi {
        async fn submit(&self, report: &Report) -> Result<(), ClientError> {
            self.reports.lock().unwrap().push(report.clone());
            match &self.reject_with {
                Some(message) => Err(ClientError::Status {
                    status: 400,
                    status_text: "Bad Request".to_string(),
                    message: Some(message.clone()),
                }),
                None => Ok(()),
            }
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap()
    }

    fn toaster() -> Toaster<RecordingSink> {
        Toaster::new(ToastPositionResolver::default(), RecordingSink::default())
    }

    fn station_with_checkin() -> Station {
        Station {
            checkin: Some(LastCheckin {
                problem: Some(ProblemKind::PartialFailure),
                affected_stalls: vec!["1A".to_string(), "2B".to_string()],
                notes: Some("2B dead".to_string()),
            }),
            ..station("dietikon", 8)
        }
    }

    fn form(kind: ReportKind) -> CheckinFormController {
        let mut form = CheckinFormController::new(kind, FormConfig::default());
        form.record_mut().date = NaiveDate::from_ymd_opt(2024, 3, 1);
        form.record_mut().time = NaiveTime::from_hms_opt(14, 37, 52);
        form
    }

    #[test]
    fn merge_zeroes_seconds() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let time = NaiveTime::from_hms_milli_opt(14, 37, 52, 250).unwrap();
        assert_eq!(
            merge_timestamp(date, time),
            date.and_hms_opt(14, 37, 0).unwrap()
        );
    }

    #[test]
    fn default_policies() {
        let config = FormConfig::default();
        assert_eq!(config.policy_for(ReportKind::Standard), CarryOverPolicy::Reset);
        assert_eq!(
            config.policy_for(ReportKind::Interruption),
            CarryOverPolicy::LastCheckin
        );
        assert_eq!(
            config.policy_for(ReportKind::ChargingStatus),
            CarryOverPolicy::Reset
        );
    }

    #[test]
    fn last_checkin_policy_carries_over() {
        let mut form = form(ReportKind::Interruption);
        form.select_station(station_with_checkin());

        assert_eq!(form.record().problem, ProblemKind::PartialFailure);
        assert_eq!(form.record().notes, "2B dead");
        assert_eq!(form.stalls().items().len(), 8);
        assert_eq!(form.stalls().selected(), vec!["1A", "2B"]);
    }

    #[test]
    fn reset_policy_starts_blank() {
        let mut form = form(ReportKind::Standard);
        form.record_mut().blocked = 3;
        form.select_station(station_with_checkin());

        assert_eq!(form.record().problem, ProblemKind::None);
        assert_eq!(form.record().blocked, 0);
        assert!(form.record().notes.is_empty());
        assert!(form.stalls().selected().is_empty());
        assert_eq!(form.stalls().items().len(), 8);
    }

    #[test]
    fn new_search_drops_station_and_stalls() {
        let mut form = form(ReportKind::Interruption);
        form.record_mut().reporter_id = "jdoe".to_string();
        form.select_station(station_with_checkin());
        form.search("zurich");

        assert!(form.record().station().is_none());
        assert!(form.stalls().items().is_empty());
        assert_eq!(form.record().reporter_id, "jdoe");
        assert!(!form.can_submit());
    }

    #[test]
    fn auto_selected_lookup_initializes_record() {
        let mut form = form(ReportKind::Interruption);
        let ticket = form.search("dietikon");
        let outcome = form.apply_results(&ticket, vec![station_with_checkin()]);
        assert!(matches!(outcome, ApplyOutcome::AutoSelected(_)));
        assert_eq!(form.record().problem, ProblemKind::PartialFailure);
        assert!(form.can_submit());
    }

    #[tokio::test]
    async fn run_search_selects_single_match() {
        let directory = TableDirectory::default().with(
            "dietikon",
            vec![station("dietikon", 8)],
            Duration::ZERO,
        );
        let mut form = form(ReportKind::Standard);
        form.run_search("dietikon", &directory).await;
        assert_eq!(form.record().station().unwrap().location_id, "dietikon");
    }

    #[tokio::test]
    async fn failed_locate_drops_selected_station() {
        let directory = TableDirectory::default();
        let mut form = form(ReportKind::Standard);
        form.select_station(station("dietikon", 8));
        assert_eq!(form.stalls().items().len(), 8);

        let result = form
            .locate(Some(&NoFix), &directory, Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(FormError::Selector(_))));
        assert!(form.record().station().is_none());
        assert!(form.stalls().items().is_empty());
        assert!(!form.can_submit());
    }

    #[test]
    fn observation_time_survives_station_changes() {
        let mut form = form(ReportKind::Interruption);
        form.select_station(station_with_checkin());
        form.select_station(station("zurich", 12));
        form.clear_station();

        assert_eq!(form.record().date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(form.record().time, NaiveTime::from_hms_opt(14, 37, 52));
        assert_eq!(form.record().problem, ProblemKind::None);
    }

    #[test]
    fn standard_report_merges_time_and_attaches_reporter() {
        let mut form = form(ReportKind::Standard);
        form.record_mut().reporter_id = "jdoe".to_string();
        form.select_station(station("dietikon", 8));
        form.record_mut().blocked = 1;
        form.record_mut().waiting = 2;
        form.stalls_mut().toggle("3A").unwrap();

        let submission = form.prepare_submission_in(&Utc, now()).unwrap();
        let Report::Standard(report) = submission.report() else {
            panic!("expected a standard check-in");
        };
        assert_eq!(
            report.time,
            Utc.with_ymd_and_hms(2024, 3, 1, 14, 37, 0).unwrap()
        );
        assert_eq!(report.tff_user_id, "jdoe");
        assert_eq!(report.blocked, 1);
        assert_eq!(report.waiting, 2);
        assert_eq!(report.affected_stalls, vec!["3A"]);
        assert!(form.is_submitting());
    }

    #[test]
    fn submit_requires_station() {
        let mut form = form(ReportKind::Standard);
        assert!(matches!(
            form.prepare_submission_in(&Utc, now()),
            Err(FormError::NoStation)
        ));
        assert!(!form.is_submitting());
    }

    #[test]
    fn future_time_is_rejected() {
        let mut form = form(ReportKind::Standard);
        form.select_station(station("dietikon", 8));
        form.record_mut().time = NaiveTime::from_hms_opt(16, 1, 0);
        assert!(matches!(
            form.prepare_submission_in(&Utc, now()),
            Err(FormError::FutureTime { .. })
        ));

        form.record_mut().time = NaiveTime::from_hms_opt(16, 0, 0);
        assert!(form.prepare_submission_in(&Utc, now()).is_ok());
    }

    #[test]
    fn interruption_requires_problem() {
        let mut form = form(ReportKind::Interruption);
        form.select_station(station("dietikon", 8));
        assert!(matches!(
            form.prepare_submission_in(&Utc, now()),
            Err(FormError::MissingProblem)
        ));

        form.record_mut().problem = ProblemKind::CompleteFailure;
        assert!(matches!(
            form.prepare_submission_in(&Utc, now()).unwrap().report(),
            Report::Interruption(_)
        ));
    }

    #[test]
    fn charging_counts_are_bounded_by_capacity() {
        let mut form = form(ReportKind::ChargingStatus);
        form.select_station(station("dietikon", 8));
        form.record_mut().charging = 9;
        assert!(matches!(
            form.prepare_submission_in(&Utc, now()),
            Err(FormError::CountExceedsStalls {
                field: "charging",
                count: 9,
                stalls: 8
            })
        ));

        form.record_mut().charging = 8;
        form.record_mut().waiting = 20;
        let submission = form.prepare_submission_in(&Utc, now()).unwrap();
        let Report::ChargingStatus(report) = submission.report() else {
            panic!("expected a charging-status report");
        };
        assert_eq!(report.stalls, 8);
        assert_eq!(report.waiting, 20);
    }

    #[test]
    fn charging_status_needs_capacity() {
        let mut form = form(ReportKind::ChargingStatus);
        form.select_station(Station {
            stalls: None,
            ..station("dietikon", 8)
        });
        assert!(matches!(
            form.prepare_submission_in(&Utc, now()),
            Err(FormError::MissingCapacity)
        ));
    }

    #[tokio::test]
    async fn double_submit_makes_one_request() {
        let api = RecordingApi::default();
        let mut toaster = toaster();
        let mut form = form(ReportKind::Standard);
        form.select_station(station("dietikon", 8));

        let first = form.prepare_submission_in(&Utc, now()).unwrap();
        assert!(!form.can_submit());
        assert!(matches!(
            form.prepare_submission_in(&Utc, now()),
            Err(FormError::AlreadySubmitting)
        ));
        assert!(matches!(
            form.submit(&api, &mut toaster, now()).await,
            Err(FormError::AlreadySubmitting)
        ));

        let result = first.send(&api).await;
        form.complete(result, &mut toaster).unwrap();
        assert_eq!(api.reports.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn success_resets_form_and_saves_reporter() {
        let path = std::env::temp_dir().join("suc_status_form_success_cookie.toml");
        let _ = std::fs::remove_file(&path);
        let api = RecordingApi::default();
        let mut toaster = toaster();
        let mut form =
            form(ReportKind::Standard).with_cookie(ReporterCookie::new(&path));
        form.record_mut().reporter_id = "jdoe".to_string();
        let ticket = form.search("dietikon");
        form.apply_results(&ticket, vec![station("dietikon", 8)]);

        let submission = form.prepare_submission_in(&Utc, now()).unwrap();
        let result = submission.send(&api).await;
        form.complete(result, &mut toaster).unwrap();

        assert!(form.record().station().is_none());
        assert!(form.selector().search_text().is_empty());
        assert!(!form.is_submitting());
        let sink = toaster.sink();
        assert_eq!(sink.toasts[0].text, SUBMITTED_TEXT);
        assert_eq!(sink.scrolls, 1);
        assert_eq!(
            ReporterCookie::new(&path).load().unwrap().as_deref(),
            Some("jdoe")
        );
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn failure_keeps_record_and_shows_server_message() {
        let api = RecordingApi {
            reject_with: Some("Charging must not exceed stalls".to_string()),
            ..RecordingApi::default()
        };
        let mut toaster = toaster();
        let mut form = form(ReportKind::Interruption);
        form.select_station(station_with_checkin());

        let submission = form.prepare_submission_in(&Utc, now()).unwrap();
        let result = submission.send(&api).await;
        assert!(matches!(
            form.complete(result, &mut toaster),
            Err(FormError::Submit(_))
        ));

        assert_eq!(form.record().station().unwrap().location_id, "dietikon");
        assert_eq!(form.record().problem, ProblemKind::PartialFailure);
        assert!(form.can_submit());
        let sink = toaster.sink();
        assert_eq!(
            sink.toasts[0].text,
            "Failed to submit: Charging must not exceed stalls"
        );
        assert_eq!(sink.scrolls, 1);
    }

    #[test]
    fn status_text_is_used_without_server_message() {
        let mut toaster = toaster();
        let mut form = form(ReportKind::Standard);
        form.select_station(station("dietikon", 8));
        form.prepare_submission_in(&Utc, now()).unwrap();

        let result = Err(ClientError::Status {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            message: None,
        });
        assert!(form.complete(result, &mut toaster).is_err());
        assert_eq!(
            toaster.sink().toasts[0].text,
            "Failed to submit: Service Unavailable"
        );
    }
}
