//! `checkin` subcommand: a check-in described entirely by flags.

use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{ArgGroup, Args};
use suc_status_checkin::form::CheckinFormController;
use suc_status_checkin::geolocation::{FixedPosition, Geolocator, Position};
use suc_status_checkin::reporter::ReporterCookie;
use suc_status_cli_utils::with_spinner;
use suc_status_station_models::{ProblemKind, ReportKind};

use crate::Context;
use crate::browse::print_stations;

/// Flags of the `checkin` subcommand.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["station", "lat"])))]
pub struct CheckinArgs {
    /// Report kind: `standard`, `interruption` or `charging_status`.
    #[arg(long, default_value = "standard", value_parser = parse_kind)]
    pub kind: ReportKind,

    /// Station name to search for.
    #[arg(long)]
    pub station: Option<String>,

    /// Latitude to search around.
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude to search around.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Location id to pick when the search is ambiguous.
    #[arg(long)]
    pub pick: Option<String>,

    /// Vehicles blocking a stall without charging.
    #[arg(long)]
    pub blocked: Option<u32>,

    /// Vehicles waiting for a stall.
    #[arg(long)]
    pub waiting: Option<u32>,

    /// Vehicles charging.
    #[arg(long)]
    pub charging: Option<u32>,

    /// Problem: `none`, `limitedPower`, `partialFailure`,
    /// `completeFailure` or `trafficDisruption`.
    #[arg(long, value_parser = parse_problem)]
    pub problem: Option<ProblemKind>,

    /// Affected stalls, e.g. `1A,2B`.
    #[arg(long, value_delimiter = ',')]
    pub stalls: Vec<String>,

    /// Mark every stall as affected.
    #[arg(long, conflicts_with = "stalls")]
    pub all_stalls: bool,

    /// Free-text notes.
    #[arg(long)]
    pub notes: Option<String>,

    /// Reporter id (default: the last one used).
    #[arg(long)]
    pub user: Option<String>,

    /// Observation date, `YYYY-MM-DD` (default: today).
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Observation time, `HH:MM` (default: now).
    #[arg(long, value_parser = parse_time)]
    pub time: Option<NaiveTime>,
}

fn parse_kind(s: &str) -> Result<ReportKind, String> {
    s.parse().map_err(|_| format!("unknown report kind '{s}'"))
}

fn parse_problem(s: &str) -> Result<ProblemKind, String> {
    s.parse().map_err(|_| format!("unknown problem '{s}'"))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| format!("invalid time '{s}': {e}"))
}

/// A form for `kind` wired to the configured reporter cookie.
#[must_use]
pub fn new_form(ctx: &Context, kind: ReportKind) -> CheckinFormController {
    CheckinFormController::new(kind, ctx.config.checkin.form.clone())
        .with_cookie(ReporterCookie::new(&ctx.config.checkin.reporter_cookie))
}

/// Runs the `checkin` subcommand.
///
/// # Errors
///
/// Returns an error if no single station can be selected, a flag does not
/// fit the station, or the submission fails.
pub async fn run(ctx: &Context, args: CheckinArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut form = new_form(ctx, args.kind);
    select_station(ctx, &mut form, &args).await?;
    apply_args(&mut form, &args)?;

    let mut toaster = ctx.toaster();
    with_spinner(
        &ctx.multi,
        "Submitting...",
        form.submit(&ctx.api, &mut toaster, Utc::now()),
    )
    .await?;
    Ok(())
}

async fn select_station(
    ctx: &Context,
    form: &mut CheckinFormController,
    args: &CheckinArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let (Some(latitude), Some(longitude)) = (args.lat, args.lng) {
        let geolocator: &dyn Geolocator = &FixedPosition(Position {
            latitude,
            longitude,
        });
        with_spinner(
            &ctx.multi,
            "Looking up nearby stations...",
            form.locate(
                Some(geolocator),
                &ctx.api,
                ctx.config.checkin.geolocation_timeout(),
            ),
        )
        .await?;
    } else if let Some(text) = &args.station {
        with_spinner(
            &ctx.multi,
            "Looking up stations...",
            form.run_search(text, &ctx.api),
        )
        .await;
    }

    if form.record().station().is_some() {
        return Ok(());
    }

    let candidates = form.selector().candidates().to_vec();
    match &args.pick {
        Some(id) => {
            let station = candidates
                .into_iter()
                .find(|s| s.location_id == *id)
                .ok_or_else(|| format!("No matching station with id '{id}'"))?;
            form.select_station(station);
            Ok(())
        }
        None if candidates.is_empty() => Err("No stations found".into()),
        None => {
            print_stations(&candidates);
            Err("Several stations match; choose one with --pick <id>".into())
        }
    }
}

fn apply_args(
    form: &mut CheckinFormController,
    args: &CheckinArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = form.record_mut();
    if let Some(user) = &args.user {
        record.reporter_id.clone_from(user);
    }
    if let Some(blocked) = args.blocked {
        record.blocked = blocked;
    }
    if let Some(waiting) = args.waiting {
        record.waiting = waiting;
    }
    if let Some(charging) = args.charging {
        record.charging = charging;
    }
    if let Some(problem) = args.problem {
        record.problem = problem;
    }
    if let Some(notes) = &args.notes {
        record.notes.clone_from(notes);
    }
    record.date = args.date;
    record.time = args.time;

    let stalls = form.stalls_mut();
    if args.all_stalls {
        stalls.select_all();
    } else if !args.stalls.is_empty() {
        stalls.clear();
        for label in &args.stalls {
            if !stalls.contains(label) {
                stalls.toggle(label)?;
            }
        }
    }
    Ok(())
}
