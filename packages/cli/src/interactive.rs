//! Interactive menu and guided check-in.
//!
//! Presents a menu-driven interface using `dialoguer`. The check-in flow
//! walks through kind, station, counters, problem, affected stalls and
//! notes, then submits with the option to retry on failure.

use chrono::Utc;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use suc_status_checkin::FormError;
use suc_status_checkin::form::CheckinFormController;
use suc_status_cli_utils::with_spinner;
use suc_status_station_models::{ProblemKind, ReportKind};
use suc_status_stats::history::DEFAULT_HISTORY_LIMIT;

use crate::checkin::{new_form, parse_time};
use crate::{Context, browse};

/// Top-level actions in the interactive menu.
enum Action {
    Checkin,
    Lookup,
    History,
    Stats,
    Overview,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Checkin,
        Self::Lookup,
        Self::History,
        Self::Stats,
        Self::Overview,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Checkin => "Check in at a station",
            Self::Lookup => "Look up stations",
            Self::History => "Recent check-ins",
            Self::Stats => "Statistics",
            Self::Overview => "Station overview",
        }
    }
}

const fn kind_label(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Standard => "Full check-in",
        ReportKind::Interruption => "Report an interruption",
        ReportKind::ChargingStatus => "Charging status",
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt or the chosen operation fails.
pub async fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("SuperCharger status")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Checkin => handle_checkin(ctx).await?,
        Action::Lookup => {
            let query: String = Input::new()
                .with_prompt("Station name or lat,lng")
                .interact_text()?;
            browse::lookup(ctx, &query).await;
        }
        Action::History => {
            let filter: String = Input::new()
                .with_prompt("Filter (empty for all)")
                .allow_empty(true)
                .interact_text()?;
            browse::history(ctx, &filter, DEFAULT_HISTORY_LIMIT).await?;
        }
        Action::Stats => {
            let path: String = Input::new()
                .with_prompt("Statistics path")
                .default("/stats".to_string())
                .interact_text()?;
            browse::stats(ctx, &path, false).await?;
        }
        Action::Overview => {
            let problems_only = Confirm::new()
                .with_prompt("Only stations with problems?")
                .default(false)
                .interact()?;
            browse::overview(ctx, problems_only).await?;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Check-in
// ---------------------------------------------------------------------------

async fn handle_checkin(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let kinds = ReportKind::all();
    let labels: Vec<&str> = kinds.iter().copied().map(kind_label).collect();
    let idx = Select::new()
        .with_prompt("Report")
        .items(&labels)
        .default(0)
        .interact()?;

    let mut form = new_form(ctx, kinds[idx]);
    choose_station(ctx, &mut form).await?;
    fill_record(&mut form)?;

    let mut toaster = ctx.toaster();
    loop {
        let title = form
            .record()
            .station()
            .map_or_else(String::new, ToString::to_string);
        if !Confirm::new()
            .with_prompt(format!("Submit for {title}?"))
            .default(true)
            .interact()?
        {
            println!("Not submitted.");
            return Ok(());
        }

        match with_spinner(
            &ctx.multi,
            "Submitting...",
            form.submit(&ctx.api, &mut toaster, Utc::now()),
        )
        .await
        {
            Ok(()) => return Ok(()),
            Err(FormError::Submit(_)) => {
                if !Confirm::new().with_prompt("Retry?").default(true).interact()? {
                    return Ok(());
                }
            }
            Err(e) => {
                println!("{e}");
                fill_record(&mut form)?;
            }
        }
    }
}

async fn choose_station(
    ctx: &Context,
    form: &mut CheckinFormController,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let text: String = Input::new()
            .with_prompt("Station name or lat,lng")
            .interact_text()?;
        with_spinner(
            &ctx.multi,
            "Looking up stations...",
            form.run_search(&text, &ctx.api),
        )
        .await;

        if let Some(station) = form.record().station() {
            println!("Selected {station}");
            return Ok(());
        }

        let candidates = form.selector().candidates().to_vec();
        if candidates.is_empty() {
            println!("No stations found, try again.");
            continue;
        }
        let labels: Vec<String> = candidates.iter().map(ToString::to_string).collect();
        let idx = Select::new()
            .with_prompt("Which station?")
            .items(&labels)
            .default(0)
            .interact()?;
        form.select_station(candidates[idx].clone());
        return Ok(());
    }
}

fn prompt_count(prompt: &str, current: u32) -> Result<u32, dialoguer::Error> {
    Input::new()
        .with_prompt(prompt)
        .default(current)
        .interact_text()
}

fn fill_record(form: &mut CheckinFormController) -> Result<(), Box<dyn std::error::Error>> {
    let kind = form.kind();

    if kind != ReportKind::Interruption {
        let record = form.record_mut();
        if kind == ReportKind::ChargingStatus {
            record.charging = prompt_count("Charging", record.charging)?;
        }
        record.blocked = prompt_count("Blocked", record.blocked)?;
        record.waiting = prompt_count("Waiting", record.waiting)?;
    }

    if kind != ReportKind::ChargingStatus {
        let problems = ProblemKind::all();
        let labels: Vec<&str> = problems.iter().map(|p| p.label()).collect();
        let current = problems
            .iter()
            .position(|p| *p == form.record().problem)
            .unwrap_or_default();
        let idx = Select::new()
            .with_prompt("Problem")
            .items(&labels)
            .default(current)
            .interact()?;
        form.record_mut().problem = problems[idx];

        if problems[idx].is_problem() && !form.stalls().items().is_empty() {
            let items = form.stalls().items().to_vec();
            let defaults: Vec<bool> = items.iter().map(|l| form.stalls().contains(l)).collect();
            let chosen = MultiSelect::new()
                .with_prompt("Affected stalls")
                .items(&items)
                .defaults(&defaults)
                .interact()?;
            let labels: Vec<&str> = chosen.iter().map(|&i| items[i].as_str()).collect();
            form.stalls_mut().set_selected(&labels);
        }

        let record = form.record_mut();
        record.notes = Input::new()
            .with_prompt("Notes")
            .default(record.notes.clone())
            .allow_empty(true)
            .interact_text()?;
    }

    let record = form.record_mut();
    record.reporter_id = Input::new()
        .with_prompt("Your id (optional)")
        .default(record.reporter_id.clone())
        .allow_empty(true)
        .interact_text()?;

    let time: String = Input::new()
        .with_prompt("Time HH:MM (empty for now)")
        .allow_empty(true)
        .validate_with(|s: &String| {
            if s.is_empty() {
                Ok(())
            } else {
                parse_time(s).map(|_| ())
            }
        })
        .interact_text()?;
    record.time = if time.is_empty() {
        None
    } else {
        Some(parse_time(&time)?)
    };

    Ok(())
}
