//! Read-only commands: lookup, history, statistics and overview.

use suc_status_cli_utils::with_spinner;
use suc_status_client::lookup;
use suc_status_station_models::{HistoryEntry, OverviewRow, ProblemKind, Station};
use suc_status_stats::navigator::{NavigationParams, NavigationState, StatsNavigator};
use suc_status_stats::{ChartOptions, HistoryView, load_overview};

use crate::Context;

/// Prints the stations matching `query`.
pub async fn lookup(ctx: &Context, query: &str) {
    let stations = with_spinner(
        &ctx.multi,
        "Looking up stations...",
        lookup::search(&ctx.api, query),
    )
    .await;
    print_stations(&stations);
}

/// Prints a numbered station list.
pub fn print_stations(stations: &[Station]) {
    if stations.is_empty() {
        println!("No stations found.");
        return;
    }
    for (i, station) in stations.iter().enumerate() {
        println!("{:>3}. {station}  [{}]", i + 1, station.location_id);
    }
}

/// Prints the most recent check-ins matching `filter`.
///
/// # Errors
///
/// Returns an error if the history cannot be loaded.
pub async fn history(
    ctx: &Context,
    filter: &str,
    limit: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = HistoryView::new(limit);
    view.set_filter(filter);
    with_spinner(&ctx.multi, "Loading history...", view.load(&ctx.api)).await?;

    if view.entries().is_empty() {
        println!("No check-ins found.");
    }
    for entry in view.entries() {
        println!("{}", format_history_entry(entry));
    }
    Ok(())
}

fn format_history_entry(entry: &HistoryEntry) -> String {
    let time = entry.checkin.time.map_or_else(
        || "-".to_string(),
        |t| t.format("%Y-%m-%d %H:%M").to_string(),
    );
    let mut line = format!("{time}  {}", entry.suc.title);
    if let Some(country) = &entry.suc.country {
        line.push_str(&format!(" ({country})"));
    }

    let counters: Vec<String> = [
        ("charging", entry.checkin.charging),
        ("blocked", entry.checkin.blocked),
        ("waiting", entry.checkin.waiting),
    ]
    .into_iter()
    .filter_map(|(label, count)| count.map(|c| format!("{label} {c}")))
    .collect();
    if !counters.is_empty() {
        line.push_str(&format!("  {}", counters.join(", ")));
    }

    if let Some(problem) = entry.checkin.problem.filter(|p| p.is_problem()) {
        line.push_str(&format!("  {}", problem.label()));
        if !entry.checkin.affected_stalls.is_empty() {
            line.push_str(&format!(" [{}]", entry.checkin.affected_stalls.join(" ")));
        }
    }
    if let Some(notes) = entry.checkin.notes.as_deref().filter(|n| !n.is_empty()) {
        line.push_str(&format!("  \"{notes}\""));
    }
    if let Some(user) = entry
        .submitter
        .tff_user_id
        .as_deref()
        .filter(|u| !u.is_empty())
    {
        line.push_str(&format!("  by {user}"));
    }
    line
}

/// Prints the statistics view for `path`.
///
/// # Errors
///
/// Returns an error for an unknown path or if loading fails.
pub async fn stats(
    ctx: &Context,
    path: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let params = NavigationParams::from_path(path)
        .ok_or_else(|| format!("Not a statistics path: '{path}'"))?;
    let mut nav = StatsNavigator::new();
    let state = with_spinner(
        &ctx.multi,
        "Loading statistics...",
        nav.navigate(&params, &ctx.api),
    )
    .await?;

    println!("{}", nav.path());
    match state {
        NavigationState::AllCountries => {
            for country in nav.countries() {
                println!(
                    "  {:<24} {:>5} stations {:>7} check-ins",
                    country.country,
                    country.super_chargers.unwrap_or_default(),
                    country.checkins.unwrap_or_default()
                );
            }
        }
        NavigationState::CountrySelected => {
            for station in nav.stations() {
                println!(
                    "  {:<32} {:>3} stalls {:>6} check-ins  [{}]",
                    station.title,
                    station.stalls.unwrap_or_default(),
                    station.checkins.unwrap_or_default(),
                    station.location_id
                );
            }
        }
        NavigationState::StationSelected => print_station_chart(&nav, json)?,
    }
    Ok(())
}

fn print_station_chart(nav: &StatsNavigator, json: bool) -> Result<(), serde_json::Error> {
    let (Some(stats), Some(chart)) = (nav.station_stats(), nav.chart()) else {
        return Ok(());
    };
    println!("{} ({})", stats.title, stats.country);
    if chart.is_empty_series() {
        println!("No charging data recorded.");
        return Ok(());
    }

    if json {
        let options = ChartOptions {
            x_title: Some("Time".to_string()),
            y_title: Some("Vehicles".to_string()),
            ..ChartOptions::default()
        };
        let output = serde_json::json!({
            "data": chart.to_data_table(),
            "options": options.to_widget_options(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let header = chart.header();
    println!(
        "  {:<17} {:>7} {:>9} {:>8} {:>8}",
        header[0], header[1], header[2], header[3], header[4]
    );
    let cell = |v: Option<u32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    for row in chart.rows() {
        println!(
            "  {:<17} {:>7} {:>9} {:>8} {:>8}",
            row.time.format("%Y-%m-%d %H:%M"),
            cell(row.stalls),
            cell(row.charging),
            cell(row.blocked),
            cell(row.waiting)
        );
    }
    Ok(())
}

/// Prints the station overview.
///
/// # Errors
///
/// Returns an error if the overview cannot be loaded.
pub async fn overview(
    ctx: &Context,
    problems_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows = with_spinner(
        &ctx.multi,
        "Loading overview...",
        load_overview(&ctx.api, problems_only),
    )
    .await?;
    if rows.is_empty() {
        println!("No stations to show.");
    }
    for row in &rows {
        println!("{}", format_overview_row(row));
    }
    Ok(())
}

fn format_overview_row(row: &OverviewRow) -> String {
    let last = row
        .last_checkin
        .map_or_else(|| "never".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
    let problem = row.problem.unwrap_or(ProblemKind::None);
    format!(
        "{:<32} {:<16} {:>3} stalls  last {last}  {}",
        row.title,
        row.country.as_deref().unwrap_or("-"),
        row.stalls.unwrap_or_default(),
        problem.label()
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};
    use suc_status_station_models::{HistoryCheckin, HistoryStation, Submitter};

    use super::*;

    #[test]
    fn history_line_lists_what_was_reported() {
        let entry = HistoryEntry {
            suc: HistoryStation {
                location_id: "dietikon".to_string(),
                title: "Dietikon".to_string(),
                country: Some("Switzerland".to_string()),
                stalls: Some(8),
            },
            checkin: HistoryCheckin {
                time: Some(Utc.with_ymd_and_hms(2016, 7, 28, 11, 5, 0).unwrap()),
                charging: None,
                blocked: Some(1),
                waiting: Some(0),
                problem: Some(ProblemKind::PartialFailure),
                affected_stalls: vec!["1A".to_string(), "2B".to_string()],
                notes: Some("2B dead".to_string()),
            },
            submitter: Submitter {
                time: None,
                tff_user_id: Some("jdoe".to_string()),
            },
        };
        assert_eq!(
            format_history_entry(&entry),
            "2016-07-28 11:05  Dietikon (Switzerland)  blocked 1, waiting 0  Partial failure [1A 2B]  \"2B dead\"  by jdoe"
        );
    }

    #[test]
    fn sparse_history_line() {
        assert_eq!(format_history_entry(&HistoryEntry::default()), "-  ");
    }

    #[test]
    fn overview_row_defaults() {
        let row = OverviewRow {
            location_id: "ulm".to_string(),
            title: "Ulm".to_string(),
            country: None,
            stalls: None,
            last_checkin: None,
            problem: None,
        };
        let line = format_overview_row(&row);
        assert!(line.starts_with("Ulm "));
        assert!(line.ends_with("last never  No problem"));
    }
}
