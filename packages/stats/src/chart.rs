//! Time series to chart-table reshaping.
//!
//! Chart widgets take an array of rows whose first row holds the column
//! labels. [`ChartTable`] keeps the typed rows and renders that shape on
//! demand.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use suc_status_station_models::TimeSeriesPoint;

/// Column labels, in row order.
pub const HEADER: [&str; 5] = ["Time", "Stalls", "Charging", "Blocked", "Waiting"];

/// One chart row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRow {
    /// Sample time.
    pub time: DateTime<Utc>,
    /// Declared stalls.
    pub stalls: Option<u32>,
    /// Vehicles charging.
    pub charging: Option<u32>,
    /// Vehicles blocking a stall.
    pub blocked: Option<u32>,
    /// Vehicles waiting.
    pub waiting: Option<u32>,
}

impl From<&TimeSeriesPoint> for ChartRow {
    fn from(point: &TimeSeriesPoint) -> Self {
        Self {
            time: point.time,
            stalls: point.stalls,
            charging: point.charging,
            blocked: point.blocked,
            waiting: point.waiting,
        }
    }
}

/// A header plus one row per time-series sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartTable {
    rows: Vec<ChartRow>,
}

impl ChartTable {
    /// Builds the table from samples, keeping their order.
    #[must_use]
    pub fn from_points(points: &[TimeSeriesPoint]) -> Self {
        Self {
            rows: points.iter().map(ChartRow::from).collect(),
        }
    }

    /// Column labels.
    #[must_use]
    pub const fn header(&self) -> [&'static str; 5] {
        HEADER
    }

    /// Data rows.
    #[must_use]
    pub fn rows(&self) -> &[ChartRow] {
        &self.rows
    }

    /// Whether there is nothing worth charting: no sample reports a
    /// charging count.
    #[must_use]
    pub fn is_empty_series(&self) -> bool {
        self.rows.iter().all(|row| row.charging.is_none())
    }

    /// The widget's array-of-arrays form, header first, times as ISO 8601
    /// strings and missing counts as `null`.
    #[must_use]
    pub fn to_data_table(&self) -> Value {
        let mut table = Vec::with_capacity(self.rows.len() + 1);
        table.push(json!(HEADER));
        table.extend(self.rows.iter().map(|row| {
            json!([
                row.time.to_rfc3339_opts(SecondsFormat::Millis, true),
                row.stalls,
                row.charging,
                row.blocked,
                row.waiting,
            ])
        }));
        Value::Array(table)
    }
}

/// Options handed to the chart widget along with the data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    /// The first data-table row is the header.
    pub first_row_contains_labels: bool,
    /// Show annotation columns.
    pub display_annotations: bool,
    /// Horizontal axis title.
    #[serde(skip)]
    pub x_title: Option<String>,
    /// Vertical axis title.
    #[serde(skip)]
    pub y_title: Option<String>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            first_row_contains_labels: true,
            display_annotations: true,
            x_title: None,
            y_title: None,
        }
    }
}

impl ChartOptions {
    /// Widget options with axis titles merged in as `hAxis`/`vAxis`.
    #[must_use]
    pub fn to_widget_options(&self) -> Value {
        let mut options = json!({
            "firstRowContainsLabels": self.first_row_contains_labels,
            "displayAnnotations": self.display_annotations,
        });
        if let Some(title) = &self.x_title {
            options["hAxis"] = json!({ "title": title });
        }
        if let Some(title) = &self.y_title {
            options["vAxis"] = json!({ "title": title });
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::point;

    #[test]
    fn header_then_one_row_per_point() {
        let points = vec![TimeSeriesPoint {
            stalls: Some(10),
            charging: Some(3),
            blocked: Some(0),
            waiting: Some(1),
            ..point(11, 0, None)
        }];
        let table = ChartTable::from_points(&points);

        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].time, points[0].time);
        assert_eq!(
            table.to_data_table(),
            json!([
                ["Time", "Stalls", "Charging", "Blocked", "Waiting"],
                ["2016-07-28T11:00:00.000Z", 10, 3, 0, 1],
            ])
        );
        assert!(!table.is_empty_series());
    }

    #[test]
    fn series_without_charging_counts_is_empty() {
        let table = ChartTable::from_points(&[point(10, 8, None), point(11, 8, None)]);
        assert!(table.is_empty_series());
        assert_eq!(table.to_data_table()[1][2], Value::Null);

        assert!(ChartTable::from_points(&[]).is_empty_series());
        assert!(
            !ChartTable::from_points(&[point(10, 8, None), point(11, 8, Some(0))])
                .is_empty_series()
        );
    }

    #[test]
    fn axis_titles_merge_into_widget_options() {
        let options = ChartOptions {
            y_title: Some("Vehicles".to_string()),
            ..ChartOptions::default()
        };
        let value = options.to_widget_options();
        assert_eq!(value["firstRowContainsLabels"], true);
        assert_eq!(value["displayAnnotations"], true);
        assert_eq!(value["vAxis"]["title"], "Vehicles");
        assert!(value.get("hAxis").is_none());
    }
}
