#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Statistics browsing.
//!
//! [`navigator::StatsNavigator`] resolves a `/stats/{country}/{station}`
//! path into the fetches that back it, [`chart::ChartTable`] reshapes a
//! station's time series for a chart widget, and [`history::HistoryView`]
//! pages through recent check-ins.

pub mod chart;
pub mod history;
pub mod navigator;

#[cfg(test)]
pub(crate) mod testing;

pub use chart::{ChartOptions, ChartTable};
pub use history::{HistoryView, load_overview};
pub use navigator::{NavigationParams, NavigationState, StatsNavigator};
