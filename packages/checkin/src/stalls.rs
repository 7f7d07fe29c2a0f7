//! Stall labels and the affected-stalls selection.
//!
//! Stalls are labelled in pairs: unit `i` has stalls `"{i}A"` and
//! `"{i}B"`, starting at unit 1. How many units a declared capacity maps
//! to depends on [`StallLabeling`].

use std::collections::BTreeSet;

use serde::Deserialize;
use strum_macros::{AsRefStr, Display};
use thiserror::Error;

/// Errors from stall selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StallError {
    /// The label is not part of the current stall set.
    #[error("Unknown stall '{label}'")]
    UnknownStall {
        /// The rejected label.
        label: String,
    },
}

/// How a station's declared capacity maps to labelled units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StallLabeling {
    /// One A/B unit per declared stall (`2 * capacity` labels).
    PairPerStall,
    /// One A/B unit per two declared stalls (`capacity` labels, rounded up
    /// to an even count).
    #[default]
    PairPerTwoStalls,
}

impl StallLabeling {
    /// Number of A/B units for `capacity`.
    #[must_use]
    pub const fn unit_count(self, capacity: u32) -> u32 {
        match self {
            Self::PairPerStall => capacity,
            Self::PairPerTwoStalls => capacity.div_ceil(2),
        }
    }
}

/// Generates the stall labels for `capacity`.
#[must_use]
pub fn stall_labels(capacity: u32, labeling: StallLabeling) -> Vec<String> {
    (1..=labeling.unit_count(capacity))
        .flat_map(|unit| [format!("{unit}A"), format!("{unit}B")])
        .collect()
}

/// Tri-state of a "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CheckState {
    /// Nothing selected.
    Unchecked,
    /// Everything selected.
    Checked,
    /// Some but not all selected.
    Indeterminate,
}

/// Selection of affected stalls over the current stall set.
#[derive(Debug, Clone, Default)]
pub struct StallsSelector {
    labeling: StallLabeling,
    items: Vec<String>,
    selected: BTreeSet<usize>,
}

impl StallsSelector {
    /// Creates an empty selector.
    #[must_use]
    pub fn new(labeling: StallLabeling) -> Self {
        Self {
            labeling,
            items: Vec::new(),
            selected: BTreeSet::new(),
        }
    }

    /// Regenerates the stall set for `capacity` and clears the selection.
    /// An unknown capacity yields an empty set.
    pub fn reset_for_capacity(&mut self, capacity: Option<u32>) {
        self.items = capacity.map_or_else(Vec::new, |c| stall_labels(c, self.labeling));
        self.selected.clear();
    }

    /// All stall labels.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Selected labels in stall order.
    #[must_use]
    pub fn selected(&self) -> Vec<String> {
        self.selected.iter().map(|&i| self.items[i].clone()).collect()
    }

    /// Whether `label` is selected.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.index_of(label)
            .is_some_and(|i| self.selected.contains(&i))
    }

    /// Flips membership of `label`, returning whether it is now selected.
    ///
    /// # Errors
    ///
    /// Returns [`StallError::UnknownStall`] if `label` is not in the
    /// current stall set.
    pub fn toggle(&mut self, label: &str) -> Result<bool, StallError> {
        let index = self.index_of(label).ok_or_else(|| StallError::UnknownStall {
            label: label.to_string(),
        })?;
        if self.selected.remove(&index) {
            Ok(false)
        } else {
            self.selected.insert(index);
            Ok(true)
        }
    }

    /// Replaces the selection with the known labels among `labels`.
    /// Unknown labels are skipped.
    pub fn set_selected<S: AsRef<str>>(&mut self, labels: &[S]) {
        self.selected.clear();
        for label in labels {
            match self.index_of(label.as_ref()) {
                Some(i) => {
                    self.selected.insert(i);
                }
                None => log::warn!("Ignoring unknown stall '{}'", label.as_ref()),
            }
        }
    }

    /// Selects every stall.
    pub fn select_all(&mut self) {
        self.selected = (0..self.items.len()).collect();
    }

    /// Deselects every stall.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Clears a full selection, otherwise selects everything.
    pub fn toggle_all(&mut self) {
        if self.is_checked() {
            self.clear();
        } else {
            self.select_all();
        }
    }

    /// Whether every stall is selected.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.selected.len() == self.items.len()
    }

    /// Whether some, but not all, stalls are selected.
    #[must_use]
    pub fn is_indeterminate(&self) -> bool {
        !self.selected.is_empty() && self.selected.len() < self.items.len()
    }

    /// Tri-state for a "select all" checkbox.
    #[must_use]
    pub fn check_state(&self) -> CheckState {
        if self.is_checked() {
            CheckState::Checked
        } else if self.is_indeterminate() {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.items.iter().position(|item| item == label)
    }
}
