//! Lookup query classification.
//!
//! The station directory accepts either a title fragment or a
//! `"lat,lng"` pair. Coordinate queries are produced by geolocation with
//! three decimal places.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum query length the directory answers; shorter queries always
/// return no candidates.
pub const MIN_QUERY_LEN: usize = 3;

static COORDINATES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(-?[0-9]+\.[0-9]+)[ \t]*,[ \t]*(-?[0-9]+\.[0-9]+)[ \t]*$")
        .unwrap_or_else(|_| unreachable!())
});

/// A classified lookup query.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupQuery {
    /// A `"lat,lng"` pair.
    Coordinates {
        /// Latitude (WGS84).
        latitude: f64,
        /// Longitude (WGS84).
        longitude: f64,
    },
    /// A title fragment.
    Text(String),
}

impl LookupQuery {
    /// Classifies `input`. Anything that is not a decimal coordinate pair
    /// is treated as text.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        if let Some(caps) = COORDINATES_RE.captures(input) {
            let latitude = caps[1].parse::<f64>();
            let longitude = caps[2].parse::<f64>();
            if let (Ok(latitude), Ok(longitude)) = (latitude, longitude) {
                return Self::Coordinates {
                    latitude,
                    longitude,
                };
            }
        }
        Self::Text(input.trim().to_string())
    }

    /// The query string sent to the directory.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Coordinates {
                latitude,
                longitude,
            } => format_coordinates(*latitude, *longitude),
            Self::Text(text) => text.clone(),
        }
    }

    /// Whether the directory would answer this query at all.
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        match self {
            Self::Coordinates { .. } => true,
            Self::Text(text) => text.chars().count() >= MIN_QUERY_LEN,
        }
    }
}

/// Formats a position as the directory's coordinate query
/// (`"47.377,8.540"`).
#[must_use]
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.3},{longitude:.3}")
}
