//! One-shot position acquisition.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Default time allowed for a position fix.
pub const DEFAULT_GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Errors from position acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    /// The source could not produce a position.
    #[error("Position unavailable: {0}")]
    Failed(String),

    /// No fix within the allowed time.
    #[error("Timed out after {0:?} waiting for a position")]
    Timeout(Duration),
}

/// A source of the user's current position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    /// Requests the current position once.
    ///
    /// # Errors
    ///
    /// Returns [`GeolocationError`] if no position can be determined.
    async fn current_position(&self) -> Result<Position, GeolocationError>;
}

/// A geolocator that always reports the same position (e.g. from
/// command-line coordinates).
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Position);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        Ok(self.0)
    }
}

/// Requests a position, treating expiry of `timeout` as a failure.
///
/// # Errors
///
/// Returns [`GeolocationError::Timeout`] on expiry, or whatever the
/// geolocator reported.
pub async fn locate_with_timeout(
    geolocator: &dyn Geolocator,
    timeout: Duration,
) -> Result<Position, GeolocationError> {
    tokio::time::timeout(timeout, geolocator.current_position())
        .await
        .map_err(|_| GeolocationError::Timeout(timeout))?
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverResolves;

    #[async_trait]
    impl Geolocator for NeverResolves {
        async fn current_position(&self) -> Result<Position, GeolocationError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn fixed_position_resolves() {
        let pos = Position {
            latitude: 47.4,
            longitude: 8.4,
        };
        let got = locate_with_timeout(&FixedPosition(pos), DEFAULT_GEOLOCATION_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(got, pos);
    }

    #[tokio::test]
    async fn expiry_is_a_failure() {
        let timeout = Duration::from_millis(20);
        let err = locate_with_timeout(&NeverResolves, timeout)
            .await
            .unwrap_err();
        assert_eq!(err, GeolocationError::Timeout(timeout));
    }
}
