//! Geographic location and solar elevation.
//!
//! The daemon only needs one number from the sky: how far the sun is above
//! (or below) the horizon right now. [`ElevationProvider`] is that seam;
//! [`solar::SolarElevation`] implements it with the SPA algorithm.

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub mod solar;

pub use solar::{SolarElevation, SolarEvents, solar_events};

/// Observer position plus the timezone used for timestamps and display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Tz,
}

impl Location {
    /// Convert a UTC instant to this location's local time.
    pub fn local_time(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.timezone)
    }
}

/// Source of solar elevation angles.
#[cfg_attr(test, mockall::automock)]
pub trait ElevationProvider {
    /// Elevation of the sun's center in degrees, positive above the horizon.
    fn elevation(&self, latitude: f64, longitude: f64, at: &DateTime<Tz>) -> Result<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_local_time_conversion() {
        let location = Location {
            latitude: 59.36,
            longitude: 18.0,
            timezone: chrono_tz::Europe::Stockholm,
        };
        let instant = Utc.with_ymd_and_hms(2024, 6, 21, 10, 0, 0).unwrap();
        // CEST is UTC+2 in June
        assert_eq!(location.local_time(instant).hour(), 12);
    }
}
