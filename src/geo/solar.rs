//! Solar elevation and daily solar event times.
//!
//! Elevation comes from the NREL Solar Position Algorithm via the
//! `solar-positioning` crate, with standard atmospheric refraction applied so
//! 0° matches the visible horizon. Sunrise, sunset, and civil twilight times
//! for the status display come from the `sunrise` crate.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use solar_positioning::{RefractionCorrection, spa};
use sunrise::{Coordinates, DawnType, SolarDay, SolarEvent};

use super::ElevationProvider;
use crate::constants::*;

/// Production [`ElevationProvider`].
#[derive(Debug, Clone, Copy)]
pub struct SolarElevation {
    delta_t: f64,
}

impl SolarElevation {
    pub fn new() -> Self {
        Self {
            delta_t: DEFAULT_DELTA_T_SECONDS,
        }
    }
}

impl Default for SolarElevation {
    fn default() -> Self {
        Self::new()
    }
}

impl ElevationProvider for SolarElevation {
    fn elevation(&self, latitude: f64, longitude: f64, at: &DateTime<Tz>) -> Result<f64> {
        if !(-90.0..=90.0).contains(&latitude) {
            anyhow::bail!("Invalid latitude: {}", latitude);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            anyhow::bail!("Invalid longitude: {}", longitude);
        }

        let position = spa::solar_position(
            at.fixed_offset(),
            latitude,
            longitude,
            OBSERVER_ALTITUDE_METERS,
            self.delta_t,
            Some(RefractionCorrection::standard()),
        )
        .map_err(|e| anyhow::anyhow!("Solar position calculation failed: {}", e))?;

        Ok(position.elevation_angle())
    }
}

/// Local times of the day's solar events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarEvents {
    pub civil_dawn: NaiveTime,  // sun at -6°, morning
    pub sunrise: NaiveTime,     // sun at 0°, morning
    pub sunset: NaiveTime,      // sun at 0°, evening
    pub civil_dusk: NaiveTime,  // sun at -6°, evening
}

/// Compute civil dawn, sunrise, sunset, and civil dusk for `date` at a location.
///
/// Times are converted to `timezone`. Near the poles some of these events do
/// not happen on every date; the returned times are then whatever the
/// underlying calculation yields and should be taken as approximate.
pub fn solar_events(latitude: f64, longitude: f64, date: NaiveDate, timezone: Tz) -> Result<SolarEvents> {
    let coord = Coordinates::new(latitude, longitude)
        .ok_or_else(|| anyhow::anyhow!("Invalid coordinates: {}, {}", latitude, longitude))?;
    let solar_day = SolarDay::new(coord, date);

    let local = |event: SolarEvent| solar_day.event_time(event).with_timezone(&timezone).time();

    Ok(SolarEvents {
        civil_dawn: local(SolarEvent::Dawn(DawnType::Civil)),
        sunrise: local(SolarEvent::Sunrise),
        sunset: local(SolarEvent::Sunset),
        civil_dusk: local(SolarEvent::Dusk(DawnType::Civil)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Stockholm;

    #[test]
    fn test_summer_noon_elevation_stockholm() {
        // Solar noon at 18°E is around 10:48 UTC
        let at = Stockholm.with_ymd_and_hms(2024, 6, 21, 12, 48, 0).unwrap();
        let elevation = SolarElevation::new().elevation(59.36, 18.0, &at).unwrap();
        assert!(
            (52.0..56.0).contains(&elevation),
            "expected about 54°, got {}",
            elevation
        );
    }

    #[test]
    fn test_winter_midnight_is_deep_night() {
        let at = Stockholm.with_ymd_and_hms(2024, 12, 21, 0, 0, 0).unwrap();
        let elevation = SolarElevation::new().elevation(59.36, 18.0, &at).unwrap();
        assert!(elevation < -45.0, "expected deep night, got {}", elevation);
    }

    #[test]
    fn test_rejects_invalid_coordinates() {
        let at = Stockholm.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
        let provider = SolarElevation::new();
        assert!(provider.elevation(95.0, 18.0, &at).is_err());
        assert!(provider.elevation(59.0, 200.0, &at).is_err());
    }

    #[test]
    fn test_solar_events_are_ordered() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let events = solar_events(59.36, 18.0, date, Stockholm).unwrap();
        assert!(events.civil_dawn < events.sunrise);
        assert!(events.sunrise < events.sunset);
        assert!(events.sunset < events.civil_dusk);
    }

    #[test]
    fn test_solar_events_reject_invalid_coordinates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        assert!(solar_events(120.0, 18.0, date, Stockholm).is_err());
    }
}
