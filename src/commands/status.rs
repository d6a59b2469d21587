//! Implementation of the --status command.
//!
//! Prints the current solar elevation, the zone it selects, and today's civil
//! twilight and sunrise/sunset times for the configured location.

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::path::Path;

use crate::config::Config;
use crate::geo::{ElevationProvider, Location, SolarElevation, SolarEvents, solar_events};
use crate::logger::Log;
use crate::utils::format_coordinates;
use crate::zones::{Zone, ZoneTable};

#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub local_time: DateTime<Tz>,
    pub elevation: f64,
    pub zone_index: usize,
    pub zone: Zone,
    pub events: SolarEvents,
}

/// Gather everything --status shows for the instant `now`.
pub fn status_report<P: ElevationProvider>(
    location: &Location,
    zones: &ZoneTable,
    provider: &P,
    now: DateTime<Utc>,
) -> Result<StatusReport> {
    let local_time = location.local_time(now);
    let elevation = provider.elevation(location.latitude, location.longitude, &local_time)?;
    let (zone_index, zone) = zones.resolve_zone(elevation);
    let events = solar_events(
        location.latitude,
        location.longitude,
        local_time.date_naive(),
        location.timezone,
    )?;

    Ok(StatusReport {
        local_time,
        elevation,
        zone_index,
        zone: zone.clone(),
        events,
    })
}

pub fn handle_status_command(config_path: Option<&Path>) -> Result<()> {
    Log::log_version();

    let config = Config::load_with_override(config_path)?;
    let location = config.location()?;
    let zones = config.zone_table()?;

    let report = status_report(&location, &zones, &SolarElevation::new(), Utc::now())?;

    Log::log_block_start(&format!(
        "{} ({})",
        format_coordinates(location.latitude, location.longitude),
        location.timezone
    ));
    Log::log_indented(&format!(
        "Local time: {}",
        report.local_time.format("%Y-%m-%d %H:%M:%S")
    ));
    Log::log_indented(&format!("Solar elevation: {:.2}°", report.elevation));

    Log::log_block_start(&format!(
        "Active zone: {} ({} of {})",
        report.zone.label(),
        report.zone_index + 1,
        zones.len()
    ));
    Log::log_indented(&format!(
        "Target: {}K @ {}%",
        report.zone.temperature, report.zone.gamma
    ));

    Log::log_block_start("Today");
    Log::log_indented(&format!("Civil dawn: {}", report.events.civil_dawn.format("%H:%M")));
    Log::log_indented(&format!("Sunrise:    {}", report.events.sunrise.format("%H:%M")));
    Log::log_indented(&format!("Sunset:     {}", report.events.sunset.format("%H:%M")));
    Log::log_indented(&format!("Civil dusk: {}", report.events.civil_dusk.format("%H:%M")));
    Log::log_end();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::MockElevationProvider;
    use chrono::TimeZone;

    fn stockholm() -> Location {
        Location {
            latitude: 59.36,
            longitude: 18.0,
            timezone: chrono_tz::Europe::Stockholm,
        }
    }

    #[test]
    fn test_status_report_resolves_zone() {
        let mut provider = MockElevationProvider::new();
        provider.expect_elevation().returning(|_, _, _| Ok(-8.5));

        let now = Utc.with_ymd_and_hms(2024, 3, 20, 18, 0, 0).unwrap();
        let report = status_report(&stockholm(), &ZoneTable::default(), &provider, now).unwrap();

        assert_eq!(report.elevation, -8.5);
        assert_eq!(report.zone_index, 2);
        assert_eq!(report.zone.temperature, 4000);
        assert_eq!(report.local_time.date_naive(), now.date_naive());
        assert!(report.events.sunrise < report.events.sunset);
    }

    #[test]
    fn test_status_report_propagates_provider_errors() {
        let mut provider = MockElevationProvider::new();
        provider
            .expect_elevation()
            .returning(|_, _, _| Err(anyhow::anyhow!("no ephemeris")));

        let now = Utc.with_ymd_and_hms(2024, 3, 20, 18, 0, 0).unwrap();
        let result = status_report(&stockholm(), &ZoneTable::default(), &provider, now);
        assert!(result.is_err());
    }

    #[test]
    fn test_status_report_with_real_provider() {
        // Early afternoon in June: well inside the day zone
        let now = Utc.with_ymd_and_hms(2024, 6, 21, 11, 0, 0).unwrap();
        let report =
            status_report(&stockholm(), &ZoneTable::default(), &SolarElevation::new(), now)
                .unwrap();
        assert_eq!(report.zone_index, 0);
        assert!(report.elevation > 40.0);
    }
}
