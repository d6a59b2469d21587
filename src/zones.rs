//! Elevation zones and target resolution.
//!
//! A [`ZoneTable`] maps a solar elevation angle to the color temperature and
//! gamma the display should be driven towards. Zones are ordered from the
//! highest threshold to the lowest; the first zone whose threshold lies
//! strictly below the current elevation wins, and the last zone catches
//! everything else.
//!
//! The strict comparison matters: an elevation exactly on a threshold belongs
//! to the zone *below* it, so the sun sitting on the horizon (0°) already
//! counts as twilight.

use anyhow::Result;
use serde::Deserialize;
use std::fmt;

use crate::constants::*;

/// One row of the zone table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Zone {
    /// Lower elevation bound in degrees (exclusive).
    pub threshold: f64,
    /// Target color temperature in Kelvin.
    pub temperature: u32,
    /// Target gamma in percent.
    pub gamma: f64,
    /// Label used in log output.
    #[serde(default)]
    pub name: Option<String>,
}

impl Zone {
    pub fn new(threshold: f64, temperature: u32, gamma: f64) -> Self {
        Self {
            threshold,
            temperature,
            gamma,
            name: None,
        }
    }

    pub fn named(threshold: f64, temperature: u32, gamma: f64, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::new(threshold, temperature, gamma)
        }
    }

    pub fn target(&self) -> Target {
        Target {
            temperature: self.temperature as f64,
            gamma: self.gamma,
        }
    }

    /// Name for display, falling back to the threshold.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("above {}°", self.threshold),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "> {:>6.1}°  {}K @ {}%  ({})",
            self.threshold,
            self.temperature,
            self.gamma,
            self.label()
        )
    }
}

/// Temperature/gamma pair the display is being driven towards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub temperature: f64,
    pub gamma: f64,
}

/// Immutable, strictly descending sequence of zones.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneTable {
    zones: Vec<Zone>,
}

impl ZoneTable {
    /// Build a table, rejecting empty input and any ordering violation.
    pub fn new(zones: Vec<Zone>) -> Result<Self> {
        if zones.is_empty() {
            anyhow::bail!("Zone table must contain at least one zone");
        }

        for (i, zone) in zones.iter().enumerate() {
            if !zone.threshold.is_finite() {
                anyhow::bail!("Zone {} has a non-finite threshold", i + 1);
            }
            if !(MINIMUM_TEMP..=MAXIMUM_TEMP).contains(&zone.temperature) {
                anyhow::bail!(
                    "Zone {} temperature {}K is outside {}-{}K",
                    i + 1,
                    zone.temperature,
                    MINIMUM_TEMP,
                    MAXIMUM_TEMP
                );
            }
            if !(MINIMUM_GAMMA..=MAXIMUM_GAMMA).contains(&zone.gamma) {
                anyhow::bail!(
                    "Zone {} gamma {}% is outside {}-{}%",
                    i + 1,
                    zone.gamma,
                    MINIMUM_GAMMA,
                    MAXIMUM_GAMMA
                );
            }
        }

        if let Some(pair) = zones
            .windows(2)
            .find(|pair| pair[1].threshold >= pair[0].threshold)
        {
            anyhow::bail!(
                "Zone thresholds must be strictly descending: {}° is followed by {}°",
                pair[0].threshold,
                pair[1].threshold
            );
        }

        Ok(Self { zones })
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Find the zone for an elevation, returning its index alongside it.
    ///
    /// Never fails: elevations at or below every threshold (and NaN) fall
    /// through to the last zone.
    pub fn resolve_zone(&self, elevation: f64) -> (usize, &Zone) {
        let floor = self.zones.len() - 1;
        self.zones
            .iter()
            .enumerate()
            .find(|(_, zone)| elevation > zone.threshold)
            .unwrap_or((floor, &self.zones[floor]))
    }

    /// Target temperature and gamma for an elevation.
    pub fn resolve(&self, elevation: f64) -> Target {
        self.resolve_zone(elevation).1.target()
    }
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self {
            zones: DEFAULT_ZONES
                .iter()
                .map(|&(threshold, temperature, gamma, name)| {
                    Zone::named(threshold, temperature, gamma, name)
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = ZoneTable::default();
        assert_eq!(table.len(), 5);
        assert!(ZoneTable::new(table.zones().to_vec()).is_ok());
    }

    #[test]
    fn test_resolve_day() {
        let table = ZoneTable::default();
        let target = table.resolve(35.0);
        assert_eq!(target.temperature, 6500.0);
        assert_eq!(target.gamma, 100.0);
    }

    #[test]
    fn test_resolve_each_band() {
        let table = ZoneTable::default();
        assert_eq!(table.resolve(-3.0).temperature, 5500.0);
        assert_eq!(table.resolve(-9.0).temperature, 4000.0);
        assert_eq!(table.resolve(-9.0).gamma, 90.0);
        assert_eq!(table.resolve(-15.0).temperature, 3200.0);
        assert_eq!(table.resolve(-45.0).temperature, 2700.0);
    }

    #[test]
    fn test_exact_threshold_falls_into_lower_zone() {
        let table = ZoneTable::default();

        // The sun on the horizon is already civil twilight
        let (index, zone) = table.resolve_zone(0.0);
        assert_eq!(index, 1);
        assert_eq!(zone.threshold, -6.0);
        assert_eq!(table.resolve(0.0).temperature, 5500.0);

        assert_eq!(table.resolve(-6.0).temperature, 4000.0);
        assert_eq!(table.resolve(-12.0).temperature, 3200.0);
        assert_eq!(table.resolve(-18.0).temperature, 2700.0);
    }

    #[test]
    fn test_floor_catches_everything_below() {
        let table = ZoneTable::default();
        assert_eq!(table.resolve_zone(-90.0).0, 4);
        assert_eq!(table.resolve_zone(-1000.0).0, 4);
        assert_eq!(table.resolve_zone(f64::NEG_INFINITY).0, 4);
        assert_eq!(table.resolve_zone(f64::NAN).0, 4);
    }

    #[test]
    fn test_single_zone_table() {
        let table = ZoneTable::new(vec![Zone::new(10.0, 4000, 80.0)]).unwrap();
        assert_eq!(table.resolve(50.0).temperature, 4000.0);
        assert_eq!(table.resolve(-50.0).temperature, 4000.0);
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(ZoneTable::new(Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let zones = vec![
            Zone::new(-6.0, 5500, 100.0),
            Zone::new(0.0, 6500, 100.0),
        ];
        assert!(ZoneTable::new(zones).is_err());
    }

    #[test]
    fn test_rejects_duplicate_thresholds() {
        let zones = vec![
            Zone::new(0.0, 6500, 100.0),
            Zone::new(0.0, 5500, 100.0),
        ];
        let err = ZoneTable::new(zones).unwrap_err();
        assert!(err.to_string().contains("strictly descending"));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(ZoneTable::new(vec![Zone::new(0.0, 500, 100.0)]).is_err());
        assert!(ZoneTable::new(vec![Zone::new(0.0, 6500, 120.0)]).is_err());
        assert!(ZoneTable::new(vec![Zone::new(f64::NAN, 6500, 100.0)]).is_err());
    }

    #[test]
    fn test_zone_label() {
        assert_eq!(Zone::named(0.0, 6500, 100.0, "day").label(), "day");
        assert_eq!(Zone::new(-6.0, 5500, 100.0).label(), "above -6°");
    }

    proptest! {
        #[test]
        fn resolve_is_total(elevation in -90.0f64..=90.0) {
            let table = ZoneTable::default();
            let target = table.resolve(elevation);
            prop_assert!(table
                .zones()
                .iter()
                .any(|z| z.target() == target));
        }

        #[test]
        fn resolved_zone_is_first_below(elevation in -120.0f64..=120.0) {
            let table = ZoneTable::default();
            let (index, zone) = table.resolve_zone(elevation);
            // Every zone before the match has a threshold at or above the elevation
            for earlier in &table.zones()[..index] {
                prop_assert!(earlier.threshold >= elevation);
            }
            if index < table.len() - 1 {
                prop_assert!(elevation > zone.threshold);
            }
        }

        #[test]
        fn higher_sun_never_means_warmer_zone(a in -90.0f64..=90.0, b in -90.0f64..=90.0) {
            let table = ZoneTable::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(table.resolve_zone(hi).0 <= table.resolve_zone(lo).0);
        }
    }
}
