//! Configuration loading, validation, and default file generation.
//!
//! Configuration lives in `$XDG_CONFIG_HOME/sunzones/sunzones.toml` unless a
//! path is given on the command line. A commented default file is written on
//! first run so the zone table is easy to discover and edit.
//!
//! ```toml
//! #[Location]
//! latitude = 59.36                 # Degrees north (negative for south)
//! longitude = 18.0                 # Degrees east (negative for west)
//! timezone = "Europe/Stockholm"    # IANA timezone name
//!
//! #[Transition]
//! temp_step = 10                   # Kelvin per transition tick
//! gamma_step = 0.005               # Gamma percent per transition tick
//! transition_delay_ms = 0          # Delay between transition ticks
//! poll_interval = 60               # Seconds between checks once settled
//!
//! #[Display command]
//! command = "hyprsunset"
//! command_timeout_ms = 5000        # 0 waits indefinitely
//!
//! [[zones]]
//! threshold = 0.0
//! temperature = 6500
//! gamma = 100.0
//! name = "day"
//! ```
//!
//! Every scalar is optional and falls back to the defaults in
//! [`crate::constants`]. Zones, when given, replace the default table
//! entirely and must be listed from the highest threshold to the lowest.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::*;
use crate::geo::Location;
use crate::logger::Log;
use crate::transition::StepSizes;
use crate::utils::{format_coordinates, path_for_display};
use crate::zones::{Zone, ZoneTable};

/// Settings loaded from `sunzones.toml`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IANA timezone name, e.g. "Europe/Stockholm".
    pub timezone: Option<String>,
    pub temp_step: Option<u32>,      // Kelvin per tick
    pub gamma_step: Option<f64>,     // percent per tick
    pub transition_delay_ms: Option<u64>,
    pub poll_interval: Option<u64>, // seconds
    /// Display command invoked for every update.
    pub command: Option<String>,
    pub command_timeout_ms: Option<u64>,
    /// Zone table, highest threshold first.
    pub zones: Option<Vec<Zone>>,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("sunzones").join("sunzones.toml"))
    }

    /// Load from the default location, creating a default file if none exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)
                .context("Failed to create default config during load")?;
            Log::log_decorated(&format!(
                "Created default configuration at {}",
                path_for_display(&config_path)
            ));
        }

        Self::load_from_path(&config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })
    }

    /// Load from `path` when one was given on the command line, otherwise
    /// from the default location.
    pub fn load_with_override(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load from an explicit path. Does not create anything.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config.apply_defaults();
        validate_config(&config)?;

        Ok(config)
    }

    /// Fill every unset field from the built-in defaults.
    pub fn apply_defaults(&mut self) {
        self.latitude.get_or_insert(DEFAULT_LATITUDE);
        self.longitude.get_or_insert(DEFAULT_LONGITUDE);
        self.timezone
            .get_or_insert_with(|| DEFAULT_TIMEZONE.to_string());
        self.temp_step.get_or_insert(DEFAULT_TEMP_STEP);
        self.gamma_step.get_or_insert(DEFAULT_GAMMA_STEP);
        self.transition_delay_ms
            .get_or_insert(DEFAULT_TRANSITION_DELAY_MS);
        self.poll_interval.get_or_insert(DEFAULT_POLL_INTERVAL);
        self.command.get_or_insert_with(|| DEFAULT_COMMAND.to_string());
        self.command_timeout_ms
            .get_or_insert(DEFAULT_COMMAND_TIMEOUT_MS);
        self.zones
            .get_or_insert_with(|| ZoneTable::default().zones().to_vec());
    }

    /// Fully defaulted configuration, as written to a fresh config file.
    pub fn defaults() -> Self {
        let mut config = Self::default();
        config.apply_defaults();
        config
    }

    pub fn location(&self) -> Result<Location> {
        let timezone_name = self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid timezone '{}': {}", timezone_name, e))?;

        Ok(Location {
            latitude: self.latitude.unwrap_or(DEFAULT_LATITUDE),
            longitude: self.longitude.unwrap_or(DEFAULT_LONGITUDE),
            timezone,
        })
    }

    pub fn zone_table(&self) -> Result<ZoneTable> {
        match &self.zones {
            Some(zones) => ZoneTable::new(zones.clone()),
            None => Ok(ZoneTable::default()),
        }
    }

    pub fn step_sizes(&self) -> StepSizes {
        StepSizes {
            temperature: self.temp_step.unwrap_or(DEFAULT_TEMP_STEP) as f64,
            gamma: self.gamma_step.unwrap_or(DEFAULT_GAMMA_STEP),
        }
    }

    /// Sleep between ticks while transitioning.
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(
            self.transition_delay_ms
                .unwrap_or(DEFAULT_TRANSITION_DELAY_MS),
        )
    }

    /// Sleep between ticks once settled.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL))
    }

    pub fn command(&self) -> &str {
        self.command.as_deref().unwrap_or(DEFAULT_COMMAND)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(
            self.command_timeout_ms
                .unwrap_or(DEFAULT_COMMAND_TIMEOUT_MS),
        )
    }

    /// Write a commented default configuration to `path`.
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let mut builder = ConfigBuilder::new()
            .add_section("Location")
            .add_setting(
                "latitude",
                &format!("{:?}", DEFAULT_LATITUDE),
                "Degrees north (negative for south)",
            )
            .add_setting(
                "longitude",
                &format!("{:?}", DEFAULT_LONGITUDE),
                "Degrees east (negative for west)",
            )
            .add_setting(
                "timezone",
                &format!("\"{}\"", DEFAULT_TIMEZONE),
                "IANA timezone name",
            )
            .add_section("Transition")
            .add_setting(
                "temp_step",
                &DEFAULT_TEMP_STEP.to_string(),
                &format!(
                    "Kelvin per transition tick ({}-{})",
                    MINIMUM_TEMP_STEP, MAXIMUM_TEMP_STEP
                ),
            )
            .add_setting(
                "gamma_step",
                &format!("{:?}", DEFAULT_GAMMA_STEP),
                "Gamma percent per transition tick",
            )
            .add_setting(
                "transition_delay_ms",
                &DEFAULT_TRANSITION_DELAY_MS.to_string(),
                "Milliseconds between transition ticks",
            )
            .add_setting(
                "poll_interval",
                &DEFAULT_POLL_INTERVAL.to_string(),
                &format!(
                    "Seconds between checks once settled ({}-{})",
                    MINIMUM_POLL_INTERVAL, MAXIMUM_POLL_INTERVAL
                ),
            )
            .add_section("Display command")
            .add_setting(
                "command",
                &format!("\"{}\"", DEFAULT_COMMAND),
                "Called as: <command> --temperature <K> --gamma <percent>",
            )
            .add_setting(
                "command_timeout_ms",
                &DEFAULT_COMMAND_TIMEOUT_MS.to_string(),
                "Kill the command after this long (0 waits indefinitely)",
            )
            .add_section("Zones (highest elevation threshold first)");

        for zone in ZoneTable::default().zones() {
            builder = builder.add_zone(zone);
        }

        fs::write(path, builder.build())
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;

        Ok(())
    }

    pub fn log_config(&self, path: Option<&Path>) {
        match path {
            Some(path) => Log::log_block_start(&format!(
                "Loaded configuration from {}",
                path_for_display(path)
            )),
            None => Log::log_block_start("Loaded configuration"),
        }

        Log::log_indented(&format!(
            "Location: {}",
            format_coordinates(
                self.latitude.unwrap_or(DEFAULT_LATITUDE),
                self.longitude.unwrap_or(DEFAULT_LONGITUDE)
            )
        ));
        Log::log_indented(&format!(
            "Timezone: {}",
            self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE)
        ));

        let steps = self.step_sizes();
        Log::log_indented(&format!(
            "Step size: {}K / {}% per tick",
            steps.temperature, steps.gamma
        ));
        Log::log_indented(&format!(
            "Transition delay: {} ms",
            self.transition_delay().as_millis()
        ));
        Log::log_indented(&format!(
            "Poll interval: {} seconds",
            self.poll_interval().as_secs()
        ));
        Log::log_indented(&format!("Display command: {}", self.command()));

        if let Ok(table) = self.zone_table() {
            Log::log_indented(&format!("Zones ({}):", table.len()));
            for zone in table.zones() {
                Log::log_indented(&format!("  {}", zone));
            }
        }
    }
}

/// Validate a configuration, checking every range and the zone table.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(lat) = config.latitude {
        if !(-90.0..=90.0).contains(&lat) {
            anyhow::bail!("Latitude must be between -90 and 90 degrees (got {})", lat);
        }
    }

    if let Some(lon) = config.longitude {
        if !(-180.0..=180.0).contains(&lon) {
            anyhow::bail!(
                "Longitude must be between -180 and 180 degrees (got {})",
                lon
            );
        }
    }

    // Parses the timezone as a side effect
    config.location()?;

    if let Some(step) = config.temp_step {
        if !(MINIMUM_TEMP_STEP..=MAXIMUM_TEMP_STEP).contains(&step) {
            anyhow::bail!(
                "temp_step must be between {} and {} Kelvin",
                MINIMUM_TEMP_STEP,
                MAXIMUM_TEMP_STEP
            );
        }
    }

    if let Some(step) = config.gamma_step {
        if !(step > 0.0 && step <= MAXIMUM_GAMMA_STEP) {
            anyhow::bail!(
                "gamma_step must be greater than 0 and at most {}",
                MAXIMUM_GAMMA_STEP
            );
        }
    }

    if let Some(delay) = config.transition_delay_ms {
        if delay > MAXIMUM_TRANSITION_DELAY_MS {
            anyhow::bail!(
                "transition_delay_ms must be at most {}",
                MAXIMUM_TRANSITION_DELAY_MS
            );
        }
    }

    if let Some(interval) = config.poll_interval {
        if !(MINIMUM_POLL_INTERVAL..=MAXIMUM_POLL_INTERVAL).contains(&interval) {
            anyhow::bail!(
                "poll_interval must be between {} and {} seconds",
                MINIMUM_POLL_INTERVAL,
                MAXIMUM_POLL_INTERVAL
            );
        }
    }

    if let Some(command) = &config.command {
        if command.trim().is_empty() {
            anyhow::bail!("command must not be empty");
        }
    }

    if let Some(timeout) = config.command_timeout_ms {
        if timeout != 0
            && !(MINIMUM_COMMAND_TIMEOUT_MS..=MAXIMUM_COMMAND_TIMEOUT_MS).contains(&timeout)
        {
            anyhow::bail!(
                "command_timeout_ms must be 0 or between {} and {}",
                MINIMUM_COMMAND_TIMEOUT_MS,
                MAXIMUM_COMMAND_TIMEOUT_MS
            );
        }
    }

    config.zone_table().context("Invalid zone table")?;

    Ok(())
}

struct ConfigBuilder {
    entries: Vec<EntryType>,
}

enum EntryType {
    Section(String),
    Setting { line: String, comment: String },
    Raw(String),
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(EntryType::Section(format!("#[{}]", title)));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(EntryType::Setting {
            line: format!("{} = {}", key, value),
            comment: format!("# {}", comment),
        });
        self
    }

    /// Append a `[[zones]]` table. Must come after every top-level setting.
    fn add_zone(mut self, zone: &Zone) -> Self {
        self.entries.push(EntryType::Raw(String::new()));
        self.entries.push(EntryType::Raw("[[zones]]".to_string()));
        self.entries
            .push(EntryType::Raw(format!("threshold = {:?}", zone.threshold)));
        self.entries
            .push(EntryType::Raw(format!("temperature = {}", zone.temperature)));
        self.entries
            .push(EntryType::Raw(format!("gamma = {:?}", zone.gamma)));
        if let Some(name) = &zone.name {
            self.entries
                .push(EntryType::Raw(format!("name = \"{}\"", name)));
        }
        self
    }

    fn build(self) -> String {
        // Align all comments one space past the longest setting line
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                EntryType::Setting { line, .. } => Some(line.len()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry {
                EntryType::Section(title) => {
                    if !first_section {
                        result.push(String::new());
                    }
                    result.push(title);
                    first_section = false;
                }
                EntryType::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{}{}{}", line, padding, comment));
                }
                EntryType::Raw(line) => result.push(line),
            }
        }

        result.push(String::new());
        result.join("\n")
    }
}
