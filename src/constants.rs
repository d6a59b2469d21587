//! Application constants and default values for sunzones.
//!
//! This module contains the configuration defaults, validation limits,
//! and operational constants used throughout the application.

// ═══ Location Defaults ═══
// Used when the config file does not specify a location

pub const DEFAULT_LATITUDE: f64 = 59.36;
pub const DEFAULT_LONGITUDE: f64 = 18.00;
pub const DEFAULT_TIMEZONE: &str = "Europe/Stockholm";

// ═══ Baseline Display State ═══
// Every run starts from these values; nothing is persisted between runs

pub const BASELINE_TEMP: f64 = 6500.0; // Kelvin - neutral daylight
pub const BASELINE_GAMMA: f64 = 100.0; // percent - full brightness

// ═══ Transition Defaults ═══

pub const DEFAULT_TEMP_STEP: u32 = 10; // Kelvin per tick
pub const DEFAULT_GAMMA_STEP: f64 = 0.005; // percent per tick
pub const DEFAULT_TRANSITION_DELAY_MS: u64 = 0; // milliseconds between transition ticks
pub const DEFAULT_POLL_INTERVAL: u64 = 60; // seconds between checks once settled

// Convergence tolerances per channel
pub const TEMP_TOLERANCE: f64 = 1.0;
pub const GAMMA_TOLERANCE: f64 = 0.001;

// ═══ Display Command ═══

pub const DEFAULT_COMMAND: &str = "hyprsunset";
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 5000;
pub const COMMAND_KILL_GRACE_MS: u64 = 100; // SIGTERM -> SIGKILL grace period
pub const COMMAND_POLL_INTERVAL_MS: u64 = 10; // how often a running command is checked

// ═══ Default Zone Table ═══
// (threshold, temperature, gamma, name), highest elevation first

pub const DEFAULT_ZONES: &[(f64, u32, f64, &str)] = &[
    (0.0, 6500, 100.0, "day"),
    (-6.0, 5500, 100.0, "civil twilight"),
    (-12.0, 4000, 90.0, "nautical twilight"),
    (-18.0, 3200, 85.0, "astronomical twilight"),
    (-90.0, 2700, 75.0, "night"),
];

// ═══ Validation Limits ═══

// Temperature limits (Kelvin scale)
pub const MINIMUM_TEMP: u32 = 1000; // Very warm candlelight-like
pub const MAXIMUM_TEMP: u32 = 20000; // Very cool blue light

// Gamma limits (percentage of full brightness)
pub const MINIMUM_GAMMA: f64 = 0.0;
pub const MAXIMUM_GAMMA: f64 = 100.0;

// Step limits
pub const MINIMUM_TEMP_STEP: u32 = 1;
pub const MAXIMUM_TEMP_STEP: u32 = 1000;
pub const MAXIMUM_GAMMA_STEP: f64 = 10.0;

// Timing limits
pub const MAXIMUM_TRANSITION_DELAY_MS: u64 = 10_000;
pub const MINIMUM_POLL_INTERVAL: u64 = 1; // seconds
pub const MAXIMUM_POLL_INTERVAL: u64 = 3600; // seconds
pub const MINIMUM_COMMAND_TIMEOUT_MS: u64 = 100;
pub const MAXIMUM_COMMAND_TIMEOUT_MS: u64 = 60_000;

// ═══ Solar Calculation Constants ═══

pub const DEFAULT_DELTA_T_SECONDS: f64 = 69.0; // TT - UT1 estimate for the 2020s
pub const OBSERVER_ALTITUDE_METERS: f64 = 0.0;

// ═══ Operational Timing Constants ═══

pub const CHECK_INTERVAL_SECS: u64 = 1; // How often to check the running flag during sleep

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure
