//! Implementation of the --test command.
//!
//! Applies one temperature and gamma pair through the configured display
//! command and exits. Useful for checking that the command works and for
//! picking zone values by eye. A running daemon will overwrite the values on
//! its next transition tick.

use anyhow::Result;
use std::path::Path;

use crate::backend::DisplaySink;
use crate::backend::hyprsunset::{HyprsunsetCommand, format_gamma};
use crate::config::Config;
use crate::constants::{MAXIMUM_GAMMA, MAXIMUM_TEMP, MINIMUM_GAMMA, MINIMUM_TEMP};
use crate::logger::Log;

/// Validate temperature value using the same limits as the zone table
fn validate_temperature(temp: u32) -> Result<()> {
    if temp < MINIMUM_TEMP {
        anyhow::bail!(
            "Temperature {} is too low (minimum: {}K)",
            temp,
            MINIMUM_TEMP
        );
    }

    if temp > MAXIMUM_TEMP {
        anyhow::bail!(
            "Temperature {} is too high (maximum: {}K)",
            temp,
            MAXIMUM_TEMP
        );
    }

    Ok(())
}

fn validate_gamma(gamma: f64) -> Result<()> {
    if gamma < MINIMUM_GAMMA {
        anyhow::bail!("Gamma {} is too low (minimum: {})", gamma, MINIMUM_GAMMA);
    }

    if gamma > MAXIMUM_GAMMA {
        anyhow::bail!("Gamma {} is too high (maximum: {})", gamma, MAXIMUM_GAMMA);
    }

    Ok(())
}

/// Validate and push one pair through `sink`.
pub fn apply_test_values<S: DisplaySink>(sink: &mut S, temperature: u32, gamma: f64) -> Result<()> {
    validate_temperature(temperature)?;
    validate_gamma(gamma)?;

    let outcome = sink.apply(temperature, gamma);
    if !outcome.is_success() {
        anyhow::bail!("Failed to apply test values: display command {}", outcome);
    }

    Ok(())
}

/// Handle the --test command to apply specific temperature and gamma values
pub fn handle_test_command(temperature: u32, gamma: f64, config_path: Option<&Path>) -> Result<()> {
    Log::log_version();

    let config = Config::load_with_override(config_path)?;
    let mut sink = HyprsunsetCommand::new(config.command(), config.command_timeout());

    Log::log_block_start(&format!(
        "Testing display settings: {}K @ {}%",
        temperature,
        format_gamma(gamma)
    ));
    Log::log_indented(&format!(
        "Running: {} {}",
        sink.program(),
        HyprsunsetCommand::arguments(temperature, gamma).join(" ")
    ));

    apply_test_values(&mut sink, temperature, gamma)?;

    Log::log_decorated("Test values applied successfully");
    Log::log_end();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ApplyOutcome, MockDisplaySink, RecordingSink};

    #[test]
    fn test_validate_temperature_bounds() {
        assert!(validate_temperature(MINIMUM_TEMP).is_ok());
        assert!(validate_temperature(MAXIMUM_TEMP).is_ok());
        assert!(validate_temperature(MINIMUM_TEMP - 1).is_err());
        assert!(validate_temperature(MAXIMUM_TEMP + 1).is_err());
    }

    #[test]
    fn test_validate_gamma_bounds() {
        assert!(validate_gamma(0.0).is_ok());
        assert!(validate_gamma(100.0).is_ok());
        assert!(validate_gamma(-0.5).is_err());
        assert!(validate_gamma(100.5).is_err());
    }

    #[test]
    fn test_apply_test_values_uses_sink_once() {
        let mut sink = RecordingSink::new();
        apply_test_values(&mut sink, 3300, 90.0).unwrap();
        assert_eq!(sink.calls, vec![(3300, 90.0)]);
    }

    #[test]
    fn test_invalid_values_never_reach_sink() {
        let mut sink = MockDisplaySink::new();
        sink.expect_apply().never();

        assert!(apply_test_values(&mut sink, 500, 90.0).is_err());
        assert!(apply_test_values(&mut sink, 3300, 150.0).is_err());
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let mut sink = MockDisplaySink::new();
        sink.expect_apply()
            .times(1)
            .returning(|_, _| ApplyOutcome::Failed { status: Some(2) });

        let err = apply_test_values(&mut sink, 3300, 90.0).unwrap_err();
        assert!(err.to_string().contains("Failed to apply test values"));
    }
}
