//! Display sink abstraction.
//!
//! The daemon never talks to the display directly. It hands each new
//! temperature/gamma pair to a [`DisplaySink`], which applies it on a best-effort
//! basis and reports what happened as an [`ApplyOutcome`]. Outcomes are values,
//! not errors: a sink that cannot reach the display must never stop the loop.
//!
//! ## Implementations
//!
//! - [`hyprsunset::HyprsunsetCommand`]: runs the `hyprsunset` binary once per
//!   update (production).
//! - [`RecordingSink`]: remembers every call and can be told to fail
//!   (tests, enabled by `cfg(test)` or the `testing-support` feature).

use std::fmt;

pub mod hyprsunset;

/// What happened when a sink tried to apply a value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The command ran and reported success.
    Applied,
    /// The command ran but exited unsuccessfully (`None` when killed by a signal).
    Failed { status: Option<i32> },
    /// The command could not be started at all.
    SpawnFailed(String),
    /// The command did not finish within the configured timeout and was killed.
    TimedOut,
}

impl ApplyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ApplyOutcome::Applied)
    }
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyOutcome::Applied => write!(f, "applied"),
            ApplyOutcome::Failed { status: Some(code) } => write!(f, "exited with status {}", code),
            ApplyOutcome::Failed { status: None } => write!(f, "terminated by signal"),
            ApplyOutcome::SpawnFailed(reason) => write!(f, "could not start: {}", reason),
            ApplyOutcome::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Something that can push a temperature/gamma pair to the display.
#[cfg_attr(test, mockall::automock)]
pub trait DisplaySink {
    /// Apply `temperature` (Kelvin) and `gamma` (percent).
    ///
    /// Implementations must not panic and must not block forever.
    fn apply(&mut self, temperature: u32, gamma: f64) -> ApplyOutcome;
}

/// Sink that records every call, for tests.
#[cfg(any(test, feature = "testing-support"))]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<(u32, f64)>,
    pub fail: bool,
}

#[cfg(any(test, feature = "testing-support"))]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every call fails as if the command were missing.
    pub fn failing() -> Self {
        Self {
            calls: Vec::new(),
            fail: true,
        }
    }

    pub fn last(&self) -> Option<(u32, f64)> {
        self.calls.last().copied()
    }
}

#[cfg(any(test, feature = "testing-support"))]
impl DisplaySink for RecordingSink {
    fn apply(&mut self, temperature: u32, gamma: f64) -> ApplyOutcome {
        self.calls.push((temperature, gamma));
        if self.fail {
            ApplyOutcome::SpawnFailed("recording sink set to fail".to_string())
        } else {
            ApplyOutcome::Applied
        }
    }
}
