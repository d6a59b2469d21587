//! Fixed-step convergence of the applied display state towards a target.
//!
//! Each tick moves temperature and gamma independently by at most their
//! configured step, clamping at the target so neither channel overshoots.
//! The channels are not synchronized: one can arrive long before the other.
//! A tick on an already converged state changes nothing.

use crate::constants::*;
use crate::zones::Target;

/// Values currently applied (or being applied) to the display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayState {
    pub temperature: f64,
    pub gamma: f64,
}

impl DisplayState {
    pub fn new(temperature: f64, gamma: f64) -> Self {
        Self { temperature, gamma }
    }

    /// The neutral state every run starts from.
    pub fn baseline() -> Self {
        Self::new(BASELINE_TEMP, BASELINE_GAMMA)
    }

    /// Temperature as handed to the display command (truncated Kelvin).
    pub fn temperature_kelvin(&self) -> u32 {
        self.temperature.max(0.0) as u32
    }

    /// True when both channels sit within tolerance of the target.
    pub fn is_converged_to(&self, target: &Target) -> bool {
        (target.temperature - self.temperature).abs() <= TEMP_TOLERANCE
            && (target.gamma - self.gamma).abs() <= GAMMA_TOLERANCE
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Per-tick step sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSizes {
    pub temperature: f64,
    pub gamma: f64,
}

impl Default for StepSizes {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMP_STEP as f64,
            gamma: DEFAULT_GAMMA_STEP,
        }
    }
}

/// Result of a single controller tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// State after the tick.
    pub state: DisplayState,
    /// Whether the state was already within tolerance before the tick.
    pub converged: bool,
    /// Whether the tick moved either channel.
    pub changed: bool,
}

/// Move `current` towards `target` by at most `step`, never past it.
///
/// Returns `current` untouched when it is already within `tolerance`.
fn approach(current: f64, target: f64, step: f64, tolerance: f64) -> f64 {
    if (target - current).abs() <= tolerance {
        current
    } else if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}

/// Owns the display state and advances it one tick at a time.
#[derive(Debug, Clone)]
pub struct TransitionController {
    state: DisplayState,
    steps: StepSizes,
}

impl TransitionController {
    /// Start from the baseline state.
    pub fn new(steps: StepSizes) -> Self {
        Self::with_state(DisplayState::baseline(), steps)
    }

    pub fn with_state(state: DisplayState, steps: StepSizes) -> Self {
        Self { state, steps }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn steps(&self) -> StepSizes {
        self.steps
    }

    /// Advance one tick towards `target`.
    pub fn step(&mut self, target: &Target) -> StepOutcome {
        if self.state.is_converged_to(target) {
            return StepOutcome {
                state: self.state,
                converged: true,
                changed: false,
            };
        }

        let previous = self.state;
        self.state.temperature = approach(
            self.state.temperature,
            target.temperature,
            self.steps.temperature,
            TEMP_TOLERANCE,
        );
        self.state.gamma = approach(
            self.state.gamma,
            target.gamma,
            self.steps.gamma,
            GAMMA_TOLERANCE,
        );

        StepOutcome {
            state: self.state,
            converged: false,
            changed: self.state != previous,
        }
    }
}
