//! The main loop: sample, resolve, step, apply, sleep.
//!
//! Every tick asks the [`ElevationProvider`] for the current solar elevation,
//! resolves it to a [`Target`] through the [`ZoneTable`], and lets the
//! [`TransitionController`] take one step. The convergence flag alone decides
//! what happens next:
//!
//! - **Transitioning**: the new state goes to the [`DisplaySink`] and the loop
//!   sleeps for the short transition delay.
//! - **Settled**: nothing is applied and the loop sleeps for the poll interval.
//!
//! Time and sleeping come from an injected [`Clock`] so the whole loop can be
//! driven by tests without waiting.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::backend::{ApplyOutcome, DisplaySink};
use crate::config::Config;
use crate::constants::*;
use crate::geo::{ElevationProvider, Location};
use crate::logger::Log;
use crate::transition::{StepOutcome, TransitionController};
use crate::zones::{Target, ZoneTable};

/// Source of the current time and of sleeping between ticks.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Sleep for `duration`, returning early once `running` is cleared.
    fn sleep(&self, duration: Duration, running: &AtomicBool);
}

/// Wall clock. Sleeps in one-second chunks so shutdown is prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration, running: &AtomicBool) {
        let check_interval = Duration::from_secs(CHECK_INTERVAL_SECS);
        let mut slept = Duration::ZERO;
        while slept < duration && running.load(Ordering::SeqCst) {
            let chunk = check_interval.min(duration - slept);
            thread::sleep(chunk);
            slept += chunk;
        }
    }
}

/// Which of the two loop modes a tick ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMode {
    Transitioning,
    Settled,
}

impl TickMode {
    pub fn from_convergence(converged: bool) -> Self {
        if converged {
            TickMode::Settled
        } else {
            TickMode::Transitioning
        }
    }

    pub fn delay(self, schedule: &Schedule) -> Duration {
        match self {
            TickMode::Transitioning => schedule.transition_delay,
            TickMode::Settled => schedule.poll_interval,
        }
    }
}

/// Sleep durations for the two loop modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub transition_delay: Duration,
    pub poll_interval: Duration,
}

impl Schedule {
    pub fn from_config(config: &Config) -> Self {
        Self {
            transition_delay: config.transition_delay(),
            poll_interval: config.poll_interval(),
        }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            transition_delay: Duration::from_millis(DEFAULT_TRANSITION_DELAY_MS),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL),
        }
    }
}

/// Everything that happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// `None` when the elevation could not be computed.
    pub elevation: Option<f64>,
    /// Target stepped towards, `None` if none was known yet.
    pub target: Option<Target>,
    pub step: Option<StepOutcome>,
    /// Sink result, `None` when nothing was applied.
    pub applied: Option<ApplyOutcome>,
    pub mode: TickMode,
    pub delay: Duration,
}

/// Owns the controller and its collaborators and runs the loop.
pub struct Daemon<P, S, C> {
    location: Location,
    zones: ZoneTable,
    controller: TransitionController,
    provider: P,
    sink: S,
    clock: C,
    schedule: Schedule,
    last_target: Option<Target>,
    last_zone: Option<usize>,
    settled: bool,
}

impl<P, S, C> Daemon<P, S, C>
where
    P: ElevationProvider,
    S: DisplaySink,
    C: Clock,
{
    pub fn new(
        location: Location,
        zones: ZoneTable,
        controller: TransitionController,
        provider: P,
        sink: S,
        clock: C,
        schedule: Schedule,
    ) -> Self {
        Self {
            location,
            zones,
            controller,
            provider,
            sink,
            clock,
            schedule,
            last_target: None,
            last_zone: None,
            settled: false,
        }
    }

    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Resolve the current target, falling back to the last known one when
    /// the elevation cannot be computed.
    fn resolve_target(&mut self) -> (Option<f64>, Option<Target>) {
        let local = self.location.local_time(self.clock.now());

        match self.provider.elevation(
            self.location.latitude,
            self.location.longitude,
            &local,
        ) {
            Ok(elevation) => {
                let (index, zone) = self.zones.resolve_zone(elevation);
                let target = zone.target();

                if self.last_zone != Some(index) {
                    Log::log_block_start(&format!(
                        "Entering {} (sun at {:.2}°)",
                        zone.label(),
                        elevation
                    ));
                    Log::log_indented(&format!(
                        "Target: {}K @ {}%",
                        zone.temperature, zone.gamma
                    ));
                    self.last_zone = Some(index);
                }

                self.last_target = Some(target);
                (Some(elevation), Some(target))
            }
            Err(e) => {
                Log::log_warning(&format!("Could not compute solar elevation: {}", e));
                if self.last_target.is_some() {
                    Log::log_indented("Keeping the previous target for this tick");
                }
                (None, self.last_target)
            }
        }
    }

    /// Run a single iteration without sleeping.
    pub fn tick(&mut self) -> TickReport {
        let (elevation, target) = self.resolve_target();

        let Some(target) = target else {
            let mode = TickMode::Settled;
            return TickReport {
                elevation,
                target: None,
                step: None,
                applied: None,
                mode,
                delay: mode.delay(&self.schedule),
            };
        };

        let step = self.controller.step(&target);
        let mode = TickMode::from_convergence(step.converged);

        let applied = if step.changed {
            let outcome = self
                .sink
                .apply(step.state.temperature_kelvin(), step.state.gamma);
            if !outcome.is_success() {
                Log::log_debug(&format!("Display command {}", outcome));
            }
            Some(outcome)
        } else {
            None
        };

        Log::log_debug(&format!(
            "{:?}: {:.0}K @ {:.3}% -> {}K @ {}%",
            mode,
            step.state.temperature,
            step.state.gamma,
            target.temperature,
            target.gamma
        ));

        let delay = mode.delay(&self.schedule);
        if step.converged && !self.settled {
            Log::log_decorated(&format!(
                "Settled at {}K @ {}%. Checking again every {} seconds",
                step.state.temperature_kelvin(),
                step.state.gamma,
                delay.as_secs()
            ));
        }
        self.settled = step.converged;

        TickReport {
            elevation,
            target: Some(target),
            step: Some(step),
            applied,
            mode,
            delay,
        }
    }

    /// Tick and sleep until `running` is cleared. Returns the number of ticks.
    pub fn run(&mut self, running: &AtomicBool) -> u64 {
        let mut ticks = 0;
        while running.load(Ordering::SeqCst) {
            let report = self.tick();
            ticks += 1;
            self.clock.sleep(report.delay, running);
        }
        ticks
    }
}

/// Clock for tests: time only moves when the loop sleeps.
#[cfg(any(test, feature = "testing-support"))]
#[derive(Debug)]
pub struct ManualClock {
    now: std::cell::Cell<DateTime<Utc>>,
    sleeps: std::cell::RefCell<Vec<Duration>>,
    stop_after: Option<usize>,
}

#[cfg(any(test, feature = "testing-support"))]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: std::cell::Cell::new(start),
            sleeps: std::cell::RefCell::new(Vec::new()),
            stop_after: None,
        }
    }

    /// Clear the running flag after `sleeps` sleeps.
    pub fn stop_after(mut self, sleeps: usize) -> Self {
        self.stop_after = Some(sleeps);
        self
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

#[cfg(any(test, feature = "testing-support"))]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn sleep(&self, duration: Duration, running: &AtomicBool) {
        let advanced = chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
        self.now.set(self.now.get() + advanced);

        let mut sleeps = self.sleeps.borrow_mut();
        sleeps.push(duration);
        if self.stop_after.is_some_and(|limit| sleeps.len() >= limit) {
            running.store(false, Ordering::SeqCst);
        }
    }
}
