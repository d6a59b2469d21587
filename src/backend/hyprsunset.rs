//! Display sink backed by the `hyprsunset` command.
//!
//! Every update runs `<command> --temperature <K> --gamma <percent>` once and
//! waits for it to finish. Output is discarded and the exit status is only
//! reported back as an [`ApplyOutcome`], so a missing binary or a failing
//! compositor never reaches the caller as an error.
//!
//! A command that outlives `timeout` receives SIGTERM, then SIGKILL after a
//! short grace period, and is always reaped.

use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use super::{ApplyOutcome, DisplaySink};
use crate::constants::*;
use crate::logger::Log;
use crate::utils::extract_version_from_output;

/// Runs the display command once per applied value pair.
#[derive(Debug, Clone)]
pub struct HyprsunsetCommand {
    program: String,
    timeout: Option<Duration>,
}

impl HyprsunsetCommand {
    /// Create a sink for `program`. A zero `timeout` waits indefinitely.
    pub fn new(program: &str, timeout: Duration) -> Self {
        Self {
            program: program.to_string(),
            timeout: (!timeout.is_zero()).then_some(timeout),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed for a value pair.
    pub fn arguments(temperature: u32, gamma: f64) -> Vec<String> {
        vec![
            "--temperature".to_string(),
            temperature.to_string(),
            "--gamma".to_string(),
            format_gamma(gamma),
        ]
    }

    fn wait_with_timeout(child: &mut Child, timeout: Duration) -> ApplyOutcome {
        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) if status.success() => return ApplyOutcome::Applied,
                Ok(Some(status)) => {
                    return ApplyOutcome::Failed {
                        status: status.code(),
                    };
                }
                Ok(None) if Instant::now() >= deadline => {
                    terminate(child);
                    return ApplyOutcome::TimedOut;
                }
                Ok(None) => thread::sleep(Duration::from_millis(COMMAND_POLL_INTERVAL_MS)),
                Err(e) => {
                    terminate(child);
                    return ApplyOutcome::SpawnFailed(e.to_string());
                }
            }
        }
    }
}

impl DisplaySink for HyprsunsetCommand {
    fn apply(&mut self, temperature: u32, gamma: f64) -> ApplyOutcome {
        let spawned = Command::new(&self.program)
            .args(Self::arguments(temperature, gamma))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => return ApplyOutcome::SpawnFailed(e.to_string()),
        };

        match self.timeout {
            Some(timeout) => Self::wait_with_timeout(&mut child, timeout),
            None => match child.wait() {
                Ok(status) if status.success() => ApplyOutcome::Applied,
                Ok(status) => ApplyOutcome::Failed {
                    status: status.code(),
                },
                Err(e) => ApplyOutcome::SpawnFailed(e.to_string()),
            },
        }
    }
}

/// Gamma as passed on the command line: three decimals, enough for the
/// smallest sensible step.
pub fn format_gamma(gamma: f64) -> String {
    format!("{:.3}", gamma)
}

/// SIGTERM, short grace period, then SIGKILL. Always reaps.
fn terminate(child: &mut Child) {
    let pid = Pid::from_raw(child.id() as i32);
    let _ = kill(pid, Signal::SIGTERM);
    thread::sleep(Duration::from_millis(COMMAND_KILL_GRACE_MS));

    match child.try_wait() {
        Ok(Some(_)) => {}
        _ => {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Look up the display command's version for the startup banner.
///
/// Never fails: a missing command only produces a warning, since the daemon
/// keeps stepping its state even when nothing can be applied.
pub fn probe_version(program: &str) -> Option<String> {
    match Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
    {
        Ok(output) => {
            // Some builds print the version on stderr
            let text = if !output.stdout.is_empty() {
                String::from_utf8_lossy(&output.stdout)
            } else {
                String::from_utf8_lossy(&output.stderr)
            };

            match extract_version_from_output(&text) {
                Some(version) => {
                    Log::log_decorated(&format!("Found {} {}", program, version));
                    Some(version)
                }
                None => {
                    Log::log_warning(&format!("Could not parse version from {} output", program));
                    None
                }
            }
        }
        Err(e) => {
            Log::log_warning(&format!("{} is not available: {}", program, e));
            Log::log_indented("Display updates will be skipped until it can be started");
            None
        }
    }
}
