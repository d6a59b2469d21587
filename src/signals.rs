//! Shutdown signal handling.
//!
//! SIGINT and SIGTERM clear a shared `running` flag from a dedicated
//! signal-hook thread. The main loop checks the flag between sleep chunks.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use crate::logger::Log;

/// Register shutdown handlers and return the flag they clear.
pub fn setup_signal_handler() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("failed to register signal handlers")?;

    thread::spawn(move || {
        for signal in signals.forever() {
            Log::log_pipe();
            Log::log_info(&format!("Shutdown signal received: {}", signal_name(signal)));
            flag.store(false, Ordering::SeqCst);
        }
    });

    Ok(running)
}

fn signal_name(signal: i32) -> &'static str {
    match signal {
        SIGINT => "SIGINT",
        SIGTERM => "SIGTERM",
        _ => "unknown",
    }
}
