use anyhow::Result;
use std::path::{Path, PathBuf};

use sunzones::args::{CliAction, ParsedArgs, display_help, display_version_info};
use sunzones::backend::hyprsunset::{HyprsunsetCommand, probe_version};
use sunzones::commands;
use sunzones::constants::EXIT_FAILURE;
use sunzones::lock::{InstanceLock, default_lock_path};
use sunzones::signals::setup_signal_handler;
use sunzones::{
    Config, Daemon, Log, Schedule, SolarElevation, SystemClock, TransitionController,
};

/// Load configuration, take the instance lock, and run the loop until a
/// shutdown signal arrives.
fn run_daemon(config_path: Option<&Path>) -> Result<()> {
    Log::log_version();

    let config = Config::load_with_override(config_path)?;
    let shown_path: Option<PathBuf> = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => Config::get_config_path().ok(),
    };
    config.log_config(shown_path.as_deref());

    let location = config.location()?;
    let zones = config.zone_table()?;

    let running = setup_signal_handler()?;
    let lock = InstanceLock::acquire(&default_lock_path())?;
    Log::log_block_start("Lock acquired, starting sunzones...");

    probe_version(config.command());

    let sink = HyprsunsetCommand::new(config.command(), config.command_timeout());
    let mut daemon = Daemon::new(
        location,
        zones,
        TransitionController::new(config.step_sizes()),
        SolarElevation::new(),
        sink,
        SystemClock,
        Schedule::from_config(&config),
    );

    Log::log_block_start("Smart zones active");
    let ticks = daemon.run(&running);
    Log::log_debug(&format!("Loop stopped after {} ticks", ticks));

    Log::log_block_start("Shutting down sunzones...");
    lock.release();
    Log::log_end();

    Ok(())
}

fn run(action: CliAction) -> Result<()> {
    match action {
        CliAction::ShowVersion => display_version_info(),
        CliAction::ShowHelp => display_help(),
        CliAction::ShowHelpDueToError => {
            display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run {
            debug_enabled,
            config_path,
        } => {
            Log::set_debug(debug_enabled);
            run_daemon(config_path.as_deref())?;
        }
        CliAction::Test {
            debug_enabled,
            config_path,
            temperature,
            gamma,
        } => {
            Log::set_debug(debug_enabled);
            commands::test::handle_test_command(temperature, gamma, config_path.as_deref())?;
        }
        CliAction::Status {
            debug_enabled,
            config_path,
        } => {
            Log::set_debug(debug_enabled);
            commands::status::handle_status_command(config_path.as_deref())?;
        }
    }

    Ok(())
}

fn main() {
    let parsed = ParsedArgs::from_env();

    if let Err(e) = run(parsed.action) {
        Log::log_pipe();
        Log::log_error(&format!("{:#}", e));
        std::process::exit(EXIT_FAILURE);
    }
}
