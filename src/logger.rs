//! Structured logging with visual formatting.
//!
//! Output is written to stdout using Unicode box drawing characters so a
//! running daemon reads as one continuous block:
//!
//! ```text
//! ┏ sunzones v0.1.0 ━━╸
//! ┃
//! ┣ Loaded configuration from ~/.config/sunzones/sunzones.toml
//! ┃   Location: 59.3600°N, 18.0000°E
//! ╹
//! ```
//!
//! Two global switches control output: one silences everything (tests and
//! one-shot commands that print their own output), the other enables the
//! per-tick debug lines requested with `--debug`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Log level enumeration for categorizing message importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Log,  // Debug/operational detail, only shown with --debug
    Warn, // Non-fatal issues
    Err,  // Recoverable failures
    Crit, // Failures that stop the daemon
    Info, // Status updates
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self {
            LogLevel::Log => "[LOG]",
            LogLevel::Warn => "[WARN]",
            LogLevel::Err => "[ERR]",
            LogLevel::Crit => "[CRIT]",
            LogLevel::Info => "[INFO]",
        };
        f.write_str(prefix)
    }
}

/// Main logging interface providing structured output formatting.
pub struct Log;

impl Log {
    /// Enable or disable all log output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable or disable debug-level output.
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Format a leveled line without printing it.
    pub fn format_line(level: LogLevel, message: &str) -> String {
        format!("{} {}", level, message)
    }

    /// Print a message with its level prefix.
    ///
    /// `LogLevel::Log` lines are dropped unless debug output is enabled.
    pub fn log(level: LogLevel, message: &str) {
        if !Self::is_enabled() {
            return;
        }
        if level == LogLevel::Log && !Self::is_debug() {
            return;
        }
        println!("{}", Self::format_line(level, message));
    }

    // ═══ Convenience Methods for Common Log Levels ═══

    pub fn log_error(message: &str) {
        Self::log(LogLevel::Err, message);
    }

    pub fn log_warning(message: &str) {
        Self::log(LogLevel::Warn, message);
    }

    pub fn log_info(message: &str) {
        Self::log(LogLevel::Info, message);
    }

    /// Log a debug line. No-op unless `--debug` was given.
    pub fn log_debug(message: &str) {
        Self::log(LogLevel::Log, message);
    }

    pub fn log_critical(message: &str) {
        Self::log(LogLevel::Crit, message);
    }

    // ═══ Visual Formatting Functions ═══

    /// Main status line with a branching indicator.
    pub fn log_decorated(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┣ {}", message);
    }

    /// Detail line nested under the previous status line.
    pub fn log_indented(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃   {}", message);
    }

    pub fn log_pipe() {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
    }

    /// Start a new visual block, used for state changes.
    pub fn log_block_start(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
        println!("┣ {}", message);
    }

    pub fn log_version() {
        if !Self::is_enabled() {
            return;
        }
        println!("┏ sunzones v{} ━━╸", env!("CARGO_PKG_VERSION"));
        println!("┃");
    }

    pub fn log_end() {
        if !Self::is_enabled() {
            return;
        }
        println!("╹");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_level_prefixes() {
        assert_eq!(Log::format_line(LogLevel::Warn, "x"), "[WARN] x");
        assert_eq!(Log::format_line(LogLevel::Err, "x"), "[ERR] x");
        assert_eq!(Log::format_line(LogLevel::Crit, "x"), "[CRIT] x");
        assert_eq!(Log::format_line(LogLevel::Info, "x"), "[INFO] x");
        assert_eq!(Log::format_line(LogLevel::Log, "x"), "[LOG] x");
    }

    #[test]
    #[serial]
    fn test_debug_toggle() {
        let original = Log::is_debug();
        Log::set_debug(true);
        assert!(Log::is_debug());
        Log::set_debug(false);
        assert!(!Log::is_debug());
        Log::set_debug(original);
    }
}
