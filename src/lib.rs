//! # Sunzones
//!
//! Drives the display's color temperature and gamma from the sun's elevation.
//!
//! Every tick the current solar elevation is mapped through a table of
//! elevation zones to a target, and the display state takes one fixed-size
//! step towards it. Updates are pushed to `hyprsunset`. While a transition is
//! in progress the loop ticks quickly; once settled it only polls.
//!
//! ## Architecture
//!
//! - **args**: Command-line parsing
//! - **backend**: The display sink trait and the `hyprsunset` command sink
//! - **commands**: One-shot `--test` and `--status` handlers
//! - **config**: Configuration loading, validation, and default generation
//! - **constants**: Application-wide constants and defaults
//! - **geo**: Location, solar elevation, and daily solar events
//! - **lock**: Single-instance lock file
//! - **logger**: Structured logging with visual formatting
//! - **scheduler**: The main loop and its injectable clock
//! - **signals**: Shutdown signal handling
//! - **transition**: Fixed-step display state controller
//! - **utils**: Version parsing and formatting helpers
//! - **zones**: Elevation zone table and target resolution

pub mod args;
pub mod backend;
pub mod commands;
pub mod config;
pub mod constants;
pub mod geo;
pub mod lock;
pub mod logger;
pub mod scheduler;
pub mod signals;
pub mod transition;
pub mod utils;
pub mod zones;

// Re-export important types for easier access
pub use backend::{ApplyOutcome, DisplaySink};
pub use config::Config;
pub use geo::{ElevationProvider, Location, SolarElevation};
pub use logger::{Log, LogLevel};
pub use scheduler::{Clock, Daemon, Schedule, SystemClock, TickMode};
pub use transition::{DisplayState, StepOutcome, StepSizes, TransitionController};
pub use zones::{Target, Zone, ZoneTable};
