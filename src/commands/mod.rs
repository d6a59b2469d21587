//! One-shot command handlers.
//!
//! `--test` applies a single temperature and gamma pair through the display
//! command. `--status` prints where the sun is and which zone that selects.

pub mod status;
pub mod test;
