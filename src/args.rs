//! Command-line argument parsing and processing.
//!
//! Parsing is done by clap; the result is folded into a [`CliAction`] so
//! `main` only has to match on what to do. Help and version output use the
//! logger's box-drawing style instead of clap's default rendering.

use clap::{Parser, error::ErrorKind};
use std::path::PathBuf;

use crate::logger::Log;

/// What the binary should do after parsing arguments.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the daemon loop
    Run {
        debug_enabled: bool,
        config_path: Option<PathBuf>,
    },
    /// Apply a single temperature/gamma pair and exit
    Test {
        debug_enabled: bool,
        config_path: Option<PathBuf>,
        temperature: u32,
        gamma: f64,
    },
    /// Print the sun's position and the matching zone, then exit
    Status {
        debug_enabled: bool,
        config_path: Option<PathBuf>,
    },
    ShowHelp,
    ShowVersion,
    /// Show help because the arguments could not be parsed
    ShowHelpDueToError,
}

#[derive(Parser, Debug)]
#[command(name = "sunzones", disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    #[arg(short, long)]
    debug: bool,

    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(short, long, num_args = 2, value_names = ["TEMP", "GAMMA"], allow_negative_numbers = true)]
    test: Option<Vec<String>>,

    #[arg(short, long)]
    status: bool,

    #[arg(short, long)]
    help: bool,

    #[arg(short = 'V', long)]
    version: bool,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse an argument list, including the program name, into an action.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        let cli = match Cli::try_parse_from(&args) {
            Ok(cli) => cli,
            Err(e) => {
                match e.kind() {
                    ErrorKind::UnknownArgument => {
                        Log::log_warning("Unknown option. See --help for usage");
                    }
                    ErrorKind::WrongNumberOfValues | ErrorKind::InvalidValue => {
                        Log::log_warning(
                            "Missing arguments for --test. Usage: --test <temperature> <gamma>",
                        );
                    }
                    _ => Log::log_warning("Could not parse command-line arguments"),
                }
                return ParsedArgs {
                    action: CliAction::ShowHelpDueToError,
                };
            }
        };

        ParsedArgs {
            action: Self::action_for(cli),
        }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }

    fn action_for(cli: Cli) -> CliAction {
        let debug_enabled = cli.debug;
        let config_path = cli.config;

        if cli.version {
            return CliAction::ShowVersion;
        }
        if cli.help {
            return CliAction::ShowHelp;
        }

        if let Some(values) = cli.test {
            return match parse_test_values(&values) {
                Some((temperature, gamma)) => CliAction::Test {
                    debug_enabled,
                    config_path,
                    temperature,
                    gamma,
                },
                None => CliAction::ShowHelpDueToError,
            };
        }

        if cli.status {
            return CliAction::Status {
                debug_enabled,
                config_path,
            };
        }

        CliAction::Run {
            debug_enabled,
            config_path,
        }
    }
}

fn parse_test_values(values: &[String]) -> Option<(u32, f64)> {
    let [temperature, gamma] = values else {
        Log::log_warning("Missing arguments for --test. Usage: --test <temperature> <gamma>");
        return None;
    };

    let temperature = match temperature.parse::<u32>() {
        Ok(temp) => Some(temp),
        Err(_) => {
            Log::log_warning(&format!("Invalid temperature value: {}", temperature));
            None
        }
    };
    let gamma = match gamma.parse::<f64>() {
        Ok(gamma) if gamma.is_finite() => Some(gamma),
        _ => {
            Log::log_warning(&format!("Invalid gamma value: {}", gamma));
            None
        }
    };

    Some((temperature?, gamma?))
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    Log::log_version();
    Log::log_pipe();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    Log::log_version();
    Log::log_block_start(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_block_start("Usage: sunzones [OPTIONS]");
    Log::log_block_start("Options:");
    Log::log_indented("-c, --config <path>       Use this config file instead of the default");
    Log::log_indented("-d, --debug               Enable detailed debug output");
    Log::log_indented("-h, --help                Print help information");
    Log::log_indented("-s, --status              Show the sun's position and active zone");
    Log::log_indented("-t, --test <temp> <gamma> Apply a temperature and gamma once");
    Log::log_indented("-V, --version             Print version information");
    Log::log_end();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(debug_enabled: bool) -> CliAction {
        CliAction::Run {
            debug_enabled,
            config_path: None,
        }
    }

    #[test]
    fn test_parse_no_args() {
        let parsed = ParsedArgs::parse(vec!["sunzones"]);
        assert_eq!(parsed.action, run(false));
    }

    #[test]
    fn test_parse_debug_flag() {
        assert_eq!(ParsedArgs::parse(vec!["sunzones", "--debug"]).action, run(true));
        assert_eq!(ParsedArgs::parse(vec!["sunzones", "-d"]).action, run(true));
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(ParsedArgs::parse(vec!["sunzones", "--help"]).action, CliAction::ShowHelp);
        assert_eq!(ParsedArgs::parse(vec!["sunzones", "-h"]).action, CliAction::ShowHelp);
        assert_eq!(
            ParsedArgs::parse(vec!["sunzones", "--version"]).action,
            CliAction::ShowVersion
        );
        assert_eq!(ParsedArgs::parse(vec!["sunzones", "-V"]).action, CliAction::ShowVersion);
    }

    #[test]
    fn test_version_takes_precedence() {
        let parsed = ParsedArgs::parse(vec!["sunzones", "--version", "--help", "--debug"]);
        assert_eq!(parsed.action, CliAction::ShowVersion);
    }

    #[test]
    fn test_help_takes_precedence_over_run() {
        let parsed = ParsedArgs::parse(vec!["sunzones", "--debug", "--help"]);
        assert_eq!(parsed.action, CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_unknown_flag() {
        let parsed = ParsedArgs::parse(vec!["sunzones", "--unknown"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);

        let parsed = ParsedArgs::parse(vec!["sunzones", "--debug", "--invalid"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_config_path() {
        let parsed = ParsedArgs::parse(vec!["sunzones", "-c", "/tmp/custom.toml", "-d"]);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: true,
                config_path: Some(PathBuf::from("/tmp/custom.toml")),
            }
        );
    }

    #[test]
    fn test_parse_test_mode() {
        let parsed = ParsedArgs::parse(vec!["sunzones", "--test", "3300", "90.5"]);
        assert_eq!(
            parsed.action,
            CliAction::Test {
                debug_enabled: false,
                config_path: None,
                temperature: 3300,
                gamma: 90.5,
            }
        );
    }

    #[test]
    fn test_parse_test_mode_invalid_values() {
        let parsed = ParsedArgs::parse(vec!["sunzones", "-t", "warm", "90"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);

        let parsed = ParsedArgs::parse(vec!["sunzones", "-t", "3300", "bright"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_test_mode_missing_values() {
        let parsed = ParsedArgs::parse(vec!["sunzones", "--test", "3300"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_status() {
        let parsed = ParsedArgs::parse(vec!["sunzones", "--status", "--debug"]);
        assert_eq!(
            parsed.action,
            CliAction::Status {
                debug_enabled: true,
                config_path: None,
            }
        );
    }
}
