//! Binary entry point for the testport CLI.
//!
//! ## Usage
//!
//! ```bash
//! # List the rule table
//! testport rules
//!
//! # Report MSTest constructs in a compiled unit
//! testport analyze unit.json
//!
//! # Preview every fix as a unified diff
//! testport fix unit.json --dry-run
//!
//! # Fix only test-method attributes and save the edited unit
//! testport fix unit.json --rule MSX201 --write fixed.json
//! ```
//!
//! Every command prints one JSON response on stdout. Errors are JSON too, and
//! the exit code comes from `OutputErrorCode`.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use testport::cli::{load_config, run_analyze, run_fix, run_rules, FixRequest};
use testport_core::error::{OutputErrorCode, PortError};
use testport_core::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Migrate MSTest test code to xUnit.
///
/// testport reads a compiled C# unit as JSON, reports MSTest constructs under
/// stable MSX rule ids and rewrites them into xUnit equivalents.
#[derive(Parser, Debug)]
#[command(name = "testport", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

/// Global options shared by every command.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Configuration file (default: ./testport.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for stderr output. `RUST_LOG` takes precedence.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// List every rule with its title, message and whether it has a fix.
    Rules,
    /// Report MSTest constructs in a compiled unit.
    Analyze {
        /// Compiled unit (JSON).
        unit: PathBuf,
    },
    /// Apply every available fix to every document of a compiled unit.
    Fix {
        /// Compiled unit (JSON).
        unit: PathBuf,
        /// Only fix findings of this rule id (repeatable).
        #[arg(long = "rule", value_name = "ID")]
        rules: Vec<String>,
        /// Print a unified diff per document instead of the new text.
        #[arg(long)]
        dry_run: bool,
        /// Write the edited unit to this file.
        #[arg(long, value_name = "OUT", conflicts_with = "dry_run")]
        write: Option<PathBuf>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // errors go to stdout as JSON, like every other response
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), PortError> {
    let config = load_config(cli.global.config.as_deref())?;
    match cli.command {
        Command::Rules => emit(&run_rules(&config)?),
        Command::Analyze { unit } => emit(&run_analyze(&config, &unit)?),
        Command::Fix {
            unit,
            rules,
            dry_run,
            write,
        } => {
            let request = FixRequest {
                unit: &unit,
                rules: &rules,
                dry_run,
                write: write.as_deref(),
            };
            emit(&run_fix(&config, &request)?)
        }
    }
}

fn emit<T: Serialize>(response: &T) -> Result<(), PortError> {
    emit_response(response, &mut io::stdout()).map_err(|e| PortError::internal(e.to_string()))?;
    let _ = io::stdout().flush();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_parsing {
        use super::*;

        #[test]
        fn parse_rules() {
            let cli = Cli::try_parse_from(["testport", "rules"]).unwrap();
            assert!(matches!(cli.command, Command::Rules));
            assert_eq!(cli.global.log_level, LogLevel::Warn);
            assert!(cli.global.config.is_none());
        }

        #[test]
        fn parse_analyze() {
            let cli = Cli::try_parse_from(["testport", "analyze", "unit.json"]).unwrap();
            match cli.command {
                Command::Analyze { unit } => assert_eq!(unit, PathBuf::from("unit.json")),
                _ => panic!("expected Analyze"),
            }
        }

        #[test]
        fn analyze_requires_a_unit() {
            assert!(Cli::try_parse_from(["testport", "analyze"]).is_err());
        }

        #[test]
        fn parse_fix_defaults() {
            let cli = Cli::try_parse_from(["testport", "fix", "unit.json"]).unwrap();
            match cli.command {
                Command::Fix {
                    unit,
                    rules,
                    dry_run,
                    write,
                } => {
                    assert_eq!(unit, PathBuf::from("unit.json"));
                    assert!(rules.is_empty());
                    assert!(!dry_run);
                    assert!(write.is_none());
                }
                _ => panic!("expected Fix"),
            }
        }

        #[test]
        fn parse_fix_with_repeated_rules() {
            let args = [
                "testport", "fix", "unit.json", "--rule", "MSX100", "--rule", "MSX201",
                "--dry-run",
            ];
            let cli = Cli::try_parse_from(args).unwrap();
            match cli.command {
                Command::Fix { rules, dry_run, .. } => {
                    assert_eq!(rules, vec!["MSX100", "MSX201"]);
                    assert!(dry_run);
                }
                _ => panic!("expected Fix"),
            }
        }

        #[test]
        fn write_conflicts_with_dry_run() {
            let args = ["testport", "fix", "unit.json", "--dry-run", "--write", "out.json"];
            assert!(Cli::try_parse_from(args).is_err());
        }

        #[test]
        fn global_flags_after_the_subcommand() {
            let args = [
                "testport", "rules", "--config", "ci.toml", "--log-level", "debug",
            ];
            let cli = Cli::try_parse_from(args).unwrap();
            assert_eq!(cli.global.config, Some(PathBuf::from("ci.toml")));
            assert_eq!(cli.global.log_level, LogLevel::Debug);
        }

        #[test]
        fn log_levels_map_to_tracing() {
            assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
            assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        }
    }
}
