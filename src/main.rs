//! Binary entry point for the tugport CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Keep the renames a module still refers to
//! tugport renames --records build/renames.csv --module src/
//!
//! # Resolve declaring types from another tree
//! tugport renames --records build/renames.csv --module src/ --types vendor/acme/
//!
//! # Show the rule catalog and which rules tugport.toml enables
//! tugport rules
//! ```
//!
//! Responses are JSON on stdout. Logs go to stderr.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use tugport::cli::{load_config, run_renames, run_rules, RenamesArgs};
use tugport_core::error::{OutputErrorCode, TugportError};
use tugport_core::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Rule-driven PHP source migration.
#[derive(Parser, Debug)]
#[command(name = "tugport", version, about = "Rule-driven PHP source migration")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Configuration file (default: tugport.toml in the current directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
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

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter a rename record file down to the entries a module refers to.
    Renames {
        /// Record file of `declaringType,oldMember,newMember` lines.
        #[arg(long)]
        records: Option<PathBuf>,
        /// Module directory whose sources are searched.
        #[arg(long)]
        module: Option<PathBuf>,
        /// Directory scanned for type declarations (default: the module).
        #[arg(long)]
        types: Option<PathBuf>,
    },
    /// List the rule catalog.
    Rules,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_format);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON too
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, format: LogFormat) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), TugportError> {
    let config = load_config(cli.global.config.as_deref(), Path::new("."))?;
    match cli.command {
        Command::Renames {
            records,
            module,
            types,
        } => {
            let args = RenamesArgs {
                records,
                module,
                types,
            };
            let response = run_renames(&config, &args)?;
            emit(&response)
        }
        Command::Rules => {
            let response = run_rules(&config)?;
            emit(&response)
        }
    }
}

fn emit<T: serde::Serialize>(response: &T) -> Result<(), TugportError> {
    emit_response(response, &mut io::stdout()).map_err(|e| TugportError::internal(e.to_string()))?;
    let _ = io::stdout().flush();
    Ok(())
}
