mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};
use trellis_core::kernel::constants;
use trellis_core::{Runtime, RuntimeConfig};
use trellis_logging::{LogFormat, LoggingConfig};

/// Trellis: component instantiation runtime
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Disable usage diagnostics, as in an optimized build
    #[arg(long, global = true)]
    production: bool,

    /// Log how long each instance took to initialize
    #[arg(long, global = true)]
    perf: bool,

    /// Log filter, e.g. `info` or `trellis_core=debug`
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format: plain or json
    #[arg(long, global = true, default_value = "plain")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an instance from a component definition file
    Init {
        /// Definition file (.json, .yaml, .yml or .toml)
        file: PathBuf,
        /// Also create a child instance for each registered component
        #[arg(long)]
        children: bool,
    },
    /// Print the resolved options of a component definition file
    Resolve {
        /// Definition file (.json, .yaml, .yml or .toml)
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let logging = LoggingConfig::default()
        .with_level(args.log_level.clone())
        .with_format(args.log_format);
    if let Err(e) = trellis_logging::init(&logging) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }
    info!("{} v{}", constants::APP_NAME, constants::APP_VERSION);

    let config = RuntimeConfig {
        diagnostics: !args.production,
        performance: args.perf,
        ..RuntimeConfig::default()
    }
    .with_warn_handler(|message| eprintln!("[trellis warn]: {}", message));
    let runtime = Runtime::with_subsystems(config, Box::new(cli::TracingSubsystems));

    let result = match &args.command {
        Commands::Init { file, children } => cli::run_init(&runtime, file, *children),
        Commands::Resolve { file } => cli::run_resolve(&runtime, file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
