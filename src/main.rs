//! gear-mesh: evaluate a helical or spur gear pair design
//!
//! Reads a JSON gear pair design, runs the mesh report pipeline and prints the
//! report as JSON on stdout. Logs and advisories go to stderr.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info, Level};
use tracing_subscriber::EnvFilter;

use helical_gears::config;
use helical_gears::error::ConfigError;
use helical_gears::gears::AngleUnit;
use helical_gears::report;

/// Evaluate a helical or spur gear pair design.
///
/// Prints center distances, backlash, contact ratios, undercut checks and
/// sliding kinematics of the pair as JSON.
#[derive(Parser, Debug)]
#[command(name = "gear-mesh")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the gear pair design file
    #[arg(value_name = "DESIGN_FILE")]
    design: PathBuf,

    /// Path to configuration file
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Unit for report angles (rad, deg); overrides the configuration
    #[arg(short, long, value_parser = parse_angle_unit)]
    angle_unit: Option<AngleUnit>,

    /// Pretty-print the JSON report
    #[arg(short, long)]
    pretty: bool,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

fn parse_angle_unit(s: &str) -> Result<AngleUnit, String> {
    AngleUnit::from_str_loose(s).ok_or_else(|| format!("unknown angle unit '{s}' (use rad or deg)"))
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Formats an error with its source chain on one line.
fn error_chain(e: &dyn Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Follow-up hint for a configuration error; only a missing file gets one.
fn config_hint(e: &ConfigError) -> Option<&'static str> {
    match e {
        ConfigError::NotFound { .. } => Some("Create one based on config/example-config.json"),
        _ => None,
    }
}

/// Entry point for the gear-mesh tool.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let cfg = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", error_chain(&e));
            if let Some(hint) = config_hint(&e) {
                eprintln!("{hint}");
            }
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        design = %args.design.display(),
        "Starting gear-mesh"
    );

    let tool = match cfg.tool.to_profile() {
        Ok(tool) => tool,
        Err(e) => {
            error!(error = %e, "Invalid tool profile in configuration");
            return ExitCode::FAILURE;
        }
    };
    let unit = args.angle_unit.unwrap_or(cfg.output.angle_unit);
    debug!(angle_unit = %unit, "Report angle unit");

    let result = report::load_design(&args.design)
        .and_then(|design| report::evaluate(&design, &tool, unit));
    let mesh_report = match result {
        Ok(mesh_report) => mesh_report,
        Err(e) => {
            eprintln!("Design error: {}", error_chain(&e));
            return ExitCode::FAILURE;
        }
    };

    let json = if args.pretty || cfg.output.pretty {
        serde_json::to_string_pretty(&mesh_report)
    } else {
        serde_json::to_string(&mesh_report)
    };

    match json {
        Ok(json) => {
            println!("{json}");
            info!(advisories = mesh_report.advisories.len(), "Report written");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Failed to serialise report");
            ExitCode::FAILURE
        }
    }
}
