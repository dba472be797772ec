//! # bazalt CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::io;
use std::process::ExitCode;

use clap::Parser;

/// bazalt: declarative record schemas.
///
/// Validates records against serialized schemas, canonicalizes shorthand
/// definitions, and resolves field defaults.
#[derive(Parser, Debug)]
#[command(name = "bazalt", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate records against a schema.
    Check(bazalt_cli::check::CheckArgs),
    /// Expand a shorthand definition map into a serialized schema.
    Normalize(bazalt_cli::normalize::NormalizeArgs),
    /// Print the default value of a field.
    Default(bazalt_cli::default::DefaultArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Check(args) => {
            if !bazalt_cli::check::run(&args, &mut out)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Normalize(args) => bazalt_cli::normalize::run(&args, &mut out)?,
        Commands::Default(args) => bazalt_cli::default::run(&args, &mut out)?,
    }

    Ok(ExitCode::SUCCESS)
}
