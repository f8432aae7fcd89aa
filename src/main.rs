//! kbpack - knowledge base package builder.
//!
//! Stages a content package (objects, taxonomy, origin, shared rules
//! filters) and hands it to the external packager.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use kbpack::commands;
use kbpack::config::Config;

#[derive(Parser)]
#[command(name = "kbpack")]
#[command(about = "Knowledge base package builder")]
#[command(
    after_help = "QUICK START:\n  kbpack preflight                 Check packager and directories\n  kbpack build packages/<name>     Build <name>.kb\n  kbpack clean                     Remove leftover staging trees"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage a package and build its archive
    Build {
        /// Package directory (e.g. packages/esc)
        package: PathBuf,

        /// Archive to write (default: <package name>.kb in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Package ObjectId (default: read from the package's metainfo.yaml)
        #[arg(long)]
        object_id: Option<String>,
    },

    /// Run preflight checks (packager, taxonomy, staging directory)
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },

    /// Remove staging trees left behind by earlier builds
    Clean,
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
    /// List staging trees left on disk
    Staging,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let base_dir = std::env::current_dir().context("Failed to determine current directory")?;
    let config = Config::load(&base_dir)?;

    match cli.command {
        Commands::Build {
            package,
            output,
            object_id,
        } => {
            commands::cmd_build(&base_dir, package, output, object_id, &config)?;
        }

        Commands::Preflight { strict } => {
            commands::cmd_preflight(&config, strict)?;
        }

        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Staging => commands::show::ShowTarget::Staging,
            };
            commands::cmd_show(show_target, &config)?;
        }

        Commands::Clean => {
            commands::cmd_clean(&config)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "command failed");
            eprintln!("[ERROR] {:#}", e);
            ExitCode::FAILURE
        }
    }
}
