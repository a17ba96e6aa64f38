//! CLI Adapter.

mod list;
mod synth;
mod validate;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::config::ConfigSources;
use crate::domain::AppError;

#[derive(Parser)]
#[command(name = "recipes-infra")]
#[command(version)]
#[command(
    about = "Declare the recipes-rs cloud topology and emit its desired-state manifest",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that evaluates the topology.
#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// TOML file overriding naming and sizing constants
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Container image tag (overrides IMAGE_TAG)
    #[arg(short = 't', long)]
    image_tag: Option<String>,
}

impl From<SourceArgs> for ConfigSources {
    fn from(args: SourceArgs) -> Self {
        ConfigSources { config_path: args.config, image_tag: args.image_tag }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the topology and write its manifest
    #[clap(visible_alias = "s")]
    Synth {
        #[command(flatten)]
        sources: SourceArgs,
        /// Manifest format: json or yaml
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Directory the manifest is written to
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Print the manifest instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Evaluate the topology and report what it declares
    #[clap(visible_alias = "v")]
    Validate {
        #[command(flatten)]
        sources: SourceArgs,
    },
    /// List resources in deployment order
    #[clap(visible_alias = "ls")]
    List {
        #[command(flatten)]
        sources: SourceArgs,
    },
}

/// Entry point for the CLI.
pub fn run() {
    crate::app::logging::init();
    let cli = Cli::parse();

    let result: Result<(), AppError> = match cli.command {
        Commands::Synth { sources, format, output, stdout } => {
            synth::run_synth(sources.into(), &format, output, stdout)
        }
        Commands::Validate { sources } => validate::run_validate(sources.into()),
        Commands::List { sources } => list::run_list(sources.into()),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
