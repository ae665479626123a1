use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use diffdeck_core::Project;
use diffdeck_logging::{init_tracing, LogFormat};

mod api;
mod config;
mod staged;

use config::{CliOverrides, FileConfig, Settings};
use staged::StagedOptions;

#[derive(Parser, Debug)]
#[command(
    name = "diffdeck",
    about = "Review, stage and commit git changes from the browser",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormatChoice,

    /// Log level filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show staged and unstaged changes with stage/undo/commit controls
    Staged(StagedArgs),
}

#[derive(Args, Debug)]
struct StagedArgs {
    /// Repository to show (default: current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Named repository as KEY=PATH; repeat for several tabs
    #[arg(long = "project", value_name = "KEY=PATH", value_parser = config::parse_project)]
    projects: Vec<Project>,

    /// Control server port (default: 6060)
    #[arg(long)]
    port: Option<u16>,

    /// Config file (default: ./diffdeck.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not open the browser
    #[arg(long)]
    no_open: bool,

    /// Where to write the HTML page (default: <tmp>/git-changes.html)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format.into());

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;

    match cli.command {
        Commands::Staged(args) => {
            let file = FileConfig::load(args.config.as_deref(), &working_dir)?;
            let settings = Settings::resolve(
                CliOverrides {
                    path: args.path,
                    projects: args.projects,
                    port: args.port,
                },
                file,
                &working_dir,
            )?;

            staged::handle_staged_command(
                settings,
                StagedOptions {
                    open_browser: !args.no_open,
                    output: args.output,
                },
            )
            .await
        }
    }
}
