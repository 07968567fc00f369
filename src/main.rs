use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use organize_sources::commands::{classify, run};
use organize_sources::completions::{generate_completions, Shell};
use organize_sources::config::{parse_repository_arg, Config, RepositoryConfig};
use organize_sources::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "organize-sources")]
#[command(about = "Classify JSON source descriptors and consolidate them by category", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./organize-sources.toml, then the user config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output directory (overrides the configuration)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Repository checkout as NAME=PATH; repeatable, replaces configured repositories
    #[arg(short, long = "repo", value_name = "NAME=PATH", value_parser = parse_repository_arg, global = true)]
    repos: Vec<RepositoryConfig>,

    /// Log debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan, classify and write organized sources (default)
    Run,

    /// Show the category a declared type maps to
    Classify {
        /// Declared `type` value, e.g. "Anime Movie"
        type_value: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum, ignore_case = true)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let working_dir =
                std::env::current_dir().context("Failed to determine working directory")?;
            let config = Config::discover(cli.config.as_deref(), &working_dir)?
                .with_overrides(cli.output, cli.repos)?;
            run::execute(&config)
        }
        Commands::Classify { type_value } => classify::execute(&type_value),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate_completions(&mut cmd, shell, &mut std::io::stdout());
            Ok(())
        }
    }
}
