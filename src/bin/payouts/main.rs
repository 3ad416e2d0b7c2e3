//! Contest Payouts CLI
//!
//! Command-line interface for computing audit contest payouts.

mod commands;
mod style;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use style::*;

const BANNER: &str = r#"
  ██████╗  █████╗ ██╗   ██╗ ██████╗ ██╗   ██╗████████╗███████╗
  ██╔══██╗██╔══██╗╚██╗ ██╔╝██╔═══██╗██║   ██║╚══██╔══╝██╔════╝
  ██████╔╝███████║ ╚████╔╝ ██║   ██║██║   ██║   ██║   ███████╗
  ██╔═══╝ ██╔══██║  ╚██╔╝  ██║   ██║██║   ██║   ██║   ╚════██║
  ██║     ██║  ██║   ██║   ╚██████╔╝╚██████╔╝   ██║   ███████║
  ╚═╝     ╚═╝  ╚═╝   ╚═╝    ╚═════╝  ╚═════╝    ╚═╝   ╚══════╝
"#;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "payouts")]
#[command(version)]
#[command(about = "Compute prize pool payouts for audit contest findings", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch findings and print the payout report (default)
    #[command(visible_alias = "r")]
    Report {
        /// Contest repository id (overrides config)
        #[arg(short, long, env = "CANTINA_REPOSITORY")]
        repository: Option<String>,

        /// Prize pool in dollars (overrides config)
        #[arg(short, long)]
        pool: Option<f64>,

        /// Maximum findings to fetch (overrides config)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Validate configuration and probe the findings provider
    Check,

    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    // Default to a full report if no command specified
    let command = cli.command.unwrap_or(Commands::Report {
        repository: None,
        pool: None,
        limit: None,
    });

    let result = match command {
        Commands::Report {
            repository,
            pool,
            limit,
        } => {
            print_banner();
            commands::report::run(&cli.config, repository, pool, limit).await
        }
        Commands::Check => commands::check::run(&cli.config).await,
        Commands::Config => commands::config::run(&cli.config),
    };

    if let Err(e) = result {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

pub fn print_banner() {
    println!("{}", style_cyan(BANNER));
    println!(
        "  {} {}",
        style_dim("Contest Payouts"),
        style_dim(&format!("v{}", VERSION))
    );
    println!();
}
