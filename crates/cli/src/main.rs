//! promptd CLI
//!
//! Main entry point for the promptd command-line tool.
//! Provides management commands for the prompt template collection.

mod commands;

use clap::{Parser, Subcommand};
use commands::{InfoCommand, ListCommand, RenderCommand};
use promptd_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// promptd - serve and inspect prompt templates
#[derive(Parser, Debug)]
#[command(name = "promptd")]
#[command(about = "Prompt template serving and management", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory containing prompt files (repeatable)
    #[arg(short, long = "prompts-dir", global = true)]
    prompts_dir: Vec<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "PROMPTD_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all available prompt names
    List(ListCommand),

    /// Show metadata for one prompt
    Info(InfoCommand),

    /// Render a prompt against supplied arguments
    Render(RenderCommand),
}

fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.prompts_dir,
        cli.config,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init(&config)?;

    tracing::info!("promptd starting");
    tracing::debug!("Prompt directories: {:?}", config.prompts_dirs);

    let command_name = match &cli.command {
        Commands::List(_) => "list",
        Commands::Info(_) => "info",
        Commands::Render(_) => "render",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::List(cmd) => cmd.execute(&config),
        Commands::Info(cmd) => cmd.execute(&config),
        Commands::Render(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
