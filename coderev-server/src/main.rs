//! Coderev - review a coding solution against a model-generated reference
//!
//! Serves a small web form, or runs a single review from the terminal.

mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coderev_core::{CliOverrides, Config};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{ReviewArgs, ServeArgs};

/// Coderev: compare your solution with an optimized reference
#[derive(Parser, Debug)]
#[command(name = "coderev")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model to use (overrides config and env)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Maximum workflow steps per review
    #[arg(long, global = true)]
    step_limit: Option<u32>,

    /// Treat the user as satisfied after this many detailed explanations
    #[arg(long, global = true)]
    explanation_rounds: Option<u32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web front end (default)
    #[command(visible_alias = "s")]
    Serve(ServeArgs),

    /// Review one solution and print the result
    #[command(visible_alias = "r")]
    Review(ReviewArgs),

    /// Show current configuration
    Config,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    let command = cli.command.unwrap_or(Commands::Serve(ServeArgs::default()));

    let (bind, port) = match command {
        Commands::Serve(ref args) => (args.bind.clone(), args.port),
        _ => (None, None),
    };

    let config = Config::load_with_overrides(
        cli.config.as_deref(),
        CliOverrides {
            model: cli.model,
            step_limit: cli.step_limit,
            explanation_rounds: cli.explanation_rounds,
            bind,
            port,
        },
    )?;

    if cli.verbose {
        tracing::info!(
            model = %config.provider.model,
            step_limit = config.workflow.step_limit,
            "Configuration loaded"
        );
    }

    match command {
        Commands::Serve(args) => {
            args.execute(&config).await?;
        }
        Commands::Review(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            print_config(&config);
        }
        Commands::Version => {
            println!("coderev {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn print_config(config: &Config) {
    println!("Coderev Configuration");
    println!("=====================");
    println!();
    println!("Provider:");
    println!("  model: {}", config.provider.model);
    println!("  endpoint: {}", config.provider.endpoint);
    match config.provider.timeout {
        Some(timeout) => println!("  timeout: {:?}", timeout),
        None => println!("  timeout: (none)"),
    }
    println!();
    println!("Workflow:");
    println!("  step_limit: {}", config.workflow.step_limit);
    match config.workflow.explanation_rounds {
        Some(rounds) => println!("  explanation_rounds: {}", rounds),
        None => println!("  explanation_rounds: (never satisfied)"),
    }
    println!();
    println!("Server:");
    println!("  listen: {}:{}", config.server.bind, config.server.port);
    println!();

    let key_set = coderev_core::Secrets::load()
        .map(|s| s.api_key().is_some())
        .unwrap_or(false);
    println!(
        "API key: {}",
        if key_set { "(set)" } else { "(not found)" }
    );

    if let Some(path) = Config::default_config_path() {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }
}
