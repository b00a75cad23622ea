use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use karmacat::{cli, config, server};

#[derive(Parser)]
#[command(name = "karmacat", version, about = "Chat-bot command core with a karma ledger and associative memory")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the bot against stdin/stdout (console transport)
    Serve,
    /// Show ledger and store statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config_path = config::default_config_path();
    let config = config::KarmacatConfig::load_from(&config_path)?;

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for the console transport.
    let filter = EnvFilter::try_new(&config.bot.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if !config_path.exists() {
        tracing::info!(path = %config_path.display(), "no config file, using defaults");
    }

    match cli.command {
        Command::Serve => {
            server::serve_console(config).await?;
        }
        Command::Stats => {
            cli::stats(&config)?;
        }
    }

    Ok(())
}
