//! Podcast Contrast CLI
//!
//! Runs the topic contrast analysis from the terminal with the same provider
//! configuration the service uses.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.verbose {
        "podcast_contrast_agents=debug"
    } else {
        "podcast_contrast_agents=warn"
    };

    // Logs go to stderr so stdout stays pipeable JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_directive.parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(&cli.global, args).await,
        Commands::Prompt(args) => commands::prompt::execute(args),
        Commands::Providers => commands::providers::execute(&cli.global),
    }
}
