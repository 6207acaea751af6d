//! Analyze command
//!
//! ```bash
//! contrast analyze --topic "nuclear power"
//! echo "remote work" | contrast analyze --stdin --format json
//! contrast --provider openai analyze -t "rent control" -o result.json
//! ```

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use podcast_contrast_agents::{validate_topic, ContrastAgent, ProviderConfig};
use std::path::PathBuf;

use super::{provider_config, read_topic};
use crate::cli::GlobalArgs;
use crate::output::{render_analysis, OutputFormat};

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Topic to analyze
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Read the topic from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Also write the raw JSON result to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Check the topic, then the credential, and build the agent.
fn prepare_agent(topic: &str, config: &ProviderConfig) -> Result<ContrastAgent> {
    validate_topic(Some(topic))?;

    let agent =
        ContrastAgent::from_config(config).context("Failed to create completion provider")?;

    if !agent.is_configured() {
        anyhow::bail!(
            "API key not configured. Set {} to use the {} provider.",
            config.kind.api_key_env(),
            config.kind
        );
    }

    Ok(agent)
}

/// Run one analysis and print the result.
pub async fn execute(global: &GlobalArgs, args: AnalyzeArgs) -> Result<()> {
    let topic = read_topic(args.topic, args.stdin)?;
    let config = provider_config(global)?;
    let agent = prepare_agent(&topic, &config)?;

    eprintln!(
        "{} {} ({})",
        "Analyzing".dimmed(),
        topic.trim().bold(),
        config.kind.to_string().dimmed()
    );

    let analysis = agent
        .invoke(Some(&topic))
        .await
        .context("Analysis failed")?;

    if let Some(path) = args.output {
        let json = serde_json::to_string_pretty(&analysis).context("Failed to serialize result")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write output to {}", path.display()))?;
        eprintln!("{} {}", "Result written to".green(), path.display());
    }

    render_analysis(&analysis, args.format)
}
