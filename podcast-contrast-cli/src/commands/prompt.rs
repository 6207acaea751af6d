//! Prompt preview command

use anyhow::Result;
use clap::Args;
use podcast_contrast_agents::{build_prompt, validate_topic};

use super::read_topic;

/// Arguments for the prompt command
#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Topic to render the prompt for
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Read the topic from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Print the rendered prompt without calling a provider.
pub fn execute(args: PromptArgs) -> Result<()> {
    let raw = read_topic(args.topic, args.stdin)?;
    let topic = validate_topic(Some(&raw))?;

    println!("{}", build_prompt(topic));
    Ok(())
}
