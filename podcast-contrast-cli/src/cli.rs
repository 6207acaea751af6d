//! CLI argument parsing

use clap::{Args, Parser, Subcommand};

use crate::commands::{analyze::AnalyzeArgs, prompt::PromptArgs};

/// Podcast Contrast CLI
///
/// Finds two well-known podcasts with opposed stances on a topic.
#[derive(Parser, Debug)]
#[command(name = "contrast")]
#[command(version)]
#[command(about = "Contrast podcast stances on a topic", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Provider to use (gemini, openai)
    #[arg(long, global = true, env = "AI_PROVIDER")]
    pub provider: Option<String>,

    /// Model override
    #[arg(long, global = true, env = "AI_MODEL")]
    pub model: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a contrast analysis for a topic
    #[command(alias = "run")]
    Analyze(AnalyzeArgs),

    /// Print the prompt that would be sent for a topic
    Prompt(PromptArgs),

    /// List supported providers and whether their key is set
    #[command(alias = "ls")]
    Providers,
}
