//! Output rendering

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table};
use podcast_contrast_agents::{AnalysisResult, PodcastStance};
use serde_json::Value;

/// Output format for analysis results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable sections and a differences table
    Table,
    /// Pretty-printed JSON, exactly as returned by the model
    Json,
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}", "=".repeat(title.len().max(20)));
}

/// Print a labelled field.
pub fn print_field(label: &str, value: &str) {
    println!("{:>14}: {}", label.bold(), value);
}

/// Render a parsed analysis. Replies that do not match the expected shape are
/// printed as JSON.
pub fn render_analysis(analysis: &Value, format: OutputFormat) -> Result<()> {
    let typed = match format {
        OutputFormat::Json => None,
        OutputFormat::Table => serde_json::from_value::<AnalysisResult>(analysis.clone()).ok(),
    };

    match typed {
        Some(result) => {
            render_table(&result);
            Ok(())
        }
        None => {
            println!("{}", serde_json::to_string_pretty(analysis)?);
            Ok(())
        }
    }
}

fn render_stance(title: &str, stance: &PodcastStance) {
    print_section(title);
    print_field("Podcast", &stance.name);
    print_field("Hosts", &stance.hosts);
    print_field("Episode", &stance.episode);
    print_field("URL", &stance.url);
    print_field("Stance", &stance.stance_label);
    println!("\n{}\n\n{}", stance.stance_detail, stance.summary.dimmed());
}

fn render_table(result: &AnalysisResult) {
    println!("{} {}", "Topic:".bold(), result.topic);

    render_stance("Left", &result.podcast_left);
    render_stance("Right", &result.podcast_right);

    print_section("Key Differences");
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Dimension"),
            Cell::new(&result.podcast_left.name),
            Cell::new(&result.podcast_right.name),
        ]);

    for difference in &result.key_differences {
        table.add_row(vec![
            Cell::new(&difference.dimension),
            Cell::new(&difference.left_view),
            Cell::new(&difference.right_view),
        ]);
    }

    println!("{table}");
}
