//! Provider listing command

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color, Table};
use podcast_contrast_agents::ProviderKind;

use super::provider_config;
use crate::cli::GlobalArgs;

/// List supported providers, marking the selected one.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let selected = provider_config(global)?.kind;

    let mut table = Table::new();
    table.set_header(vec!["Provider", "Key Variable", "Key Set", "Default Model"]);

    for kind in ProviderKind::ALL {
        let key_set = std::env::var(kind.api_key_env())
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false);

        let name = if kind == selected {
            format!("{} (selected)", kind)
        } else {
            kind.to_string()
        };

        table.add_row(vec![
            Cell::new(name),
            Cell::new(kind.api_key_env()),
            if key_set {
                Cell::new("yes").fg(Color::Green)
            } else {
                Cell::new("no").fg(Color::Red)
            },
            Cell::new(kind.default_model()),
        ]);
    }

    println!("{}", "Completion Providers".bold().cyan());
    println!("{table}");

    Ok(())
}
