//! CLI command implementations

pub mod analyze;
pub mod prompt;
pub mod providers;

use anyhow::{Context as _, Result};
use podcast_contrast_agents::ProviderConfig;
use std::io::{self, Read};

use crate::cli::GlobalArgs;

/// Provider configuration from the environment, with command-line overrides.
pub fn provider_config(global: &GlobalArgs) -> Result<ProviderConfig> {
    ProviderConfig::from_lookup(|name| match name {
        "AI_PROVIDER" if global.provider.is_some() => global.provider.clone(),
        "AI_MODEL" if global.model.is_some() => global.model.clone(),
        _ => std::env::var(name).ok(),
    })
    .context("Invalid provider configuration")
}

/// Read the topic from the flag or stdin. A trailing line break from stdin is
/// dropped; everything else is kept so length checks see the raw value.
pub fn read_topic(topic: Option<String>, use_stdin: bool) -> Result<String> {
    if use_stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
    } else if let Some(topic) = topic {
        Ok(topic)
    } else {
        anyhow::bail!("Either --topic or --stdin must be provided")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podcast_contrast_agents::ProviderKind;

    #[test]
    fn test_flags_override_environment() {
        let global = GlobalArgs {
            provider: Some("openai".to_string()),
            model: Some("gpt-4.1".to_string()),
        };

        let config = provider_config(&global).unwrap();
        assert_eq!(config.kind, ProviderKind::OpenAi);
        assert_eq!(config.model, "gpt-4.1");
    }

    #[test]
    fn test_unknown_provider_flag_is_rejected() {
        let global = GlobalArgs {
            provider: Some("mystery".to_string()),
            model: None,
        };

        assert!(provider_config(&global).is_err());
    }

    #[test]
    fn test_read_topic_requires_a_source() {
        assert_eq!(read_topic(Some("tariffs".into()), false).unwrap(), "tariffs");
        assert!(read_topic(None, false).is_err());
    }
}
