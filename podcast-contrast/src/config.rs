//! Configuration for the Podcast Contrast Service
//!
//! Everything comes from environment variables and is read once at startup.
//!
//! Environment variables:
//! - PODCAST_CONTRAST_PORT: listen port (default 8080)
//! - PLATFORM_ENV: dev | staging | prod
//! - AI_PROVIDER: gemini | openai (default gemini)
//! - GEMINI_API_KEY / OPENAI_API_KEY: credential for the selected provider
//! - AI_BASE_URL, AI_MODEL: optional provider overrides
//!
//! A missing credential aborts startup in staging and prod. In dev the service
//! starts anyway and answers analysis requests with a configuration error.

use anyhow::{anyhow, Result};
use podcast_contrast_agents::{ProviderConfig, ProviderKind};
use std::env;
use tracing::{info, warn};

/// Platform environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformEnv {
    #[default]
    Dev,
    Staging,
    Prod,
}

impl PlatformEnv {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => PlatformEnv::Prod,
            "staging" => PlatformEnv::Staging,
            _ => PlatformEnv::Dev,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformEnv::Dev => "dev",
            PlatformEnv::Staging => "staging",
            PlatformEnv::Prod => "prod",
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub port: u16,

    /// Platform environment
    pub platform_env: PlatformEnv,

    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Upstream provider settings
    pub provider: ProviderConfig,
}

fn default_port() -> u16 {
    8080
}

fn default_service_name() -> String {
    "podcast-contrast".to_string()
}

fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails when the provider settings are invalid, or when no credential is
    /// set outside dev.
    pub fn load() -> Result<Self> {
        let platform_env = PlatformEnv::parse(
            &env::var("PLATFORM_ENV").unwrap_or_else(|_| "dev".to_string()),
        );

        let provider = ProviderConfig::from_env()
            .map_err(|e| anyhow!("Invalid provider configuration: {}. ABORTING STARTUP.", e))?;

        let config = Self {
            port: env::var("PODCAST_CONTRAST_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_port),
            platform_env,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| default_service_name()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| default_service_version()),
            provider,
        };

        config.validate()?;
        config.log_startup();

        Ok(config)
    }

    /// Check the credential requirement for the platform environment.
    pub fn validate(&self) -> Result<()> {
        if self.provider.has_api_key() {
            return Ok(());
        }

        if self.platform_env == PlatformEnv::Dev {
            warn!(
                provider = %self.provider.kind,
                key_env = self.provider.kind.api_key_env(),
                "No provider API key set; analysis requests will fail until one is configured"
            );
            return Ok(());
        }

        Err(anyhow!(
            "{} environment variable is required in {} mode. ABORTING STARTUP.",
            self.provider.kind.api_key_env(),
            self.platform_env.as_str()
        ))
    }

    fn log_startup(&self) {
        info!(
            service_name = %self.service_name,
            service_version = %self.service_version,
            platform_env = self.platform_env.as_str(),
            port = self.port,
            provider = %self.provider.kind,
            model = %self.provider.model,
            api_key_configured = self.provider.has_api_key(),
            "Configuration loaded"
        );
    }
}

impl Default for Config {
    /// Development configuration with no provider credential.
    fn default() -> Self {
        Self {
            port: default_port(),
            platform_env: PlatformEnv::default(),
            service_name: default_service_name(),
            service_version: default_service_version(),
            provider: ProviderConfig::new(ProviderKind::default()),
        }
    }
}
