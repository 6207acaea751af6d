//! Provider Abstraction
//!
//! Configuration, errors and the [`CompletionProvider`] trait shared by all
//! upstream variants.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

use super::{GeminiProvider, OpenAiProvider};

/// Output token budget sent with every completion request.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1500;

/// Sampling temperature sent with every completion request.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Environment variable selecting the provider variant.
pub const PROVIDER_ENV: &str = "AI_PROVIDER";

/// Environment variable overriding the provider endpoint base.
pub const BASE_URL_ENV: &str = "AI_BASE_URL";

/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "AI_MODEL";

/// Supported upstream AI services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Google Gemini `generateContent`
    #[default]
    Gemini,
    /// OpenAI chat completions
    OpenAi,
}

impl ProviderKind {
    /// All supported variants.
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Gemini, ProviderKind::OpenAi];

    /// Identifier used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Default endpoint base.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/",
            ProviderKind::OpenAi => "https://api.openai.com/",
        }
    }

    /// Default model.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.0-flash",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            other => Err(ProviderError::Configuration(format!(
                "unknown provider '{}' (expected one of: gemini, openai)",
                other
            ))),
        }
    }
}

/// Errors from completion provider calls.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream error: status={status}, message={message}")]
    Upstream { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

/// Provider configuration.
///
/// The API key is optional here; a provider is only built when one is set.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Selected variant
    pub kind: ProviderKind,

    /// Provider credential
    pub api_key: Option<String>,

    /// Endpoint base URL override; `None` uses the variant's public endpoint
    pub base_url: Option<Url>,

    /// Model name
    pub model: String,

    /// Output token budget
    pub max_output_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("model", &self.model)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl ProviderConfig {
    /// Default configuration for a variant, without a credential.
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            api_key: None,
            base_url: None,
            model: kind.default_model().to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set the credential.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the endpoint base.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Load configuration from process environment.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through a variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match non_blank(lookup(PROVIDER_ENV)) {
            Some(value) => value.parse()?,
            None => ProviderKind::default(),
        };

        let mut config = Self::new(kind);
        config.api_key = non_blank(lookup(kind.api_key_env()));

        if let Some(base_url) = non_blank(lookup(BASE_URL_ENV)) {
            config.base_url = Some(Url::parse(&base_url).map_err(|e| {
                ProviderError::Configuration(format!("{}: {}", BASE_URL_ENV, e))
            })?);
        }

        if let Some(model) = non_blank(lookup(MODEL_ENV)) {
            config.model = model;
        }

        Ok(config)
    }

    /// Whether a credential is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Resolve `path` against the base URL, treating the base as a directory.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        let mut base = match &self.base_url {
            Some(url) => url.clone(),
            None => Url::parse(self.kind.default_base_url())
                .map_err(|e| ProviderError::Configuration(e.to_string()))?,
        };
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }

        base.join(path)
            .map_err(|e| ProviderError::Configuration(e.to_string()))
    }

    pub(crate) fn require_api_key(&self) -> Result<String, ProviderError> {
        self.api_key.clone().ok_or_else(|| {
            ProviderError::Configuration(format!("{} is not set", self.kind.api_key_env()))
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A text completion backend.
///
/// `generate` returns whatever text the model produced, which may be empty.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Variant implemented by this provider.
    fn kind(&self) -> ProviderKind;

    /// Send one prompt and wait for the full reply text.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Build the configured provider, or `None` when no credential is set.
pub fn build_provider(
    config: &ProviderConfig,
) -> Result<Option<Arc<dyn CompletionProvider>>, ProviderError> {
    if !config.has_api_key() {
        return Ok(None);
    }

    let provider: Arc<dyn CompletionProvider> = match config.kind {
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(config.clone())?),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(config.clone())?),
    };

    info!(provider = %config.kind, model = %config.model, "Completion provider configured");

    Ok(Some(provider))
}

/// Build the shared HTTP client. No timeout override: calls run until the
/// upstream answers or the host tears the request down.
pub(crate) fn http_client() -> Result<Client, ProviderError> {
    Client::builder()
        .build()
        .map_err(|e| ProviderError::Configuration(e.to_string()))
}

/// Send a request and decode a success body.
///
/// Non-success statuses with a JSON body become [`ProviderError::Upstream`]
/// carrying the provider's own error message when it has one. A non-JSON error
/// body is logged and reported as [`ProviderError::Decode`] so it never
/// reaches the caller.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        error!(status = status.as_u16(), body = %body, "Upstream provider returned an error");

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            ProviderError::Decode(format!(
                "upstream status {} with a non-JSON body: {}",
                status.as_u16(),
                e
            ))
        })?;

        return Err(ProviderError::Upstream {
            status: status.as_u16(),
            message: upstream_error_message(&value),
        });
    }

    debug!(bytes = body.len(), "Upstream response received");

    serde_json::from_str(&body).map_err(|e| {
        error!(error = %e, body = %body, "Upstream success body is not valid JSON");
        ProviderError::Decode(e.to_string())
    })
}

/// Extract a human-readable message from a JSON upstream error body.
///
/// Prefers a non-empty string at `error.message`, else the re-serialized body.
pub fn upstream_error_message(body: &Value) -> String {
    body.pointer("/error/message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_defaults_to_gemini() {
        let config = ProviderConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.kind, ProviderKind::Gemini);
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_output_tokens, 1500);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_config_reads_key_for_selected_provider() {
        let config = ProviderConfig::from_lookup(lookup(&[
            ("AI_PROVIDER", "OpenAI"),
            ("GEMINI_API_KEY", "gemini-key"),
            ("OPENAI_API_KEY", "openai-key"),
        ]))
        .unwrap();

        assert_eq!(config.kind, ProviderKind::OpenAi);
        assert_eq!(config.api_key.as_deref(), Some("openai-key"));
        assert!(config.base_url.is_none());
        let url = config.endpoint("v1/chat/completions").unwrap();
        assert_eq!(url.as_str(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_config_blank_key_is_absent() {
        let config = ProviderConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "   ")])).unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_config_rejects_unknown_provider() {
        let err = ProviderConfig::from_lookup(lookup(&[("AI_PROVIDER", "llama")])).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[test]
    fn test_config_overrides() {
        let config = ProviderConfig::from_lookup(lookup(&[
            ("AI_BASE_URL", "http://127.0.0.1:9000/proxy"),
            ("AI_MODEL", "gemini-1.5-pro"),
        ]))
        .unwrap();

        assert_eq!(config.model, "gemini-1.5-pro");
        let url = config.endpoint("v1beta/models/x:generateContent").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/proxy/v1beta/models/x:generateContent");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ProviderConfig::new(ProviderKind::Gemini).with_api_key("secret-value");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-value"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_build_provider_without_key() {
        let config = ProviderConfig::new(ProviderKind::OpenAi);
        assert!(build_provider(&config).unwrap().is_none());
    }

    #[test]
    fn test_build_provider_selects_variant() {
        let config = ProviderConfig::new(ProviderKind::OpenAi).with_api_key("k");
        let provider = build_provider(&config).unwrap().unwrap();
        assert_eq!(provider.kind(), ProviderKind::OpenAi);
    }

    #[test]
    fn test_upstream_error_message() {
        assert_eq!(
            upstream_error_message(&json!({"error": {"message": "rate limited"}})),
            "rate limited"
        );
        assert_eq!(
            upstream_error_message(&json!({"error": {"code": 429}})),
            r#"{"error":{"code":429}}"#
        );
        assert_eq!(
            upstream_error_message(&json!({"error": {"message": ""}})),
            r#"{"error":{"message":""}}"#
        );
    }
}
