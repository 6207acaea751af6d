//! Topic Contrast Agent
//!
//! Linear pipeline: validate topic, require a provider, render the prompt,
//! call the provider once, strip code fences, parse JSON. Every failure is
//! terminal for the request and nothing is retried.
//!
//! ## Failure Modes
//! - Missing, non-string or blank topic: `MissingTopic` (400)
//! - Topic over 200 characters: `TopicTooLong` (400)
//! - No provider credential: `Configuration` (500)
//! - Provider returned a non-success status: `Upstream` (502)
//! - Provider reply has no text: `EmptyResponse` (500)
//! - Reply text is not JSON: `Parse` (500)
//! - Anything else (transport, undecodable body): `Internal` (500)

use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::prompt::build_prompt;
use crate::clients::{build_provider, CompletionProvider, ProviderConfig, ProviderError};
use crate::contracts::{AnalysisResult, Conformance, EXPECTED_DIFFERENCES, MAX_TOPIC_CHARS};

/// Agent version (semantic versioning).
pub const CONTRAST_AGENT_VERSION: &str = "1.0.0";

/// Agent identifier.
pub const CONTRAST_AGENT_ID: &str = "topic-contrast-agent";

/// Errors from the contrast pipeline.
///
/// `Display` yields the caller-facing message; diagnostic detail is carried in
/// fields and only logged.
#[derive(Debug, Error)]
pub enum ContrastAgentError {
    #[error("A topic is required.")]
    MissingTopic,

    #[error("Topic is too long.")]
    TopicTooLong { length: usize },

    #[error("API key not configured on server.")]
    Configuration,

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Empty response from AI. Please try again.")]
    EmptyResponse,

    #[error("Could not parse AI response. Please try a different topic.")]
    Parse { raw: String, reason: String },

    #[error("Server error. Please try again.")]
    Internal(String),
}

impl From<ProviderError> for ContrastAgentError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Upstream { status, message } => {
                ContrastAgentError::Upstream { status, message }
            }
            other => ContrastAgentError::Internal(other.to_string()),
        }
    }
}

impl ContrastAgentError {
    /// HTTP status reported to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContrastAgentError::MissingTopic | ContrastAgentError::TopicTooLong { .. } => {
                StatusCode::BAD_REQUEST
            }
            ContrastAgentError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ContrastAgentError::Configuration
            | ContrastAgentError::EmptyResponse
            | ContrastAgentError::Parse { .. }
            | ContrastAgentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Stable error code for logs.
pub fn error_code(error: &ContrastAgentError) -> &'static str {
    match error {
        ContrastAgentError::MissingTopic => "CONTRAST_TOPIC_MISSING",
        ContrastAgentError::TopicTooLong { .. } => "CONTRAST_TOPIC_TOO_LONG",
        ContrastAgentError::Configuration => "CONTRAST_CONFIG",
        ContrastAgentError::Upstream { .. } => "CONTRAST_UPSTREAM",
        ContrastAgentError::EmptyResponse => "CONTRAST_EMPTY_RESPONSE",
        ContrastAgentError::Parse { .. } => "CONTRAST_PARSE",
        ContrastAgentError::Internal(_) => "CONTRAST_INTERNAL",
    }
}

/// Validate a raw topic and return it trimmed.
///
/// Blankness is judged after trimming; length is judged on the raw value,
/// counted in UTF-16 code units. 200 units is accepted.
pub fn validate_topic(topic: Option<&str>) -> Result<&str, ContrastAgentError> {
    let raw = topic.ok_or(ContrastAgentError::MissingTopic)?;
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ContrastAgentError::MissingTopic);
    }

    let length = raw.encode_utf16().count();
    if length > MAX_TOPIC_CHARS {
        return Err(ContrastAgentError::TopicTooLong { length });
    }

    Ok(trimmed)
}

/// Remove every ```` ```json ```` and ```` ``` ```` marker, then trim.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Turn provider reply text into a JSON value.
///
/// The value is passed through as parsed; a reply that does not match
/// [`AnalysisResult`] is logged but not rejected.
pub fn parse_completion(text: &str) -> Result<Value, ContrastAgentError> {
    if text.is_empty() {
        return Err(ContrastAgentError::EmptyResponse);
    }

    let cleaned = strip_code_fences(text);
    let value: Value = serde_json::from_str(&cleaned).map_err(|e| ContrastAgentError::Parse {
        raw: text.to_string(),
        reason: e.to_string(),
    })?;

    match AnalysisResult::conformance(&value) {
        Conformance::Conforming => {}
        Conformance::WrongDifferenceCount(count) => {
            warn!(
                expected = EXPECTED_DIFFERENCES,
                actual = count,
                "Model reply has an unexpected number of key differences"
            );
        }
        Conformance::Malformed => {
            warn!("Model reply does not match the analysis result shape");
        }
    }

    Ok(value)
}

/// Topic contrast agent.
///
/// Holds the provider chosen at construction; `None` means no credential was
/// configured and every valid request fails with `Configuration`.
#[derive(Clone)]
pub struct ContrastAgent {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl std::fmt::Debug for ContrastAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContrastAgent")
            .field("provider", &self.provider.as_ref().map(|p| p.kind()))
            .finish()
    }
}

impl ContrastAgent {
    /// Create an agent around an optional provider.
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self { provider }
    }

    /// Create an agent from provider configuration.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self::new(build_provider(config)?))
    }

    /// Whether a provider is available.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Run the full analysis for a raw topic.
    #[instrument(skip(self, topic), fields(agent_id = CONTRAST_AGENT_ID))]
    pub async fn invoke(&self, topic: Option<&str>) -> Result<Value, ContrastAgentError> {
        let result = self.execute(topic).await;

        if let Err(ref e) = result {
            log_failure(e);
        }

        result
    }

    async fn execute(&self, topic: Option<&str>) -> Result<Value, ContrastAgentError> {
        let topic = validate_topic(topic)?;
        let provider = self
            .provider
            .as_ref()
            .ok_or(ContrastAgentError::Configuration)?;

        info!(
            provider = %provider.kind(),
            topic_chars = topic.chars().count(),
            "Requesting contrast analysis"
        );

        let prompt = build_prompt(topic);
        let text = provider.generate(&prompt).await?;

        let value = parse_completion(&text)?;
        info!("Contrast analysis completed");

        Ok(value)
    }
}

fn log_failure(error: &ContrastAgentError) {
    let code = error_code(error);

    match error {
        ContrastAgentError::MissingTopic | ContrastAgentError::TopicTooLong { .. } => {
            info!(code, error = %error, "Rejected analysis request");
        }
        ContrastAgentError::Configuration => {
            error!(code, "No provider API key configured on server");
        }
        ContrastAgentError::Upstream { status, message } => {
            error!(code, status, message = %message, "Provider call failed");
        }
        ContrastAgentError::EmptyResponse => {
            error!(code, "Provider returned empty text");
        }
        ContrastAgentError::Parse { raw, reason } => {
            error!(code, reason = %reason, raw = %raw, "Could not parse provider reply as JSON");
        }
        ContrastAgentError::Internal(detail) => {
            error!(code, detail = %detail, "Analysis failed");
        }
    }
}
