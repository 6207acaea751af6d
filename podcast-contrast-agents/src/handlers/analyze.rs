//! Analyze Handler
//!
//! Entry point for topic contrast requests:
//!
//! 1. Reject any method other than POST (405)
//! 2. Read `topic` from the JSON body
//! 3. Run the contrast agent
//! 4. Map the outcome to a status and a JSON body
//!
//! The handler holds no per-request state and is shared across concurrent
//! requests.

use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::agents::ContrastAgent;
use crate::clients::{CompletionProvider, ProviderConfig, ProviderError};
use crate::contracts::{AnalysisRequest, ErrorBody};

/// Message returned for non-POST requests.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

/// Outcome of one analyze request.
#[derive(Debug, Clone)]
pub struct AnalyzeResponse {
    /// Request ID for correlation
    pub request_id: Uuid,

    /// HTTP status
    pub status: StatusCode,

    /// JSON body: the model's analysis, or an [`ErrorBody`]
    pub body: Value,
}

impl AnalyzeResponse {
    fn success(request_id: Uuid, body: Value) -> Self {
        Self {
            request_id,
            status: StatusCode::OK,
            body,
        }
    }

    fn failure(request_id: Uuid, status: StatusCode, message: impl Into<String>) -> Self {
        let body = serde_json::to_value(ErrorBody::new(message))
            .unwrap_or_else(|_| Value::Object(Default::default()));

        Self {
            request_id,
            status,
            body,
        }
    }

    /// Error message, when this is an error response.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

/// Topic contrast handler.
#[derive(Clone)]
pub struct AnalyzeHandler {
    agent: ContrastAgent,
}

impl AnalyzeHandler {
    /// Create a handler from provider configuration.
    ///
    /// The provider is built once here; a missing credential leaves the
    /// handler unconfigured rather than failing.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            agent: ContrastAgent::from_config(config)?,
        })
    }

    /// Create a handler around an explicit provider (for testing and
    /// alternate backends).
    pub fn with_provider(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self {
            agent: ContrastAgent::new(provider),
        }
    }

    /// Underlying agent.
    pub fn agent(&self) -> &ContrastAgent {
        &self.agent
    }

    /// Handle one request.
    pub async fn handle(&self, method: &Method, body: &[u8]) -> AnalyzeResponse {
        let request_id = Uuid::new_v4();
        let span = info_span!("analyze", request_id = %request_id, method = %method);

        self.handle_inner(request_id, method, body)
            .instrument(span)
            .await
    }

    async fn handle_inner(&self, request_id: Uuid, method: &Method, body: &[u8]) -> AnalyzeResponse {
        if *method != Method::POST {
            info!("Rejected non-POST request");
            return AnalyzeResponse::failure(
                request_id,
                StatusCode::METHOD_NOT_ALLOWED,
                METHOD_NOT_ALLOWED_MESSAGE,
            );
        }

        let request = AnalysisRequest::from_body(body);
        let topic = request.as_ref().map(|r| r.topic.as_str());

        match self.agent.invoke(topic).await {
            Ok(analysis) => AnalyzeResponse::success(request_id, analysis),
            Err(e) => AnalyzeResponse::failure(request_id, e.status_code(), e.to_string()),
        }
    }
}
