//! HTTP Routes
//!
//! - `/api/analyze` (any method) - topic contrast analysis, POST only
//! - `/api/info` - service and provider info
//! - `/health` - liveness probe
//! - `/ready` - readiness probe

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use podcast_contrast_agents::{AnalyzeHandler, CONTRAST_AGENT_ID, CONTRAST_AGENT_VERSION};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;

/// Response header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Shared application state. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    analyze_handler: Arc<AnalyzeHandler>,
    config: Arc<Config>,
}

impl AppState {
    /// Create state from configuration. The provider is built once here.
    pub fn new(config: Config) -> Result<Self> {
        let handler = AnalyzeHandler::new(&config.provider)
            .map_err(|e| anyhow::anyhow!("Failed to create analyze handler: {}", e))?;

        Ok(Self::with_handler(config, handler))
    }

    /// Create state around an existing handler.
    pub fn with_handler(config: Config, handler: AnalyzeHandler) -> Self {
        Self {
            analyze_handler: Arc::new(handler),
            config: Arc::new(config),
        }
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/api/analyze", any(analyze))
        .route("/api/info", get(service_info))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe - always returns OK if the process is running.
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness probe - ready once a provider credential is configured.
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.analyze_handler.agent().is_configured() {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT_READY")
    }
}

/// /api/analyze - contrast two podcasts on a topic.
async fn analyze(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    let outcome = state.analyze_handler.handle(&method, &body).await;

    let mut response = (outcome.status, Json(outcome.body)).into_response();
    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(&outcome.request_id.to_string()) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    if outcome.status == StatusCode::METHOD_NOT_ALLOWED {
        headers.insert(header::ALLOW, HeaderValue::from_static("POST"));
    }

    response
}

/// GET /api/info - describe the service and its provider.
async fn service_info(State(state): State<AppState>) -> Json<ServiceInfoResponse> {
    let agent = state.analyze_handler.agent();

    Json(ServiceInfoResponse {
        service: state.config.service_name.clone(),
        version: state.config.service_version.clone(),
        agent_id: CONTRAST_AGENT_ID.to_string(),
        agent_version: CONTRAST_AGENT_VERSION.to_string(),
        endpoint: "/api/analyze".to_string(),
        methods: vec!["POST".to_string()],
        provider: state.config.provider.kind.to_string(),
        model: state.config.provider.model.clone(),
        configured: agent.is_configured(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfoResponse {
    pub service: String,
    pub version: String,
    pub agent_id: String,
    pub agent_version: String,
    pub endpoint: String,
    pub methods: Vec<String>,
    pub provider: String,
    pub model: String,
    pub configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use podcast_contrast_agents::{CompletionProvider, ProviderError, ProviderKind};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct FixedProvider(&'static str);

    #[async_trait]
    impl CompletionProvider for FixedProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Gemini
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    fn app(reply: Option<&'static str>) -> Router {
        let provider = reply.map(|r| Arc::new(FixedProvider(r)) as Arc<dyn CompletionProvider>);
        router(AppState::with_handler(
            Config::default(),
            AnalyzeHandler::with_provider(provider),
        ))
    }

    fn post_topic(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(None)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_reflects_credential() {
        let request = || Request::builder().uri("/ready").body(Body::empty()).unwrap();

        let response = app(None).oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(Some("{}")).oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_analyze_is_405() {
        let response = app(Some("{}"))
            .oneshot(Request::builder().uri("/api/analyze").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(json_body(response).await, json!({"error": "Method not allowed"}));
    }

    #[tokio::test]
    async fn test_post_analyze_relays_model_json() {
        let response = app(Some("```json\n{\"topic\":\"tariffs\"}\n```"))
            .oneshot(post_topic(r#"{"topic":"tariffs"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"topic": "tariffs"}));
    }

    #[tokio::test]
    async fn test_post_analyze_validation_error() {
        let response = app(Some("{}"))
            .oneshot(post_topic(r#"{"topic":"   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "A topic is required."}));
    }

    #[tokio::test]
    async fn test_post_analyze_without_credential() {
        let response = app(None)
            .oneshot(post_topic(r#"{"topic":"tariffs"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": "API key not configured on server."})
        );
    }

    #[tokio::test]
    async fn test_info() {
        let response = app(None)
            .oneshot(Request::builder().uri("/api/info").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let info: ServiceInfoResponse =
            serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(info.provider, "gemini");
        assert!(!info.configured);
    }
}
