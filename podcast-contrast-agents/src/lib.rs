//! Podcast Contrast Agents
//!
//! Finds two well-known podcasts with opposed stances on a caller-supplied
//! topic by asking one configured AI provider, and relays the model's JSON
//! answer.
//!
//! # Pipeline
//!
//! ```text
//! caller -> AnalyzeHandler -> ContrastAgent -> CompletionProvider -> upstream API
//! ```
//!
//! The pipeline is linear and stateless: validate, build the prompt, make one
//! outbound call, strip code fences, parse JSON, respond. Nothing is retried or
//! persisted.
//!
//! # Usage
//!
//! ```rust,ignore
//! use podcast_contrast_agents::{AnalyzeHandler, ProviderConfig};
//! use reqwest::Method;
//!
//! let handler = AnalyzeHandler::new(&ProviderConfig::from_env()?)?;
//! let response = handler.handle(&Method::POST, br#"{"topic":"nuclear power"}"#).await;
//! println!("{} {}", response.status, response.body);
//! ```
//!
//! # Modules
//!
//! - [`contracts`]: request, result and error shapes
//! - [`clients`]: completion provider variants (Gemini, OpenAI)
//! - [`agents`]: prompt rendering and the contrast pipeline
//! - [`handlers`]: the transport-independent analyze handler

#![warn(rustdoc::missing_crate_level_docs)]

pub mod agents;
pub mod clients;
pub mod contracts;
pub mod handlers;

pub use agents::{
    build_prompt, parse_completion, strip_code_fences, validate_topic, ContrastAgent,
    ContrastAgentError, CONTRAST_AGENT_ID, CONTRAST_AGENT_VERSION,
};
pub use clients::{
    build_provider, CompletionProvider, GeminiProvider, OpenAiProvider, ProviderConfig,
    ProviderError, ProviderKind,
};
pub use contracts::{AnalysisRequest, AnalysisResult, Conformance, Difference, ErrorBody, PodcastStance};
pub use handlers::{AnalyzeHandler, AnalyzeResponse};
