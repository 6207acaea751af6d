//! Completion Provider Clients
//!
//! Each upstream AI service is one [`CompletionProvider`] variant. Variants
//! differ only in request shaping, credential placement and where the reply
//! text lives in the response; the analysis pipeline is shared.

pub mod gemini;
pub mod openai;
pub mod provider;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use provider::*;
