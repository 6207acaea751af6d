//! Analysis Contracts
//!
//! `AnalysisRequest` is what a caller posts; `AnalysisResult` is the shape the
//! prompt asks the upstream model to produce. The model's output is relayed as
//! raw JSON, so `AnalysisResult` is used to check conformance rather than to
//! gate the response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum raw topic length, in UTF-16 code units.
pub const MAX_TOPIC_CHARS: usize = 200;

/// Number of contrast dimensions the prompt asks for.
pub const EXPECTED_DIFFERENCES: usize = 3;

/// Inbound analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Topic to contrast podcasts on
    pub topic: String,
}

impl AnalysisRequest {
    /// Read a request from a raw body.
    ///
    /// Returns `None` when the body is not JSON, is not an object, or has no
    /// string `topic` field. Callers treat all of these as a missing topic.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let value: Value = serde_json::from_slice(body).ok()?;
        let topic = value.get("topic")?.as_str()?;

        Some(Self {
            topic: topic.to_owned(),
        })
    }
}

/// One podcast's stance on the topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastStance {
    pub name: String,
    pub episode: String,
    pub url: String,
    pub hosts: String,
    pub stance_label: String,
    pub stance_detail: String,
    pub summary: String,
}

/// One axis of contrast between the two stances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    pub dimension: String,
    pub left_view: String,
    pub right_view: String,
}

/// Analysis result as requested from the upstream model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub topic: String,
    pub podcast_left: PodcastStance,
    pub podcast_right: PodcastStance,
    pub key_differences: Vec<Difference>,
}

/// How closely a parsed model reply matches [`AnalysisResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conformance {
    /// Deserializes and carries exactly three differences
    Conforming,
    /// Deserializes but with a different number of differences
    WrongDifferenceCount(usize),
    /// Does not deserialize into `AnalysisResult`
    Malformed,
}

impl AnalysisResult {
    /// Check a parsed reply against the requested shape.
    pub fn conformance(value: &Value) -> Conformance {
        match Self::deserialize(value) {
            Ok(result) if result.key_differences.len() == EXPECTED_DIFFERENCES => {
                Conformance::Conforming
            }
            Ok(result) => Conformance::WrongDifferenceCount(result.key_differences.len()),
            Err(_) => Conformance::Malformed,
        }
    }
}
