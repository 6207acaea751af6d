//! Common Contract Types

use serde::{Deserialize, Serialize};

/// Error payload returned to callers on every failure path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Terse, user-facing message
    pub error: String,
}

impl ErrorBody {
    /// Create an error body from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
