//! Non-task payloads of the task service API: health checks and error bodies.

use serde::{Deserialize, Serialize};

/// Body of `GET health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"healthy"` when the service is up.
    pub status: String,
    /// Service name.
    pub service: String,
}

impl HealthStatus {
    /// A healthy status for the named service.
    #[must_use]
    pub fn healthy(service: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            service: service.to_string(),
        }
    }

    /// Returns `true` if the service reported itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// JSON body returned with non-success responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub detail: String,
}

impl ErrorBody {
    /// Wraps a reason.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
