//! API response types and shared server state.

use crate::config::ServiceConfig;
use crate::provider::PlanProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status, always `"ok"` when the server answers.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Error response body.
///
/// Every error, whatever its status code, serialises to this one shape so
/// clients have a single field to read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub detail: String,
}

/// API server state shared across request handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Service configuration.
    pub config: Arc<ServiceConfig>,
    /// The model backend. A trait object so tests can inject a scripted
    /// provider behind the same router.
    pub provider: Arc<dyn PlanProvider>,
}

impl fmt::Debug for ApiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiState")
            .field("config", &self.config)
            .field("provider", &self.provider.name())
            .finish()
    }
}
