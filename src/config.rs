//! Configuration types for the extraction service.
//!
//! All extraction behaviour is controlled through [`ServiceConfig`], built
//! via its [`ServiceConfigBuilder`] or loaded from the process environment
//! with [`ServiceConfig::from_env`]. Keeping every knob in one struct makes
//! it trivial to share the config across request tasks behind an `Arc` and
//! to log the effective settings at startup (the API key is redacted from
//! `Debug` output).
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest; `build()` validates the result so
//! an invalid configuration is caught at startup, never mid-request.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable holding the LLM provider API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Which content the provider receives for a plan.
///
/// The vision strategy rasterises page 1 and sends the image; the text
/// strategy extracts the embedded text layer from every page and sends
/// that. Vision is the default: marketing floor plans are mostly vector
/// drawings whose text layer rarely carries the room table intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// Send the extracted text layer to a chat-completion model.
    Text,
    /// Send a rasterised page-1 image to a vision-capable model. (default)
    #[default]
    Vision,
}

impl FromStr for ExtractionStrategy {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "vision" => Ok(Self::Vision),
            other => Err(ExtractError::InvalidConfig(format!(
                "unknown extraction strategy '{other}', expected 'text' or 'vision'"
            ))),
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Vision => write!(f, "vision"),
        }
    }
}

/// Configuration for the extraction service.
///
/// Built via [`ServiceConfig::builder()`] or [`ServiceConfig::from_env()`].
///
/// # Example
/// ```rust
/// use plan2data::{ExtractionStrategy, ServiceConfig};
///
/// let config = ServiceConfig::builder()
///     .api_key("sk-test")
///     .model("gpt-4.1")
///     .strategy(ExtractionStrategy::Vision)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ServiceConfig {
    /// LLM provider API key. Required; loaded from `OPENAI_API_KEY`.
    pub api_key: String,

    /// Base URL of the OpenAI-compatible API. Default: `https://api.openai.com/v1`.
    ///
    /// Point this at any chat-completions-compatible endpoint — the original
    /// deployment of this pipeline ran one variant against a non-OpenAI
    /// backend, and the integration tests run against a loopback mock.
    pub api_base: String,

    /// Model identifier. Default: `gpt-4.1`.
    pub model: String,

    /// Maximum tokens the model may generate per extraction. Default: 1000.
    ///
    /// The reply is one small JSON object; 1000 tokens covers even plans
    /// with many extra rooms. Raising it only raises the cost ceiling.
    pub max_tokens: u32,

    /// Provider-call timeout in seconds. Range: 1–300. Default: 30.
    ///
    /// The orchestrator awaits the provider under this bound and maps an
    /// expiry to HTTP 504. The HTTP client carries the same bound, so a
    /// stalled connection cannot outlive the request.
    pub request_timeout_secs: u64,

    /// Content strategy. Default: [`ExtractionStrategy::Vision`].
    pub strategy: ExtractionStrategy,

    /// Maximum rendered page-1 dimension (width or height) in pixels. Default: 2048.
    ///
    /// A safety cap independent of the page's physical size: an A0 plan
    /// would otherwise rasterise to a grotesque bitmap. 1024–2048 px is the
    /// sweet spot for vision models reading printed room labels.
    pub max_rendered_pixels: u32,

    /// Maximum accepted upload size in bytes. Default: 20 MiB.
    pub max_upload_bytes: usize,

    /// Allowed CORS origins. `None` (default) permits any origin.
    pub cors_origins: Option<Vec<String>>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4.1".to_string(),
            max_tokens: 1000,
            request_timeout_secs: 30,
            strategy: ExtractionStrategy::default(),
            max_rendered_pixels: 2048,
            max_upload_bytes: 20 * 1024 * 1024,
            cors_origins: None,
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("strategy", &self.strategy)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// Load the configuration from the process environment.
    ///
    /// `OPENAI_API_KEY` is required — a missing or empty key fails with
    /// [`ExtractError::MissingApiKey`] so the server refuses to start.
    /// Optional overrides: `PLAN2DATA_API_BASE`, `PLAN2DATA_MODEL`,
    /// `PLAN2DATA_STRATEGY`, `PLAN2DATA_TIMEOUT_SECS`,
    /// `PLAN2DATA_MAX_UPLOAD_BYTES`, `PLAN2DATA_CORS_ORIGINS`
    /// (comma-separated).
    pub fn from_env() -> Result<Self, ExtractError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ExtractError::MissingApiKey {
                var: API_KEY_VAR.to_string(),
            })?;

        let mut builder = Self::builder().api_key(api_key);

        if let Ok(base) = std::env::var("PLAN2DATA_API_BASE") {
            builder = builder.api_base(base);
        }
        if let Ok(model) = std::env::var("PLAN2DATA_MODEL") {
            builder = builder.model(model);
        }
        if let Ok(strategy) = std::env::var("PLAN2DATA_STRATEGY") {
            builder = builder.strategy(strategy.parse()?);
        }
        if let Ok(secs) = std::env::var("PLAN2DATA_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                ExtractError::InvalidConfig(format!(
                    "PLAN2DATA_TIMEOUT_SECS must be an integer, got '{secs}'"
                ))
            })?;
            builder = builder.request_timeout_secs(secs);
        }
        if let Ok(bytes) = std::env::var("PLAN2DATA_MAX_UPLOAD_BYTES") {
            let bytes: usize = bytes.parse().map_err(|_| {
                ExtractError::InvalidConfig(format!(
                    "PLAN2DATA_MAX_UPLOAD_BYTES must be an integer, got '{bytes}'"
                ))
            })?;
            builder = builder.max_upload_bytes(bytes);
        }
        if let Ok(origins) = std::env::var("PLAN2DATA_CORS_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            if !origins.is_empty() {
                builder = builder.cors_origins(origins);
            }
        }

        builder.build()
    }

    /// Provider-call timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Trailing slashes are stripped so path joining stays predictable.
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.config.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n.max(1);
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs.clamp(1, 300);
        self
    }

    pub fn strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.clamp(256, 4096);
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes.max(1024);
        self
    }

    pub fn cors_origins(mut self, origins: Vec<String>) -> Self {
        self.config.cors_origins = Some(origins);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, ExtractError> {
        let c = &self.config;
        if c.api_key.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "api_key must not be empty (set OPENAI_API_KEY)".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(ExtractError::InvalidConfig("model must not be empty".into()));
        }
        if c.request_timeout_secs == 0 || c.request_timeout_secs > 300 {
            return Err(ExtractError::InvalidConfig(format!(
                "request_timeout_secs must be 1–300, got {}",
                c.request_timeout_secs
            )));
        }
        Ok(self.config)
    }
}
