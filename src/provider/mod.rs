//! LLM provider abstraction.
//!
//! The extraction pipeline talks to the model through the [`PlanProvider`]
//! trait rather than a concrete HTTP client. That seam exists for two
//! reasons: the service has run against more than one OpenAI-compatible
//! backend, and the HTTP handler tests inject a scripted provider so the
//! full request path is testable without network access.
//!
//! [`parse_object_reply`] lives here because every implementation shares
//! the same contract: the model is asked for a single JSON object
//! (`response_format: json_object`), and whatever comes back must be
//! parsed defensively before the normaliser sees it.

pub mod openai;

pub use openai::OpenAiProvider;

use crate::error::ExtractError;
use crate::pipeline::encode::EncodedImage;
use crate::schema::RawExtraction;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

/// What the model is asked to read.
pub enum PlanContent {
    /// The newline-joined text layer of every page.
    Text(String),
    /// Rasterised page 1 as a base64 PNG.
    Image(EncodedImage),
}

/// A backend capable of turning plan content into raw extraction JSON.
#[async_trait]
pub trait PlanProvider: Send + Sync {
    /// Short identifier used in logs and error messages.
    fn name(&self) -> &str;

    /// Send the plan to the model and return the parsed reply object.
    ///
    /// Implementations own the wire format and reply parsing; callers
    /// receive either a JSON object (possibly empty, possibly full of
    /// junk keys — the normaliser copes) or an [`ExtractError`].
    async fn extract(&self, content: &PlanContent) -> Result<RawExtraction, ExtractError>;
}

// Models occasionally wrap the object in markdown fences despite the
// json_object response format. Strip one outer fence before parsing.
static RE_JSON_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\s*\n?(.*?)\n?```\s*$").unwrap());

/// Parse a model reply into a JSON object.
///
/// Accepts the bare object, or the object wrapped in a single ```` ```json ````
/// fence. Anything else — an array, a scalar, prose, truncated JSON — is a
/// [`ExtractError::MalformedReply`] carrying an excerpt for the logs.
pub fn parse_object_reply(reply: &str) -> Result<RawExtraction, ExtractError> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::EmptyReply);
    }

    let inner = match RE_JSON_FENCES.captures(trimmed) {
        Some(caps) => caps[1].trim().to_string(),
        None => trimmed.to_string(),
    };
    if inner.is_empty() {
        return Err(ExtractError::EmptyReply);
    }

    match serde_json::from_str::<serde_json::Value>(&inner) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(ExtractError::MalformedReply {
            detail: format!("expected an object, got {}", value_kind(&other)),
            excerpt: reply_excerpt(&inner),
        }),
        Err(e) => Err(ExtractError::MalformedReply {
            detail: e.to_string(),
            excerpt: reply_excerpt(&inner),
        }),
    }
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn reply_excerpt(reply: &str) -> String {
    const MAX_CHARS: usize = 200;
    if reply.chars().count() <= MAX_CHARS {
        reply.to_string()
    } else {
        let head: String = reply.chars().take(MAX_CHARS).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn parses_bare_object() {
        let raw = parse_object_reply(r#"{"surface_sejour": "18.5"}"#).unwrap();
        assert_eq!(raw["surface_sejour"], "18.5");
    }

    #[test]
    fn parses_fenced_object() {
        let raw = parse_object_reply("```json\n{\"type_de_bien\": \"T2\"}\n```").unwrap();
        assert_eq!(raw["type_de_bien"], "T2");
    }

    #[test]
    fn parses_fence_without_language_tag() {
        let raw = parse_object_reply("```\n{\"a\": 1}\n```").unwrap();
        assert_eq!(raw["a"], 1);
    }

    #[test]
    fn empty_reply_is_its_own_error() {
        assert!(matches!(
            parse_object_reply("   \n "),
            Err(ExtractError::EmptyReply)
        ));
        assert!(matches!(
            parse_object_reply("```json\n\n```"),
            Err(ExtractError::EmptyReply)
        ));
    }

    #[test]
    fn array_reply_is_malformed() {
        let err = parse_object_reply(r#"[{"surface_sejour": "18.5"}]"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderFailure);
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn scalar_reply_is_malformed() {
        let err = parse_object_reply("42").unwrap_err();
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn prose_reply_is_malformed_with_excerpt() {
        let err = parse_object_reply("Je suis désolé, je ne peux pas lire ce plan.").unwrap_err();
        match err {
            ExtractError::MalformedReply { excerpt, .. } => {
                assert!(excerpt.starts_with("Je suis désolé"));
            }
            other => panic!("expected MalformedReply, got {other:?}"),
        }
    }

    #[test]
    fn long_excerpt_is_truncated() {
        let reply = "x".repeat(500);
        let err = parse_object_reply(&reply).unwrap_err();
        match err {
            ExtractError::MalformedReply { excerpt, .. } => {
                assert!(excerpt.chars().count() <= 201);
                assert!(excerpt.ends_with('…'));
            }
            other => panic!("expected MalformedReply, got {other:?}"),
        }
    }
}
