//! OpenAI chat-completions provider.
//!
//! Also serves any OpenAI-compatible backend: point `api_base` at the
//! compatible endpoint and keep the same wire format. The request always
//! sets `response_format: {"type": "json_object"}` so the model is
//! constrained to emit a single JSON object.

use crate::config::ServiceConfig;
use crate::error::ExtractError;
use crate::prompts::{text_user_message, TEXT_SYSTEM_PROMPT, VISION_PROMPT};
use crate::provider::{parse_object_reply, PlanContent, PlanProvider};
use crate::schema::RawExtraction;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, warn};

pub struct OpenAiProvider {
    api_key: String,
    api_base: String,
    model: String,
    max_tokens: u32,
    timeout_secs: u64,
    client: Client,
}

impl OpenAiProvider {
    /// Build a provider from the service configuration.
    ///
    /// The HTTP client carries the same timeout the orchestrator enforces,
    /// so a stalled TCP connection fails at the same bound as a slow model.
    pub fn new(config: &ServiceConfig) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ExtractError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout_secs: config.request_timeout_secs,
            client,
        })
    }

    /// Assemble the chat-completions request body.
    ///
    /// Text content becomes a system + user message pair. Image content
    /// becomes a single user message whose content array carries the prompt
    /// text part followed by the data-URL image part.
    fn build_body(&self, content: &PlanContent) -> serde_json::Value {
        let messages = match content {
            PlanContent::Text(document_text) => serde_json::json!([
                {
                    "role": "system",
                    "content": TEXT_SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": text_user_message(document_text)
                }
            ]),
            PlanContent::Image(image) => serde_json::json!([
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "text",
                            "text": VISION_PROMPT
                        },
                        {
                            "type": "image_url",
                            "image_url": { "url": image.to_data_url() }
                        }
                    ]
                }
            ]),
        };

        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": self.max_tokens,
            "response_format": { "type": "json_object" }
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> ExtractError {
        if e.is_timeout() {
            ExtractError::ProviderTimeout {
                secs: self.timeout_secs,
            }
        } else {
            ExtractError::ProviderNetwork { source: e }
        }
    }
}

#[async_trait]
impl PlanProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn extract(&self, content: &PlanContent) -> Result<RawExtraction, ExtractError> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = self.build_body(content);

        debug!("Calling {} (model {})", url, self.model);
        let start = Instant::now();

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            return Err(ExtractError::ProviderRateLimited {
                provider: self.name().to_string(),
                retry_after_secs: retry_after,
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let text = resp.text().await.unwrap_or_default();
            return Err(ExtractError::ProviderAuth {
                provider: self.name().to_string(),
                detail: if text.is_empty() {
                    format!("HTTP {}", status.as_u16())
                } else {
                    text
                },
            });
        }

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!("Provider returned HTTP {}: {}", status.as_u16(), text);
            return Err(ExtractError::ProviderApi {
                status: status.as_u16(),
                message: text,
            });
        }

        let json: serde_json::Value = resp.json().await.map_err(|e| self.transport_error(e))?;

        let reply = json["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["message"]["content"].as_str())
            .ok_or(ExtractError::EmptyReply)?;

        debug!(
            "Provider replied in {:?} ({} chars)",
            start.elapsed(),
            reply.len()
        );

        parse_object_reply(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encode::EncodedImage;

    fn provider() -> OpenAiProvider {
        let config = ServiceConfig::builder()
            .api_key("sk-test")
            .model("gpt-4.1")
            .max_tokens(1000)
            .build()
            .unwrap();
        OpenAiProvider::new(&config).unwrap()
    }

    #[test]
    fn text_body_is_system_plus_user() {
        let body = provider().build_body(&PlanContent::Text("Séjour 18.5 m²".to_string()));

        assert_eq!(body["model"], "gpt-4.1");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["response_format"]["type"], "json_object");

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert!(messages[1]["content"]
            .as_str()
            .unwrap()
            .contains("Séjour 18.5 m²"));
    }

    #[test]
    fn vision_body_is_single_user_message_with_image_part() {
        let image = EncodedImage {
            base64: "aGVsbG8=".to_string(),
            mime_type: "image/png",
        };
        let body = provider().build_body(&PlanContent::Image(image));

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");

        let parts = messages[0]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(
            parts[1]["image_url"]["url"],
            "data:image/png;base64,aGVsbG8="
        );
    }

    #[test]
    fn response_format_always_requests_json_object() {
        let text_body = provider().build_body(&PlanContent::Text(String::new()));
        let image_body = provider().build_body(&PlanContent::Image(EncodedImage {
            base64: String::new(),
            mime_type: "image/png",
        }));
        assert_eq!(text_body["response_format"]["type"], "json_object");
        assert_eq!(image_body["response_format"]["type"], "json_object");
    }
}
