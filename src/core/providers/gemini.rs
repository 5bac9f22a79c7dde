//! Gemini provider implementation

use crate::core::provider::{GenerationProvider, ProviderError};
use crate::core::retry::RetryPolicy;
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Gemini `generateContent` client authenticated by API key
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    retry: RetryPolicy,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key, sent as the `key` query parameter
    /// * `base_url` - API root, e.g. `https://generativelanguage.googleapis.com/v1beta`
    /// * `model` - Model name, e.g. `gemini-2.0-flash`
    /// * `timeout` - Per-attempt request timeout
    /// * `retry` - Retry policy for transient failures
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url,
            model,
            retry,
        })
    }

    /// Get the endpoint URL for the configured model
    fn endpoint_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Classify Gemini errors
    fn classify_error(error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("api_key_invalid") || error_lower.contains("api key not valid") {
            return "Invalid API key. Please check your GEMINI_API_KEY configuration.".to_string();
        }

        if error_lower.contains("resource_exhausted") || error_lower.contains("quota") {
            return "Rate limit or quota exceeded for the Gemini API.".to_string();
        }

        if error_lower.contains("not found") && error_lower.contains("model") {
            return "Model not found. Please check the [gemini] model setting.".to_string();
        }

        if error_lower.contains("permission_denied") {
            return "Permission denied. The API key is not allowed to call this model."
                .to_string();
        }

        error_detail.to_string()
    }

    /// Single request/response round trip
    async fn send_generate_request(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(self.endpoint_url())
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::from_status(
                status.as_u16(),
                Self::classify_error(&error_text),
            ));
        }

        let generated: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &generated.usage_metadata {
            debug!(
                "Gemini usage: prompt={} candidates={} total={}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        match generated.first_text() {
            Some(text) => Ok(text.to_string()),
            None => {
                let finish_reason = generated
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref())
                    .unwrap_or("none");
                warn!("Gemini returned no text (finish reason: {})", finish_reason);
                Err(ProviderError::EmptyResponse)
            }
        }
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = GenerateContentRequest::from_prompt(prompt);
        debug!(
            "Sending {} byte prompt to Gemini model {}",
            prompt.len(),
            self.model
        );
        let body = &body;
        self.retry
            .run("Gemini generateContent", move || {
                self.send_generate_request(body)
            })
            .await
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const PATH: &str = "/models/gemini-test:generateContent";

    fn provider(base_url: String, retry: RetryPolicy) -> GeminiProvider {
        GeminiProvider::new(
            "test-key".to_string(),
            base_url,
            "gemini-test".to_string(),
            Duration::from_secs(5),
            retry,
        )
        .unwrap()
    }

    fn reply(text: &str) -> String {
        json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_generate_returns_first_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::Json(json!({
                "contents": [{"parts": [{"text": "Give me a hint"}]}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply("Try a hash map."))
            .create_async()
            .await;

        let gemini = provider(server.url(), RetryPolicy::none());
        let text = gemini.generate("Give me a hint").await.unwrap();

        assert_eq!(text, "Try a hash map.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_maps_auth_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error": {"status": "INVALID_ARGUMENT", "message": "API key not valid."}}"#)
            .expect(1)
            .create_async()
            .await;

        let gemini = provider(server.url(), RetryPolicy::new(3, 1.0, 1));
        let err = gemini.generate("prompt").await.unwrap_err();

        assert!(matches!(err, ProviderError::BadRequest(ref m) if m.contains("GEMINI_API_KEY")));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_retries_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("overloaded")
            .expect(3)
            .create_async()
            .await;

        let gemini = provider(server.url(), RetryPolicy::new(2, 1.0, 1));
        let err = gemini.generate("prompt").await.unwrap_err();

        assert!(matches!(err, ProviderError::ApiError { status: 503, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_without_candidates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let gemini = provider(server.url(), RetryPolicy::none());
        let err = gemini.generate("prompt").await.unwrap_err();

        assert!(matches!(err, ProviderError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_leak_key() {
        let gemini = GeminiProvider::new(
            "SECRET-GEMINI-KEY".to_string(),
            "http://127.0.0.1:1".to_string(),
            "gemini-test".to_string(),
            Duration::from_secs(5),
            RetryPolicy::none(),
        )
        .unwrap();

        let err = gemini.generate("prompt").await.unwrap_err();
        let message = err.to_string();

        assert!(matches!(err, ProviderError::Transport(_)), "{message}");
        assert!(!message.contains("SECRET-GEMINI-KEY"), "{message}");
    }

    #[test]
    fn test_classify_quota_error() {
        let result = GeminiProvider::classify_error("RESOURCE_EXHAUSTED: quota exceeded");
        assert!(result.contains("quota"));
    }

    #[test]
    fn test_classify_passthrough() {
        let result = GeminiProvider::classify_error("something odd");
        assert_eq!(result, "something odd");
    }
}
