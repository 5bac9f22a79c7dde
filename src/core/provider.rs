//! Provider abstraction layer for the external APIs
//!
//! The relay talks to two collaborators: a text generation model and a video
//! search service. Both sit behind traits so handlers can be exercised
//! without network access.

use crate::core::retry::Retryable;
use async_trait::async_trait;
use thiserror::Error;

/// Error types for provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Response contained no text")]
    EmptyResponse,

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Map a non-success HTTP status and its classified message to an error
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ProviderError::Authentication(message),
            429 => ProviderError::RateLimit(message),
            400 | 404 => ProviderError::BadRequest(message),
            _ => ProviderError::ApiError { status, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    /// The request URL carries the API key as a query parameter, so it is
    /// dropped before the error is rendered
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_timeout() {
            ProviderError::Timeout(e.to_string())
        } else if e.is_decode() {
            ProviderError::Decode(e.to_string())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

impl Retryable for ProviderError {
    fn is_retryable(&self) -> bool {
        match self {
            ProviderError::RateLimit(_)
            | ProviderError::Timeout(_)
            | ProviderError::Transport(_) => true,
            ProviderError::ApiError { status, .. } => *status >= 500,
            ProviderError::Authentication(_)
            | ProviderError::BadRequest(_)
            | ProviderError::EmptyResponse
            | ProviderError::Decode(_) => false,
        }
    }
}

/// Text generation model
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Send one prompt and return the primary text of the reply
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Model the provider sends prompts to
    fn model_name(&self) -> &str;
}

/// Video search service
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// ID of the best matching video, `None` when the search has no usable
    /// result
    async fn first_video_id(&self, query: &str) -> Result<Option<String>, ProviderError>;
}
