//! YouTube Data API search client

use crate::core::provider::{ProviderError, VideoSearch};
use crate::core::retry::RetryPolicy;
use crate::models::youtube::SearchListResponse;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Looks up a single walkthrough video for a problem
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl YouTubeClient {
    pub fn new(
        api_key: String,
        base_url: String,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url,
            retry,
        })
    }

    async fn send_search_request(&self, query: &str) -> Result<SearchListResponse, ProviderError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("key", self.api_key.as_str()),
                ("maxResults", "1"),
                ("type", "video"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn first_video_id(&self, query: &str) -> Result<Option<String>, ProviderError> {
        let results = self
            .retry
            .run("YouTube search", move || self.send_search_request(query))
            .await?;

        let video_id = results.first_video_id().map(str::to_string);
        debug!("YouTube search for {:?} -> {:?}", query, video_id);
        Ok(video_id)
    }
}
