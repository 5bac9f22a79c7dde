//! YouTube Data API `search.list` data models

use serde::{Deserialize, Serialize};

/// Response body of `GET /search`
///
/// Every level is optional: the relay only cares whether
/// `items[0].id.videoId` exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchListResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<SearchResult>>,
}

impl SearchListResponse {
    /// Video ID of the first search result, if present
    pub fn first_video_id(&self) -> Option<&str> {
        self.items
            .as_ref()?
            .first()?
            .id
            .as_ref()?
            .video_id
            .as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}
