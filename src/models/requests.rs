//! Client request bodies
//!
//! Each endpoint binds its JSON body to one of these shapes. Fields are free
//! text and are not validated beyond their type.

use serde::{Deserialize, Serialize};

/// Body of `POST /hint`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintRequest {
    pub problem_description: String,
}

/// Body of `POST /explain_error`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainErrorRequest {
    pub code: String,
    pub error: String,
}

/// Body of `POST /analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub code: String,
    pub problem_description: String,
}

/// Body of `POST /optimal_code`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimalCodeRequest {
    pub problem_description: String,
}

/// Body of `POST /similar_problems` and `POST /companies_asked`
///
/// The extension sends the problem title in `problem_description`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarProblemsRequest {
    pub problem_description: String,
}

/// Body of `POST /youtube_search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeSearchRequest {
    pub query: String,
}
