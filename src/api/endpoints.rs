//! API endpoint handlers
//!
//! One POST route per assistant use case plus the video lookup. Handlers
//! never fail: every outcome, including upstream errors, is a 200 with a
//! JSON body the extension knows how to render.

use crate::api::extract::ApiJson;
use crate::core::assistant::CodingAssistant;
use crate::core::config::Config;
use crate::core::constants::{route, sentinel};
use crate::core::provider::VideoSearch;
use crate::models::requests::{
    AnalyzeRequest, ExplainErrorRequest, HintRequest, OptimalCodeRequest, SimilarProblemsRequest,
    YouTubeSearchRequest,
};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub assistant: CodingAssistant,
    pub video_search: Arc<dyn VideoSearch>,
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(route::ROOT, get(root))
        .route(route::HEALTH, get(health_check))
        .route(route::HINT, post(hint))
        .route(route::EXPLAIN_ERROR, post(explain_error))
        .route(route::ANALYZE, post(analyze))
        .route(route::OPTIMAL_CODE, post(optimal_code))
        .route(route::SIMILAR_PROBLEMS, post(similar_problems))
        .route(route::COMPANIES_ASKED, post(companies_asked))
        .route(route::YOUTUBE_SEARCH, post(youtube_search))
        .with_state(state)
        // The extension calls from arbitrary problem pages
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// POST /hint
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
async fn hint(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<HintRequest>,
) -> Json<Value> {
    info!("📥 hint: {} chars", request.problem_description.len());
    let hint = state.assistant.hint(&request.problem_description).await;
    Json(json!({ "hint": hint }))
}

/// POST /explain_error
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
async fn explain_error(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ExplainErrorRequest>,
) -> Json<Value> {
    info!(
        "📥 explain_error: {} chars of code, {} chars of error",
        request.code.len(),
        request.error.len()
    );
    let explanation = state
        .assistant
        .explain_error(&request.code, &request.error)
        .await;
    Json(json!({ "explanation": explanation }))
}

/// POST /analyze
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
async fn analyze(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeRequest>,
) -> Json<Value> {
    info!("📥 analyze: {} chars of code", request.code.len());
    let analysis = state
        .assistant
        .analyze(&request.code, &request.problem_description)
        .await;
    Json(json!({ "analysis": analysis }))
}

/// POST /optimal_code - returns the solution object itself, unwrapped
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
async fn optimal_code(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<OptimalCodeRequest>,
) -> Json<Value> {
    info!("📥 optimal_code: {} chars", request.problem_description.len());
    Json(
        state
            .assistant
            .optimal_code(&request.problem_description)
            .await,
    )
}

/// POST /similar_problems
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
async fn similar_problems(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SimilarProblemsRequest>,
) -> Json<Value> {
    info!("📥 similar_problems: {:?}", request.problem_description);
    let similar = state
        .assistant
        .similar_problems(&request.problem_description)
        .await;
    Json(json!({ "similar": similar }))
}

/// POST /companies_asked
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
async fn companies_asked(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SimilarProblemsRequest>,
) -> Json<Value> {
    info!("📥 companies_asked: {:?}", request.problem_description);
    let companies = state
        .assistant
        .companies_asked(&request.problem_description)
        .await;
    Json(json!({ "companies": companies }))
}

/// POST /youtube_search
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
async fn youtube_search(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<YouTubeSearchRequest>,
) -> Json<Value> {
    info!("📥 youtube_search: {:?}", request.query);
    match state.video_search.first_video_id(&request.query).await {
        Ok(Some(video_id)) => Json(json!({ "videoId": video_id })),
        Ok(None) => Json(json!({ "error": sentinel::NO_VIDEO })),
        Err(e) => {
            warn!("Video search failed: {}", e);
            Json(json!({ "error": e.to_string() }))
        }
    }
}

/// GET / - Root endpoint
async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": format!("Code Buddy relay v{}", env!("CARGO_PKG_VERSION")),
        "status": "running",
        "config": {
            "provider": state.assistant.provider().provider_name(),
            "model": state.assistant.provider().model_name(),
            "request_timeout": state.config.request_timeout,
            "max_retries": state.config.max_retries,
        },
        "endpoints": {
            "hint": route::HINT,
            "explain_error": route::EXPLAIN_ERROR,
            "analyze": route::ANALYZE,
            "optimal_code": route::OPTIMAL_CODE,
            "similar_problems": route::SIMILAR_PROBLEMS,
            "companies_asked": route::COMPANIES_ASKED,
            "youtube_search": route::YOUTUBE_SEARCH,
            "health": route::HEALTH,
        },
    }))
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "provider": state.assistant.provider().provider_name(),
        "model": state.assistant.provider().model_name(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TomlConfig;
    use crate::core::constants::OPTIMAL_CODE_KEYS;
    use crate::core::test_helpers::{ScriptedProvider, ScriptedSearch};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_config() -> Arc<Config> {
        let env = |name: &str| Some(format!("{name}-value"));
        Arc::new(Config::from_parts(TomlConfig::default(), env).unwrap())
    }

    fn app(model_reply: ScriptedProvider, search: ScriptedSearch) -> Router {
        create_router(AppState {
            config: test_config(),
            assistant: CodingAssistant::new(Arc::new(model_reply)),
            video_search: Arc::new(search),
        })
    }

    fn replying(text: &str) -> Router {
        app(ScriptedProvider::replying(text), ScriptedSearch::NotFound)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_raw(app: Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_hint() {
        let (status, body) = post_json(
            replying("Use a hash map."),
            route::HINT,
            json!({"problem_description": "Two Sum"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"hint": "Use a hash map."}));
    }

    #[tokio::test]
    async fn test_explain_error_with_failed_model_call() {
        let (status, body) = post_json(
            app(ScriptedProvider::failing(503), ScriptedSearch::NotFound),
            route::EXPLAIN_ERROR,
            json!({"code": "x = y", "error": "NameError"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"explanation": "[AI Error: Unable to get response]"})
        );
    }

    #[tokio::test]
    async fn test_analyze() {
        let (_, body) = post_json(
            replying("O(n) time, O(n) space."),
            route::ANALYZE,
            json!({"code": "...", "problem_description": "Two Sum"}),
        )
        .await;

        assert_eq!(body, json!({"analysis": "O(n) time, O(n) space."}));
    }

    #[tokio::test]
    async fn test_optimal_code_from_fenced_reply() {
        let mut solution = serde_json::Map::new();
        for key in OPTIMAL_CODE_KEYS {
            solution.insert(key.to_string(), json!(format!("{key} text")));
        }
        let solution = Value::Object(solution);
        let reply = format!("```json\n{solution}\n```");

        let (_, body) = post_json(
            replying(&reply),
            route::OPTIMAL_CODE,
            json!({"problem_description": "Two Sum"}),
        )
        .await;

        assert_eq!(body, solution);
    }

    #[tokio::test]
    async fn test_optimal_code_unparseable() {
        let (status, body) = post_json(
            replying("I would rather not."),
            route::OPTIMAL_CODE,
            json!({"problem_description": "Two Sum"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "AI response could not be parsed as JSON");
        assert_eq!(body["raw"], "I would rather not.");
    }

    #[tokio::test]
    async fn test_similar_problems_prose_reply() {
        let (status, body) = post_json(
            replying("Sorry, I cannot help."),
            route::SIMILAR_PROBLEMS,
            json!({"problem_description": "Two Sum"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let similar = body["similar"].as_array().unwrap();
        assert!(similar.iter().all(Value::is_string));
        assert_eq!(similar[0], "[AI error: Could not parse similar problems]");
        assert_eq!(similar[1], "Sorry, I cannot help.");
    }

    #[tokio::test]
    async fn test_companies_asked_two_sum() {
        let (_, body) = post_json(
            replying(r#"[{"name":"Google","year":2021}]"#),
            route::COMPANIES_ASKED,
            json!({"problem_description": "Two Sum"}),
        )
        .await;

        assert_eq!(body, json!({"companies": [{"name": "Google", "year": 2021}]}));
    }

    #[tokio::test]
    async fn test_youtube_search_found() {
        let (_, body) = post_json(
            app(
                ScriptedProvider::replying(""),
                ScriptedSearch::Found("KLlXCFG5TnA".to_string()),
            ),
            route::YOUTUBE_SEARCH,
            json!({"query": "two sum"}),
        )
        .await;

        assert_eq!(body, json!({"videoId": "KLlXCFG5TnA"}));
    }

    #[tokio::test]
    async fn test_youtube_search_no_items() {
        let (_, body) = post_json(
            replying(""),
            route::YOUTUBE_SEARCH,
            json!({"query": "two sum"}),
        )
        .await;

        assert_eq!(body, json!({"error": "No video found"}));
    }

    #[tokio::test]
    async fn test_youtube_search_transport_failure() {
        let (status, body) = post_json(
            app(
                ScriptedProvider::replying(""),
                ScriptedSearch::Failing("connection refused".to_string()),
            ),
            route::YOUTUBE_SEARCH,
            json!({"query": "two sum"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"error": "Transport error: connection refused"})
        );
    }

    #[tokio::test]
    async fn test_missing_field_rejected_as_json() {
        let response = replying("unused")
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(route::HINT)
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.headers()["content-type"], "application/json");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("missing field `problem_description`")
        );
    }

    #[tokio::test]
    async fn test_malformed_body_rejected_as_json() {
        let (status, body) =
            post_raw(replying("unused"), route::YOUTUBE_SEARCH, "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = replying("")
            .oneshot(
                Request::builder()
                    .uri(route::HEALTH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model"], "scripted-model");
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed() {
        let response = replying("")
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri(route::HINT)
                    .header("origin", "https://leetcode.com")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
