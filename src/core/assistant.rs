//! Coding assistant use cases
//!
//! Each use case builds its prompt, makes one model call and shapes the
//! reply. None of them can fail: a failed call yields the sentinel text and
//! an unparseable reply yields the use case's fallback value.

use crate::conversion::prompt_builder;
use crate::conversion::response_parser::{ResponseKind, parse_response};
use crate::core::constants::{OPTIMAL_CODE_KEYS, sentinel};
use crate::core::provider::GenerationProvider;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Prompt/response adapter in front of the generation model
#[derive(Clone)]
pub struct CodingAssistant {
    provider: Arc<dyn GenerationProvider>,
}

impl CodingAssistant {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn GenerationProvider {
        self.provider.as_ref()
    }

    /// Non-spoiling hint for a problem
    pub async fn hint(&self, problem_description: &str) -> String {
        self.complete(&prompt_builder::hint_prompt(problem_description))
            .await
    }

    /// Explanation of a compiler/runtime error with a suggested fix
    pub async fn explain_error(&self, code: &str, error: &str) -> String {
        self.complete(&prompt_builder::explain_error_prompt(code, error))
            .await
    }

    /// Complexity analysis of a submission
    pub async fn analyze(&self, code: &str, problem_description: &str) -> String {
        self.complete(&prompt_builder::analyze_prompt(code, problem_description))
            .await
    }

    /// Optimal and brute-force solutions as one flat object
    pub async fn optimal_code(&self, problem_description: &str) -> Value {
        let raw = self
            .complete(&prompt_builder::optimal_code_prompt(problem_description))
            .await;
        let value = parse_response(ResponseKind::OptimalCode, &raw);

        if let Some(object) = value.as_object() {
            if !object.contains_key("error") {
                let missing: Vec<&str> = OPTIMAL_CODE_KEYS
                    .iter()
                    .copied()
                    .filter(|key| !object.contains_key(*key))
                    .collect();
                if !missing.is_empty() {
                    warn!("Optimal code reply is missing keys: {}", missing.join(", "));
                }
            }
        }

        value
    }

    /// Titles of similar problems
    pub async fn similar_problems(&self, problem_title: &str) -> Value {
        let raw = self
            .complete(&prompt_builder::similar_problems_prompt(problem_title))
            .await;
        parse_response(ResponseKind::SimilarProblems, &raw)
    }

    /// Companies that asked the problem, as `{name, year}` objects
    pub async fn companies_asked(&self, problem_title: &str) -> Value {
        let raw = self
            .complete(&prompt_builder::companies_asked_prompt(problem_title))
            .await;
        parse_response(ResponseKind::CompaniesAsked, &raw)
    }

    /// One model round trip; failures become the sentinel text
    async fn complete(&self, prompt: &str) -> String {
        match self.provider.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("{} call failed: {}", self.provider.provider_name(), e);
                sentinel::MODEL_UNAVAILABLE.to_string()
            }
        }
    }
}
