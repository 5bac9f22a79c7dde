//! Scripted providers for handler and assistant tests

use crate::core::provider::{GenerationProvider, ProviderError, VideoSearch};
use async_trait::async_trait;
use std::sync::Mutex;

/// Generation provider that replays a fixed reply and records prompts
pub struct ScriptedProvider {
    reply: Result<String, u16>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    /// Always answers with `text`
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with the given HTTP status
    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(ProviderError::from_status(*status, "scripted failure".into())),
        }
    }

    fn provider_name(&self) -> &str {
        "Scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// Video search with a canned outcome
pub enum ScriptedSearch {
    Found(String),
    NotFound,
    Failing(String),
}

#[async_trait]
impl VideoSearch for ScriptedSearch {
    async fn first_video_id(&self, _query: &str) -> Result<Option<String>, ProviderError> {
        match self {
            ScriptedSearch::Found(id) => Ok(Some(id.clone())),
            ScriptedSearch::NotFound => Ok(None),
            ScriptedSearch::Failing(message) => Err(ProviderError::Transport(message.clone())),
        }
    }
}
