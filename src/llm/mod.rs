//! LLM completion providers and the assistant prompt

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::Result;
use crate::config::LlmConfig;

pub mod gemini;

pub use gemini::GeminiClient;

/// A text completion backend
#[async_trait]
pub trait CompletionModel: Send + Sync {
    fn name(&self) -> &str;

    /// Complete a fully rendered prompt
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Construct the configured model; `None` when it cannot be initialized
pub fn from_config(config: &LlmConfig) -> Option<Arc<dyn CompletionModel>> {
    match GeminiClient::new(config) {
        Ok(client) => {
            info!("Gemini client initialized with model {}", config.model);
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("LLM client not initialized: {}", e);
            None
        }
    }
}

const ASSISTANT_TEMPLATE: &str = "You are LocalConnect AI, an intelligent assistant specializing in local services. \
Your goal is to provide helpful information, especially regarding local businesses, \
services, and general knowledge, considering the user's location if provided. \
If the query is a general question, answer it directly.\n\n\
User's Current/Requested Location: {location_info}\n\
User Query: {query}\n\n\
Response:";

/// Prompt with the two named slots `location_info` and `query`
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(ASSISTANT_TEMPLATE)
    }
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    #[must_use]
    pub fn render(&self, location_info: &str, query: &str) -> String {
        self.template
            .replace("{location_info}", location_info)
            .replace("{query}", query)
    }
}
