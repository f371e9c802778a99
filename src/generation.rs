//! Utterance generation for the agent side of a dialogue
//!
//! The engine only sees [`Generator`]: given a strategy and the
//! conversation so far, produce one utterance or fail. Failures are
//! absorbed by the caller with deterministic [`fallback`] lines.

pub mod fallback;
mod prompts;

#[cfg(test)]
pub(crate) mod testing;

use crate::engine::{DonationContext, SentimentLabel, Strategy};
use crate::llm::{LlmConfig, LlmError, LlmRequest, LlmService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

const SYSTEM_PROMPT: &str = "You are a helpful, polite fundraising assistant.";

/// One completed user/agent round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub user: String,
    pub agent: String,
}

/// Everything a generator may condition on for one agent turn
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub strategy: Strategy,
    pub user_text: String,
    pub turn: u32,
    pub recovery: bool,
    pub sentiment: SentimentLabel,
    /// Most recent exchanges, oldest first
    pub recent: Vec<Exchange>,
    pub context: DonationContext,
}

#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;
}

/// Generator backed by a hosted chat model
pub struct LlmGenerator {
    service: Arc<dyn LlmService>,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
}

impl LlmGenerator {
    pub fn new(service: Arc<dyn LlmService>, config: &LlmConfig) -> Self {
        Self {
            service,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: config.timeout,
        }
    }

    fn build_request(&self, request: &GenerationRequest) -> LlmRequest {
        let prompt = if request.recovery {
            prompts::recovery_prompt(request)
        } else {
            prompts::strategy_prompt(request)
        };
        LlmRequest::single_turn(SYSTEM_PROMPT, prompt).with_sampling(self.max_tokens, self.temperature)
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let llm_request = self.build_request(request);

        let response = timeout(self.timeout, self.service.complete(&llm_request))
            .await
            .map_err(|_| {
                LlmError::timeout(format!(
                    "Generation exceeded {}ms",
                    self.timeout.as_millis()
                ))
            })??;

        let text = response.text.trim();
        if text.is_empty() {
            return Err(LlmError::empty("Model returned an empty utterance"));
        }
        Ok(text.to_string())
    }
}
