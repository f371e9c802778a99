//! Mock generators and fixtures

use super::{GenerationRequest, Generator};
use crate::engine::{DonationContext, SentimentLabel, Strategy};
use crate::llm::LlmError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

pub fn sample_context() -> DonationContext {
    DonationContext {
        organization: "Hope Trust".to_string(),
        cause: "child literacy".to_string(),
        amounts: "500, 1000, 2500".to_string(),
        impact: "₹500 buys books for 5 children".to_string(),
    }
}

pub fn sample_request(strategy: Strategy, recovery: bool) -> GenerationRequest {
    GenerationRequest {
        strategy,
        user_text: "tell me more".to_string(),
        turn: 1,
        recovery,
        sentiment: SentimentLabel::Neutral,
        recent: Vec::new(),
        context: sample_context(),
    }
}

/// Returns queued replies in order, recording every request. When the
/// queue runs dry it echoes the strategy name.
#[derive(Default)]
pub struct MockGenerator {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_reply(&self, text: &str) {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("[{}] reply", request.strategy)))
    }
}

/// Always fails
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, LlmError> {
        Err(LlmError::network("generator offline"))
    }
}
