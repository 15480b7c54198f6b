//! Scripted `TextGenerator` for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmError, TextGenerator};

/// Replays queued replies in order and records every prompt and token budget
/// it receives.
/// Once the queue is exhausted every further call fails with `EmptyContent`.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, u16>>>,
    prompts: Mutex<Vec<String>>,
    token_budgets: Mutex<Vec<u32>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Ok(text.to_string()))
    }

    /// Queues a transport failure with the given HTTP status.
    pub fn fail(self, status: u16) -> Self {
        self.push(Err(status))
    }

    fn push(self, item: Result<String, u16>) -> Self {
        self.replies
            .lock()
            .expect("replies lock poisoned")
            .push_back(item);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock poisoned").clone()
    }

    pub fn token_budgets(&self) -> Vec<u32> {
        self.token_budgets
            .lock()
            .expect("token budgets lock poisoned")
            .clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        self.token_budgets
            .lock()
            .expect("token budgets lock poisoned")
            .push(max_tokens);
        self.prompts
            .lock()
            .expect("prompts lock poisoned")
            .push(prompt.to_string());
        let next = self
            .replies
            .lock()
            .expect("replies lock poisoned")
            .pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(status)) => Err(LlmError::Api {
                status,
                message: "scripted failure".to_string(),
            }),
            None => Err(LlmError::EmptyContent),
        }
    }
}
