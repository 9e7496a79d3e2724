use super::TranslationProvider;
use crate::errors::{Result, Talk2DbError};
use crate::model::TranslationResult;
use crate::prompt::PromptBuilder;
use async_trait::async_trait;
use std::sync::Mutex;

const PROVIDER: &str = "fake";

/// Returns a canned reply and remembers every prompt it was given.
pub struct FakeProvider {
    reply: std::result::Result<String, String>,
    prompts: PromptBuilder,
    seen: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            prompts: PromptBuilder::default(),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with a provider error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            prompts: PromptBuilder::default(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_prompts(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    /// Prompts received so far, oldest first.
    pub fn seen_prompts(&self) -> Vec<String> {
        self.seen.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TranslationProvider for FakeProvider {
    async fn translate(&self, question: &str, schema: &str) -> Result<TranslationResult> {
        let prompt = self.prompts.instruction_prompt(question, schema);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(prompt);
        }

        match &self.reply {
            Ok(text) => Ok(TranslationResult {
                text: text.clone(),
                provider: PROVIDER,
                model: "fake".to_string(),
            }),
            Err(message) => Err(Talk2DbError::provider(PROVIDER, message.clone())),
        }
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        "fake"
    }
}
