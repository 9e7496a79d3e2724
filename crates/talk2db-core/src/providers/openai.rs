use super::TranslationProvider;
use crate::errors::{Result, Talk2DbError};
use crate::model::TranslationResult;
use crate::prompt::PromptBuilder;
use async_trait::async_trait;
use serde_json::json;

const PROVIDER: &str = "openai";

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat-completion client.
pub struct ChatCompletionClient {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub temperature: f32,
    prompts: PromptBuilder,
    client: reqwest::Client,
}

impl ChatCompletionClient {
    pub fn new(model: String, api_key: String, prompts: PromptBuilder) -> Self {
        Self {
            model,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.0,
            prompts,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl TranslationProvider for ChatCompletionClient {
    async fn translate(&self, question: &str, schema: &str) -> Result<TranslationResult> {
        let url = format!("{}/chat/completions", self.base_url);
        let prompt = self.prompts.chat_prompt(question, schema);

        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": self.temperature,
        });

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Talk2DbError::provider(PROVIDER, format!("request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            tracing::error!(event = "provider_status", provider = PROVIDER, %status, body = %error_text);
            return Err(Talk2DbError::provider(
                PROVIDER,
                format!("chat API error {}: {}", status, error_text),
            ));
        }

        let json: serde_json::Value = resp.json().await.map_err(|e| {
            Talk2DbError::provider(PROVIDER, format!("failed to parse response: {}", e))
        })?;

        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Talk2DbError::provider(PROVIDER, "response missing message content"))?
            .to_string();

        Ok(TranslationResult {
            text,
            provider: PROVIDER,
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }
}
