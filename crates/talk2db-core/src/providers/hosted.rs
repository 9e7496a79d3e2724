use super::TranslationProvider;
use crate::errors::{Result, Talk2DbError};
use crate::model::TranslationResult;
use crate::prompt::PromptBuilder;
use async_trait::async_trait;
use serde_json::json;

const PROVIDER: &str = "hosted";

/// Hosted text-generation endpoint (Hugging Face inference style).
///
/// Sends `{"inputs": prompt}` with a bearer token and reads
/// `[0].generated_text` from the response.
pub struct HostedInferenceClient {
    pub url: String,
    pub api_token: String,
    prompts: PromptBuilder,
    client: reqwest::Client,
}

impl HostedInferenceClient {
    pub fn new(url: String, api_token: String, prompts: PromptBuilder) -> Self {
        Self {
            url,
            api_token,
            prompts,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TranslationProvider for HostedInferenceClient {
    async fn translate(&self, question: &str, schema: &str) -> Result<TranslationResult> {
        let prompt = self.prompts.instruction_prompt(question, schema);

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_token)
            .json(&json!({ "inputs": prompt }))
            .send()
            .await
            .map_err(|e| Talk2DbError::provider(PROVIDER, format!("request failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Talk2DbError::provider(PROVIDER, format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::error!(event = "provider_status", provider = PROVIDER, %status, body = %body);
            return Err(Talk2DbError::provider(
                PROVIDER,
                format!("inference API error {}: {}", status, body),
            ));
        }

        let json: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            Talk2DbError::provider(PROVIDER, format!("failed to parse response: {}", e))
        })?;

        let text = json
            .pointer("/0/generated_text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                Talk2DbError::provider(PROVIDER, "response missing [0].generated_text")
            })?
            .to_string();

        Ok(TranslationResult {
            text,
            provider: PROVIDER,
            model: self.url.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.url
    }
}
