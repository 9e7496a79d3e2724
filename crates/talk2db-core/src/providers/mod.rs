use crate::config::{self, ProviderSettings};
use crate::errors::{ConfigError, Result};
use crate::model::TranslationResult;
use crate::prompt::PromptBuilder;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

pub mod fake;
pub mod hosted;
pub mod openai;

pub use fake::FakeProvider;
pub use hosted::HostedInferenceClient;
pub use openai::ChatCompletionClient;

/// Turns a question plus schema context into raw model output.
///
/// One call, no retries. Each implementation builds its own prompt shape.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, question: &str, schema: &str) -> Result<TranslationResult>;

    fn provider_name(&self) -> &'static str;

    fn model(&self) -> &str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Chat-completion API (system + user messages)
    #[default]
    Chat,
    /// Hosted text-generation endpoint (`{"inputs": prompt}`)
    Hosted,
    /// Canned reply, no network
    Fake,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Chat => "chat",
            ProviderKind::Hosted => "hosted",
            ProviderKind::Fake => "fake",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chat" | "openai" | "oai" => Ok(ProviderKind::Chat),
            "hosted" | "hf" | "huggingface" => Ok(ProviderKind::Hosted),
            "fake" => Ok(ProviderKind::Fake),
            other => Err(format!(
                "unknown provider '{}' (expected chat|hosted|fake)",
                other
            )),
        }
    }
}

/// Pick and construct the configured provider. Done once, at startup.
pub fn from_settings(
    settings: &ProviderSettings,
    prompts: PromptBuilder,
) -> std::result::Result<Arc<dyn TranslationProvider>, ConfigError> {
    let require = |value: &Option<String>, key: &str| {
        value
            .clone()
            .ok_or_else(|| ConfigError(format!("{} must be set for the {} provider", key, settings.kind.as_str())))
    };

    let provider: Arc<dyn TranslationProvider> = match settings.kind {
        ProviderKind::Hosted => Arc::new(HostedInferenceClient::new(
            require(&settings.hosted_url, config::ENV_HF_API_URL)?,
            require(&settings.hosted_token, config::ENV_HF_API_TOKEN)?,
            prompts,
        )),
        ProviderKind::Chat => {
            let mut client = ChatCompletionClient::new(
                settings.chat_model.clone(),
                require(&settings.chat_token, config::ENV_OAI_API_TOKEN)?,
                prompts,
            );
            if let Some(base) = &settings.chat_base_url {
                client = client.with_base_url(base.as_str());
            }
            Arc::new(client)
        }
        ProviderKind::Fake => {
            Arc::new(FakeProvider::new(settings.fake_reply.clone()).with_prompts(prompts))
        }
    };

    tracing::info!(
        event = "provider_selected",
        provider = provider.provider_name(),
        model = provider.model()
    );
    Ok(provider)
}
