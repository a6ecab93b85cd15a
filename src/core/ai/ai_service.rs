use super::models::{
    AiConfig, AiError, AiMessage, CompletionRequest, SummaryMethod, SummaryOutcome, WritingModel,
};
use crate::core::summary;
use async_trait::async_trait;
use tokio::sync::Semaphore;

/// Token budget and temperature for model-backed summaries.
const SUMMARY_MAX_TOKENS: u32 = 500;
const SUMMARY_TEMPERATURE: f32 = 0.3;

#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Sends a chat completion request and returns the first choice's text.
    async fn chat_complete(&self, request: &CompletionRequest) -> Result<String, AiError>;
}

// Blanket implementation for Box<dyn AiProvider>
// This lets the composition root pick the concrete client at runtime
// while the service stays generic (tests plug in a scripted provider).
#[async_trait]
impl AiProvider for Box<dyn AiProvider> {
    async fn chat_complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
        (**self).chat_complete(request).await
    }
}

/// Wraps an optional provider with the writer persona, generation defaults
/// and a bounded pool of in-flight provider calls.
pub struct AiService<P: AiProvider> {
    provider: Option<P>,
    system_prompt: String,
    config: AiConfig,
    permits: Semaphore,
}

impl<P: AiProvider> AiService<P> {
    /// `provider` is `None` when no credential is configured; every call then
    /// fails with `AiError::NotConfigured` and summaries stay extractive.
    pub fn new(
        provider: Option<P>,
        system_prompt: String,
        config: AiConfig,
        max_concurrency: usize,
    ) -> Self {
        Self {
            provider,
            system_prompt,
            config,
            permits: Semaphore::new(max_concurrency.max(1)),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, AiError> {
        let provider = self.provider.as_ref().ok_or(AiError::NotConfigured)?;

        // Held until the provider answers.
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AiError::PoolClosed)?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Calling AI provider"
        );

        let content = provider.chat_complete(&request).await?;

        tracing::debug!(chars = content.len(), "AI provider responded");
        Ok(content)
    }

    /// Generates prose for `prompt` in the writer persona.
    pub async fn write(&self, prompt: &str, model: WritingModel) -> Result<String, AiError> {
        let request = CompletionRequest {
            model: model.provider_id().to_string(),
            messages: vec![
                AiMessage::system(self.system_prompt.clone()),
                AiMessage::user(prompt),
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            top_p: self.config.top_p,
        };

        self.complete(request).await
    }

    /// Raw completion over caller-supplied messages. No persona is injected.
    pub async fn chat(
        &self,
        messages: Vec<AiMessage>,
        model: WritingModel,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<String, AiError> {
        let request = CompletionRequest {
            model: model.provider_id().to_string(),
            messages,
            temperature: temperature.unwrap_or(self.config.temperature),
            max_tokens: max_tokens.or(self.config.max_tokens),
            top_p: self.config.top_p,
        };

        self.complete(request).await
    }

    /// Summarizes with the provider when a model is requested and available,
    /// otherwise (or on any provider failure) with the extractive summarizer.
    pub async fn summarize(
        &self,
        text: &str,
        max_length: usize,
        model: Option<WritingModel>,
    ) -> SummaryOutcome {
        if let Some(model) = model {
            if self.is_configured() {
                match self.summarize_with_model(text, max_length, model).await {
                    Ok(summary) => {
                        return SummaryOutcome {
                            summary,
                            method: SummaryMethod::Model,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, model = %model, "Model summary failed, using extractive summary");
                    }
                }
            }
        }

        SummaryOutcome {
            summary: summary::summarize(text, max_length),
            method: SummaryMethod::Extractive,
        }
    }

    async fn summarize_with_model(
        &self,
        text: &str,
        max_length: usize,
        model: WritingModel,
    ) -> Result<String, AiError> {
        let request = CompletionRequest {
            model: model.provider_id().to_string(),
            messages: vec![
                AiMessage::system(
                    "You summarize text faithfully. Reply with the summary only.",
                ),
                AiMessage::user(format!(
                    "Summarize the following text in at most {} characters:\n\n{}",
                    max_length, text
                )),
            ],
            temperature: SUMMARY_TEMPERATURE,
            max_tokens: Some(SUMMARY_MAX_TOKENS),
            top_p: None,
        };

        let summary = self.complete(request).await?;
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(AiError::InvalidResponse("empty summary".to_string()));
        }
        Ok(summary.to_string())
    }
}
