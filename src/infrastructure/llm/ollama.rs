use async_trait::async_trait;
use futures::StreamExt;
use rig::agent::MultiTurnStreamItem;
use rig::client::{CompletionClient, Nothing, ProviderClient};
use rig::message::Text;
use rig::providers::ollama;
use rig::streaming::{StreamedAssistantContent, StreamingPrompt};

use crate::domain::ports::{AnswerStream, ChatModel};
use crate::domain::RagError;
use crate::infrastructure::config::{LlmConfig, DEFAULT_LLM_MODEL};

/// Chat adapter that streams completions from a locally running Ollama model.
pub struct OllamaChat {
    model: String,
    temperature: f64,
}

impl OllamaChat {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.3,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

impl Default for OllamaChat {
    fn default() -> Self {
        Self::new(DEFAULT_LLM_MODEL)
    }
}

#[async_trait]
impl ChatModel for OllamaChat {
    async fn stream_answer(&self, system: &str, prompt: &str) -> Result<AnswerStream, RagError> {
        let model = self.model.clone();
        let temperature = self.temperature;
        let system = system.to_string();
        let prompt = prompt.to_string();

        // The generator owns the agent for as long as the consumer keeps
        // polling; dropping the stream abandons the completion.
        let increments = async_stream::stream! {
            let client = ollama::Client::from_val(Nothing);
            let agent = client
                .agent(&model)
                .preamble(&system)
                .temperature(temperature)
                .build();

            let mut inner = agent.stream_prompt(prompt).await;
            while let Some(item) = inner.next().await {
                match item {
                    Ok(MultiTurnStreamItem::StreamAssistantItem(StreamedAssistantContent::Text(
                        Text { text },
                    ))) => yield Ok(text),
                    // The final aggregated response repeats the streamed
                    // text; it only marks termination.
                    Ok(_) => {}
                    Err(err) => {
                        yield Err(RagError::service_unavailable(err.to_string()));
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(increments))
    }
}
