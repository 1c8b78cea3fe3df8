//! OpenAI chat-based script extraction.

use super::ScriptExtractor;
use crate::analysis::{analysis_schema, ScriptAnalysis};
use crate::config::Prompts;
use crate::error::{Result, SelgError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    ResponseFormatJsonSchema,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Script extractor backed by OpenAI chat completions with a strict
/// response schema.
pub struct OpenAiExtractor {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    prompts: Prompts,
}

impl OpenAiExtractor {
    /// Create an extractor with default model and prompts.
    pub fn new() -> Self {
        Self::with_config("gpt-4o-mini", 0.3, Prompts::default())
    }

    /// Create an extractor with custom configuration.
    pub fn with_config(model: &str, temperature: f32, prompts: Prompts) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            temperature,
            prompts,
        }
    }

    fn response_format() -> ResponseFormat {
        ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                name: "vsl_script_analysis".to_string(),
                description: Some(
                    "Structured analysis of a video sales letter script".to_string(),
                ),
                schema: Some(analysis_schema()),
                strict: Some(true),
            },
        }
    }
}

impl Default for OpenAiExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScriptExtractor for OpenAiExtractor {
    #[instrument(skip(self, transcript), fields(transcript_chars = transcript.len()))]
    async fn extract(&self, transcript: &str) -> Result<ScriptAnalysis> {
        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), transcript.to_string());

        let system_message = self
            .prompts
            .render_with_custom(&self.prompts.analysis.system, &vars);
        let user_message = self
            .prompts
            .render_with_custom(&self.prompts.analysis.user, &vars);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_message)
                .build()
                .map_err(|e| SelgError::OpenAI(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()
                .map_err(|e| SelgError::OpenAI(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .response_format(Self::response_format())
            .build()
            .map_err(|e| SelgError::OpenAI(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            SelgError::OpenAI(format!("Failed to get analysis response: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SelgError::OpenAI("Empty response from model".to_string()))?;

        debug!("Model returned {} bytes of analysis JSON", content.len());

        ScriptAnalysis::from_model_response(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_format_is_strict_json_schema() {
        match OpenAiExtractor::response_format() {
            ResponseFormat::JsonSchema { json_schema } => {
                assert_eq!(json_schema.name, "vsl_script_analysis");
                assert_eq!(json_schema.strict, Some(true));
                assert!(json_schema.schema.is_some());
            }
            other => panic!("unexpected response format: {:?}", other),
        }
    }
}
