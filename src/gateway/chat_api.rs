//! Chat-completions provider — groq-like and openai-like backends.
//!
//! [`ChatCompletionsProvider`] speaks the OpenAI `/chat/completions` wire
//! format. Groq and OpenAI differ only in endpoint, model and history
//! window, all of which resolve through [`ProviderConfig`], so both kinds
//! share this one implementation — adding another compatible host means
//! adding configuration, not code.
//!
//! Word translation on these backends is a constrained chat call: a
//! translator system prompt, a tight token budget and a low temperature.

use async_trait::async_trait;
use serde_json::Value;

use crate::chat::Message;
use crate::config::{LanguagePair, ProviderConfig};
use crate::gateway::error::GatewayError;
use crate::gateway::prompt::{translation_request, translation_system_prompt};
use crate::gateway::provider::Provider;

/// Token budget for a word translation reply.
const TRANSLATE_MAX_TOKENS: u32 = 50;
/// Sampling temperature for word translation — near-deterministic.
const TRANSLATE_TEMPERATURE: f32 = 0.3;

// ---------------------------------------------------------------------------
// ChatCompletionsProvider
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/chat/completions` endpoint.
///
/// Works with Groq, OpenAI, and any other host speaking the same format;
/// all connection details come from the [`ProviderConfig`].
pub struct ChatCompletionsProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl ChatCompletionsProvider {
    /// Build a provider from config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`. A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &ProviderConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url())
    }

    /// Request body for a tutor chat turn.
    fn chat_body(&self, prompt: &[Message]) -> Value {
        serde_json::json!({
            "model":       self.config.model(),
            "messages":    prompt,
            "max_tokens":  self.config.max_tokens(),
            "temperature": self.config.temperature,
        })
    }

    /// Request body for a constrained word-translation turn.
    fn translate_body(&self, word: &str, pair: &LanguagePair) -> Value {
        serde_json::json!({
            "model": self.config.model(),
            "messages": [
                { "role": "system", "content": translation_system_prompt(pair) },
                { "role": "user",   "content": translation_request(word)       },
            ],
            "max_tokens":  TRANSLATE_MAX_TOKENS,
            "temperature": TRANSLATE_TEMPERATURE,
        })
    }

    /// POST `body`, normalise HTTP failures, and extract the first
    /// completion's text.
    async fn complete(&self, body: Value) -> Result<String, GatewayError> {
        let mut req = self.client.post(self.endpoint()).json(&body);

        if let Some(key) = self.config.credential() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::from_status(status.as_u16(), body));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        first_choice_content(&json)
    }
}

#[async_trait]
impl Provider for ChatCompletionsProvider {
    async fn chat(&self, prompt: &[Message]) -> Result<String, GatewayError> {
        self.complete(self.chat_body(prompt)).await
    }

    async fn translate(
        &self,
        word: &str,
        pair: &LanguagePair,
    ) -> Result<String, GatewayError> {
        self.complete(self.translate_body(word, pair)).await
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Extract `choices[0].message.content`, trimmed. An absent or empty field
/// is a malformed response, never an empty success.
fn first_choice_content(json: &Value) -> Result<String, GatewayError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| {
            GatewayError::MalformedResponse("missing choices[0].message.content".into())
        })?
        .trim()
        .to_string();

    if content.is_empty() {
        return Err(GatewayError::MalformedResponse(
            "empty completion content".into(),
        ));
    }

    Ok(content)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
