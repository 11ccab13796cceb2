//! Hugging Face Inference API provider.
//!
//! Chat rides the text-generation task: the windowed prompt is flattened
//! into a single `inputs` transcript (see [`flatten_prompt`]) and the reply
//! is read from `[0].generated_text`. Word translation goes to a dedicated
//! Helsinki-NLP opus-mt model chosen from the configured language pair —
//! no prompt engineering, just `{"inputs": word}`.

use async_trait::async_trait;
use serde_json::Value;

use crate::chat::Message;
use crate::config::{LanguagePair, ProviderConfig};
use crate::gateway::error::GatewayError;
use crate::gateway::prompt::flatten_prompt;
use crate::gateway::provider::Provider;

// ---------------------------------------------------------------------------
// HuggingFaceProvider
// ---------------------------------------------------------------------------

/// Calls the Hugging Face Inference API (`/models/{model}` endpoints).
pub struct HuggingFaceProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl HuggingFaceProvider {
    /// Build a provider from config, with the per-request timeout applied.
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

    fn model_endpoint(&self, model: &str) -> String {
        format!("{}/models/{}", self.config.base_url(), model)
    }

    /// POST `body` to a model endpoint, normalise HTTP failures, return the
    /// decoded JSON.
    async fn post_inference(&self, url: String, body: Value) -> Result<Value, GatewayError> {
        let mut req = self.client.post(url).json(&body);

        if let Some(key) = self.config.credential() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::from_status(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl Provider for HuggingFaceProvider {
    async fn chat(&self, prompt: &[Message]) -> Result<String, GatewayError> {
        let inputs = flatten_prompt(prompt);

        let body = serde_json::json!({
            "inputs": inputs,
            "parameters": {
                "max_new_tokens":   self.config.max_tokens(),
                "temperature":      self.config.temperature,
                "return_full_text": false,
            }
        });

        let url = self.model_endpoint(self.config.model());
        let json = self.post_inference(url, body).await?;

        generated_text(&json, &inputs)
    }

    async fn translate(
        &self,
        word: &str,
        pair: &LanguagePair,
    ) -> Result<String, GatewayError> {
        let body = serde_json::json!({ "inputs": word });

        let url = self.model_endpoint(&pair.opus_mt_model());
        let json = self.post_inference(url, body).await?;

        translation_text(&json)
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Extract `[0].generated_text`. Some deployments ignore
/// `return_full_text: false` and echo the prompt — strip it when present.
/// A reported `error` field or a missing/empty text is a malformed response.
fn generated_text(json: &Value, prompt: &str) -> Result<String, GatewayError> {
    if let Some(error) = json["error"].as_str() {
        return Err(GatewayError::MalformedResponse(format!(
            "provider reported: {error}"
        )));
    }

    let text = json[0]["generated_text"]
        .as_str()
        .ok_or_else(|| GatewayError::MalformedResponse("missing [0].generated_text".into()))?;

    let text = text.strip_prefix(prompt).unwrap_or(text).trim().to_string();

    if text.is_empty() {
        return Err(GatewayError::MalformedResponse(
            "empty generated_text".into(),
        ));
    }

    Ok(text)
}

/// Extract `[0].translation_text` from an opus-mt response.
fn translation_text(json: &Value) -> Result<String, GatewayError> {
    let text = json[0]["translation_text"]
        .as_str()
        .ok_or_else(|| GatewayError::MalformedResponse("missing [0].translation_text".into()))?
        .trim()
        .to_string();

    if text.is_empty() {
        return Err(GatewayError::MalformedResponse(
            "empty translation_text".into(),
        ));
    }

    Ok(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    fn hf_config() -> ProviderConfig {
        ProviderConfig {
            kind: ProviderKind::HuggingFace,
            api_key: Some("hf_test".into()),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn model_endpoint_joins_base_and_model() {
        let provider = HuggingFaceProvider::from_config(&hf_config());
        assert_eq!(
            provider.model_endpoint("microsoft/DialoGPT-medium"),
            "https://api-inference.huggingface.co/models/microsoft/DialoGPT-medium"
        );
    }

    #[test]
    fn translation_endpoint_follows_language_pair() {
        let provider = HuggingFaceProvider::from_config(&hf_config());
        let pair = LanguagePair {
            source: "en".into(),
            target: "pl".into(),
        };
        assert_eq!(
            provider.model_endpoint(&pair.opus_mt_model()),
            "https://api-inference.huggingface.co/models/Helsinki-NLP/opus-mt-en-pl"
        );
    }

    #[test]
    fn parses_generated_text() {
        let json = serde_json::json!([ { "generated_text": "  Cześć!  " } ]);
        assert_eq!(generated_text(&json, "prompt").unwrap(), "Cześć!");
    }

    #[test]
    fn strips_echoed_prompt_prefix() {
        let json = serde_json::json!([ { "generated_text": "User: hi\nAssistant: hello" } ]);
        assert_eq!(
            generated_text(&json, "User: hi\nAssistant:").unwrap(),
            "hello"
        );
    }

    #[test]
    fn provider_reported_error_is_malformed() {
        let json = serde_json::json!({ "error": "model is loading" });
        match generated_text(&json, "") {
            Err(GatewayError::MalformedResponse(detail)) => {
                assert!(detail.contains("model is loading"));
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn missing_generated_text_is_malformed() {
        let json = serde_json::json!([ {} ]);
        assert!(matches!(
            generated_text(&json, ""),
            Err(GatewayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn parses_translation_text() {
        let json = serde_json::json!([ { "translation_text": "pies" } ]);
        assert_eq!(translation_text(&json).unwrap(), "pies");
    }

    #[test]
    fn missing_translation_text_is_malformed() {
        let json = serde_json::json!([]);
        assert!(matches!(
            translation_text(&json),
            Err(GatewayError::MalformedResponse(_))
        ));
    }
}
