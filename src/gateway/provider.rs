//! Core `Provider` trait, provider selection, and the `Gateway` façade.
//!
//! [`Provider`] is the per-backend wire contract: shape one chat or
//! translation request, normalise the response or failure. Selection is a
//! pure function of [`ProviderKind`] ([`make_provider`]) — call sites never
//! branch on the provider themselves.
//!
//! [`Gateway`] is what the session controller talks to. It owns the
//! provider, windows the conversation history into the outbound prompt,
//! and downgrades translation failures to the identity translation so a
//! word lookup can never take the session down.

use async_trait::async_trait;

use crate::chat::{ConversationHistory, Message};
use crate::config::{AppConfig, LanguagePair, ProviderConfig, ProviderKind};
use crate::gateway::chat_api::ChatCompletionsProvider;
use crate::gateway::error::GatewayError;
use crate::gateway::huggingface::HuggingFaceProvider;
use crate::gateway::prompt::DEFAULT_SYSTEM_PROMPT;

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async interface implemented by every backend.
///
/// Implementors must be `Send + Sync` so they can be held behind a
/// `Box<dyn Provider>` and called from the async runtime.
///
/// Both methods receive fully prepared inputs: `chat` gets the already
/// windowed prompt (system message first), `translate` gets a single word
/// plus the translation direction.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send the windowed prompt, return the assistant's reply text.
    async fn chat(&self, prompt: &[Message]) -> Result<String, GatewayError>;

    /// Translate a single word along the given language pair.
    async fn translate(
        &self,
        word: &str,
        pair: &LanguagePair,
    ) -> Result<String, GatewayError>;
}

// Compile-time assertion: Box<dyn Provider> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Provider>) {}
};

// ---------------------------------------------------------------------------
// Provider selection
// ---------------------------------------------------------------------------

/// Build the backend for a provider config. Pure function of `kind`:
/// groq-like and openai-like hosts share the chat-completions
/// implementation (their differences are configuration), huggingface-like
/// hosts get the inference-API implementation.
pub fn make_provider(config: &ProviderConfig) -> Box<dyn Provider> {
    match config.kind {
        ProviderKind::Groq | ProviderKind::OpenAi => {
            Box::new(ChatCompletionsProvider::from_config(config))
        }
        ProviderKind::HuggingFace => Box::new(HuggingFaceProvider::from_config(config)),
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Provider-agnostic entry point for chat and word translation.
///
/// Switching providers mid-session means building a new `Gateway`; the
/// conversation history lives outside and is unaffected.
pub struct Gateway {
    provider: Box<dyn Provider>,
    system_prompt: String,
    window: usize,
    languages: LanguagePair,
}

impl Gateway {
    /// Assemble a gateway from its parts. Useful for tests and custom
    /// backends; production code goes through [`Gateway::from_config`].
    pub fn new(
        provider: Box<dyn Provider>,
        window: usize,
        system_prompt: String,
        languages: LanguagePair,
    ) -> Self {
        Self {
            provider,
            system_prompt,
            window,
            languages,
        }
    }

    /// Build the gateway the application config describes.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            make_provider(&config.provider),
            config.provider.history_window(),
            config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            config.languages.clone(),
        )
    }

    /// Send one chat turn.
    ///
    /// The newest user message must already be appended to `history`; the
    /// windowed prompt (one system message + the last `window` entries) is
    /// built here so every provider sees the same bounded view.
    pub async fn chat(&self, history: &ConversationHistory) -> Result<String, GatewayError> {
        let prompt = history.windowed_prompt(&self.system_prompt, self.window);
        self.provider.chat(&prompt).await
    }

    /// Translate a single word.
    ///
    /// Never fails: on any gateway error the original word is returned
    /// unchanged and the failure is logged as a warning. A lookup popup
    /// showing the untranslated word beats an error dialog.
    pub async fn translate(&self, word: &str) -> String {
        match self.provider.translate(word, &self.languages).await {
            Ok(translation) => translation,
            Err(e) => {
                log::warn!("word translation failed ({e}); returning {word:?} unchanged");
                word.to_string()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
