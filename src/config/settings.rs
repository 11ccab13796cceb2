//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! Saving [`AppConfig`] also persists the last-used credential/provider pair,
//! so a returning user does not have to re-enter the API key.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ProviderKind
// ---------------------------------------------------------------------------

/// Selects which LLM/translation backend handles chat and word lookup.
///
/// | Variant     | Wire protocol                    | Translation path        |
/// |-------------|----------------------------------|-------------------------|
/// | Groq        | OpenAI chat-completions          | constrained chat prompt |
/// | HuggingFace | Inference API text-generation    | opus-mt model           |
/// | OpenAi      | OpenAI chat-completions          | constrained chat prompt |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Groq cloud — fast llama-family models behind the OpenAI wire format.
    Groq,
    /// Hugging Face Inference API — text-generation models plus dedicated
    /// translation models (Helsinki-NLP opus-mt family).
    HuggingFace,
    /// OpenAI, or any other host speaking the same chat-completions format.
    OpenAi,
}

impl Default for ProviderKind {
    fn default() -> Self {
        Self::Groq
    }
}

impl ProviderKind {
    /// Base URL used when the config does not override it.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
            ProviderKind::HuggingFace => "https://api-inference.huggingface.co",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
        }
    }

    /// Model identifier used when the config does not override it.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "llama3-8b-8192",
            ProviderKind::HuggingFace => "microsoft/DialoGPT-medium",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }

    /// How many history entries the windowed prompt keeps for this backend.
    ///
    /// Text-generation backends get a smaller window because the whole
    /// transcript is flattened into a single `inputs` string.
    pub fn default_history_window(&self) -> usize {
        match self {
            ProviderKind::Groq | ProviderKind::OpenAi => 10,
            ProviderKind::HuggingFace => 6,
        }
    }

    /// Token budget for a chat reply when the config does not override it.
    pub fn default_max_tokens(&self) -> u32 {
        match self {
            ProviderKind::Groq | ProviderKind::OpenAi => 500,
            ProviderKind::HuggingFace => 150,
        }
    }

    /// Expected key prefix, when the provider issues keys with one.
    pub fn key_prefix(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Groq => Some("gsk_"),
            ProviderKind::HuggingFace => Some("hf_"),
            ProviderKind::OpenAi => None,
        }
    }

    /// Shape check for a credential string: non-empty, and carrying the
    /// provider's key prefix when there is one. This is a local sanity
    /// check only; the key is actually validated by the remote API.
    pub fn credential_looks_valid(&self, key: &str) -> bool {
        let key = key.trim();
        if key.is_empty() {
            return false;
        }
        match self.key_prefix() {
            Some(prefix) => key.starts_with(prefix),
            None => true,
        }
    }

    /// Human-readable provider name for notifications.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "Groq",
            ProviderKind::HuggingFace => "Hugging Face",
            ProviderKind::OpenAi => "OpenAI",
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderConfig
// ---------------------------------------------------------------------------

/// Settings for the chat/translation gateway.
///
/// `model`, `base_url` and `history_window` are optional overrides; `None`
/// resolves to the per-kind default so that switching `kind` does not leave
/// a stale model identifier behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which backend to use.
    pub kind: ProviderKind,
    /// Bearer credential — `None` until the user saves one.
    pub api_key: Option<String>,
    /// Model identifier override (e.g. `"llama3-8b-8192"`).
    pub model: Option<String>,
    /// Endpoint base URL override.
    pub base_url: Option<String>,
    /// History window override: number of recent entries in the prompt.
    pub history_window: Option<usize>,
    /// Token budget override for a chat reply.
    pub max_tokens: Option<u32>,
    /// Sampling temperature for chat (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a gateway response before timing out.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            api_key: None,
            model: None,
            base_url: None,
            history_window: None,
            max_tokens: None,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

impl ProviderConfig {
    /// Resolved model identifier (override or per-kind default).
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(self.kind.default_model())
    }

    /// Resolved base URL (override or per-kind default).
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(self.kind.default_base_url())
    }

    /// Resolved history window (override or per-kind default).
    pub fn history_window(&self) -> usize {
        self.history_window
            .unwrap_or(self.kind.default_history_window())
    }

    /// Resolved reply token budget (override or per-kind default).
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(self.kind.default_max_tokens())
    }

    /// The trimmed credential, or `None` when absent or blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

// ---------------------------------------------------------------------------
// LanguagePair
// ---------------------------------------------------------------------------

/// The translation direction for word lookup, as ISO-639-1 codes.
///
/// `source` is the language being learned (the assistant's reply language
/// for vocabulary), `target` is the user's native language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Language the looked-up words are in.
    pub source: String,
    /// Language to translate into.
    pub target: String,
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            source: "en".into(),
            target: "pl".into(),
        }
    }
}

impl LanguagePair {
    /// Model identifier of the matching Helsinki-NLP translation model.
    pub fn opus_mt_model(&self) -> String {
        format!("Helsinki-NLP/opus-mt-{}-{}", self.source, self.target)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use language_tutor::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Override for the tutor system prompt. `None` uses the built-in one.
    pub system_prompt: Option<String>,
    /// Gateway/provider settings, including the last-used credential.
    pub provider: ProviderConfig,
    /// Translation direction for word lookup.
    pub languages: LanguagePair,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.provider.kind, ProviderKind::Groq);
        assert!(cfg.provider.api_key.is_none());
        assert_eq!(cfg.provider.model(), "llama3-8b-8192");
        assert_eq!(cfg.provider.base_url(), "https://api.groq.com/openai/v1");
        assert_eq!(cfg.provider.history_window(), 10);
        assert_eq!(cfg.provider.max_tokens(), 500);
        assert_eq!(cfg.languages, LanguagePair::default());
        assert!(cfg.system_prompt.is_none());
    }

    #[test]
    fn per_kind_defaults_resolve() {
        let mut cfg = ProviderConfig::default();

        cfg.kind = ProviderKind::HuggingFace;
        assert_eq!(cfg.model(), "microsoft/DialoGPT-medium");
        assert_eq!(cfg.history_window(), 6);
        assert_eq!(cfg.max_tokens(), 150);

        cfg.kind = ProviderKind::OpenAi;
        assert_eq!(cfg.model(), "gpt-4o-mini");
        assert_eq!(cfg.base_url(), "https://api.openai.com/v1");
        assert_eq!(cfg.history_window(), 10);
    }

    #[test]
    fn overrides_beat_kind_defaults() {
        let cfg = ProviderConfig {
            kind: ProviderKind::Groq,
            model: Some("llama-3.1-70b-versatile".into()),
            base_url: Some("https://proxy.example.com/v1".into()),
            history_window: Some(4),
            ..ProviderConfig::default()
        };

        assert_eq!(cfg.model(), "llama-3.1-70b-versatile");
        assert_eq!(cfg.base_url(), "https://proxy.example.com/v1");
        assert_eq!(cfg.history_window(), 4);
    }

    #[test]
    fn credential_trims_and_rejects_blank() {
        let mut cfg = ProviderConfig::default();
        assert_eq!(cfg.credential(), None);

        cfg.api_key = Some("   ".into());
        assert_eq!(cfg.credential(), None);

        cfg.api_key = Some("  gsk_abc  ".into());
        assert_eq!(cfg.credential(), Some("gsk_abc"));
    }

    #[test]
    fn credential_shape_check_per_kind() {
        assert!(ProviderKind::Groq.credential_looks_valid("gsk_12345"));
        assert!(!ProviderKind::Groq.credential_looks_valid("hf_12345"));
        assert!(!ProviderKind::Groq.credential_looks_valid(""));

        assert!(ProviderKind::HuggingFace.credential_looks_valid("hf_12345"));
        assert!(!ProviderKind::HuggingFace.credential_looks_valid("gsk_1"));

        // OpenAI-style hosts issue keys with varying prefixes — accept any
        // non-empty string.
        assert!(ProviderKind::OpenAi.credential_looks_valid("sk-proj-1"));
        assert!(!ProviderKind::OpenAi.credential_looks_valid("  "));
    }

    #[test]
    fn opus_mt_model_follows_language_pair() {
        let pair = LanguagePair {
            source: "en".into(),
            target: "de".into(),
        };
        assert_eq!(pair.opus_mt_model(), "Helsinki-NLP/opus-mt-en-de");
    }

    /// Verify that a modified `AppConfig` survives a TOML round trip.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let mut original = AppConfig::default();
        original.provider.kind = ProviderKind::HuggingFace;
        original.provider.api_key = Some("hf_test123".into());
        original.provider.history_window = Some(8);
        original.languages.target = "de".into();
        original.system_prompt = Some("You are a strict grammar coach.".into());

        original.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.provider.kind, ProviderKind::HuggingFace);
        assert_eq!(loaded.provider.api_key, Some("hf_test123".into()));
        assert_eq!(loaded.provider.history_window, Some(8));
        assert_eq!(loaded.languages.target, "de");
        assert_eq!(
            loaded.system_prompt.as_deref(),
            Some("You are a strict grammar coach.")
        );
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.provider.kind, ProviderKind::Groq);
        assert!(config.provider.api_key.is_none());
    }
}
