//! Multi-provider chat / word-translation gateway.
//!
//! This module provides:
//! * [`Provider`] — async trait implemented by all backends.
//! * [`ChatCompletionsProvider`] — groq-like / openai-like chat backends.
//! * [`HuggingFaceProvider`] — inference-API backend with opus-mt translation.
//! * [`make_provider`] — provider selection as a pure function of the kind.
//! * [`Gateway`] — history windowing + graceful-degradation translation.
//! * [`GatewayError`] — normalised failure taxonomy.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use language_tutor::chat::ConversationHistory;
//! use language_tutor::config::AppConfig;
//! use language_tutor::gateway::Gateway;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::load().unwrap();
//!     let gateway = Gateway::from_config(&config);
//!
//!     let mut history = ConversationHistory::new();
//!     history.push_user("How do I order coffee in Polish?");
//!
//!     match gateway.chat(&history).await {
//!         Ok(reply) => println!("{reply}"),
//!         Err(e) => eprintln!("chat failed: {e}"),
//!     }
//!
//!     // Never fails — worst case the word comes back unchanged.
//!     let translation = gateway.translate("kawa").await;
//!     println!("kawa = {translation}");
//! }
//! ```

pub mod chat_api;
pub mod error;
pub mod huggingface;
pub mod prompt;
pub mod provider;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use chat_api::ChatCompletionsProvider;
pub use error::GatewayError;
pub use huggingface::HuggingFaceProvider;
pub use prompt::DEFAULT_SYSTEM_PROMPT;
pub use provider::{make_provider, Gateway, Provider};
