//! Configuration module for language-tutor.
//!
//! Provides `AppConfig` (top-level settings), the provider/language
//! sub-configs, `AppPaths` for cross-platform data directories, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, LanguagePair, ProviderConfig, ProviderKind};
