//! Prompt text for the tutor conversation and word translation.
//!
//! Two prompt shapes are produced here:
//! * **Chat** — the windowed message list is sent as-is to chat-completions
//!   providers; only the system instruction text lives here.
//! * **Flat** — text-generation providers take a single `inputs` string, so
//!   [`flatten_prompt`] renders the message list as a labelled transcript
//!   ending in an `Assistant:` cue.
//!
//! The exact wording is intentionally not a contract; the structure
//! (single system instruction, transcript labels, trailing cue) is.

use crate::chat::{Message, Role};
use crate::config::LanguagePair;

// ---------------------------------------------------------------------------
// System instructions
// ---------------------------------------------------------------------------

/// Default instruction for the tutor conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful language-learning assistant. Keep your replies short and \
helpful. Help the user practice grammar, vocabulary and conversation.";

/// Transcript label for user entries in a flattened prompt.
const USER_LABEL: &str = "User";
/// Transcript label for assistant entries in a flattened prompt.
const ASSISTANT_LABEL: &str = "Assistant";

// ---------------------------------------------------------------------------
// Word translation
// ---------------------------------------------------------------------------

/// System instruction for chat-shaped word translation: answer with the
/// translation alone, nothing else.
pub fn translation_system_prompt(pair: &LanguagePair) -> String {
    format!(
        "You are a translator. Reply with only the {} translation of the \
         given word, without any explanation.",
        language_name(&pair.target)
    )
}

/// User message for chat-shaped word translation.
pub fn translation_request(word: &str) -> String {
    format!("Translate the word: {word}")
}

/// Human-readable name for the ISO-639-1 codes the tutor commonly targets.
/// Unknown codes pass through unchanged — providers cope with either.
fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "pl" => "Polish",
        "de" => "German",
        "es" => "Spanish",
        "fr" => "French",
        "it" => "Italian",
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Flat prompt (text-generation providers)
// ---------------------------------------------------------------------------

/// Render a windowed message list as a single labelled transcript.
///
/// The system instruction leads, each turn becomes a `User:`/`Assistant:`
/// line, and the string ends with a bare `Assistant:` cue for the model to
/// complete.
pub fn flatten_prompt(messages: &[Message]) -> String {
    let mut prompt = String::with_capacity(1024);

    for msg in messages {
        match msg.role {
            Role::System => {
                prompt.push_str(&msg.content);
                prompt.push_str("\n\n");
            }
            Role::User => {
                prompt.push_str(USER_LABEL);
                prompt.push_str(": ");
                prompt.push_str(&msg.content);
                prompt.push('\n');
            }
            Role::Assistant => {
                prompt.push_str(ASSISTANT_LABEL);
                prompt.push_str(": ");
                prompt.push_str(&msg.content);
                prompt.push('\n');
            }
        }
    }

    prompt.push_str(ASSISTANT_LABEL);
    prompt.push(':');
    prompt
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
