//! Conversation log for the current session.

pub mod history;

pub use history::{ConversationHistory, Message, Role};
