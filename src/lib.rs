//! Core library for the language-tutor assistant.
//!
//! The crate is organised around five modules:
//!
//! * [`config`] — settings structs, provider defaults, TOML persistence.
//! * [`chat`] — conversation history and the windowed prompt.
//! * [`gateway`] — multi-provider chat / word-translation gateway.
//! * [`session`] — the conversation state machine and effect intents.
//! * [`vocabulary`] — saved favorites, flashcard deck, CSV export.
//!
//! `main.rs` wires these together behind a console front end; any other
//! front end (GUI, web) can drive [`session::SessionController`] the same
//! way by executing the [`session::Effect`] intents it returns.

pub mod chat;
pub mod config;
pub mod gateway;
pub mod session;
pub mod vocabulary;
