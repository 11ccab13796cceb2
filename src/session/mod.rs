//! Conversation session: state machine, controller, and effect intents.
//!
//! # Architecture
//!
//! ```text
//! front end input (typed text / transcription events)
//!        │
//!        ▼
//! SessionController ── windows history ──▶ Gateway ──▶ provider
//!        │
//!        └─▶ Vec<Effect>  (render message, speak text, show error, …)
//!               │
//!               ▼
//!        front end executes the intents
//! ```
//!
//! At most one turn is in flight: capture or submission attempts during
//! `Processing`/`Speaking` are rejected with [`SessionError::Busy`], never
//! queued.

pub mod controller;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use controller::{Effect, Session, SessionController, SessionError};
pub use state::SessionState;
