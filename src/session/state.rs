//! Conversation session states.
//!
//! [`SessionState`] drives the controller's state machine:
//!
//! ```text
//! Idle ──start capture──▶ Recording
//!      ──submit text───▶ Processing            (typed input skips Recording)
//! Recording ──utterance finalized──▶ Processing
//!           ──stop / capture error─▶ Idle
//! Processing ──gateway reply──▶ Speaking
//!            ──gateway error──▶ Idle           (after an error artifact)
//! Speaking ──playback finished / unsupported──▶ Idle
//! ```
//!
//! There is no terminal state; the session ends with the process.

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Phase of the conversation turn-taking cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for input.
    Idle,

    /// Speech capture is active; an utterance is being transcribed.
    Recording,

    /// A chat request is in flight. New capture/submission is rejected —
    /// and there is no way to cancel the outstanding request.
    Processing,

    /// The reply is being spoken/rendered by the output collaborator.
    Speaking,
}

impl SessionState {
    /// Returns `true` while a turn is in flight — the window in which new
    /// capture or submission attempts are rejected, not queued.
    ///
    /// `Recording` is not busy: a direct text submission while recording is
    /// treated as the finalized utterance.
    ///
    /// ```
    /// use language_tutor::session::SessionState;
    ///
    /// assert!(!SessionState::Idle.is_busy());
    /// assert!(!SessionState::Recording.is_busy());
    /// assert!(SessionState::Processing.is_busy());
    /// assert!(SessionState::Speaking.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::Processing | SessionState::Speaking)
    }

    /// A short human-readable label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Recording => "Recording",
            SessionState::Processing => "Processing",
            SessionState::Speaking => "Speaking",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_is_not_busy() {
        assert!(!SessionState::Idle.is_busy());
    }

    #[test]
    fn recording_is_not_busy() {
        assert!(!SessionState::Recording.is_busy());
    }

    #[test]
    fn processing_is_busy() {
        assert!(SessionState::Processing.is_busy());
    }

    #[test]
    fn speaking_is_busy() {
        assert!(SessionState::Speaking.is_busy());
    }

    #[test]
    fn default_state_is_idle() {
        assert_eq!(SessionState::default(), SessionState::Idle);
    }

    #[test]
    fn labels_match_states() {
        assert_eq!(SessionState::Idle.label(), "Idle");
        assert_eq!(SessionState::Recording.label(), "Recording");
        assert_eq!(SessionState::Processing.label(), "Processing");
        assert_eq!(SessionState::Speaking.label(), "Speaking");
        assert_eq!(SessionState::Speaking.to_string(), "Speaking");
    }
}
