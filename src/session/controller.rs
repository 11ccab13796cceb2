//! Session controller — the conversation state machine.
//!
//! [`SessionController`] orchestrates turn-taking: it accepts typed or
//! transcribed input, drives the [`Gateway`], updates the conversation
//! history, and enforces the single-in-flight rule. Transitions are named
//! methods returning a list of [`Effect`] intents (render a message, speak
//! a reply, show an error) that the surrounding front end executes; the
//! state machine itself knows nothing about any particular UI.
//!
//! All session data lives in one explicit [`Session`] value owned by the
//! controller and discarded with it at session end.
//!
//! # Error policy
//!
//! Gateway failures never escape the controller: every failed turn becomes
//! exactly one [`Effect::ShowError`] plus a transition back to
//! [`SessionState::Idle`], and the session stays interactive. The only
//! errors callers see are the rejections [`SessionError::NotConfigured`]
//! and [`SessionError::Busy`].

use thiserror::Error;
use uuid::Uuid;

use crate::chat::ConversationHistory;
use crate::config::AppConfig;
use crate::gateway::Gateway;
use crate::vocabulary::{FlashcardDeck, VocabularyStore};

use super::state::SessionState;

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// Side-effect intents produced by state transitions.
///
/// The controller never touches a screen or a speaker; it returns these and
/// the front end executes them in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Display the user's message in the transcript.
    RenderUserMessage(String),
    /// Display the assistant's reply in the transcript.
    RenderAssistantMessage(String),
    /// Speak the assistant's reply aloud. Front ends without audio output
    /// execute this as a no-op and call
    /// [`SessionController::playback_finished`] immediately.
    Speak(String),
    /// Show a translation lookup result next to the clicked word.
    ShowTranslation { word: String, translation: String },
    /// Surface an error to the user. Never fatal to the session.
    ShowError(String),
    /// Surface an informational notice (greeting, favorite saved, …).
    Notify(String),
}

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Rejections returned to the caller. Anything else the controller absorbs
/// into [`Effect::ShowError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No valid provider credential has been configured yet.
    #[error("no provider configured — save an API key first")]
    NotConfigured,

    /// A turn is already in flight; the request is rejected, not queued.
    #[error("still {0} — wait for the current turn to finish")]
    Busy(SessionState),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// All conversation-scoped data, owned by the controller.
///
/// Constructed at session start, discarded at session end. The history is
/// provider-agnostic free text, so reconfiguring the gateway mid-session
/// leaves it intact.
pub struct Session {
    pub history: ConversationHistory,
    pub vocabulary: VocabularyStore,
    pub deck: FlashcardDeck,
}

impl Session {
    /// A fresh session with an in-memory vocabulary store.
    pub fn new() -> Self {
        Self::with_store(VocabularyStore::in_memory())
    }

    /// A fresh session around an existing (e.g. disk-backed) store.
    pub fn with_store(vocabulary: VocabularyStore) -> Self {
        let mut deck = FlashcardDeck::new();
        deck.refresh(&vocabulary);
        Self {
            history: ConversationHistory::new(),
            vocabulary,
            deck,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// SessionController
// ---------------------------------------------------------------------------

/// Drives one conversation session.
///
/// Methods take `&mut self` and run each turn to completion before the next
/// can start, so at most one gateway call is ever in flight. The state
/// guard turns late arrivals into [`SessionError::Busy`] rejections
/// rather than a queue.
pub struct SessionController {
    state: SessionState,
    session: Session,
    gateway: Option<Gateway>,
}

impl SessionController {
    /// Create a controller in `Idle` with no provider configured.
    pub fn new(session: Session) -> Self {
        Self {
            state: SessionState::Idle,
            session,
            gateway: None,
        }
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Validate the credential and (re)build the gateway from config.
    ///
    /// Re-selectable at any time; the conversation history survives a
    /// provider switch. Returns `NotConfigured` when the credential is
    /// missing or fails the provider's shape check.
    pub fn configure(&mut self, config: &AppConfig) -> Result<Vec<Effect>, SessionError> {
        let kind = config.provider.kind;
        let key = config
            .provider
            .credential()
            .ok_or(SessionError::NotConfigured)?;
        if !kind.credential_looks_valid(key) {
            return Err(SessionError::NotConfigured);
        }

        self.gateway = Some(Gateway::from_config(config));
        log::info!("session configured with provider {}", kind.label());

        Ok(vec![Effect::Notify(format!(
            "Hi! I'm your language-learning assistant, running on {}. How can I help?",
            kind.label()
        ))])
    }

    /// Install a pre-built gateway directly. Front ends that assemble their
    /// own [`crate::gateway::Provider`] use this instead of
    /// [`configure`](Self::configure).
    pub fn install_gateway(&mut self, gateway: Gateway) {
        self.gateway = Some(gateway);
    }

    /// Returns `true` once a gateway is available.
    pub fn is_configured(&self) -> bool {
        self.gateway.is_some()
    }

    fn require_gateway(&self) -> Result<&Gateway, SessionError> {
        self.gateway.as_ref().ok_or(SessionError::NotConfigured)
    }

    // -----------------------------------------------------------------------
    // Capture transitions
    // -----------------------------------------------------------------------

    /// `Idle → Recording`. Requires a configured provider; rejected while a
    /// turn is in flight. Starting while already recording is a no-op.
    pub fn start_capture(&mut self) -> Result<Vec<Effect>, SessionError> {
        if self.state.is_busy() {
            return Err(SessionError::Busy(self.state));
        }
        self.require_gateway()?;

        if self.state == SessionState::Idle {
            log::debug!("session: start capture → Recording");
            self.state = SessionState::Recording;
        }
        Ok(Vec::new())
    }

    /// `Recording → Idle`, immediately and synchronously (no network call
    /// has been issued yet). In any other state this is a no-op: once
    /// `Processing` has begun there is no cancelling the in-flight request.
    pub fn stop_capture(&mut self) -> Vec<Effect> {
        if self.state == SessionState::Recording {
            log::debug!("session: capture stopped → Idle");
            self.state = SessionState::Idle;
        }
        Vec::new()
    }

    /// The capture device failed. Lands back in `Idle` with a visible error
    /// message, never silently dropped.
    pub fn capture_failed(&mut self, reason: &str) -> Vec<Effect> {
        if self.state == SessionState::Recording {
            self.state = SessionState::Idle;
        }
        log::warn!("session: capture failed: {reason}");
        vec![Effect::ShowError(format!("Speech capture failed: {reason}"))]
    }

    // -----------------------------------------------------------------------
    // The chat turn
    // -----------------------------------------------------------------------

    /// Run one conversation turn from typed text or a finalized
    /// transcription.
    ///
    /// Valid from `Idle` (direct submission) and `Recording` (utterance
    /// finalized); rejected with [`SessionError::Busy`] while `Processing`
    /// or `Speaking`, leaving the history untouched. Blank input is
    /// ignored.
    ///
    /// The user message is appended before the gateway call and stays in
    /// the history even when the call fails; a failed call produces exactly
    /// one [`Effect::ShowError`] and returns the session to `Idle`.
    pub async fn submit_text(&mut self, text: &str) -> Result<Vec<Effect>, SessionError> {
        if self.state.is_busy() {
            return Err(SessionError::Busy(self.state));
        }
        let gateway = self.gateway.as_ref().ok_or(SessionError::NotConfigured)?;

        let text = text.trim();
        if text.is_empty() {
            log::debug!("session: ignoring blank submission");
            return Ok(Vec::new());
        }

        self.state = SessionState::Processing;
        self.session.history.push_user(text);

        let mut effects = vec![Effect::RenderUserMessage(text.to_string())];

        match gateway.chat(&self.session.history).await {
            Ok(reply) => {
                self.session.history.push_assistant(reply.clone());
                self.state = SessionState::Speaking;
                effects.push(Effect::RenderAssistantMessage(reply.clone()));
                effects.push(Effect::Speak(reply));
            }
            Err(e) => {
                log::warn!("session: chat turn failed: {e}");
                self.state = SessionState::Idle;
                effects.push(Effect::ShowError(format!(
                    "The assistant could not reply: {e}"
                )));
            }
        }

        Ok(effects)
    }

    /// `Speaking → Idle`. Called by the front end when playback ends, or
    /// immediately after [`Effect::Speak`] when playback is unsupported.
    pub fn playback_finished(&mut self) {
        if self.state == SessionState::Speaking {
            log::debug!("session: playback finished → Idle");
            self.state = SessionState::Idle;
        }
    }

    // -----------------------------------------------------------------------
    // Word lookup and favorites
    // -----------------------------------------------------------------------

    /// Translate a clicked word.
    ///
    /// Cannot fail past the configuration check: the gateway degrades a
    /// failed translation to the original word, so the effect always
    /// carries something to show.
    pub async fn lookup_word(&self, word: &str) -> Result<Vec<Effect>, SessionError> {
        let gateway = self.require_gateway()?;
        let translation = gateway.translate(word).await;
        Ok(vec![Effect::ShowTranslation {
            word: word.to_string(),
            translation,
        }])
    }

    /// Save a confirmed word/translation pair as a favorite.
    ///
    /// A duplicate word is surfaced as a warning notice, not an error; the
    /// deck is refreshed on success so the new card is reviewable at once.
    pub fn save_favorite(
        &mut self,
        word: &str,
        translation: &str,
        context: Option<String>,
    ) -> Vec<Effect> {
        match self.session.vocabulary.add(word, translation, context) {
            Ok(favorite) => {
                self.session.deck.refresh(&self.session.vocabulary);
                vec![Effect::Notify(format!(
                    "Added \"{}\" to your favorites.",
                    favorite.word
                ))]
            }
            Err(e) => {
                log::warn!("session: favorite rejected: {e}");
                vec![Effect::Notify(e.to_string())]
            }
        }
    }

    /// Remove a favorite by id (no-op when absent) and realign the deck.
    pub fn remove_favorite(&mut self, id: Uuid) -> Vec<Effect> {
        self.session.vocabulary.remove(id);
        self.session.deck.refresh(&self.session.vocabulary);
        Vec::new()
    }

    /// Remove every favorite and realign the deck.
    pub fn clear_favorites(&mut self) -> Vec<Effect> {
        self.session.vocabulary.clear();
        self.session.deck.refresh(&self.session.vocabulary);
        vec![Effect::Notify("All favorites removed.".into())]
    }

    /// Wholesale clear of the conversation history.
    pub fn clear_chat(&mut self) {
        self.session.history.clear();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Current state of the turn-taking machine.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Read access to the session data.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access to the session data (deck navigation, exports).
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

#[cfg(test)]
impl SessionController {
    /// Put the machine into an arbitrary state to test guard behavior.
    fn force_state(&mut self, state: SessionState) {
        self.state = state;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::chat::Message;
    use crate::config::{LanguagePair, ProviderKind};
    use crate::gateway::{GatewayError, Provider};

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Always replies with a fixed string; translates by suffixing "-pl".
    struct OkProvider(String);

    #[async_trait]
    impl Provider for OkProvider {
        async fn chat(&self, _prompt: &[Message]) -> Result<String, GatewayError> {
            Ok(self.0.clone())
        }

        async fn translate(
            &self,
            word: &str,
            _pair: &LanguagePair,
        ) -> Result<String, GatewayError> {
            Ok(format!("{word}-pl"))
        }
    }

    /// Every call fails with a network error.
    struct FailProvider;

    #[async_trait]
    impl Provider for FailProvider {
        async fn chat(&self, _prompt: &[Message]) -> Result<String, GatewayError> {
            Err(GatewayError::Network("connection refused".into()))
        }

        async fn translate(
            &self,
            _word: &str,
            _pair: &LanguagePair,
        ) -> Result<String, GatewayError> {
            Err(GatewayError::Network("connection refused".into()))
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn gateway_over(provider: Box<dyn Provider>) -> Gateway {
        Gateway::new(provider, 10, "tutor".into(), LanguagePair::default())
    }

    fn configured_controller(provider: Box<dyn Provider>) -> SessionController {
        let mut controller = SessionController::new(Session::new());
        controller.install_gateway(gateway_over(provider));
        controller
    }

    fn groq_config(key: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.provider.kind = ProviderKind::Groq;
        config.provider.api_key = Some(key.into());
        config
    }

    fn error_count(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, Effect::ShowError(_)))
            .count()
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    #[test]
    fn starts_idle_and_unconfigured() {
        let controller = SessionController::new(Session::new());
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(!controller.is_configured());
    }

    #[tokio::test]
    async fn unconfigured_session_rejects_capture_and_submission() {
        let mut controller = SessionController::new(Session::new());

        assert_eq!(
            controller.start_capture().unwrap_err(),
            SessionError::NotConfigured
        );
        assert_eq!(
            controller.submit_text("hello").await.unwrap_err(),
            SessionError::NotConfigured
        );
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(controller.session().history.is_empty());
    }

    #[test]
    fn configure_rejects_missing_or_misshapen_keys() {
        let mut controller = SessionController::new(Session::new());

        let mut config = AppConfig::default();
        assert_eq!(
            controller.configure(&config).unwrap_err(),
            SessionError::NotConfigured
        );

        // A HuggingFace-shaped key on a Groq provider fails the shape check.
        config.provider.api_key = Some("hf_wrong".into());
        assert_eq!(
            controller.configure(&config).unwrap_err(),
            SessionError::NotConfigured
        );
        assert!(!controller.is_configured());
    }

    #[test]
    fn configure_greets_with_the_provider_name() {
        let mut controller = SessionController::new(Session::new());
        let effects = controller.configure(&groq_config("gsk_valid")).unwrap();

        assert!(controller.is_configured());
        assert_eq!(effects.len(), 1);
        assert!(matches!(&effects[0], Effect::Notify(msg) if msg.contains("Groq")));
    }

    // -----------------------------------------------------------------------
    // Capture transitions
    // -----------------------------------------------------------------------

    #[test]
    fn capture_round_trip() {
        let mut controller = configured_controller(Box::new(OkProvider("ok".into())));

        controller.start_capture().unwrap();
        assert_eq!(controller.state(), SessionState::Recording);

        // Starting again while recording is a quiet no-op.
        controller.start_capture().unwrap();
        assert_eq!(controller.state(), SessionState::Recording);

        controller.stop_capture();
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[test]
    fn capture_failure_lands_in_idle_with_one_error() {
        let mut controller = configured_controller(Box::new(OkProvider("ok".into())));
        controller.start_capture().unwrap();

        let effects = controller.capture_failed("microphone unplugged");

        assert_eq!(controller.state(), SessionState::Idle);
        assert_eq!(error_count(&effects), 1);
        assert!(matches!(
            &effects[0],
            Effect::ShowError(msg) if msg.contains("microphone unplugged")
        ));
    }

    #[test]
    fn start_capture_is_rejected_while_busy() {
        let mut controller = configured_controller(Box::new(OkProvider("ok".into())));
        controller.force_state(SessionState::Processing);

        assert_eq!(
            controller.start_capture().unwrap_err(),
            SessionError::Busy(SessionState::Processing)
        );
        assert_eq!(controller.state(), SessionState::Processing);
    }

    #[test]
    fn stop_capture_does_not_cancel_processing() {
        let mut controller = configured_controller(Box::new(OkProvider("ok".into())));
        controller.force_state(SessionState::Processing);

        let effects = controller.stop_capture();
        assert!(effects.is_empty());
        // The in-flight turn keeps running; stop only affects Recording.
        assert_eq!(controller.state(), SessionState::Processing);
    }

    // -----------------------------------------------------------------------
    // Chat turns
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn successful_turn_renders_speaks_and_appends() {
        let mut controller = configured_controller(Box::new(OkProvider("Cześć!".into())));

        let effects = controller.submit_text("hello").await.unwrap();

        assert_eq!(
            effects,
            vec![
                Effect::RenderUserMessage("hello".into()),
                Effect::RenderAssistantMessage("Cześć!".into()),
                Effect::Speak("Cześć!".into()),
            ]
        );
        assert_eq!(controller.state(), SessionState::Speaking);

        let history: Vec<&Message> = controller.session().history.iter().collect();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "hello");
        assert_eq!(history[1].content, "Cześć!");

        controller.playback_finished();
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn submission_from_recording_finalizes_the_utterance() {
        let mut controller = configured_controller(Box::new(OkProvider("reply".into())));
        controller.start_capture().unwrap();

        let effects = controller.submit_text("transcribed words").await.unwrap();
        assert_eq!(controller.state(), SessionState::Speaking);
        assert_eq!(effects.len(), 3);
    }

    #[tokio::test]
    async fn submission_is_rejected_while_processing() {
        let mut controller = configured_controller(Box::new(OkProvider("ok".into())));
        controller.session_mut().history.push_user("first");
        controller.force_state(SessionState::Processing);

        let err = controller.submit_text("hello").await.unwrap_err();
        assert_eq!(err, SessionError::Busy(SessionState::Processing));
        // The rejected call must not grow the history.
        assert_eq!(controller.session().history.len(), 1);
    }

    #[tokio::test]
    async fn submission_is_rejected_while_speaking() {
        let mut controller = configured_controller(Box::new(OkProvider("ok".into())));
        controller.submit_text("first").await.unwrap();
        assert_eq!(controller.state(), SessionState::Speaking);

        let err = controller.submit_text("second").await.unwrap_err();
        assert_eq!(err, SessionError::Busy(SessionState::Speaking));
        assert_eq!(controller.session().history.len(), 2);
    }

    #[tokio::test]
    async fn gateway_failure_keeps_user_message_and_recovers_to_idle() {
        let mut controller = configured_controller(Box::new(FailProvider));

        let effects = controller.submit_text("hello").await.unwrap();

        assert_eq!(controller.state(), SessionState::Idle);
        assert_eq!(error_count(&effects), 1);

        // The user's message stays; no assistant message was appended.
        let history: Vec<&Message> = controller.session().history.iter().collect();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "hello");

        // The session remains usable after the failure.
        assert!(controller.start_capture().is_ok());
    }

    #[tokio::test]
    async fn blank_submission_is_ignored() {
        let mut controller = configured_controller(Box::new(OkProvider("ok".into())));

        let effects = controller.submit_text("   ").await.unwrap();
        assert!(effects.is_empty());
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(controller.session().history.is_empty());
    }

    #[test]
    fn playback_finished_outside_speaking_is_a_noop() {
        let mut controller = configured_controller(Box::new(OkProvider("ok".into())));
        controller.playback_finished();
        assert_eq!(controller.state(), SessionState::Idle);
    }

    // -----------------------------------------------------------------------
    // Word lookup and favorites
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn lookup_word_shows_the_translation() {
        let controller = configured_controller(Box::new(OkProvider("unused".into())));

        let effects = controller.lookup_word("dom").await.unwrap();
        assert_eq!(
            effects,
            vec![Effect::ShowTranslation {
                word: "dom".into(),
                translation: "dom-pl".into(),
            }]
        );
    }

    #[tokio::test]
    async fn lookup_word_degrades_to_the_original_word() {
        let controller = configured_controller(Box::new(FailProvider));

        let effects = controller.lookup_word("dom").await.unwrap();
        assert_eq!(
            effects,
            vec![Effect::ShowTranslation {
                word: "dom".into(),
                translation: "dom".into(),
            }]
        );
    }

    #[test]
    fn save_favorite_refreshes_the_deck() {
        let mut controller = configured_controller(Box::new(OkProvider("ok".into())));

        let effects = controller.save_favorite("casa", "house", None);
        assert!(matches!(&effects[0], Effect::Notify(msg) if msg.contains("casa")));

        let session = controller.session();
        assert_eq!(session.vocabulary.len(), 1);
        assert_eq!(session.deck.current_card(&session.vocabulary).unwrap().word, "casa");
    }

    #[test]
    fn duplicate_favorite_is_a_warning_not_an_error() {
        let mut controller = configured_controller(Box::new(OkProvider("ok".into())));

        controller.save_favorite("Casa", "house", None);
        let effects = controller.save_favorite("casa", "house2", None);

        assert_eq!(effects.len(), 1);
        assert!(matches!(&effects[0], Effect::Notify(msg) if msg.contains("already")));
        assert_eq!(error_count(&effects), 0);
        assert_eq!(controller.session().vocabulary.len(), 1);
    }

    #[test]
    fn remove_and_clear_keep_the_deck_aligned() {
        let mut controller = configured_controller(Box::new(OkProvider("ok".into())));
        controller.save_favorite("a", "A", None);
        controller.save_favorite("b", "B", None);

        let id = controller.session().vocabulary.get(0).unwrap().id;
        controller.remove_favorite(id);
        assert_eq!(controller.session().deck.len(), 1);

        controller.clear_favorites();
        let session = controller.session();
        assert!(session.vocabulary.is_empty());
        assert!(session.deck.is_empty());
        assert!(session.deck.current_card(&session.vocabulary).is_none());
    }

    // -----------------------------------------------------------------------
    // History lifecycle
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn clear_chat_empties_history() {
        let mut controller = configured_controller(Box::new(OkProvider("ok".into())));
        controller.submit_text("hello").await.unwrap();
        controller.playback_finished();

        controller.clear_chat();
        assert!(controller.session().history.is_empty());
    }

    #[tokio::test]
    async fn reconfiguring_preserves_history() {
        let mut controller = configured_controller(Box::new(OkProvider("ok".into())));
        controller.submit_text("hello").await.unwrap();
        controller.playback_finished();
        assert_eq!(controller.session().history.len(), 2);

        // Switch to a config-built provider; the transcript must survive.
        controller.configure(&groq_config("gsk_valid")).unwrap();
        assert_eq!(controller.session().history.len(), 2);
    }
}
