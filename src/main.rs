//! Application entry point — console front end for language-tutor.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Load saved favorites from disk.
//! 4. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 5. Build the [`SessionController`]; configure it when a credential is
//!    already saved.
//! 6. Run the line-oriented REPL until `:quit` or EOF.
//!
//! Plain lines are chat submissions; `:`-commands drive capture simulation,
//! word lookup, favorites and the flashcard deck (`:help` lists them). The
//! REPL is the rendering/speech collaborator: it executes the controller's
//! effect intents by printing, and reports `Speak` as finished immediately
//! since a terminal has no audio playback.

use std::io::BufRead;
use std::path::Path;

use anyhow::Result;

use language_tutor::config::{AppConfig, ProviderKind};
use language_tutor::session::{Effect, Session, SessionController};
use language_tutor::vocabulary::{export_to_file, Grade, VocabularyStore};

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("language-tutor starting up");

    // 2. Configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Saved favorites
    let favorites = VocabularyStore::load_or_default();
    let mut controller = SessionController::new(Session::with_store(favorites));

    // 4. Tokio runtime (2 workers — the REPL itself stays on this thread)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    // 5. Configure from the persisted credential, when there is one
    match controller.configure(&config) {
        Ok(effects) => run_effects(&mut controller, effects),
        Err(_) => println!(
            "No provider configured yet — use :provider <groq|huggingface|openai> <api-key>"
        ),
    }

    println!("Type a message to chat, or :help for commands.");

    // 6. REPL
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix(':') {
            if !handle_command(&rt, &mut controller, &mut config, command) {
                break;
            }
        } else {
            submit(&rt, &mut controller, line);
        }
    }

    log::info!("language-tutor shutting down");
    Ok(())
}

// ---------------------------------------------------------------------------
// Chat turns
// ---------------------------------------------------------------------------

fn submit(rt: &tokio::runtime::Runtime, controller: &mut SessionController, text: &str) {
    match rt.block_on(controller.submit_text(text)) {
        Ok(effects) => run_effects(controller, effects),
        Err(e) => println!("! {e}"),
    }
}

/// Execute effect intents by printing. `Speak` completes immediately
/// (the console has no audio playback), returning the session to idle.
fn run_effects(controller: &mut SessionController, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::RenderUserMessage(text) => println!("you> {text}"),
            Effect::RenderAssistantMessage(text) => println!("tutor> {text}"),
            Effect::Speak(_) => controller.playback_finished(),
            Effect::ShowTranslation { word, translation } => {
                println!("{word} = {translation}");
            }
            Effect::ShowError(message) => println!("! {message}"),
            Effect::Notify(message) => println!("* {message}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Dispatch a `:`-command. Returns `false` to quit the REPL.
fn handle_command(
    rt: &tokio::runtime::Runtime,
    controller: &mut SessionController,
    config: &mut AppConfig,
    command: &str,
) -> bool {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match name {
        "help" => print_help(),

        "provider" => set_provider(controller, config, &args),

        "record" => match controller.start_capture() {
            Ok(_) => println!("* recording — type the utterance, or :stop to cancel"),
            Err(e) => println!("! {e}"),
        },
        "stop" => {
            let effects = controller.stop_capture();
            run_effects(controller, effects);
            println!("* capture stopped");
        }

        "translate" => match args.first().copied() {
            Some(word) => match rt.block_on(controller.lookup_word(word)) {
                Ok(effects) => run_effects(controller, effects),
                Err(e) => println!("! {e}"),
            },
            None => println!("usage: :translate <word>"),
        },

        "save" => match args.split_first() {
            Some((&word, rest)) if !rest.is_empty() => {
                let translation = rest.join(" ");
                let effects = controller.save_favorite(word, &translation, None);
                run_effects(controller, effects);
            }
            _ => println!("usage: :save <word> <translation>"),
        },
        "favorites" => list_favorites(controller, args.first().copied()),
        "remove" => match args.first().and_then(|s| s.parse().ok()) {
            Some(id) => {
                let effects = controller.remove_favorite(id);
                run_effects(controller, effects);
                println!("* removed (if it existed)");
            }
            None => println!("usage: :remove <id>"),
        },
        "clear-favorites" => {
            let effects = controller.clear_favorites();
            run_effects(controller, effects);
        }
        "export" => match args.first() {
            Some(path) => {
                match export_to_file(&controller.session().vocabulary, Path::new(path)) {
                    Ok(()) => println!("* exported to {path}"),
                    Err(e) => println!("! export failed: {e}"),
                }
            }
            None => println!("usage: :export <path.csv>"),
        },

        "card" => show_card(controller),
        "flip" => {
            controller.session_mut().deck.flip();
            show_card(controller);
        }
        "answer" => match args.first().copied().and_then(parse_grade) {
            Some(grade) => {
                controller.session_mut().deck.answer(grade);
                show_card(controller);
            }
            None => println!("usage: :answer <correct|learning|wrong>"),
        },
        "shuffle" => {
            controller.session_mut().deck.shuffle();
            println!("* deck shuffled");
            show_card(controller);
        }
        "reset-progress" => {
            controller.session_mut().deck.reset_progress();
            println!("* progress reset");
        }

        "clear" => {
            controller.clear_chat();
            println!("* chat cleared");
        }
        "state" => println!("* {}", controller.state()),
        "quit" | "q" => return false,

        other => println!("! unknown command :{other} — try :help"),
    }
    true
}

fn set_provider(controller: &mut SessionController, config: &mut AppConfig, args: &[&str]) {
    let (kind, key) = match args {
        [kind, key] => (*kind, *key),
        _ => {
            println!("usage: :provider <groq|huggingface|openai> <api-key>");
            return;
        }
    };

    let kind = match kind {
        "groq" => ProviderKind::Groq,
        "huggingface" | "hf" => ProviderKind::HuggingFace,
        "openai" => ProviderKind::OpenAi,
        other => {
            println!("! unknown provider {other:?}");
            return;
        }
    };

    config.provider.kind = kind;
    config.provider.api_key = Some(key.to_string());

    match controller.configure(config) {
        Ok(effects) => {
            // Persist the credential/provider pair for the next session.
            if let Err(e) = config.save() {
                log::warn!("could not save settings: {e}");
            }
            run_effects(controller, effects);
        }
        Err(e) => println!("! {e}"),
    }
}

fn list_favorites(controller: &SessionController, filter: Option<&str>) {
    let favorites = controller.session().vocabulary.list(filter);
    if favorites.is_empty() {
        println!("* no favorites yet — :save a word after a :translate lookup");
        return;
    }
    for favorite in favorites {
        println!(
            "  {} = {}  [{}]",
            favorite.word, favorite.translation, favorite.id
        );
    }
}

fn parse_grade(text: &str) -> Option<Grade> {
    match text {
        "correct" => Some(Grade::Correct),
        "learning" => Some(Grade::Learning),
        "wrong" => Some(Grade::Wrong),
        _ => None,
    }
}

fn show_card(controller: &SessionController) {
    let session = controller.session();
    let deck = &session.deck;

    match deck.current_card(&session.vocabulary) {
        Some(card) => {
            println!(
                "card {}/{} — correct so far: {}",
                deck.cursor() + 1,
                deck.len(),
                deck.correct_count()
            );
            if deck.flipped() {
                println!("  {} = {}", card.word, card.translation);
            } else {
                println!("  {}   (:flip to reveal)", card.word);
            }
        }
        None => println!("* the deck is empty — save some favorites first"),
    }
}

fn print_help() {
    println!(
        "\
commands:
  :provider <groq|huggingface|openai> <api-key>   configure the backend
  :record / :stop              simulate speech capture (typed line = utterance)
  :translate <word>            look up a word
  :save <word> <translation>   save a favorite
  :favorites [filter]          list favorites
  :remove <id>                 remove a favorite
  :clear-favorites             remove all favorites
  :export <path.csv>           export favorites as CSV
  :card / :flip                show / reveal the current flashcard
  :answer <correct|learning|wrong>   grade the card and advance
  :shuffle / :reset-progress   reshuffle the deck / restart the review
  :clear                       clear the chat history
  :state                       show the session state
  :quit                        exit"
    );
}
