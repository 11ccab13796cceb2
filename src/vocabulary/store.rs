//! Saved vocabulary words (favorites).
//!
//! [`VocabularyStore`] owns every [`Favorite`] in the session. Entries are
//! created on user confirmation after a translation lookup and deduplicated
//! case-insensitively on the word. When path-backed, the store persists to
//! JSON after every mutation so favorites survive app restarts:
//!
//! | Platform | Path |
//! |----------|------|
//! | Windows  | `%APPDATA%\language-tutor\favorites.json` |
//! | macOS    | `~/Library/Application Support/language-tutor/favorites.json` |
//! | Linux    | `~/.config/language-tutor/favorites.json` |

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppPaths;

// ---------------------------------------------------------------------------
// Favorite
// ---------------------------------------------------------------------------

/// A saved word/translation pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    /// Unique token; stable for the lifetime of the entry.
    pub id: Uuid,
    /// The saved word, as the user clicked it.
    pub word: String,
    /// Its translation.
    pub translation: String,
    /// The sentence the word was clicked in, when available.
    pub context: Option<String>,
    /// When the entry was saved.
    pub added_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// VocabError
// ---------------------------------------------------------------------------

/// Rejections from vocabulary operations. Not faults — an explicit result
/// variant the caller surfaces as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabError {
    /// The word is already saved (case-insensitive comparison).
    #[error("\"{0}\" is already in your favorites")]
    DuplicateWord(String),
}

// ---------------------------------------------------------------------------
// VocabularyStore
// ---------------------------------------------------------------------------

/// Deduplicated, insertion-ordered collection of [`Favorite`]s.
pub struct VocabularyStore {
    entries: Vec<Favorite>,
    path: Option<PathBuf>,
}

impl VocabularyStore {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// A store that lives only in memory — nothing is written to disk.
    pub fn in_memory() -> Self {
        Self {
            entries: Vec::new(),
            path: None,
        }
    }

    /// Load favorites from the platform config directory, or return an empty
    /// store when the file does not exist yet.
    pub fn load_or_default() -> Self {
        Self::load_from(AppPaths::new().favorites_file)
    }

    /// Load favorites from an explicit path (useful for tests).
    pub fn load_from(path: PathBuf) -> Self {
        let entries = Self::load_entries(&path);
        Self {
            entries,
            path: Some(path),
        }
    }

    fn load_entries(path: &PathBuf) -> Vec<Favorite> {
        if path.exists() {
            let data = std::fs::read_to_string(path).unwrap_or_default();
            serde_json::from_str(&data).unwrap_or_default()
        } else {
            Vec::new()
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Save a new word/translation pair.
    ///
    /// Rejects the add with [`VocabError::DuplicateWord`] when an entry with
    /// the same word (Unicode case-insensitive) already exists; otherwise
    /// assigns a fresh id and the current timestamp, persists, and returns
    /// the created entry.
    pub fn add(
        &mut self,
        word: &str,
        translation: &str,
        context: Option<String>,
    ) -> Result<Favorite, VocabError> {
        let needle = word.to_lowercase();
        if self.entries.iter().any(|e| e.word.to_lowercase() == needle) {
            return Err(VocabError::DuplicateWord(word.to_string()));
        }

        let favorite = Favorite {
            id: Uuid::new_v4(),
            word: word.to_string(),
            translation: translation.to_string(),
            context,
            added_at: Utc::now(),
        };

        self.entries.push(favorite.clone());
        self.save();
        Ok(favorite)
    }

    /// Remove an entry by id. Removing an id that is not present is a no-op,
    /// not a failure — removing twice is safe.
    pub fn remove(&mut self, id: Uuid) {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() != before {
            self.save();
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.save();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Entries matching `filter` as a case-insensitive substring of the word
    /// or the translation, in insertion order. `None` or an empty filter
    /// returns everything.
    pub fn list(&self, filter: Option<&str>) -> Vec<&Favorite> {
        match filter.map(str::trim).filter(|f| !f.is_empty()) {
            None => self.entries.iter().collect(),
            Some(filter) => {
                let needle = filter.to_lowercase();
                self.entries
                    .iter()
                    .filter(|e| {
                        e.word.to_lowercase().contains(&needle)
                            || e.translation.to_lowercase().contains(&needle)
                    })
                    .collect()
            }
        }
    }

    /// Entry at `index` in insertion order.
    pub fn get(&self, index: usize) -> Option<&Favorite> {
        self.entries.get(index)
    }

    /// Entry with the given id.
    pub fn get_by_id(&self, id: Uuid) -> Option<&Favorite> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The id sequence in insertion order — the deck uses this to detect
    /// membership changes.
    pub fn ids(&self) -> Vec<Uuid> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Favorite> {
        self.entries.iter()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(data) = serde_json::to_string_pretty(&self.entries) {
            let _ = std::fs::write(path, data);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
