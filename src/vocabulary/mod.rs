//! Personal vocabulary: saved favorites, the flashcard review deck, and
//! CSV export.
//!
//! [`VocabularyStore`] owns the entries; [`FlashcardDeck`] holds only
//! review state (a permutation of store indices) and is realigned with the
//! store via [`FlashcardDeck::refresh`] after any membership change.

pub mod deck;
pub mod export;
pub mod store;

pub use deck::{FlashcardDeck, Grade};
pub use export::{export_to_file, write_csv};
pub use store::{Favorite, VocabError, VocabularyStore};
