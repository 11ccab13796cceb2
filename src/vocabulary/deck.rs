//! Flashcard review cycle over the vocabulary store.
//!
//! [`FlashcardDeck`] keeps a review cursor, a flip flag and a correct-answer
//! counter on top of [`VocabularyStore`]. The deck never owns the entries —
//! it holds a permutation of store indices plus a membership snapshot, and
//! [`refresh`](FlashcardDeck::refresh) realigns it whenever favorites were
//! added or removed.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use super::store::{Favorite, VocabularyStore};

// ---------------------------------------------------------------------------
// Grade
// ---------------------------------------------------------------------------

/// Self-assessment after revealing a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    /// Knew it.
    Correct,
    /// Getting there.
    Learning,
    /// Did not know it.
    Wrong,
}

// ---------------------------------------------------------------------------
// FlashcardDeck
// ---------------------------------------------------------------------------

/// Review state: a permutation of store indices, the cursor into it, the
/// running correct count and whether the current card is flipped.
///
/// # Example
/// ```rust
/// use language_tutor::vocabulary::{FlashcardDeck, Grade, VocabularyStore};
///
/// let mut store = VocabularyStore::in_memory();
/// store.add("casa", "house", None).unwrap();
///
/// let mut deck = FlashcardDeck::new();
/// deck.refresh(&store);
///
/// assert_eq!(deck.current_card(&store).unwrap().word, "casa");
/// deck.flip();
/// deck.answer(Grade::Correct);
/// assert_eq!(deck.correct_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct FlashcardDeck {
    order: Vec<usize>,
    cursor: usize,
    correct_count: u32,
    flipped: bool,
    /// Store id sequence as of the last refresh; membership-change detector.
    known_ids: Vec<Uuid>,
}

impl FlashcardDeck {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Store alignment
    // -----------------------------------------------------------------------

    /// Realign the deck with the store.
    ///
    /// When the store's membership changed since the last refresh, `order`
    /// is recomputed as the identity permutation over the current size
    /// (a shuffled order does not survive adds/removes). The cursor is
    /// clamped back to 0 when it falls out of range, and the current card
    /// shows its front again.
    pub fn refresh(&mut self, store: &VocabularyStore) {
        let ids = store.ids();
        if ids != self.known_ids {
            self.order = (0..ids.len()).collect();
            self.known_ids = ids;
        }
        if self.cursor >= self.order.len() {
            self.cursor = 0;
        }
        self.flipped = false;
    }

    // -----------------------------------------------------------------------
    // Review cycle
    // -----------------------------------------------------------------------

    /// The favorite under the cursor, or `None` when the deck is empty.
    pub fn current_card<'s>(&self, store: &'s VocabularyStore) -> Option<&'s Favorite> {
        self.order.get(self.cursor).and_then(|&i| store.get(i))
    }

    /// Toggle between front (word) and back (translation). No-op when the
    /// deck is empty.
    pub fn flip(&mut self) {
        if !self.order.is_empty() {
            self.flipped = !self.flipped;
        }
    }

    /// Grade the current card and advance to the next one (wrapping at the
    /// end of the deck). Only `Correct` increments the counter; the deck
    /// always moves on regardless of grade. No-op when empty.
    pub fn answer(&mut self, grade: Grade) {
        if self.order.is_empty() {
            return;
        }
        if grade == Grade::Correct {
            self.correct_count += 1;
        }
        self.cursor = (self.cursor + 1) % self.order.len();
        self.flipped = false;
    }

    /// Shuffle the review order (Fisher–Yates, uniform over permutations)
    /// and restart from the first card. No-op with fewer than 2 cards.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    /// [`shuffle`](Self::shuffle) with an explicit RNG, so tests can seed it.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.order.len() < 2 {
            return;
        }
        self.order.shuffle(rng);
        self.cursor = 0;
        self.flipped = false;
    }

    /// Restart the review: zero the correct count, go back to the first
    /// card, show its front. The order and the store are untouched.
    pub fn reset_progress(&mut self) {
        self.correct_count = 0;
        self.cursor = 0;
        self.flipped = false;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Position of the current card, 0-based.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of `Correct` answers since the last progress reset.
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    /// Whether the current card shows its back.
    pub fn flipped(&self) -> bool {
        self.flipped
    }

    /// Number of cards in the deck.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` when there are no cards to review.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The current review order as store indices.
    pub fn order(&self) -> &[usize] {
        &self.order
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
