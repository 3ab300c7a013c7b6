//! Flashcard records and the immutable deck that holds them.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One flashcard, built from a single row of the remote table.
///
/// Serializes as `{"page_id", "name", "checkbox"}`, the shape embedded in the
/// page and posted to the mutation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlashcardRecord {
    /// Opaque row identifier.
    #[serde(rename = "page_id")]
    pub id: String,
    /// Display text.
    pub name: String,
    /// Whether the card is marked as known.
    #[serde(rename = "checkbox")]
    pub known: bool,
}

impl FlashcardRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, known: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            known,
        }
    }

    /// A copy of this record with `known` inverted.
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            known: !self.known,
        }
    }
}

/// An immutable snapshot of the card sequence, in display order.
///
/// Records are shared between snapshots: [`Deck::toggle`] allocates only the
/// replaced record, every other entry is the same `Arc` as before.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Arc<FlashcardRecord>>,
}

impl Deck {
    /// Build a deck, rejecting sequences that repeat an id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCard`] if two records share an id.
    pub fn new(records: Vec<FlashcardRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(Error::DuplicateCard {
                    id: record.id.clone(),
                });
            }
        }
        Ok(Self {
            cards: records.into_iter().map(Arc::new).collect(),
        })
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the deck has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards marked as known.
    #[must_use]
    pub fn known_count(&self) -> usize {
        self.cards.iter().filter(|c| c.known).count()
    }

    /// Look up a card by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FlashcardRecord> {
        self.cards.iter().find(|c| c.id == id).map(Arc::as_ref)
    }

    /// Iterate over the cards in display order.
    pub fn iter(&self) -> impl Iterator<Item = &FlashcardRecord> {
        self.cards.iter().map(Arc::as_ref)
    }

    /// The shared handles, for identity comparisons between snapshots.
    #[must_use]
    pub fn shared(&self) -> &[Arc<FlashcardRecord>] {
        &self.cards
    }

    /// Produce the deck that results from flipping `id`'s known flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCard`] if no card has that id.
    pub fn toggle(&self, id: &str) -> Result<Self> {
        if !self.cards.iter().any(|c| c.id == id) {
            return Err(Error::UnknownCard { id: id.to_string() });
        }
        let cards = self
            .cards
            .iter()
            .map(|card| {
                if card.id == id {
                    Arc::new(card.toggled())
                } else {
                    Arc::clone(card)
                }
            })
            .collect();
        Ok(Self { cards })
    }

    /// Owned copies of every record, in display order.
    #[must_use]
    pub fn to_records(&self) -> Vec<FlashcardRecord> {
        self.iter().cloned().collect()
    }
}

impl TryFrom<Vec<FlashcardRecord>> for Deck {
    type Error = Error;

    fn try_from(records: Vec<FlashcardRecord>) -> Result<Self> {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Deck {
        Deck::new(vec![
            FlashcardRecord::new("b", "Dog", true),
            FlashcardRecord::new("a", "Cat", false),
        ])
        .unwrap()
    }

    #[test]
    fn test_record_wire_format() {
        let record = FlashcardRecord::new("a", "Cat", false);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"page_id": "a", "name": "Cat", "checkbox": false})
        );
    }

    #[test]
    fn test_record_from_wire() {
        let record: FlashcardRecord =
            serde_json::from_str(r#"{"name":"Dog","checkbox":true,"page_id":"b"}"#).unwrap();
        assert_eq!(record, FlashcardRecord::new("b", "Dog", true));
    }

    #[test]
    fn test_toggled_copies_other_fields() {
        let record = FlashcardRecord::new("a", "Cat", false);
        let flipped = record.toggled();
        assert_eq!(flipped.id, "a");
        assert_eq!(flipped.name, "Cat");
        assert!(flipped.known);
    }

    #[test]
    fn test_deck_rejects_duplicates() {
        let err = Deck::new(vec![
            FlashcardRecord::new("a", "Cat", false),
            FlashcardRecord::new("a", "Cat again", true),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateCard { id } if id == "a"));
    }

    #[test]
    fn test_toggle_scenario() {
        let deck = sample();
        let next = deck.toggle("a").unwrap();

        assert_eq!(
            next.to_records(),
            vec![
                FlashcardRecord::new("b", "Dog", true),
                FlashcardRecord::new("a", "Cat", true),
            ]
        );
        // The previous snapshot is untouched.
        assert!(!deck.get("a").unwrap().known);
    }

    #[test]
    fn test_toggle_shares_untouched_records() {
        let deck = sample();
        let next = deck.toggle("a").unwrap();

        assert!(Arc::ptr_eq(&deck.shared()[0], &next.shared()[0]));
        assert!(!Arc::ptr_eq(&deck.shared()[1], &next.shared()[1]));
    }

    #[test]
    fn test_toggle_twice_restores() {
        let deck = sample();
        let back = deck.toggle("b").unwrap().toggle("b").unwrap();
        assert_eq!(deck, back);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let deck = sample();
        let err = deck.toggle("zzz").unwrap_err();
        assert!(matches!(err, Error::UnknownCard { .. }));
    }

    #[test]
    fn test_known_count() {
        let deck = sample();
        assert_eq!(deck.known_count(), 1);
        assert_eq!(deck.toggle("a").unwrap().known_count(), 2);
    }

    #[test]
    fn test_empty_deck() {
        let deck = Deck::default();
        assert!(deck.is_empty());
        assert_eq!(deck.len(), 0);
        assert!(deck.toggle("a").is_err());
    }
}
