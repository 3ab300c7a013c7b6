//! The card list: local state plus a mutation per toggle.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::card::Deck;
use crate::error::{Error, Result};
use crate::mutation::CardMutator;

/// Holds the current deck and pushes every toggle to a [`CardMutator`].
///
/// The deck is updated optimistically: it reflects the toggle as soon as
/// [`toggle`](Self::toggle) returns, whatever happens to the remote write.
#[derive(Debug)]
pub struct CardListView {
    deck: Deck,
    mutator: Arc<dyn CardMutator>,
}

impl CardListView {
    /// Start a view from the deck produced at page load.
    #[must_use]
    pub fn new(deck: Deck, mutator: Arc<dyn CardMutator>) -> Self {
        Self { deck, mutator }
    }

    /// The current snapshot.
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Flip the known flag of `id` and send the whole new sequence.
    ///
    /// The write runs on its own task. Dropping the returned handle leaves it
    /// running; awaiting [`PendingSync::wait`] yields its outcome. Failures are
    /// logged either way. Rapid toggles are not coalesced and their writes may
    /// land in any order.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCard`] if `id` is not in the deck. The state is
    /// left as it was and nothing is sent.
    pub fn toggle(&mut self, id: &str) -> Result<PendingSync> {
        self.deck = self.deck.toggle(id)?;
        debug!(id, "card toggled");

        let payload = self.deck.to_records();
        let mutator = Arc::clone(&self.mutator);
        let handle = tokio::spawn(async move {
            let result = mutator.persist(&payload).await;
            if let Err(e) = &result {
                warn!("failed to persist toggle: {e}");
            }
            result
        });
        Ok(PendingSync { handle })
    }
}

/// The in-flight write started by a toggle.
#[derive(Debug)]
#[must_use = "drop the handle explicitly to fire and forget"]
pub struct PendingSync {
    handle: JoinHandle<Result<()>>,
}

impl PendingSync {
    /// Wait for the write to finish.
    ///
    /// # Errors
    ///
    /// Returns the mutator's error, or [`Error::Internal`] if the task panicked.
    pub async fn wait(self) -> Result<()> {
        self.handle
            .await
            .map_err(|e| Error::internal(format!("mutation task failed: {e}")))?
    }

    /// Whether the write has finished, successfully or not.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
