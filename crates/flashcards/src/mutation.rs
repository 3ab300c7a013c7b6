//! Persisting toggles back to the remote table.
//!
//! A toggle always ships the full card sequence. [`TableMutator`] writes it
//! straight to the table; [`HttpMutator`] hands it to a running server's
//! `/api/pages` endpoint, which does the same thing on its side.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};

use crate::card::FlashcardRecord;
use crate::error::Result;
use crate::notion::client::check_status;
use crate::notion::TableClient;

/// Path of the mutation endpoint on the web server.
pub const PAGES_ENDPOINT: &str = "/api/pages";

/// Receives the full card sequence after every toggle.
#[async_trait::async_trait]
pub trait CardMutator: Send + Sync + std::fmt::Debug {
    /// Persist the known flag of every card in `cards`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn persist(&self, cards: &[FlashcardRecord]) -> Result<()>;
}

/// Writes each card's checkbox to its row, one request per card.
///
/// Stops at the first failure; earlier writes are not rolled back.
#[derive(Debug, Clone)]
pub struct TableMutator {
    client: Arc<dyn TableClient>,
}

impl TableMutator {
    /// Create a mutator that writes through `client`.
    #[must_use]
    pub fn new(client: Arc<dyn TableClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl CardMutator for TableMutator {
    #[instrument(skip_all, fields(cards = cards.len()))]
    async fn persist(&self, cards: &[FlashcardRecord]) -> Result<()> {
        for card in cards {
            self.client.update_checkbox(&card.id, card.known).await?;
        }
        debug!("sequence persisted");
        Ok(())
    }
}

/// Posts the sequence to a flashcards server.
#[derive(Debug, Clone)]
pub struct HttpMutator {
    http: Client,
    endpoint: String,
}

impl HttpMutator {
    /// Create a mutator for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}{PAGES_ENDPOINT}", base_url.trim_end_matches('/')),
        })
    }

    /// The full URL sequences are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl CardMutator for HttpMutator {
    #[instrument(skip_all, fields(endpoint = %self.endpoint, cards = cards.len()))]
    async fn persist(&self, cards: &[FlashcardRecord]) -> Result<()> {
        let response = self.http.post(&self.endpoint).json(cards).send().await?;
        check_status(response).await?;
        Ok(())
    }
}
