//! Remote table access.
//!
//! The rest of the crate talks to the document database only through the
//! [`TableClient`] trait, so loaders, mutators and the server can be handed a
//! fake in tests. [`NotionClient`] is the HTTP implementation.

pub(crate) mod client;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use client::NotionClient;

/// Name of the title property holding the card text.
pub const NAME_PROPERTY: &str = "Name";

/// Name of the checkbox property holding the known flag.
pub const CHECKBOX_PROPERTY: &str = "Checkbox";

/// A row of the remote table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Row identifier.
    pub id: String,
    /// Typed property values keyed by property name.
    ///
    /// Partial page objects come back without this bag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, PropertyValue>>,
}

/// The value of one property, tagged by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    /// A title: a list of rich-text runs.
    Title {
        /// The runs, in order.
        title: Vec<RichText>,
    },
    /// A checkbox.
    Checkbox {
        /// Whether it is ticked.
        checkbox: bool,
    },
    /// Any kind this crate does not read.
    #[serde(other)]
    Other,
}

impl PropertyValue {
    /// Name of this value's kind, for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Title { .. } => "title",
            Self::Checkbox { .. } => "checkbox",
            Self::Other => "other",
        }
    }
}

/// A run of rich text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    /// The text without annotations.
    pub plain_text: String,
}

/// Body of a database query response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QueryResponse {
    pub(crate) results: Vec<Page>,
}

/// Error object returned by the API on failure.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub(crate) message: String,
}

/// Access to the remote table.
#[async_trait::async_trait]
pub trait TableClient: Send + Sync + std::fmt::Debug {
    /// Fetch the rows of a table in the order the service returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn query_database(&self, database_id: &str) -> Result<Vec<Page>>;

    /// Set the checkbox property of one row.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn update_checkbox(&self, page_id: &str, checked: bool) -> Result<()>;
}
