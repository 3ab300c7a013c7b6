//! `flashcards` - A flashcard checklist backed by a Notion database
//!
//! Rows of a Notion database become cards with a name and a "known" checkbox.
//! The library loads and validates those rows, keeps the card list as an
//! immutable deck, pushes every toggle back to the database, and serves the
//! whole thing as a single web page.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod card;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod mutation;
pub mod notion;
pub mod render;
pub mod server;
pub mod view;

pub use card::{Deck, FlashcardRecord};
pub use config::Config;
pub use error::{Error, Result};
pub use loader::{load_deck, load_flashcards};
pub use logging::init_logging;
pub use mutation::{CardMutator, HttpMutator, TableMutator};
pub use notion::{NotionClient, TableClient};
pub use server::{build_router, serve, AppState};
pub use view::{CardListView, PendingSync};
