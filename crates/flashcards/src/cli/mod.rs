//! Command-line interface for flashcards.
//!
//! This module provides the CLI structure for the `flashcards` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, ListCommand, ServeCommand, ToggleCommand};

use crate::logging::Verbosity;

/// flashcards - A flashcard checklist backed by a Notion database
///
/// Reads cards from the database named by `NOTION_DATABASE_ID` using the
/// integration token in `NOTION_TOKEN`.
#[derive(Debug, Parser)]
#[command(name = "flashcards")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the card page
    Serve(ServeCommand),

    /// Print the cards in display order
    List(ListCommand),

    /// Flip a card's known flag and write it back
    Toggle(ToggleCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
