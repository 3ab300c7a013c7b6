//! `flashcards` - CLI for the flashcard checklist
//!
//! Serves the card page, or works with the deck from the terminal.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use flashcards::cli::{Cli, Command, ConfigCommand, ListCommand, ServeCommand, ToggleCommand};
use flashcards::{
    init_logging, load_deck, AppState, CardListView, CardMutator, Config, HttpMutator,
    NotionClient, TableClient, TableMutator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Serve(cmd) => handle_serve(config, cmd).await,
        Command::List(cmd) => handle_list(&config, &cmd).await,
        Command::Toggle(cmd) => handle_toggle(&config, cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn table_client(config: &Config) -> anyhow::Result<Arc<dyn TableClient>> {
    Ok(Arc::new(NotionClient::from_config(config)?))
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(bind) = cmd.bind {
        config.server.bind_addr = bind;
    }
    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    let client = table_client(&config)?;
    flashcards::serve(listener, AppState::new(client, config)).await?;
    Ok(())
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let client = table_client(config)?;
    let deck = load_deck(client.as_ref(), config.notion.database_id.as_deref()).await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&deck.to_records())?);
        return Ok(());
    }

    for card in deck.iter() {
        let mark = if card.known { "x" } else { " " };
        println!("[{mark}] {}  ({})", card.name, card.id);
    }
    println!();
    println!("{} of {} known", deck.known_count(), deck.len());
    Ok(())
}

async fn handle_toggle(config: &Config, cmd: ToggleCommand) -> anyhow::Result<()> {
    let client = table_client(config)?;
    let deck = load_deck(client.as_ref(), config.notion.database_id.as_deref()).await?;

    let mutator: Arc<dyn CardMutator> = match &cmd.remote {
        Some(url) => Arc::new(HttpMutator::new(url, config.request_timeout())?),
        None => Arc::new(TableMutator::new(client)),
    };

    let mut view = CardListView::new(deck, mutator);
    let pending = view.toggle(&cmd.id)?;
    pending.wait().await.context("writing the toggle back")?;

    if let Some(card) = view.deck().get(&cmd.id) {
        let state = if card.known { "known" } else { "not known" };
        println!("{}: {state}", card.name);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let shown = config.redacted();
            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Notion]");
                println!(
                    "  Database id:   {}",
                    shown.notion.database_id.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "  Token:         {}",
                    shown.notion.token.as_deref().unwrap_or("(not set)")
                );
                println!("  API base URL:  {}", shown.notion.api_base_url);
                println!("  API version:   {}", shown.notion.api_version);
                println!("  Timeout (s):   {}", shown.notion.timeout_secs);
                println!();
                println!("[Server]");
                println!("  Bind address:  {}", shown.server.bind_addr);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(loaded) => {
                    println!("Configuration is valid.");
                    if loaded.database_id().is_err() {
                        println!("Warning: no database id set (NOTION_DATABASE_ID).");
                    }
                    if loaded.token().is_err() {
                        println!("Warning: no token set (NOTION_TOKEN).");
                    }
                }
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
