mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tango", about = "Vocabulary flashcards in the terminal", version)]
struct Cli {
    /// Data directory (overrides TANGO_DATA_DIR and the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: <config dir>/tango/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Manage decks
    #[command(subcommand)]
    Deck(DeckCommand),

    /// Manage the cards in a deck
    #[command(subcommand)]
    Card(CardCommand),

    /// Study a deck card by card
    Study {
        /// Deck name (case-insensitive prefix match)
        deck: String,
    },

    /// Show completed study sessions
    History,
}

#[derive(Subcommand)]
enum DeckCommand {
    /// List decks with their card counts
    List,

    /// Create a deck
    Create {
        name: String,
    },

    /// Rename a deck
    Rename {
        /// Deck name (case-insensitive prefix match)
        deck: String,
        /// New name
        name: String,
    },

    /// Delete a deck and all of its cards
    Delete {
        /// Deck name (case-insensitive prefix match)
        deck: String,
    },
}

#[derive(Subcommand)]
enum CardCommand {
    /// List the cards in a deck
    List {
        /// Deck name (case-insensitive prefix match)
        deck: String,
    },

    /// Add a card. Without --definition the configured generator writes one.
    Add {
        /// Deck name (case-insensitive prefix match)
        deck: String,
        /// The term to learn
        term: String,
        #[arg(long)]
        definition: Option<String>,
    },

    /// Edit the card at a position (as shown by `card list`)
    Edit {
        /// Deck name (case-insensitive prefix match)
        deck: String,
        /// 1-based position
        position: usize,
        #[arg(long)]
        term: Option<String>,
        #[arg(long, conflicts_with = "regenerate")]
        definition: Option<String>,
        /// Ask the generator for a fresh definition
        #[arg(long)]
        regenerate: bool,
    },

    /// Delete the cards at one or more positions
    Delete {
        /// Deck name (case-insensitive prefix match)
        deck: String,
        /// 1-based positions
        #[arg(required = true)]
        positions: Vec<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut app = app::App::new(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Command::Deck(subcmd) => match subcmd {
            DeckCommand::List => commands::deck::run_list(&app, &cli.format)?,
            DeckCommand::Create { name } => {
                commands::deck::run_create(&mut app, &name, &cli.format)?
            }
            DeckCommand::Rename { deck, name } => {
                commands::deck::run_rename(&mut app, &deck, &name, &cli.format)?
            }
            DeckCommand::Delete { deck } => {
                commands::deck::run_delete(&mut app, &deck, &cli.format)?
            }
        },
        Command::Card(subcmd) => match subcmd {
            CardCommand::List { deck } => commands::card::run_list(&mut app, &deck, &cli.format)?,
            CardCommand::Add { deck, term, definition } => {
                commands::card::run_add(&mut app, &deck, &term, definition, &cli.format)?
            }
            CardCommand::Edit {
                deck,
                position,
                term,
                definition,
                regenerate,
            } => commands::card::run_edit(
                &mut app,
                &deck,
                position,
                term,
                definition,
                regenerate,
                &cli.format,
            )?,
            CardCommand::Delete { deck, positions } => {
                commands::card::run_delete(&mut app, &deck, &positions, &cli.format)?
            }
        },
        Command::Study { deck } => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            commands::study::run(&mut app, &deck, stdin.lock(), stdout.lock())?;
        }
        Command::History => commands::history::run(&app, &cli.format)?,
    }

    Ok(())
}
