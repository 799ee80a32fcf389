use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use tango_lib::config::Config;
use tango_lib::flashcards::{CardList, CommandGenerator, Deck, DeckRepository, FlashcardStorage};

/// Shared application state for CLI commands
pub struct App {
    pub config: Config,
    pub repo: DeckRepository<FlashcardStorage>,
}

impl App {
    /// Load config and open the data directory
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let config = Config::load(config_path).context("Failed to load config")?;

        let data_dir = match data_dir {
            Some(dir) => dir,
            None => config
                .resolve_data_dir()
                .context("Failed to get data directory")?,
        };

        let storage = FlashcardStorage::new(data_dir);
        storage
            .init()
            .with_context(|| format!("Failed to initialize storage at {:?}", storage.base_path()))?;

        Ok(Self {
            config,
            repo: DeckRepository::new(storage),
        })
    }

    /// Find a deck by name (case-insensitive prefix match)
    pub fn find_deck(&self, name: &str) -> Result<Deck> {
        let decks = self.repo.list_decks().context("Failed to list decks")?;

        let name_lower = name.to_lowercase();

        // Exact match first
        if let Some(deck) = decks.iter().find(|d| d.name.to_lowercase() == name_lower) {
            return Ok(deck.clone());
        }

        // Prefix match
        let matches: Vec<&Deck> = decks
            .iter()
            .filter(|d| d.name.to_lowercase().starts_with(&name_lower))
            .collect();

        match matches.len() {
            0 => {
                if decks.is_empty() {
                    bail!("No deck matching '{}'. Create one with `tango deck create`.", name)
                }
                bail!(
                    "No deck matching '{}'. Available decks:\n{}",
                    name,
                    decks.iter().map(|d| format!("  - {}", d.name)).collect::<Vec<_>>().join("\n")
                )
            }
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous deck name '{}'. Matches:\n{}",
                name,
                matches.iter().map(|d| format!("  - {}", d.name)).collect::<Vec<_>>().join("\n")
            ),
        }
    }

    /// Live card list for a deck
    pub fn card_list(&mut self, deck_id: Uuid) -> Result<CardList<'_, FlashcardStorage>> {
        CardList::load(&mut self.repo, deck_id).context("Failed to load cards")
    }

    pub fn generator(&self) -> Result<CommandGenerator> {
        CommandGenerator::from_config(&self.config.generator).context(
            "No definition given and no generator configured. \
             Pass --definition or set [generator] command in config.toml",
        )
    }
}

/// Convert 1-based positions from the command line into list offsets
pub fn to_offsets(positions: &[usize]) -> Result<Vec<usize>> {
    positions
        .iter()
        .map(|&p| {
            if p == 0 {
                bail!("Positions start at 1");
            }
            Ok(p - 1)
        })
        .collect()
}
