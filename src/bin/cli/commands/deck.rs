use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let decks = app.repo.list_decks().context("Failed to list decks")?;

    let mut rows = Vec::new();
    for deck in &decks {
        let count = app
            .repo
            .fetch_cards(deck.id)
            .with_context(|| format!("Failed to load cards for \"{}\"", deck.name))?
            .len();
        rows.push((deck, count));
    }

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = rows
                .iter()
                .map(|(deck, count)| {
                    serde_json::json!({
                        "id": deck.id.to_string(),
                        "name": deck.name,
                        "cardCount": count,
                        "createdAt": deck.created_at.to_rfc3339(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if rows.is_empty() {
                println!("(no decks)");
            }
            for (deck, count) in rows {
                let noun = if count == 1 { "card" } else { "cards" };
                println!("{} ({} {})", deck.name, count, noun);
            }
        }
    }

    Ok(())
}

pub fn run_create(app: &mut App, name: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.repo.create_deck(name).context("Failed to create deck")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": deck.id.to_string(),
                "name": deck.name,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Created deck \"{}\"", deck.name);
            println!("  ID: {}", deck.id);
        }
    }

    Ok(())
}

pub fn run_rename(
    app: &mut App,
    deck_name: &str,
    new_name: &str,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let renamed = app
        .repo
        .rename_deck(deck.id, new_name)
        .context("Failed to rename deck")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": renamed.id.to_string(),
                "name": renamed.name,
                "previousName": deck.name,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Renamed deck \"{}\" to \"{}\"", deck.name, renamed.name);
        }
    }

    Ok(())
}

pub fn run_delete(app: &mut App, deck_name: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let removed = app
        .repo
        .delete_deck(deck.id)
        .context("Failed to delete deck")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": deck.id.to_string(),
                "name": deck.name,
                "cardsDeleted": removed,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Deleted deck \"{}\" and {} cards", deck.name, removed);
        }
    }

    Ok(())
}
