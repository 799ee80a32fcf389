use anyhow::{bail, Context, Result};

use tango_lib::flashcards::{Card, DefinitionGenerator};

use crate::app::{to_offsets, App};
use crate::OutputFormat;

fn card_json(position: usize, card: &Card) -> serde_json::Value {
    serde_json::json!({
        "position": position,
        "id": card.id.to_string(),
        "term": card.term,
        "definition": card.definition,
        "createdAt": card.created_at.to_rfc3339(),
        "updatedAt": card.updated_at.to_rfc3339(),
    })
}

/// First line of a definition, shortened for list views
fn preview(definition: &str) -> String {
    let first_line = definition.lines().next().unwrap_or("");
    let chars: Vec<char> = first_line.chars().collect();
    if chars.len() > 60 {
        format!("{}...", chars[..57].iter().collect::<String>())
    } else {
        first_line.to_string()
    }
}

pub fn run_list(app: &mut App, deck_name: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let list = app.card_list(deck.id)?;

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = list
                .cards()
                .iter()
                .enumerate()
                .map(|(i, c)| card_json(i + 1, c))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if list.is_empty() {
                println!("No cards in \"{}\" yet. Add one with `tango card add`.", deck.name);
            }
            for (i, card) in list.cards().iter().enumerate() {
                println!("{:>3}. {}", i + 1, card.term);
                let def = preview(&card.definition);
                if !def.is_empty() {
                    println!("     {}", def);
                }
            }
        }
    }

    Ok(())
}

pub fn run_add(
    app: &mut App,
    deck_name: &str,
    term: &str,
    definition: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.find_deck(deck_name)?;

    let definition = match definition {
        Some(d) => d,
        None => app
            .generator()?
            .generate_definition(term)
            .with_context(|| format!("Failed to generate a definition for \"{}\"", term))?,
    };

    let mut list = app.card_list(deck.id)?;
    let card = list.add(term, &definition).context("Failed to add card")?.clone();
    let position = list.len();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card_json(position, &card))?);
        }
        OutputFormat::Plain => {
            println!("Added \"{}\" to \"{}\" at position {}", card.term, deck.name, position);
            println!("  {}", card.definition);
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn run_edit(
    app: &mut App,
    deck_name: &str,
    position: usize,
    term: Option<String>,
    definition: Option<String>,
    regenerate: bool,
    format: &OutputFormat,
) -> Result<()> {
    if term.is_none() && definition.is_none() && !regenerate {
        bail!("Nothing to change. Pass --term, --definition or --regenerate.");
    }

    let deck = app.find_deck(deck_name)?;
    let offset = to_offsets(&[position])?[0];

    let current = {
        let list = app.card_list(deck.id)?;
        match list.get(offset) {
            Some(card) => card.clone(),
            None => bail!("No card at position {} (deck has {} cards)", position, list.len()),
        }
    };

    let new_term = term.unwrap_or_else(|| current.term.clone());
    let new_definition = match definition {
        Some(d) => d,
        None if regenerate => app
            .generator()?
            .generate_definition(&new_term)
            .with_context(|| format!("Failed to generate a definition for \"{}\"", new_term))?,
        None => current.definition.clone(),
    };

    let mut list = app.card_list(deck.id)?;
    let card = list
        .update(current.id, &new_term, &new_definition)
        .context("Failed to update card")?
        .clone();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card_json(position, &card))?);
        }
        OutputFormat::Plain => {
            println!("Updated card {} in \"{}\"", position, deck.name);
            println!("  {}", card.term);
            println!("  {}", card.definition);
        }
    }

    Ok(())
}

pub fn run_delete(
    app: &mut App,
    deck_name: &str,
    positions: &[usize],
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let offsets = to_offsets(positions)?;

    let mut list = app.card_list(deck.id)?;
    let removed = list.delete_at(&offsets).context("Failed to delete cards")?;
    let remaining = list.len();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "deckId": deck.id.to_string(),
                "deleted": removed,
                "remaining": remaining,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Deleted {} cards from \"{}\" ({} left)", removed, deck.name, remaining);
        }
    }

    Ok(())
}
