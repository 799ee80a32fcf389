use anyhow::{Context, Result};

use tango_lib::flashcards::ActivityKind;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let entries = app.repo.list_activity().context("Failed to read activity log")?;
    let decks = app.repo.list_decks().context("Failed to list decks")?;

    let deck_name = |id: Option<uuid::Uuid>| -> String {
        id.and_then(|id| decks.iter().find(|d| d.id == id))
            .map(|d| d.name.clone())
            .unwrap_or_else(|| "(deleted deck)".to_string())
    };

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = entries
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "id": e.id.to_string(),
                        "kind": e.kind,
                        "deckId": e.deck_id.map(|d| d.to_string()),
                        "deckName": deck_name(e.deck_id),
                        "cardCount": e.card_count,
                        "createdAt": e.created_at.to_rfc3339(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if entries.is_empty() {
                println!("(no study sessions yet)");
            }
            for entry in &entries {
                let when = entry.created_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M");
                match entry.kind {
                    ActivityKind::StudyCompleted => println!(
                        "{}  studied {} ({} cards)",
                        when,
                        deck_name(entry.deck_id),
                        entry.card_count
                    ),
                }
            }
        }
    }

    Ok(())
}
