use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

use tango_lib::flashcards::{ActivityLog, StudySession};

use crate::app::App;

const HELP: &str = "[Enter/f] flip  [n] next  [q] quit";

/// How an interactive session ended
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Quit,
}

pub fn run<R: BufRead, W: Write>(
    app: &mut App,
    deck_name: &str,
    input: R,
    mut output: W,
) -> Result<()> {
    let deck = app.find_deck(deck_name)?;

    let session = {
        let list = app.card_list(deck.id)?;
        if list.is_empty() {
            bail!("\"{}\" has no cards to study. Add some with `tango card add`.", deck.name);
        }
        list.start_session()?
    };
    let card_count = session.card_count();

    writeln!(output, "{}", deck.name)?;
    writeln!(output, "{}", HELP)?;

    match drive(session, input, &mut output)? {
        Outcome::Completed => {
            writeln!(output, "Study complete! {} cards reviewed.", card_count)?;
            app.repo
                .record_activity(&ActivityLog::study_completed(deck.id, card_count))
                .context("Failed to record study session")?;
        }
        Outcome::Quit => {
            writeln!(output, "Stopped early.")?;
        }
    }

    Ok(())
}

/// Run the session loop, reading one command per line
pub fn drive<R: BufRead, W: Write>(
    mut session: StudySession,
    input: R,
    output: &mut W,
) -> Result<Outcome> {
    show(&session, output)?;

    for line in input.lines() {
        let line = line?;
        match line.trim() {
            "" | "f" => session.flip(),
            "n" => session.advance(),
            "q" => return Ok(Outcome::Quit),
            other => {
                writeln!(output, "Unknown command '{}'. {}", other, HELP)?;
                continue;
            }
        }

        if session.is_completed() {
            return Ok(Outcome::Completed);
        }
        show(&session, output)?;
    }

    // Input closed before the last card
    Ok(Outcome::Quit)
}

fn show<W: Write>(session: &StudySession, output: &mut W) -> Result<()> {
    let side = if session.face_up() { "term" } else { "definition" };
    writeln!(output)?;
    writeln!(output, "[{}] {}", session.progress_text(), side)?;
    writeln!(output, "  {}", session.visible_text().unwrap_or(""))?;
    output.flush()?;
    Ok(())
}
