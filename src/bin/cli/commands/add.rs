use anyhow::Result;

use glossa_lib::commands::vocabulary as vocab;
use glossa_lib::vocabulary::NewEntry;

use crate::app::{command_error, parse_id, App};
use crate::OutputFormat;

#[allow(clippy::too_many_arguments)]
pub fn run(
    app: &App,
    word: String,
    language: String,
    translation: Option<String>,
    context: Option<String>,
    notes: Option<String>,
    book: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let request = NewEntry {
        word,
        language,
        translation,
        context,
        notes,
        book_id: book.map(parse_id).transpose()?,
    };

    let entry = vocab::capture_entry(app.store(), request).map_err(command_error)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        OutputFormat::Plain => {
            println!("Captured \"{}\" ({})", entry.word, entry.language);
            if let Some(translation) = &entry.translation {
                println!("  Translation: {}", translation);
            }
            println!("  ID: {}", entry.id);
        }
    }

    Ok(())
}
