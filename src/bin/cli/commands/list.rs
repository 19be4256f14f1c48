use anyhow::Result;
use chrono::Utc;

use glossa_lib::commands::vocabulary as vocab;
use glossa_lib::vocabulary::{EntryFilter, VocabularyEntry};

use crate::app::{command_error, parse_id, App};
use crate::render::terminal::{due_label, score_label, truncate, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    language: Option<String>,
    book: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let filter = EntryFilter {
        language,
        book_id: book.map(parse_id).transpose()?,
    };
    let entries = vocab::list_entries(app.store(), &filter).map_err(command_error)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Plain => {
            if entries.is_empty() {
                println!("No words captured yet.");
                return Ok(());
            }
            print_table(&entries, use_color);
            println!("\n{} words total", entries.len());
        }
    }

    Ok(())
}

/// Print entries as an aligned table
pub fn print_table(entries: &[VocabularyEntry], use_color: bool) {
    let now = Utc::now();
    let word_width = entries
        .iter()
        .map(|e| e.word.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 30);
    let translation_width = 24;

    println!(
        "{:<36} {:<ww$} {:<4} {:<tw$} {:<5} {}",
        "ID", "Word", "Lang", "Translation", "Score", "Next review",
        ww = word_width, tw = translation_width
    );
    println!(
        "{} {} {} {} {} {}",
        "\u{2500}".repeat(36),
        "\u{2500}".repeat(word_width),
        "\u{2500}".repeat(4),
        "\u{2500}".repeat(translation_width),
        "\u{2500}".repeat(5),
        "\u{2500}".repeat(11)
    );

    for entry in entries {
        let word = truncate(&entry.word, word_width);
        let word = if use_color {
            // Pad before coloring so escape codes don't break alignment
            format!("{}{:<ww$}{}", Color::BOLD, word, Color::RESET, ww = word_width)
        } else {
            format!("{:<ww$}", word, ww = word_width)
        };
        let translation = truncate(entry.translation.as_deref().unwrap_or(""), translation_width);

        println!(
            "{:<36} {} {:<4} {:<tw$} {:<5} {}",
            entry.id,
            word,
            truncate(&entry.language, 4),
            translation,
            score_label(entry),
            due_label(entry, now, use_color),
            tw = translation_width
        );
    }
}
