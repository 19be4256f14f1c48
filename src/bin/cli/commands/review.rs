use anyhow::Result;
use chrono::Utc;

use glossa_lib::commands::vocabulary as vocab;

use crate::app::{command_error, parse_id, App};
use crate::render::terminal::{due_label, score_label};
use crate::OutputFormat;

pub fn run(app: &App, id: &str, score: i64, format: &OutputFormat, use_color: bool) -> Result<()> {
    let entry_id = parse_id(id)?;
    let entry = vocab::submit_review(app.store(), entry_id, score).map_err(command_error)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        OutputFormat::Plain => {
            println!("Reviewed \"{}\": {}", entry.word, score_label(&entry));
            if let Some(next) = entry.next_review_date {
                println!(
                    "  Next review: {} ({})",
                    next.format("%Y-%m-%d"),
                    due_label(&entry, Utc::now(), use_color)
                );
            }
        }
    }

    Ok(())
}
