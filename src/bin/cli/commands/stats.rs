use anyhow::Result;
use chrono::Utc;

use glossa_lib::commands::vocabulary as vocab;

use crate::app::{command_error, App};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let stats = vocab::review_stats(app.store(), Utc::now()).map_err(command_error)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("Retention:  {}%", stats.retention_score);
            println!("Words:      {}", stats.total_entries);
            println!("  new:      {}", stats.new_entries);
            println!("  due:      {}", stats.due_entries);
            println!("  learned:  {}", stats.learned_entries);
            println!();
            println!("Scores:");
            for (index, count) in stats.score_distribution.iter().enumerate() {
                println!("  {}: {}", index + 1, count);
            }
        }
    }

    Ok(())
}
