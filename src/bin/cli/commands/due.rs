use anyhow::Result;
use chrono::Utc;

use glossa_lib::commands::vocabulary as vocab;

use crate::app::{command_error, App};
use crate::commands::list::print_table;
use crate::OutputFormat;

pub fn run(app: &App, limit: Option<usize>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let mut due = vocab::list_due_entries(app.store(), Utc::now()).map_err(command_error)?;
    let total = due.len();
    if let Some(limit) = limit {
        due.truncate(limit);
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&due)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due for review.");
                return Ok(());
            }
            print_table(&due, use_color);
            if due.len() < total {
                println!("\n{} of {} due words shown", due.len(), total);
            } else {
                println!("\n{} words due", total);
            }
        }
    }

    Ok(())
}
