use anyhow::Result;

use glossa_lib::commands::vocabulary as vocab;

use crate::app::{command_error, parse_id, App};
use crate::OutputFormat;

pub fn run(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    let entry_id = parse_id(id)?;
    vocab::delete_entry(app.store(), entry_id).map_err(command_error)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "id": entry_id.to_string(), "deleted": true });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("Deleted {}", entry_id),
    }

    Ok(())
}
