use anyhow::{anyhow, Context, Result};

use glossa_lib::server;

use crate::app::App;

pub fn run(app: App, bind: Option<String>) -> Result<()> {
    let mut server_config = app.config.server.clone();
    if let Some(bind) = bind {
        server_config.bind = bind;
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(server::start_server(&server_config, app.store))
        .map_err(|e| anyhow!("Server error: {}", e))
}
