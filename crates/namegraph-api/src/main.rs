//! namegraph dashboard server
//!
//! Reads configuration from the file named by `NAMEGRAPH_CONFIG` (if set)
//! and the `NAMEGRAPH_*` environment variables, runs the analysis once, and
//! serves the dashboard.

use namegraph_api::{init_tracing, serve};
use namegraph_core::AppConfig;
use std::path::PathBuf;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os("NAMEGRAPH_CONFIG").map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    init_tracing(&config.logging);
    tracing::info!("namegraph dashboard starting on http://{}", config.server.bind_addr());

    serve(config).await
}
