//! namegraph API - Dashboard server
//!
//! Serves the co-occurrence dashboard: the HTML page, the JSON graph data it
//! renders, and the hover readout it updates.

pub mod dashboard;
pub mod error;
pub mod handlers;
pub mod hover;
pub mod routes;
pub mod state;
pub mod stylesheet;

use std::sync::Arc;

use axum::{routing::get, Router};
use namegraph_core::{AppConfig, LoggingConfig};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::dashboard::index))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes());

    if let Some(dir) = &state.config.dashboard.assets_dir {
        tracing::info!("Serving dashboard assets from {}", dir.display());
        router = router.nest_service("/assets", ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", logging.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(logging.include_location)
        .with_line_number(logging.include_location);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Run the analysis for `config`, then serve the dashboard until terminated
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let addr = config.server.bind_addr();
    let state = Arc::new(AppState::prepare(config)?);
    tracing::info!(
        "Analysis ready: {} subjects, {} sentence edges, {} paragraph edges",
        state.analysis.subjects.len(),
        state.analysis.sentence_graph.edge_count(),
        state.analysis.paragraph_graph.edge_count()
    );

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Dashboard available at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

