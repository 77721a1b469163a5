mod config;
mod db;
mod errors;
mod matching;
mod models;
mod routes;
mod state;
mod stores;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::matching::settings::get_matching_settings;
use crate::routes::build_router;
use crate::state::AppState;
use crate::stores::postgres::PgStore;
use crate::stores::Stores;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Matcher API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;
    init_schema(&db).await?;
    let stores = Stores::from_backend(PgStore::new(db));

    // Surface malformed stored settings at startup rather than on first request
    let settings = get_matching_settings(stores.settings.as_ref()).await?;
    info!(
        "Matching settings: {} attributes, {} total points",
        settings.attributes.len(),
        settings.total_points()
    );

    // Build app state
    let state = AppState { stores };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the admin UI host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
