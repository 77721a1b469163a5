use crate::stores::Stores;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Settings, campaign, playlist and pitch stores. PostgreSQL in production.
    pub stores: Stores,
}
