//! Storage collaborators of the matching engine.
//!
//! Each concern is an async trait so the engine can be driven by PostgreSQL
//! in production and by in-memory fakes in tests. `AppState` carries them as
//! `Arc<dyn ...>` inside [`Stores`].

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::matching::attributes::MatchingConfiguration;
use crate::models::campaign::CampaignRow;
use crate::models::pitch::{NewPitch, PitchRow};
use crate::models::playlist::PlaylistRow;

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Stored configuration, or `None` if nothing was saved yet.
    async fn load_settings(&self) -> Result<Option<MatchingConfiguration>>;

    async fn store_settings(&self, config: &MatchingConfiguration) -> Result<()>;
}

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn get_campaign(&self, id: Uuid) -> Result<Option<CampaignRow>>;

    async fn list_campaigns(&self) -> Result<Vec<CampaignRow>>;
}

#[async_trait]
pub trait PlaylistStore: Send + Sync {
    async fn list_playlists(&self) -> Result<Vec<PlaylistRow>>;
}

#[async_trait]
pub trait PitchStore: Send + Sync {
    /// Creates one pitch. `Ok(None)` means the store declined to create it.
    async fn create_pitch(&self, pitch: NewPitch) -> Result<Option<PitchRow>>;
}

/// Bundle of store handles shared by the handlers.
#[derive(Clone)]
pub struct Stores {
    pub settings: Arc<dyn SettingsStore>,
    pub campaigns: Arc<dyn CampaignStore>,
    pub playlists: Arc<dyn PlaylistStore>,
    pub pitches: Arc<dyn PitchStore>,
}

impl Stores {
    /// Uses one backend for every concern.
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: SettingsStore + CampaignStore + PlaylistStore + PitchStore + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            settings: backend.clone(),
            campaigns: backend.clone(),
            playlists: backend.clone(),
            pitches: backend,
        }
    }
}
