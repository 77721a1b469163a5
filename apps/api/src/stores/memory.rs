//! In-memory store used by tests.

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::matching::attributes::MatchingConfiguration;
use crate::models::campaign::CampaignRow;
use crate::models::pitch::{NewPitch, PitchRow};
use crate::models::playlist::PlaylistRow;
use crate::stores::{CampaignStore, PitchStore, PlaylistStore, SettingsStore};

#[derive(Default)]
pub struct MemoryStore {
    pub settings: Mutex<Option<MatchingConfiguration>>,
    pub campaigns: Vec<CampaignRow>,
    pub playlists: Vec<PlaylistRow>,
    /// Every pitch creation request, in call order.
    pub requested: Mutex<Vec<NewPitch>>,
    /// Playlists for which `create_pitch` returns `Ok(None)`.
    pub decline_playlists: HashSet<Uuid>,
    /// Playlists for which `create_pitch` returns an error.
    pub error_playlists: HashSet<Uuid>,
    /// Makes `list_playlists` fail.
    pub catalog_unavailable: bool,
}

impl MemoryStore {
    pub fn requested_playlists(&self) -> Vec<Uuid> {
        self.requested
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.playlist_id)
            .collect()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load_settings(&self) -> Result<Option<MatchingConfiguration>> {
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn store_settings(&self, config: &MatchingConfiguration) -> Result<()> {
        *self.settings.lock().unwrap() = Some(config.clone());
        Ok(())
    }
}

#[async_trait]
impl CampaignStore for MemoryStore {
    async fn get_campaign(&self, id: Uuid) -> Result<Option<CampaignRow>> {
        Ok(self.campaigns.iter().find(|c| c.id == id).cloned())
    }

    async fn list_campaigns(&self) -> Result<Vec<CampaignRow>> {
        Ok(self.campaigns.clone())
    }
}

#[async_trait]
impl PlaylistStore for MemoryStore {
    async fn list_playlists(&self) -> Result<Vec<PlaylistRow>> {
        if self.catalog_unavailable {
            return Err(anyhow!("playlist catalog unavailable"));
        }
        Ok(self.playlists.clone())
    }
}

#[async_trait]
impl PitchStore for MemoryStore {
    async fn create_pitch(&self, pitch: NewPitch) -> Result<Option<PitchRow>> {
        self.requested.lock().unwrap().push(pitch.clone());

        if self.error_playlists.contains(&pitch.playlist_id) {
            return Err(anyhow!("insert failed for playlist {}", pitch.playlist_id));
        }
        if self.decline_playlists.contains(&pitch.playlist_id) {
            return Ok(None);
        }
        Ok(Some(PitchRow {
            id: Uuid::new_v4(),
            campaign_id: pitch.campaign_id,
            client_id: pitch.client_id,
            track_link: pitch.track_link,
            playlist_id: pitch.playlist_id,
            status: pitch.status,
            created_at: Utc::now(),
        }))
    }
}
