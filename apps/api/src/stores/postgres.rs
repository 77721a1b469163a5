use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::matching::attributes::MatchingConfiguration;
use crate::models::campaign::CampaignRow;
use crate::models::pitch::{NewPitch, PitchRow};
use crate::models::playlist::PlaylistRow;
use crate::stores::{CampaignStore, PitchStore, PlaylistStore, SettingsStore};

/// Matching settings live in a single row keyed by this id.
const SETTINGS_ROW_ID: i16 = 1;

/// PostgreSQL backend for every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn load_settings(&self) -> Result<Option<MatchingConfiguration>> {
        let stored: Option<Value> =
            sqlx::query_scalar("SELECT attributes FROM matching_settings WHERE id = $1")
                .bind(SETTINGS_ROW_ID)
                .fetch_optional(&self.pool)
                .await?;

        stored
            .map(|raw| {
                serde_json::from_value(raw).context("Stored matching settings are malformed")
            })
            .transpose()
    }

    async fn store_settings(&self, config: &MatchingConfiguration) -> Result<()> {
        let attributes = serde_json::to_value(config)?;
        sqlx::query(
            r#"
            INSERT INTO matching_settings (id, attributes, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (id) DO UPDATE
                SET attributes = EXCLUDED.attributes,
                    updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(SETTINGS_ROW_ID)
        .bind(&attributes)
        .execute(&self.pool)
        .await?;

        info!(
            "Saved matching settings ({} attributes)",
            config.attributes.len()
        );
        Ok(())
    }
}

#[async_trait]
impl CampaignStore for PgStore {
    async fn get_campaign(&self, id: Uuid) -> Result<Option<CampaignRow>> {
        Ok(
            sqlx::query_as::<_, CampaignRow>("SELECT * FROM campaigns WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_campaigns(&self) -> Result<Vec<CampaignRow>> {
        Ok(
            sqlx::query_as::<_, CampaignRow>("SELECT * FROM campaigns ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }
}

#[async_trait]
impl PlaylistStore for PgStore {
    async fn list_playlists(&self) -> Result<Vec<PlaylistRow>> {
        Ok(
            sqlx::query_as::<_, PlaylistRow>("SELECT * FROM playlists ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?,
        )
    }
}

#[async_trait]
impl PitchStore for PgStore {
    async fn create_pitch(&self, pitch: NewPitch) -> Result<Option<PitchRow>> {
        Ok(sqlx::query_as::<_, PitchRow>(
            r#"
            INSERT INTO pitches (id, campaign_id, client_id, track_link, playlist_id, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (campaign_id, playlist_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(pitch.campaign_id)
        .bind(pitch.client_id)
        .bind(&pitch.track_link)
        .bind(pitch.playlist_id)
        .bind(&pitch.status)
        .fetch_optional(&self.pool)
        .await?)
    }
}
