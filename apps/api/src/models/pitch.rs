use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Status assigned to pitches created by automatic matching.
pub const STATUS_MATCHED: &str = "matched";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PitchRow {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub client_id: Uuid,
    pub track_link: String,
    pub playlist_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a pitch. Id and timestamp are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPitch {
    pub campaign_id: Uuid,
    pub client_id: Uuid,
    pub track_link: String,
    pub playlist_id: Uuid,
    pub status: String,
}
