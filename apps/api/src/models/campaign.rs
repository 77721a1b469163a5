use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A promotion request for one track. `data` holds the descriptive fields
/// (genre, language, mood, tier, ...) the matching engine addresses by path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CampaignRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub track_link: String,
    /// Number of playlist placements requested.
    pub pitches: i32,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}
