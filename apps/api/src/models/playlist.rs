use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlaylistRow {
    pub id: Uuid,
    pub name: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}
