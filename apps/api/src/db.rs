use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the matching tables if they do not exist yet.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS matching_settings (
        id          SMALLINT PRIMARY KEY,
        attributes  JSONB NOT NULL,
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS campaigns (
        id          UUID PRIMARY KEY,
        client_id   UUID NOT NULL,
        track_link  TEXT NOT NULL,
        pitches     INTEGER NOT NULL DEFAULT 0,
        data        JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS playlists (
        id          UUID PRIMARY KEY,
        name        TEXT NOT NULL,
        data        JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    // One pitch per (campaign, playlist); PgStore relies on this for ON CONFLICT
    r#"
    CREATE TABLE IF NOT EXISTS pitches (
        id           UUID PRIMARY KEY,
        campaign_id  UUID NOT NULL REFERENCES campaigns (id),
        client_id    UUID NOT NULL,
        track_link   TEXT NOT NULL,
        playlist_id  UUID NOT NULL REFERENCES playlists (id),
        status       TEXT NOT NULL,
        created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (campaign_id, playlist_id)
    )
    "#,
];
