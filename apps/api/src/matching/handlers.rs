//! Axum route handlers for the Matching API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::attributes::{AttributeDefinition, MatchingConfiguration};
use crate::matching::auto_pitch::{auto_match_campaign, AutoMatchOutcome};
use crate::matching::scoring::{rank_playlists, MatchResult};
use crate::matching::settings::{
    get_matching_settings, save_matching_settings, SaveSettingsOutcome,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub attributes: Vec<AttributeDefinition>,
    pub primary: Vec<String>,   // attribute ids
    pub secondary: Vec<String>, // attribute ids
    pub total_points: u32,
}

impl From<MatchingConfiguration> for SettingsResponse {
    fn from(config: MatchingConfiguration) -> Self {
        let ids = |attrs: &[AttributeDefinition]| attrs.iter().map(|a| a.id.clone()).collect();
        Self {
            primary: ids(config.primary()),
            secondary: ids(config.secondary()),
            total_points: config.total_points(),
            attributes: config.attributes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MatchesQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RankedMatch {
    #[serde(flatten)]
    pub result: MatchResult,
    pub match_percentage: u32,
    pub passes_required: bool,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub campaign_id: Uuid,
    pub evaluated: usize,
    pub matches: Vec<RankedMatch>,
}

#[derive(Debug, Serialize)]
pub struct CampaignMatchSummary {
    pub campaign_id: Uuid,
    pub requested_pitches: i32,
    pub qualifying_playlists: usize,
    pub best_score: Option<u32>,
    pub best_percentage: Option<u32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/matching/settings
pub async fn handle_get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, AppError> {
    let config = get_matching_settings(state.stores.settings.as_ref()).await?;
    Ok(Json(config.into()))
}

/// PUT /api/v1/matching/settings
///
/// Invalid configurations come back as `success: false`, not as an HTTP error.
pub async fn handle_save_settings(
    State(state): State<AppState>,
    Json(config): Json<MatchingConfiguration>,
) -> Json<SaveSettingsOutcome> {
    Json(save_matching_settings(state.stores.settings.as_ref(), &config).await)
}

/// POST /api/v1/matching/settings/reset
pub async fn handle_reset_settings(State(state): State<AppState>) -> Json<SaveSettingsOutcome> {
    info!("Resetting matching settings to defaults");
    let defaults = MatchingConfiguration::default();
    Json(save_matching_settings(state.stores.settings.as_ref(), &defaults).await)
}

/// GET /api/v1/campaigns/:id/matches?limit=N
///
/// Full ranking (optionally truncated) with per-attribute breakdowns.
/// Playlists failing a required attribute are included and flagged.
pub async fn handle_campaign_matches(
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
    Query(query): Query<MatchesQuery>,
) -> Result<Json<MatchesResponse>, AppError> {
    if query.limit == Some(0) {
        return Err(AppError::Validation("limit must be positive".to_string()));
    }

    let campaign = state
        .stores
        .campaigns
        .get_campaign(campaign_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Campaign {campaign_id} not found")))?;

    let config = get_matching_settings(state.stores.settings.as_ref()).await?;
    let playlists = state.stores.playlists.list_playlists().await?;

    let ranked = rank_playlists(&campaign, &playlists, &config);
    let evaluated = ranked.len();
    let limit = query.limit.unwrap_or(evaluated);

    let matches = ranked
        .into_iter()
        .take(limit)
        .map(|result| RankedMatch {
            match_percentage: result.match_percentage(),
            passes_required: result.passes_required(),
            result,
        })
        .collect();

    Ok(Json(MatchesResponse {
        campaign_id,
        evaluated,
        matches,
    }))
}

/// POST /api/v1/campaigns/:id/auto-match
pub async fn handle_auto_match(
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
) -> Json<AutoMatchOutcome> {
    Json(auto_match_campaign(&state.stores, campaign_id).await)
}

/// GET /api/v1/matching/summary
///
/// One line per campaign: how many playlists pass every required attribute
/// and the best score among them.
pub async fn handle_matching_summary(
    State(state): State<AppState>,
) -> Result<Json<Vec<CampaignMatchSummary>>, AppError> {
    let config = get_matching_settings(state.stores.settings.as_ref()).await?;
    let campaigns = state.stores.campaigns.list_campaigns().await?;
    let playlists = state.stores.playlists.list_playlists().await?;

    let summary = campaigns
        .iter()
        .map(|campaign| {
            let qualifying: Vec<MatchResult> = rank_playlists(campaign, &playlists, &config)
                .into_iter()
                .filter(MatchResult::passes_required)
                .collect();
            let best = qualifying.first();
            CampaignMatchSummary {
                campaign_id: campaign.id,
                requested_pitches: campaign.pitches,
                qualifying_playlists: qualifying.len(),
                best_score: best.map(|r| r.score),
                best_percentage: best.map(MatchResult::match_percentage),
            }
        })
        .collect();

    Ok(Json(summary))
}
