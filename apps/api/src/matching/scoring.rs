//! Scoring & ranking — evaluates every configured attribute for a
//! (campaign, playlist) pair and orders a catalog by the resulting score.
//!
//! Pure and synchronous. The required-attribute veto is recorded in the
//! breakdown but NOT applied here; the auto-pitch orchestrator enforces it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::matching::attributes::MatchingConfiguration;
use crate::matching::field::resolve_field;
use crate::matching::predicate::attribute_matches;
use crate::models::campaign::CampaignRow;
use crate::models::playlist::PlaylistRow;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of one attribute for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub attribute_id: String,
    pub attribute_name: String,
    pub points: u32, // 0 or the attribute's full points
    pub matched: bool,
    pub required: bool,
    pub campaign_value: Option<Value>,
    pub playlist_value: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub playlist: PlaylistRow,
    pub score: u32,
    pub breakdown: Vec<BreakdownEntry>,
    /// Sum of all configured points, independent of outcomes.
    pub total_possible_points: u32,
}

impl MatchResult {
    /// Score as a rounded percentage of `total_possible_points`.
    pub fn match_percentage(&self) -> u32 {
        if self.total_possible_points == 0 {
            return 0;
        }
        ((f64::from(self.score) / f64::from(self.total_possible_points)) * 100.0).round() as u32
    }

    /// False if any required attribute failed to match.
    pub fn passes_required(&self) -> bool {
        !self.breakdown.iter().any(|e| e.required && !e.matched)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores one playlist against one campaign.
pub fn score_playlist(
    campaign: &CampaignRow,
    playlist: &PlaylistRow,
    config: &MatchingConfiguration,
) -> MatchResult {
    let mut score = 0_u32;
    let mut total_possible_points = 0_u32;
    let mut breakdown = Vec::with_capacity(config.attributes.len());

    for attribute in &config.attributes {
        let campaign_value = resolve_field(&campaign.data, &attribute.source_campaign_field);
        let playlist_value = resolve_field(&playlist.data, &attribute.source_playlist_field);
        let matched = attribute_matches(attribute, campaign_value, playlist_value);

        // Stored settings are not re-validated; sums saturate at u32::MAX.
        total_possible_points = total_possible_points.saturating_add(attribute.points);

        // Required failures fall through as a plain zero-point entry; later
        // attributes are still evaluated.
        let points = if matched { attribute.points } else { 0 };
        score = score.saturating_add(points);

        breakdown.push(BreakdownEntry {
            attribute_id: attribute.id.clone(),
            attribute_name: attribute.name.clone(),
            points,
            matched,
            required: attribute.required,
            campaign_value: campaign_value.cloned(),
            playlist_value: playlist_value.cloned(),
        });
    }

    MatchResult {
        playlist: playlist.clone(),
        score,
        breakdown,
        total_possible_points,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ranking
// ────────────────────────────────────────────────────────────────────────────

/// Scores the whole catalog and sorts by score, highest first.
/// Equal scores keep catalog order.
pub fn rank_playlists(
    campaign: &CampaignRow,
    playlists: &[PlaylistRow],
    config: &MatchingConfiguration,
) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = playlists
        .iter()
        .map(|playlist| score_playlist(campaign, playlist, config))
        .collect();

    // sort_by is stable
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
