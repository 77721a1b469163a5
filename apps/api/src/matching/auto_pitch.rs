//! Auto-pitch orchestration — turns the top qualifying matches for a
//! campaign into pitch records.
//!
//! Flow: rank → drop results failing a required attribute → take the
//! campaign's requested count → create pitches one at a time, in rank order.
//! Callers always get an `AutoMatchOutcome`; nothing propagates as an error.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::matching::attributes::MatchingConfiguration;
use crate::matching::scoring::{rank_playlists, MatchResult};
use crate::matching::settings::get_matching_settings;
use crate::models::campaign::CampaignRow;
use crate::models::pitch::{NewPitch, PitchRow, STATUS_MATCHED};
use crate::models::playlist::PlaylistRow;
use crate::stores::{PitchStore, Stores};

const NO_PITCHES_REQUIRED: &str = "No pitches required for this campaign";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoMatchOutcome {
    pub success: bool,
    pub message: String,
    pub pitches: Vec<PitchRow>,
}

impl AutoMatchOutcome {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            pitches: Vec::new(),
        }
    }
}

/// Ranks `playlists` for `campaign` and pitches the top qualifying ones.
pub async fn auto_match(
    campaign: &CampaignRow,
    playlists: &[PlaylistRow],
    config: &MatchingConfiguration,
    pitch_store: &dyn PitchStore,
) -> AutoMatchOutcome {
    let requested = usize::try_from(campaign.pitches).unwrap_or(0);
    if requested == 0 {
        return AutoMatchOutcome::failure(NO_PITCHES_REQUIRED);
    }

    let selected: Vec<MatchResult> = rank_playlists(campaign, playlists, config)
        .into_iter()
        .filter(MatchResult::passes_required)
        .take(requested)
        .collect();

    if selected.is_empty() {
        info!("Campaign {}: no playlist passed required attributes", campaign.id);
        return AutoMatchOutcome::failure("No matching playlists found");
    }

    // One awaited create at a time, in rank order.
    let mut pitches = Vec::with_capacity(selected.len());
    for result in &selected {
        let new_pitch = NewPitch {
            campaign_id: campaign.id,
            client_id: campaign.client_id,
            track_link: campaign.track_link.clone(),
            playlist_id: result.playlist.id,
            status: STATUS_MATCHED.to_string(),
        };

        match pitch_store.create_pitch(new_pitch).await {
            Ok(Some(pitch)) => pitches.push(pitch),
            Ok(None) => warn!(
                "Pitch for campaign {} / playlist {} was not created",
                campaign.id, result.playlist.id
            ),
            Err(e) => warn!(
                "Pitch creation failed for campaign {} / playlist {}: {e}",
                campaign.id, result.playlist.id
            ),
        }
    }

    info!(
        "Campaign {}: {} of {} selected pitches created",
        campaign.id,
        pitches.len(),
        selected.len()
    );

    AutoMatchOutcome {
        success: true,
        message: format!(
            "Successfully matched campaign with {} playlists",
            pitches.len()
        ),
        pitches,
    }
}

/// Loads settings, campaign and catalog from the stores and runs
/// [`auto_match`]. Store failures become a failure outcome.
pub async fn auto_match_campaign(stores: &Stores, campaign_id: Uuid) -> AutoMatchOutcome {
    match load_and_match(stores, campaign_id).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Automatic matching failed for campaign {campaign_id}: {e:?}");
            AutoMatchOutcome::failure("An error occurred during automatic matching")
        }
    }
}

async fn load_and_match(stores: &Stores, campaign_id: Uuid) -> Result<AutoMatchOutcome> {
    let Some(campaign) = stores.campaigns.get_campaign(campaign_id).await? else {
        return Ok(AutoMatchOutcome::failure("Campaign not found"));
    };
    if campaign.pitches <= 0 {
        return Ok(AutoMatchOutcome::failure(NO_PITCHES_REQUIRED));
    }
    let config = get_matching_settings(stores.settings.as_ref()).await?;
    let playlists = stores.playlists.list_playlists().await?;

    Ok(auto_match(&campaign, &playlists, &config, stores.pitches.as_ref()).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::attributes::AttributeDefinition;
    use crate::matching::scoring::tests::{make_campaign, make_playlist, sample_campaign};
    use crate::stores::memory::MemoryStore;
    use serde_json::json;

    fn qualifying(name: &str) -> PlaylistRow {
        make_playlist(
            name,
            json!({
                "genre": "pop",
                "language": "english",
                "vocal_type": "female",
                "tier": 48
            }),
        )
    }

    #[tokio::test]
    async fn test_zero_pitches_short_circuits() {
        let store = MemoryStore::default();
        let campaign = sample_campaign(0);
        let outcome = auto_match(
            &campaign,
            &[qualifying("a")],
            &MatchingConfiguration::default(),
            &store,
        )
        .await;

        assert!(!outcome.success);
        assert!(outcome.pitches.is_empty());
        assert!(outcome.message.starts_with("No pitches required"));
        assert!(store.requested_playlists().is_empty());
    }

    #[tokio::test]
    async fn test_negative_pitches_short_circuits() {
        let store = MemoryStore::default();
        let outcome = auto_match(
            &sample_campaign(-2),
            &[qualifying("a")],
            &MatchingConfiguration::default(),
            &store,
        )
        .await;
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_required_veto_beats_higher_score() {
        let store = MemoryStore::default();
        let campaign = sample_campaign(1);
        // Misses required genre but hits every optional attribute.
        let high_but_vetoed = make_playlist(
            "vetoed",
            json!({
                "genre": "metal",
                "language": "english",
                "vocal_type": "female",
                "tier": 50,
                "subgenre": "synthpop",
                "mood": ["happy"],
                "tempo": "fast"
            }),
        );
        let plain = qualifying("plain");
        let plain_id = plain.id;

        let outcome = auto_match(
            &campaign,
            &[high_but_vetoed, plain],
            &MatchingConfiguration::default(),
            &store,
        )
        .await;

        assert!(outcome.success);
        assert_eq!(outcome.pitches.len(), 1);
        assert_eq!(outcome.pitches[0].playlist_id, plain_id);
        assert_eq!(store.requested_playlists(), vec![plain_id]);
    }

    #[tokio::test]
    async fn test_no_qualifying_playlists() {
        let store = MemoryStore::default();
        let outcome = auto_match(
            &sample_campaign(3),
            &[make_playlist("off", json!({ "genre": "jazz" }))],
            &MatchingConfiguration::default(),
            &store,
        )
        .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "No matching playlists found");
        assert!(outcome.pitches.is_empty());
    }

    #[tokio::test]
    async fn test_takes_top_n_in_rank_order() {
        let config = MatchingConfiguration::new(vec![
            AttributeDefinition::standard("genre", "Genre", true, 20),
            AttributeDefinition::standard("mood", "Mood", false, 15),
        ]);
        let campaign = make_campaign(2, json!({ "genre": "pop", "mood": "happy" }));
        let low = make_playlist("low", json!({ "genre": "pop" }));
        let high = make_playlist("high", json!({ "genre": "pop", "mood": "happy" }));
        let other = make_playlist("other", json!({ "genre": "pop" }));
        let (low_id, high_id) = (low.id, high.id);

        let store = MemoryStore::default();
        let outcome = auto_match(&campaign, &[low, high, other], &config, &store).await;

        assert!(outcome.success);
        assert_eq!(store.requested_playlists(), vec![high_id, low_id]);
        assert_eq!(
            outcome.message,
            "Successfully matched campaign with 2 playlists"
        );

        let requested = store.requested.lock().unwrap();
        let first = &requested[0];
        assert_eq!(first.campaign_id, campaign.id);
        assert_eq!(first.client_id, campaign.client_id);
        assert_eq!(first.track_link, campaign.track_link);
        assert_eq!(first.status, "matched");
    }

    #[tokio::test]
    async fn test_partial_pitch_failure_still_succeeds() {
        let playlists = vec![qualifying("a"), qualifying("b"), qualifying("c")];
        let mut store = MemoryStore::default();
        store.decline_playlists.insert(playlists[1].id);

        let outcome = auto_match(
            &sample_campaign(3),
            &playlists,
            &MatchingConfiguration::default(),
            &store,
        )
        .await;

        assert!(outcome.success);
        assert_eq!(outcome.pitches.len(), 2);
        assert_eq!(store.requested_playlists().len(), 3);
        assert_eq!(
            outcome.message,
            "Successfully matched campaign with 2 playlists"
        );
    }

    #[tokio::test]
    async fn test_pitch_store_error_is_skipped() {
        let playlists = vec![qualifying("a"), qualifying("b")];
        let mut store = MemoryStore::default();
        store.error_playlists.insert(playlists[0].id);

        let outcome = auto_match(
            &sample_campaign(2),
            &playlists,
            &MatchingConfiguration::default(),
            &store,
        )
        .await;

        assert!(outcome.success);
        assert_eq!(outcome.pitches.len(), 1);
        assert_eq!(outcome.pitches[0].playlist_id, playlists[1].id);
    }

    #[tokio::test]
    async fn test_auto_match_campaign_uses_stored_settings() {
        let campaign = make_campaign(5, json!({ "genre": "pop" }));
        let campaign_id = campaign.id;
        let store = MemoryStore {
            settings: std::sync::Mutex::new(Some(MatchingConfiguration::new(vec![
                AttributeDefinition::standard("genre", "Genre", true, 20),
            ]))),
            campaigns: vec![campaign],
            playlists: vec![
                make_playlist("pop", json!({ "genre": "Pop" })),
                make_playlist("rock", json!({ "genre": "rock" })),
            ],
            ..Default::default()
        };
        let stores = Stores::from_backend(store);

        let outcome = auto_match_campaign(&stores, campaign_id).await;
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.pitches.len(), 1);
    }

    #[tokio::test]
    async fn test_auto_match_campaign_unknown_campaign() {
        let stores = Stores::from_backend(MemoryStore::default());
        let outcome = auto_match_campaign(&stores, Uuid::new_v4()).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Campaign not found");
    }

    #[tokio::test]
    async fn test_auto_match_campaign_zero_pitches_never_loads_catalog() {
        let campaign = sample_campaign(0);
        let campaign_id = campaign.id;
        let stores = Stores::from_backend(MemoryStore {
            campaigns: vec![campaign],
            catalog_unavailable: true,
            ..Default::default()
        });

        let outcome = auto_match_campaign(&stores, campaign_id).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "No pitches required for this campaign");
        assert!(outcome.pitches.is_empty());
    }

    #[tokio::test]
    async fn test_auto_match_campaign_converts_store_errors() {
        let campaign = sample_campaign(2);
        let campaign_id = campaign.id;
        let stores = Stores::from_backend(MemoryStore {
            campaigns: vec![campaign],
            catalog_unavailable: true,
            ..Default::default()
        });

        let outcome = auto_match_campaign(&stores, campaign_id).await;
        assert!(!outcome.success);
        assert_eq!(
            outcome.message,
            "An error occurred during automatic matching"
        );
        assert!(outcome.pitches.is_empty());
    }
}
