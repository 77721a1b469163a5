//! Loading and saving the matching configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::matching::attributes::MatchingConfiguration;
use crate::stores::SettingsStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSettingsOutcome {
    pub success: bool,
    pub message: String,
}

/// Current configuration, falling back to the built-in default when nothing
/// has been stored.
pub async fn get_matching_settings(store: &dyn SettingsStore) -> Result<MatchingConfiguration> {
    match store.load_settings().await? {
        Some(config) => Ok(config),
        None => {
            debug!("No stored matching settings, using defaults");
            Ok(MatchingConfiguration::default())
        }
    }
}

/// Validates and persists a configuration. Failures are reported in the
/// outcome, never as an error.
pub async fn save_matching_settings(
    store: &dyn SettingsStore,
    config: &MatchingConfiguration,
) -> SaveSettingsOutcome {
    if let Err(reason) = config.validate() {
        return SaveSettingsOutcome {
            success: false,
            message: reason,
        };
    }

    match store.store_settings(config).await {
        Ok(()) => SaveSettingsOutcome {
            success: true,
            message: "Matching settings saved".to_string(),
        },
        Err(e) => {
            error!("Failed to save matching settings: {e:?}");
            SaveSettingsOutcome {
                success: false,
                message: "Failed to save matching settings".to_string(),
            }
        }
    }
}
