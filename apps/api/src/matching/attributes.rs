//! Attribute configuration. The ordered list of dimensions a campaign is
//! matched on, with point values and field-path mappings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Number of leading attributes shown as the "primary" group in listings.
pub const PRIMARY_ATTRIBUTE_COUNT: usize = 4;

/// How an attribute decides whether two values match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeKind {
    /// Equality / set-overlap semantics.
    Standard,
    /// Numeric tolerance: matched iff `|campaign - playlist| <= max_difference`.
    TierGap { max_difference: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub id: String,
    pub name: String,
    pub required: bool,
    pub points: u32,
    pub source_campaign_field: String,
    pub source_playlist_field: String,
    #[serde(default = "standard_kind")]
    pub kind: AttributeKind,
}

fn standard_kind() -> AttributeKind {
    AttributeKind::Standard
}

impl AttributeDefinition {
    /// Standard attribute reading the same field path on both sides.
    pub fn standard(id: &str, name: &str, required: bool, points: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            required,
            points,
            source_campaign_field: id.to_string(),
            source_playlist_field: id.to_string(),
            kind: AttributeKind::Standard,
        }
    }

    pub fn tier_gap(
        id: &str,
        name: &str,
        required: bool,
        points: u32,
        field: &str,
        max_difference: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            required,
            points,
            source_campaign_field: field.to_string(),
            source_playlist_field: field.to_string(),
            kind: AttributeKind::TierGap { max_difference },
        }
    }
}

/// Ordered attribute list loaded once per ranking run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchingConfiguration {
    pub attributes: Vec<AttributeDefinition>,
}

impl MatchingConfiguration {
    pub fn new(attributes: Vec<AttributeDefinition>) -> Self {
        Self { attributes }
    }

    /// Theoretical maximum score: every attribute matched.
    pub fn total_points(&self) -> u32 {
        self.attributes
            .iter()
            .fold(0_u32, |total, a| total.saturating_add(a.points))
    }

    pub fn primary(&self) -> &[AttributeDefinition] {
        let split = PRIMARY_ATTRIBUTE_COUNT.min(self.attributes.len());
        &self.attributes[..split]
    }

    pub fn secondary(&self) -> &[AttributeDefinition] {
        let split = PRIMARY_ATTRIBUTE_COUNT.min(self.attributes.len());
        &self.attributes[split..]
    }

    /// Checks the structural rules an administrator must respect when saving:
    /// unique ids, non-empty field paths and a point total that fits in `u32`.
    /// Scoring never calls this.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        let mut total = 0_u32;
        for attribute in &self.attributes {
            total = total.checked_add(attribute.points).ok_or_else(|| {
                format!("Point total overflows at attribute '{}'", attribute.id)
            })?;
            if attribute.id.trim().is_empty() {
                return Err("Attribute id cannot be empty".to_string());
            }
            if !seen.insert(attribute.id.as_str()) {
                return Err(format!("Duplicate attribute id '{}'", attribute.id));
            }
            if attribute.source_campaign_field.trim().is_empty()
                || attribute.source_playlist_field.trim().is_empty()
            {
                return Err(format!(
                    "Attribute '{}' must map both a campaign and a playlist field",
                    attribute.id
                ));
            }
        }
        Ok(())
    }
}

/// Configuration used when nothing has been saved yet.
impl Default for MatchingConfiguration {
    fn default() -> Self {
        Self::new(vec![
            AttributeDefinition::standard("genre", "Genre", true, 20),
            AttributeDefinition::standard("language", "Language", true, 20),
            AttributeDefinition::standard("vocal_type", "Vocal Type", true, 20),
            AttributeDefinition::tier_gap("tier_gap", "Tier Gap", true, 20, "tier", 5),
            AttributeDefinition::standard("subgenre", "Subgenre", false, 10),
            AttributeDefinition::standard("mood", "Mood", false, 15),
            AttributeDefinition::standard("tempo", "Tempo", false, 10),
        ])
    }
}
