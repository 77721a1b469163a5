//! Match predicate: decides whether a campaign value and a playlist value
//! agree on one attribute.

use std::borrow::Cow;

use serde_json::Value;

use crate::matching::attributes::{AttributeDefinition, AttributeKind};

/// Evaluates the attribute's predicate on two resolved values.
pub fn attribute_matches(
    attribute: &AttributeDefinition,
    campaign_value: Option<&Value>,
    playlist_value: Option<&Value>,
) -> bool {
    match attribute.kind {
        AttributeKind::Standard => values_match(campaign_value, playlist_value),
        AttributeKind::TierGap { max_difference } => {
            within_tier_gap(campaign_value, playlist_value, max_difference)
        }
    }
}

/// Equality / overlap semantics, in priority order:
/// 1. both arrays: at least one shared element
/// 2. one array: the array contains the scalar
/// 3. either side absent or null: both must be absent or null
/// 4. case-insensitive comparison of the string renderings
///
/// Array elements are compared with the same case-insensitive rule as scalars.
pub fn values_match(campaign_value: Option<&Value>, playlist_value: Option<&Value>) -> bool {
    match (campaign_value, playlist_value) {
        (Some(Value::Array(campaign)), Some(Value::Array(playlist))) => campaign
            .iter()
            .any(|c| playlist.iter().any(|p| scalars_equal(c, p))),
        (Some(Value::Array(items)), other) | (other, Some(Value::Array(items))) => {
            let scalar = other.unwrap_or(&Value::Null);
            items.iter().any(|item| scalars_equal(item, scalar))
        }
        (c, p) if is_absent(c) || is_absent(p) => is_absent(c) && is_absent(p),
        (Some(c), Some(p)) => scalars_equal(c, p),
        _ => false,
    }
}

/// Numeric tolerance check. Non-numeric or missing values count as 0.
pub fn within_tier_gap(
    campaign_value: Option<&Value>,
    playlist_value: Option<&Value>,
    max_difference: u32,
) -> bool {
    let campaign = coerce_number(campaign_value);
    let playlist = coerce_number(playlist_value);
    (campaign - playlist).abs() <= f64::from(max_difference)
}

fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn scalars_equal(a: &Value, b: &Value) -> bool {
    if a.is_null() || b.is_null() {
        return a.is_null() && b.is_null();
    }
    render(a).to_lowercase() == render(b).to_lowercase()
}

fn render(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Number(n) => match n.as_f64() {
            // 1.0 renders as "1", like integers
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
                Cow::Owned((f as i64).to_string())
            }
            _ => Cow::Owned(n.to_string()),
        },
        other => Cow::Owned(other.to_string()),
    }
}

fn coerce_number(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    number.filter(|n| n.is_finite()).unwrap_or(0.0)
}
