use restock_core::UrgencyLevel;

use crate::config::UrgencyThresholds;

/// Classify a triggered reorder.
///
/// Only meaningful once `on_hand <= reorder_point`; untriggered items get no
/// plan and therefore no urgency.
pub fn classify(on_hand: i64, reorder_point: i64, thresholds: &UrgencyThresholds) -> UrgencyLevel {
    if on_hand <= thresholds.high_at_or_below {
        UrgencyLevel::High
    } else if (on_hand as f64) < reorder_point as f64 * thresholds.medium_fraction {
        UrgencyLevel::Medium
    } else {
        UrgencyLevel::Low
    }
}
