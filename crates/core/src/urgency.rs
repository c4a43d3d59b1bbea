//! Reorder urgency classification.

use serde::{Deserialize, Serialize};

/// How soon a replenishment should happen.
///
/// Ordered from least to most urgent, so `max()` / sorting works as expected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UrgencyLevel {
    None,
    Low,
    Medium,
    High,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::None => "NONE",
            UrgencyLevel::Low => "LOW",
            UrgencyLevel::Medium => "MEDIUM",
            UrgencyLevel::High => "HIGH",
        }
    }
}

impl core::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_sorts_above_everything_else() {
        let mut levels = vec![
            UrgencyLevel::Low,
            UrgencyLevel::High,
            UrgencyLevel::None,
            UrgencyLevel::Medium,
        ];
        levels.sort();
        assert_eq!(
            levels,
            vec![
                UrgencyLevel::None,
                UrgencyLevel::Low,
                UrgencyLevel::Medium,
                UrgencyLevel::High
            ]
        );
    }

    #[test]
    fn serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&UrgencyLevel::Medium).unwrap(),
            "\"MEDIUM\""
        );
    }
}
