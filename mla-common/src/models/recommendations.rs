//! Categorized recommendations derived from an analysis

use super::lenient;
use serde::{Deserialize, Serialize};

/// The six recommendation categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationCategory {
    Harmonic,
    Melodic,
    Rhythmic,
    Structural,
    Arrangement,
    Development,
}

impl RecommendationCategory {
    /// Declared display order
    pub const ALL: [RecommendationCategory; 6] = [
        RecommendationCategory::Harmonic,
        RecommendationCategory::Melodic,
        RecommendationCategory::Rhythmic,
        RecommendationCategory::Structural,
        RecommendationCategory::Arrangement,
        RecommendationCategory::Development,
    ];

    /// Key used by the Analysis Service
    pub fn wire_key(self) -> &'static str {
        match self {
            RecommendationCategory::Harmonic => "harmonic_suggestions",
            RecommendationCategory::Melodic => "melodic_suggestions",
            RecommendationCategory::Rhythmic => "rhythmic_suggestions",
            RecommendationCategory::Structural => "structural_suggestions",
            RecommendationCategory::Arrangement => "arrangement_ideas",
            RecommendationCategory::Development => "development_strategies",
        }
    }

    /// Group heading
    pub fn title(self) -> &'static str {
        match self {
            RecommendationCategory::Harmonic => "Harmonic Suggestions",
            RecommendationCategory::Melodic => "Melodic Suggestions",
            RecommendationCategory::Rhythmic => "Rhythmic Suggestions",
            RecommendationCategory::Structural => "Structural Suggestions",
            RecommendationCategory::Arrangement => "Arrangement Ideas",
            RecommendationCategory::Development => "Development Strategies",
        }
    }
}

/// One suggestion; free text is kept verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub specific_advice: Option<String>,
}

/// Recommendations keyed by category
///
/// Keys the service sends beyond the six categories (genre tips, user context)
/// are dropped on decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    #[serde(default, deserialize_with = "lenient::deserialize_seq", skip_serializing_if = "Option::is_none")]
    pub harmonic_suggestions: Option<Vec<RecommendationItem>>,

    #[serde(default, deserialize_with = "lenient::deserialize_seq", skip_serializing_if = "Option::is_none")]
    pub melodic_suggestions: Option<Vec<RecommendationItem>>,

    #[serde(default, deserialize_with = "lenient::deserialize_seq", skip_serializing_if = "Option::is_none")]
    pub rhythmic_suggestions: Option<Vec<RecommendationItem>>,

    #[serde(default, deserialize_with = "lenient::deserialize_seq", skip_serializing_if = "Option::is_none")]
    pub structural_suggestions: Option<Vec<RecommendationItem>>,

    #[serde(default, deserialize_with = "lenient::deserialize_seq", skip_serializing_if = "Option::is_none")]
    pub arrangement_ideas: Option<Vec<RecommendationItem>>,

    #[serde(default, deserialize_with = "lenient::deserialize_seq", skip_serializing_if = "Option::is_none")]
    pub development_strategies: Option<Vec<RecommendationItem>>,
}

impl RecommendationSet {
    /// Items for a category; empty when the category is absent
    pub fn items(&self, category: RecommendationCategory) -> &[RecommendationItem] {
        let slot = match category {
            RecommendationCategory::Harmonic => &self.harmonic_suggestions,
            RecommendationCategory::Melodic => &self.melodic_suggestions,
            RecommendationCategory::Rhythmic => &self.rhythmic_suggestions,
            RecommendationCategory::Structural => &self.structural_suggestions,
            RecommendationCategory::Arrangement => &self.arrangement_ideas,
            RecommendationCategory::Development => &self.development_strategies,
        };
        slot.as_deref().unwrap_or(&[])
    }

    /// Total number of items across all categories
    pub fn total_items(&self) -> usize {
        RecommendationCategory::ALL
            .iter()
            .map(|c| self.items(*c).len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_keys_match_field_names() {
        let set: RecommendationSet = serde_json::from_value(json!({
            "harmonic_suggestions": [{"title": "h"}],
            "melodic_suggestions": [{"title": "m"}],
            "rhythmic_suggestions": [{"title": "r"}],
            "structural_suggestions": [{"title": "s"}],
            "arrangement_ideas": [{"title": "a"}],
            "development_strategies": [{"title": "d"}]
        }))
        .unwrap();

        for category in RecommendationCategory::ALL {
            assert_eq!(set.items(category).len(), 1, "{}", category.wire_key());
        }
        assert_eq!(set.total_items(), 6);
    }

    #[test]
    fn test_extra_service_keys_are_ignored() {
        let set: RecommendationSet = serde_json::from_value(json!({
            "genre_specific_tips": [{"title": "jazz it up"}],
            "user_context": {"goals": ["harmony"], "target_genre": "jazz", "notes": ""}
        }))
        .unwrap();
        assert_eq!(set.total_items(), 0);
    }

    #[test]
    fn test_non_array_category_is_empty() {
        let set: RecommendationSet =
            serde_json::from_value(json!({"melodic_suggestions": "none"})).unwrap();
        assert!(set.items(RecommendationCategory::Melodic).is_empty());
    }

    #[test]
    fn test_item_fields_decode_verbatim() {
        let set: RecommendationSet = serde_json::from_value(json!({
            "harmonic_suggestions": [{
                "category": "Voice Leading",
                "title": "Smooth voice leading",
                "description": "Keep <common> tones",
                "specific_advice": "Move chord tones by the smallest intervals possible between changes."
            }]
        }))
        .unwrap();

        let item = &set.items(RecommendationCategory::Harmonic)[0];
        assert_eq!(item.category.as_deref(), Some("Voice Leading"));
        assert_eq!(item.description.as_deref(), Some("Keep <common> tones"));
    }
}
