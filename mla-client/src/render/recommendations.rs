//! Recommendation groups

use mla_common::models::{RecommendationCategory, RecommendationItem, RecommendationSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationCard {
    pub category: String,
    pub title: String,
    pub description: String,
    pub specific_advice: String,
}

impl From<&RecommendationItem> for RecommendationCard {
    fn from(item: &RecommendationItem) -> Self {
        Self {
            category: item.category.clone().unwrap_or_default(),
            title: item.title.clone().unwrap_or_default(),
            description: item.description.clone().unwrap_or_default(),
            specific_advice: item.specific_advice.clone().unwrap_or_default(),
        }
    }
}

/// One collapsible category group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationGroup {
    pub category: RecommendationCategory,
    pub title: &'static str,
    pub count: usize,
    pub expanded: bool,
    pub cards: Vec<RecommendationCard>,
}

impl RecommendationGroup {
    /// Header text, e.g. `"Melodic Suggestions (3)"`
    pub fn heading(&self) -> String {
        format!("{} ({})", self.title, self.count)
    }
}

/// Build the groups in category order, omitting empty categories
///
/// Only the first group that is actually rendered starts expanded.
pub fn groups(set: &RecommendationSet) -> Vec<RecommendationGroup> {
    RecommendationCategory::ALL
        .iter()
        .filter_map(|&category| {
            let items = set.items(category);
            if items.is_empty() {
                return None;
            }
            Some(RecommendationGroup {
                category,
                title: category.title(),
                count: items.len(),
                expanded: false,
                cards: items.iter().map(RecommendationCard::from).collect(),
            })
        })
        .enumerate()
        .map(|(index, group)| RecommendationGroup {
            expanded: index == 0,
            ..group
        })
        .collect()
}
