//! Analysis form: goals, genre, notes and the auto-improve toggle

use crate::intake::CandidateFile;
use mla_common::models::Goal;
use std::collections::BTreeSet;

/// Submit label when an improved MIDI will be generated
pub const LABEL_GENERATE: &str = "Analyze & Generate Improved MIDI";
/// Submit label for analysis only
pub const LABEL_RECOMMEND: &str = "Analyze & Get Recommendations";

/// Form state beside the file picker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisForm {
    goals: BTreeSet<Goal>,
    target_genre: Option<String>,
    additional_notes: Option<String>,
    auto_improve: bool,
}

impl AnalysisForm {
    pub fn set_goal(&mut self, goal: Goal, checked: bool) {
        if checked {
            self.goals.insert(goal);
        } else {
            self.goals.remove(&goal);
        }
    }

    pub fn is_checked(&self, goal: Goal) -> bool {
        self.goals.contains(&goal)
    }

    /// Genre sub-selector is shown only while the genre goal is checked
    pub fn genre_selection_visible(&self) -> bool {
        self.is_checked(Goal::Genre)
    }

    pub fn set_target_genre(&mut self, genre: Option<String>) {
        self.target_genre = genre.filter(|g| !g.trim().is_empty());
    }

    pub fn set_additional_notes(&mut self, notes: Option<String>) {
        self.additional_notes = notes.filter(|n| !n.trim().is_empty());
    }

    pub fn set_auto_improve(&mut self, enabled: bool) {
        self.auto_improve = enabled;
    }

    pub fn auto_improve(&self) -> bool {
        self.auto_improve
    }

    pub fn submit_label(&self) -> &'static str {
        if self.auto_improve {
            LABEL_GENERATE
        } else {
            LABEL_RECOMMEND
        }
    }

    /// Snapshot sent with the upload; a hidden genre selector contributes nothing
    pub fn preferences(&self) -> FormPreferences {
        FormPreferences {
            goals: self.goals.iter().copied().collect(),
            target_genre: if self.genre_selection_visible() {
                self.target_genre.clone()
            } else {
                None
            },
            additional_notes: self.additional_notes.clone(),
            auto_improve: self.auto_improve,
        }
    }
}

/// Preference fields attached to an upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPreferences {
    pub goals: Vec<Goal>,
    pub target_genre: Option<String>,
    pub additional_notes: Option<String>,
    pub auto_improve: bool,
}

/// One analysis submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: CandidateFile,
    /// Present only when preference fields are configured to be sent
    pub preferences: Option<FormPreferences>,
}
