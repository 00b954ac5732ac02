//! Service response, user preferences and the cross-navigation result bundle

use super::lenient;
use super::{AnalysisResult, RecommendationSet};
use serde::{Deserialize, Serialize};

/// Analysis goal selectable on the upload form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Goal {
    Harmony,
    Melody,
    Rhythm,
    Structure,
    Arrangement,
    Genre,
}

impl Goal {
    pub const ALL: [Goal; 6] = [
        Goal::Harmony,
        Goal::Melody,
        Goal::Rhythm,
        Goal::Structure,
        Goal::Arrangement,
        Goal::Genre,
    ];

    /// Form/wire tag
    pub fn tag(self) -> &'static str {
        match self {
            Goal::Harmony => "harmony",
            Goal::Melody => "melody",
            Goal::Rhythm => "rhythm",
            Goal::Structure => "structure",
            Goal::Arrangement => "arrangement",
            Goal::Genre => "genre",
        }
    }

    /// Parse a tag; unknown tags yield `None`
    pub fn from_tag(tag: &str) -> Option<Goal> {
        Goal::ALL.into_iter().find(|g| g.tag() == tag)
    }

    /// Description of the improvement applied for this goal
    pub fn improvement(self) -> &'static str {
        match self {
            Goal::Harmony => "Enhanced chord progressions and harmonic movement",
            Goal::Melody => "Improved melodic lines and harmonic intervals",
            Goal::Rhythm => "Added rhythmic elements and percussion tracks",
            Goal::Structure => "Extended song structure with intro/outro sections",
            Goal::Arrangement => "Enhanced instrumentation and accompaniment",
            Goal::Genre => "Applied genre-specific styling and characteristics",
        }
    }
}

/// Preferences echoed back by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Raw goal tags; unknown tags are kept and skipped at render time
    #[serde(default, deserialize_with = "lenient::deserialize_seq", skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub target_genre: Option<String>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

impl UserPreferences {
    pub fn goals(&self) -> &[String] {
        self.goals.as_deref().unwrap_or(&[])
    }

    /// Target genre; an empty string counts as absent
    pub fn target_genre(&self) -> Option<&str> {
        self.target_genre.as_deref().filter(|g| !g.trim().is_empty())
    }
}

/// Reference to a generated "improved" MIDI artifact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImprovedArtifactRef {
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,

    /// Opaque identifier for the download and cleanup endpoints
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub download_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl ImprovedArtifactRef {
    pub fn is_available(&self) -> bool {
        self.available.unwrap_or(false)
    }
}

/// Response body of the upload call
///
/// The body is decoded regardless of HTTP status; failures carry
/// `success: false` (or omit it) together with an `error` message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<RecommendationSet>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub improved_midi: Option<ImprovedArtifactRef>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub user_preferences: Option<UserPreferences>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResponse {
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(false)
    }

    /// Build the bundle carried to the results view
    ///
    /// `fallback_filename` is used when the service does not echo a filename.
    pub fn into_bundle(self, fallback_filename: &str) -> ResultBundle {
        ResultBundle {
            analysis: self.analysis.unwrap_or_default(),
            recommendations: self.recommendations.unwrap_or_default(),
            filename: self
                .filename
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| fallback_filename.to_string()),
            improved_midi: self.improved_midi,
            user_preferences: self.user_preferences,
        }
    }
}

/// Everything the results view needs, handed across navigation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    #[serde(default)]
    pub analysis: AnalysisResult,

    #[serde(default)]
    pub recommendations: RecommendationSet,

    #[serde(default)]
    pub filename: String,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub improved_midi: Option<ImprovedArtifactRef>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub user_preferences: Option<UserPreferences>,
}
