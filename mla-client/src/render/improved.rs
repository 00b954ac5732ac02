//! Improved-artifact section

use mla_common::models::{Goal, ImprovedArtifactRef, UserPreferences};

/// Filename shown and saved when the service does not name the artifact
pub const DEFAULT_IMPROVED_FILENAME: &str = "improved_music.mid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImprovedSection {
    pub applied_improvements: Vec<String>,
    pub filename: String,
    /// Id bound to the download control
    pub download_id: String,
}

/// Build the section, or `None` when no artifact is available
///
/// An artifact without a download id cannot be fetched, so it gets no section.
pub fn improved_section(
    artifact: Option<&ImprovedArtifactRef>,
    preferences: Option<&UserPreferences>,
) -> Option<ImprovedSection> {
    let artifact = artifact.filter(|a| a.is_available())?;
    let Some(download_id) = artifact
        .download_id
        .clone()
        .filter(|id| !id.trim().is_empty())
    else {
        tracing::debug!("Improved MIDI marked available without a download id");
        return None;
    };

    let mut applied_improvements: Vec<String> = Vec::new();
    if let Some(prefs) = preferences {
        applied_improvements.extend(
            prefs
                .goals()
                .iter()
                .filter_map(|tag| Goal::from_tag(tag))
                .map(|goal| goal.improvement().to_string()),
        );
        if let Some(genre) = prefs.target_genre() {
            applied_improvements.push(format!("Optimized for {} style", genre));
        }
    }

    Some(ImprovedSection {
        applied_improvements,
        filename: artifact
            .filename
            .clone()
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_IMPROVED_FILENAME.to_string()),
        download_id,
    })
}
