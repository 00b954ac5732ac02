//! Default resolution
//!
//! The one place where absent analysis fields receive their display
//! defaults. Section builders consume a fully-populated [`ResolvedAnalysis`].

use mla_common::human_format::format_number;
use mla_common::models::AnalysisResult;

pub const UNKNOWN: &str = "Unknown";
pub const DEFAULT_BPM: f64 = 120.0;
pub const DEFAULT_TIME_SIGNATURE: &str = "4/4";
/// Shown in a section badge when the service omits the measure span
const UNKNOWN_MEASURES: &str = "?";

/// Analysis with every field present
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAnalysis {
    // basic_info
    pub format: String,
    pub tracks: f64,
    pub ticks_per_beat: String,
    pub length_seconds: f64,

    // tempo_info
    pub average_bpm: f64,
    pub tempo_changes: f64,
    pub tempo_stability: String,

    // notes_analysis
    pub total_notes: f64,
    pub average_velocity: f64,
    pub lowest_pitch: f64,
    pub highest_pitch: f64,
    pub most_common_notes: Vec<String>,

    // key_signature
    pub key: String,
    pub mode: String,
    pub confidence: f64,

    // chord_progression
    pub total_chords: f64,
    pub progression_type: String,
    pub chords: Vec<String>,

    // melodic_analysis
    pub contour: String,
    pub melodic_range: f64,
    pub average_interval: f64,

    // rhythm_patterns
    pub time_signature: String,
    pub rhythmic_complexity: String,
    pub unique_durations: f64,

    // structure_analysis
    pub total_measures: f64,
    pub estimated_form: String,
    pub sections: Vec<ResolvedSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSection {
    pub name: String,
    pub measures: String,
}

/// Blank text counts as absent
fn text_or(value: Option<&String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

/// A tempo of zero or below carries no information
fn bpm_or_default(bpm: Option<f64>) -> f64 {
    bpm.filter(|b| b.is_finite() && *b > 0.0).unwrap_or(DEFAULT_BPM)
}

/// Apply every display default to a raw analysis
pub fn resolve(analysis: &AnalysisResult) -> ResolvedAnalysis {
    let basic = analysis.basic_info.clone().unwrap_or_default();
    let tempo = analysis.tempo_info.clone().unwrap_or_default();
    let notes = analysis.notes_analysis.clone().unwrap_or_default();
    let pitch_range = notes.pitch_range.clone().unwrap_or_default();
    let key = analysis.key_signature.clone().unwrap_or_default();
    let chords = analysis.chord_progression.clone().unwrap_or_default();
    let melody = analysis.melodic_analysis.clone().unwrap_or_default();
    let rhythm = analysis.rhythm_patterns.clone().unwrap_or_default();
    let structure = analysis.structure_analysis.clone().unwrap_or_default();

    ResolvedAnalysis {
        format: basic.format.map(format_number).unwrap_or_else(|| UNKNOWN.to_string()),
        tracks: basic.tracks.unwrap_or(0.0),
        ticks_per_beat: basic
            .ticks_per_beat
            .map(format_number)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        length_seconds: basic.length_seconds.unwrap_or(0.0),

        average_bpm: bpm_or_default(tempo.average_bpm),
        tempo_changes: tempo.tempo_changes.unwrap_or(0.0),
        tempo_stability: text_or(tempo.tempo_stability.as_ref(), UNKNOWN),

        total_notes: notes.total_notes.unwrap_or(0.0),
        average_velocity: notes.average_velocity.unwrap_or(0.0),
        lowest_pitch: pitch_range.lowest.unwrap_or(0.0),
        highest_pitch: pitch_range.highest.unwrap_or(0.0),
        most_common_notes: notes.most_common_notes.unwrap_or_default(),

        key: text_or(key.key.as_ref(), UNKNOWN),
        mode: text_or(key.mode.as_ref(), UNKNOWN),
        confidence: key.confidence.unwrap_or(0.0),

        total_chords: chords.total_chords.unwrap_or(0.0),
        progression_type: text_or(chords.progression_type.as_ref(), UNKNOWN),
        chords: chords.chords.unwrap_or_default(),

        contour: text_or(melody.contour.as_ref(), UNKNOWN),
        melodic_range: melody.range.unwrap_or(0.0),
        average_interval: melody.average_interval.unwrap_or(0.0),

        time_signature: text_or(rhythm.time_signature.as_ref(), DEFAULT_TIME_SIGNATURE),
        rhythmic_complexity: text_or(rhythm.rhythmic_complexity.as_ref(), UNKNOWN),
        unique_durations: rhythm.unique_durations.unwrap_or(0.0),

        total_measures: structure.total_measures.unwrap_or(0.0),
        estimated_form: text_or(structure.estimated_form.as_ref(), UNKNOWN),
        sections: structure
            .sections
            .unwrap_or_default()
            .into_iter()
            .map(|s| ResolvedSection {
                name: text_or(s.name.as_ref(), UNKNOWN),
                measures: text_or(s.measures.map(|m| m.to_string()).as_ref(), UNKNOWN_MEASURES),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_analysis_resolves_to_defaults() {
        let resolved = resolve(&AnalysisResult::default());
        assert_eq!(resolved.format, "Unknown");
        assert_eq!(resolved.ticks_per_beat, "Unknown");
        assert_eq!(resolved.average_bpm, 120.0);
        assert_eq!(resolved.key, "Unknown");
        assert_eq!(resolved.time_signature, "4/4");
        assert_eq!(resolved.total_notes, 0.0);
        assert!(resolved.chords.is_empty());
        assert!(resolved.sections.is_empty());
    }

    #[test]
    fn test_present_zero_values_are_kept() {
        let analysis: AnalysisResult = serde_json::from_value(json!({
            "basic_info": {"format": 0},
            "tempo_info": {"tempo_changes": 0}
        }))
        .unwrap();
        let resolved = resolve(&analysis);
        assert_eq!(resolved.format, "0");
        assert_eq!(resolved.tempo_changes, 0.0);
    }

    #[test]
    fn test_blank_text_and_zero_tempo_use_defaults() {
        let analysis: AnalysisResult = serde_json::from_value(json!({
            "key_signature": {"key": "", "mode": "  "},
            "tempo_info": {"average_bpm": 0, "tempo_stability": ""},
            "rhythm_patterns": {"time_signature": ""},
            "structure_analysis": {"sections": [{"name": "", "measures": ""}]}
        }))
        .unwrap();
        let resolved = resolve(&analysis);
        assert_eq!(resolved.key, "Unknown");
        assert_eq!(resolved.mode, "Unknown");
        assert_eq!(resolved.average_bpm, 120.0);
        assert_eq!(resolved.tempo_stability, "Unknown");
        assert_eq!(resolved.time_signature, "4/4");
        assert_eq!(
            resolved.sections,
            vec![ResolvedSection { name: "Unknown".into(), measures: "?".into() }]
        );
    }

    #[test]
    fn test_negative_tempo_uses_default() {
        let analysis: AnalysisResult = serde_json::from_value(json!({
            "tempo_info": {"average_bpm": -12.5}
        }))
        .unwrap();
        assert_eq!(resolve(&analysis).average_bpm, 120.0);
    }

    #[test]
    fn test_partial_sections_get_placeholders() {
        let analysis: AnalysisResult = serde_json::from_value(json!({
            "structure_analysis": {"sections": [{"name": "Verse"}, {"measures": 8}]}
        }))
        .unwrap();
        let resolved = resolve(&analysis);
        assert_eq!(
            resolved.sections,
            vec![
                ResolvedSection { name: "Verse".into(), measures: "?".into() },
                ResolvedSection { name: "Unknown".into(), measures: "8".into() },
            ]
        );
    }
}
