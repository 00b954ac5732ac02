//! Analysis payload produced by the Analysis Service
//!
//! Mirrors the service's snake_case JSON. Every sub-record and every field is
//! optional, and malformed values decode as absent (see [`super::lenient`]).

use super::lenient;
use crate::human_format::format_number;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured description of a MIDI file's musical characteristics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub basic_info: Option<BasicInfo>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub tempo_info: Option<TempoInfo>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub notes_analysis: Option<NotesAnalysis>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub key_signature: Option<KeySignature>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub chord_progression: Option<ChordProgression>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub melodic_analysis: Option<MelodicAnalysis>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub rhythm_patterns: Option<RhythmPatterns>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub structure_analysis: Option<StructureAnalysis>,
}

/// File-level MIDI header information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    /// MIDI file format (0, 1 or 2)
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub format: Option<f64>,

    /// Track count
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub tracks: Option<f64>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub ticks_per_beat: Option<f64>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub length_seconds: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TempoInfo {
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub average_bpm: Option<f64>,

    /// Number of tempo change events
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub tempo_changes: Option<f64>,

    /// Stability label, e.g. "Stable" or "Variable"
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub tempo_stability: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotesAnalysis {
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub total_notes: Option<f64>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub average_velocity: Option<f64>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub pitch_range: Option<PitchRange>,

    /// Note names, most frequent first
    #[serde(default, deserialize_with = "lenient::deserialize_seq", skip_serializing_if = "Option::is_none")]
    pub most_common_notes: Option<Vec<String>>,
}

/// Lowest and highest MIDI note numbers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchRange {
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub lowest: Option<f64>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub highest: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeySignature {
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Detection confidence in 0..1
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChordProgression {
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub total_chords: Option<f64>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub progression_type: Option<String>,

    /// Chord labels in order of appearance
    #[serde(default, deserialize_with = "lenient::deserialize_seq", skip_serializing_if = "Option::is_none")]
    pub chords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MelodicAnalysis {
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub contour: Option<String>,

    /// Melodic range in semitones
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub range: Option<f64>,

    /// Mean interval in semitones
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub average_interval: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RhythmPatterns {
    /// "n/d" form, e.g. "3/4"
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub time_signature: Option<String>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub rhythmic_complexity: Option<String>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub unique_durations: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureAnalysis {
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub total_measures: Option<f64>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub estimated_form: Option<String>,

    #[serde(default, deserialize_with = "lenient::deserialize_seq", skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SongSection>>,
}

/// Detected song section; `measures` is a count or a range such as "1-16"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongSection {
    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::deserialize", skip_serializing_if = "Option::is_none")]
    pub measures: Option<Scalar>,
}

/// A JSON scalar shown verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => f.write_str(&format_number(*n)),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_decodes_to_all_absent() {
        let analysis: AnalysisResult = serde_json::from_value(json!({})).unwrap();
        assert_eq!(analysis, AnalysisResult::default());
    }

    #[test]
    fn test_service_payload_decodes() {
        let analysis: AnalysisResult = serde_json::from_value(json!({
            "basic_info": {"format": 1, "tracks": 4, "ticks_per_beat": 480, "length_seconds": 125.3},
            "tempo_info": {"average_bpm": 95, "tempo_changes": 0, "tempo_stability": "Stable"},
            "key_signature": {"key": "A minor", "mode": "minor", "confidence": 0.8},
            "structure_analysis": {
                "total_measures": 40,
                "estimated_form": "AABA",
                "sections": [{"name": "Intro", "measures": "1-8"}, {"name": "Coda", "measures": 4}]
            }
        }))
        .unwrap();

        assert_eq!(analysis.basic_info.as_ref().unwrap().tracks, Some(4.0));
        assert_eq!(analysis.tempo_info.as_ref().unwrap().average_bpm, Some(95.0));
        let sections = analysis.structure_analysis.unwrap().sections.unwrap();
        assert_eq!(sections[0].measures, Some(Scalar::Text("1-8".to_string())));
        assert_eq!(sections[1].measures, Some(Scalar::Number(4.0)));
    }

    #[test]
    fn test_malformed_sub_record_is_absent() {
        let analysis: AnalysisResult = serde_json::from_value(json!({
            "tempo_info": "fast",
            "notes_analysis": {"total_notes": "lots", "most_common_notes": ["C", "E"]}
        }))
        .unwrap();

        assert!(analysis.tempo_info.is_none());
        let notes = analysis.notes_analysis.unwrap();
        assert_eq!(notes.total_notes, None);
        assert_eq!(notes.most_common_notes, Some(vec!["C".to_string(), "E".to_string()]));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let analysis: AnalysisResult = serde_json::from_value(json!({
            "melodic_analysis": {"contour": "Arch", "intervals": [2, 3, -1]}
        }))
        .unwrap();
        assert_eq!(analysis.melodic_analysis.unwrap().contour.as_deref(), Some("Arch"));
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Number(16.0).to_string(), "16");
        assert_eq!(Scalar::Text("1-16".to_string()).to_string(), "1-16");
    }
}
