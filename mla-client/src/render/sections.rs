//! Analysis display sections
//!
//! Each builder is a pure function of the [`ResolvedAnalysis`]; values are
//! pre-formatted display strings.

use super::defaults::ResolvedAnalysis;
use mla_common::human_format::{classify_tempo, format_duration, format_number, format_percentage};

pub const NO_CHORDS: &str = "No chords detected";
pub const NO_COMMON_NOTES: &str = "None detected";
pub const NO_SECTIONS: &str = "No sections detected";

const MAX_CHORDS: usize = 8;
const MAX_COMMON_NOTES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCards {
    pub key: String,
    pub tempo: String,
    pub total_notes: String,
    pub tracks: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicSection {
    pub format: String,
    pub tracks: String,
    pub ticks_per_beat: String,
    pub duration: String,
    pub average_bpm: String,
    pub tempo_changes: String,
    pub tempo_stability: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarmonySection {
    pub key: String,
    pub mode: String,
    pub confidence: String,
    pub total_chords: String,
    pub progression_type: String,
    pub chords: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MelodySection {
    pub contour: String,
    pub range: String,
    pub average_interval: String,
    pub pitch_range: String,
    pub average_velocity: String,
    pub common_notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RhythmSection {
    pub time_signature: String,
    pub complexity: String,
    pub unique_durations: String,
    pub tempo_class: String,
    pub tempo_stability: String,
    pub tempo_changes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureSection {
    pub total_measures: String,
    pub estimated_form: String,
    pub section_count: usize,
    /// `"<name> (<measures>)"` per detected section
    pub badges: Vec<String>,
}

impl StructureSection {
    pub fn badges_display(&self) -> String {
        if self.badges.is_empty() {
            NO_SECTIONS.to_string()
        } else {
            self.badges.join(" ")
        }
    }
}

fn join_first(values: &[String], limit: usize, empty: &str) -> String {
    if values.is_empty() {
        return empty.to_string();
    }
    values
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn summary(a: &ResolvedAnalysis) -> SummaryCards {
    SummaryCards {
        key: a.key.clone(),
        tempo: format!("{} BPM", format_number(a.average_bpm)),
        total_notes: format_number(a.total_notes),
        tracks: format_number(a.tracks),
    }
}

pub fn basic(a: &ResolvedAnalysis) -> BasicSection {
    BasicSection {
        format: format!("Type {}", a.format),
        tracks: format_number(a.tracks),
        ticks_per_beat: a.ticks_per_beat.clone(),
        duration: format_duration(a.length_seconds),
        average_bpm: format_number(a.average_bpm),
        tempo_changes: format_number(a.tempo_changes),
        tempo_stability: a.tempo_stability.clone(),
    }
}

pub fn harmony(a: &ResolvedAnalysis) -> HarmonySection {
    HarmonySection {
        key: a.key.clone(),
        mode: a.mode.clone(),
        confidence: format_percentage(a.confidence),
        total_chords: format_number(a.total_chords),
        progression_type: a.progression_type.clone(),
        chords: join_first(&a.chords, MAX_CHORDS, NO_CHORDS),
    }
}

pub fn melody(a: &ResolvedAnalysis) -> MelodySection {
    MelodySection {
        contour: a.contour.clone(),
        range: format!("{} semitones", format_number(a.melodic_range)),
        average_interval: format!("{} semitones", format_number(a.average_interval)),
        pitch_range: format!(
            "MIDI {} - {}",
            format_number(a.lowest_pitch),
            format_number(a.highest_pitch)
        ),
        average_velocity: format_number(a.average_velocity),
        common_notes: join_first(&a.most_common_notes, MAX_COMMON_NOTES, NO_COMMON_NOTES),
    }
}

pub fn rhythm(a: &ResolvedAnalysis) -> RhythmSection {
    RhythmSection {
        time_signature: a.time_signature.clone(),
        complexity: a.rhythmic_complexity.clone(),
        unique_durations: format_number(a.unique_durations),
        tempo_class: classify_tempo(a.average_bpm).to_string(),
        tempo_stability: a.tempo_stability.clone(),
        tempo_changes: format_number(a.tempo_changes),
    }
}

pub fn structure(a: &ResolvedAnalysis) -> StructureSection {
    StructureSection {
        total_measures: format_number(a.total_measures),
        estimated_form: a.estimated_form.clone(),
        section_count: a.sections.len(),
        badges: a
            .sections
            .iter()
            .map(|s| format!("{} ({})", s.name, s.measures))
            .collect(),
    }
}
