//! Terminal text output for the results view

use super::{ResultsPage, ResultsView, NO_RESULTS_MESSAGE};
use std::fmt;

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "== {} ==", title)
}

fn row(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    writeln!(f, "  {:<22} {}", format!("{}:", label), value)
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis results for {}", self.filename)?;

        if let Some(improved) = &self.improved {
            heading(f, "Improved MIDI")?;
            for line in &improved.applied_improvements {
                writeln!(f, "  * {}", line)?;
            }
            row(f, "File", &improved.filename)?;
            row(f, "Download id", &improved.download_id)?;
        }

        heading(f, "Summary")?;
        row(f, "Key Signature", &self.summary.key)?;
        row(f, "Tempo", &self.summary.tempo)?;
        row(f, "Total Notes", &self.summary.total_notes)?;
        row(f, "Tracks", &self.summary.tracks)?;

        heading(f, "Basic")?;
        row(f, "MIDI Format", &self.basic.format)?;
        row(f, "Number of Tracks", &self.basic.tracks)?;
        row(f, "Ticks Per Beat", &self.basic.ticks_per_beat)?;
        row(f, "Duration", &self.basic.duration)?;
        row(f, "Average BPM", &self.basic.average_bpm)?;
        row(f, "Tempo Changes", &self.basic.tempo_changes)?;
        row(f, "Tempo Stability", &self.basic.tempo_stability)?;

        heading(f, "Harmony")?;
        row(f, "Detected Key", &self.harmony.key)?;
        row(f, "Mode", &self.harmony.mode)?;
        row(f, "Confidence", &self.harmony.confidence)?;
        row(f, "Total Chords", &self.harmony.total_chords)?;
        row(f, "Progression Type", &self.harmony.progression_type)?;
        row(f, "Detected Chords", &self.harmony.chords)?;

        heading(f, "Melody")?;
        row(f, "Melodic Contour", &self.melody.contour)?;
        row(f, "Melodic Range", &self.melody.range)?;
        row(f, "Average Interval", &self.melody.average_interval)?;
        row(f, "Pitch Range", &self.melody.pitch_range)?;
        row(f, "Average Velocity", &self.melody.average_velocity)?;
        row(f, "Most Common Notes", &self.melody.common_notes)?;

        heading(f, "Rhythm")?;
        row(f, "Time Signature", &self.rhythm.time_signature)?;
        row(f, "Rhythmic Complexity", &self.rhythm.complexity)?;
        row(f, "Unique Durations", &self.rhythm.unique_durations)?;
        row(f, "BPM Classification", &self.rhythm.tempo_class)?;
        row(f, "Tempo Stability", &self.rhythm.tempo_stability)?;
        row(f, "Tempo Changes", &self.rhythm.tempo_changes)?;

        heading(f, "Structure")?;
        row(f, "Total Measures", &self.structure.total_measures)?;
        row(f, "Estimated Form", &self.structure.estimated_form)?;
        row(f, "Number of Sections", &self.structure.section_count.to_string())?;
        row(f, "Sections", &self.structure.badges_display())?;

        if !self.recommendations.is_empty() {
            heading(f, "Recommendations")?;
        }
        for group in &self.recommendations {
            let marker = if group.expanded { "v" } else { ">" };
            writeln!(f, "{} {}", marker, group.heading())?;
            // Collapsed groups show only their header
            if !group.expanded {
                continue;
            }
            for card in &group.cards {
                writeln!(f, "  [{}] {}", card.category, card.title)?;
                writeln!(f, "    {}", card.description)?;
                writeln!(f, "    Suggestion: {}", card.specific_advice)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for ResultsPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultsPage::NoResults => writeln!(f, "{}", NO_RESULTS_MESSAGE),
            ResultsPage::Results(view) => view.fmt(f),
        }
    }
}
