//! Rendering pipeline
//!
//! Turns a [`ResultBundle`] into a [`ResultsView`]: plain display data with
//! every default already applied. Rendering never fails; a missing bundle is
//! the normal [`ResultsPage::NoResults`] state.

pub mod defaults;
pub mod improved;
pub mod recommendations;
pub mod sections;
mod text;

pub use defaults::{resolve, ResolvedAnalysis};
pub use improved::{improved_section, ImprovedSection, DEFAULT_IMPROVED_FILENAME};
pub use recommendations::{RecommendationCard, RecommendationGroup};
pub use sections::{
    BasicSection, HarmonySection, MelodySection, RhythmSection, StructureSection, SummaryCards,
};

use crate::store::{ResultStore, SessionStorage};
use mla_common::models::ResultBundle;

pub const NO_RESULTS_MESSAGE: &str = "No analysis results found. Please upload a MIDI file first.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub filename: String,
    pub improved: Option<ImprovedSection>,
    pub summary: SummaryCards,
    pub basic: BasicSection,
    pub harmony: HarmonySection,
    pub melody: MelodySection,
    pub rhythm: RhythmSection,
    pub structure: StructureSection,
    pub recommendations: Vec<RecommendationGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsPage {
    NoResults,
    Results(Box<ResultsView>),
}

/// Render a bundle
pub fn render(bundle: &ResultBundle) -> ResultsView {
    let resolved = resolve(&bundle.analysis);
    ResultsView {
        filename: bundle.filename.clone(),
        improved: improved_section(bundle.improved_midi.as_ref(), bundle.user_preferences.as_ref()),
        summary: sections::summary(&resolved),
        basic: sections::basic(&resolved),
        harmony: sections::harmony(&resolved),
        melody: sections::melody(&resolved),
        rhythm: sections::rhythm(&resolved),
        structure: sections::structure(&resolved),
        recommendations: recommendations::groups(&bundle.recommendations),
    }
}

pub fn render_results(bundle: Option<&ResultBundle>) -> ResultsPage {
    match bundle {
        Some(bundle) => ResultsPage::Results(Box::new(render(bundle))),
        None => ResultsPage::NoResults,
    }
}

/// Load the stored bundle and render it (the results view's entry point)
pub fn load_results_page<S: SessionStorage>(store: &ResultStore<S>) -> ResultsPage {
    let bundle = store.get();
    if bundle.is_none() {
        tracing::info!("No stored results; showing empty state");
    }
    render_results(bundle.as_ref())
}
