//! Wire models exchanged with the Analysis Service and carried across navigation
//!
//! Every field is optional. Absence means "not computed" and is never an error;
//! defaults are applied by the client's rendering layer, not here.

pub mod analysis;
pub mod bundle;
pub mod lenient;
pub mod recommendations;

pub use analysis::{
    AnalysisResult, BasicInfo, ChordProgression, KeySignature, MelodicAnalysis, NotesAnalysis,
    PitchRange, RhythmPatterns, Scalar, SongSection, StructureAnalysis, TempoInfo,
};
pub use bundle::{AnalysisResponse, Goal, ImprovedArtifactRef, ResultBundle, UserPreferences};
pub use recommendations::{RecommendationCategory, RecommendationItem, RecommendationSet};
