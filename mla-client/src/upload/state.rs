//! Upload page state machine
//!
//! `Idle → FileSelected → Submitting → {Succeeded, Failed}`
//!
//! A failure is reported inline and the page returns to `FileSelected`
//! (or `Idle` if the file was removed meanwhile). Each transition is a pure
//! function of (page, event) producing the next page and a list of effects
//! for the controller to execute.

use super::form::{AnalysisForm, UploadRequest};
use crate::error::{
    ClientError, GENERIC_SERVICE_MESSAGE, NO_FILE_MESSAGE, TRANSPORT_MESSAGE,
};
use crate::intake::{CandidateFile, IntakeOutcome, IntakePanel, SelectionSource};
use mla_common::models::{AnalysisResponse, Goal, ResultBundle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    FileSelected,
    /// One request in flight for this file
    Submitting { file: CandidateFile },
    /// Bundle handed off; the page is about to be replaced
    Succeeded,
}

/// Category of an inline error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Service,
    Transport,
}

/// Error shown in the page's error section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineError {
    pub kind: ErrorKind,
    pub message: String,
}

impl InlineError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<InlineError> for ClientError {
    fn from(err: InlineError) -> Self {
        match err.kind {
            ErrorKind::Validation => ClientError::Validation(err.message),
            ErrorKind::Service => ClientError::Service(err.message),
            ErrorKind::Transport => ClientError::Transport(err.message),
        }
    }
}

/// External stimuli: user actions and service outcomes
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    FileChosen {
        file: CandidateFile,
        source: SelectionSource,
    },
    FileCleared,
    DragEnter,
    DragLeave,
    GoalToggled {
        goal: Goal,
        checked: bool,
    },
    GenreSelected(Option<String>),
    NotesChanged(Option<String>),
    AutoImproveToggled(bool),
    Submit,
    /// Decodable service reply, successful or not
    AnalysisCompleted(AnalysisResponse),
    /// Network or decode failure; the detail is for logs only
    AnalysisFailed(String),
    /// The bundle could not be written to session storage
    PersistFailed(String),
}

/// Work requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEffect {
    StartAnalysis(UploadRequest),
    PersistBundle(ResultBundle),
    NavigateToResults,
}

/// Everything visible on the upload page
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPage {
    pub phase: UploadPhase,
    pub intake: IntakePanel,
    pub form: AnalysisForm,
    pub loading: bool,
    pub error: Option<InlineError>,
    include_preferences: bool,
}

impl UploadPage {
    pub fn new(include_preferences: bool) -> Self {
        Self {
            phase: UploadPhase::Idle,
            intake: IntakePanel::new(),
            form: AnalysisForm::default(),
            loading: false,
            error: None,
            include_preferences,
        }
    }

    /// Submit is enabled only with a file selected and nothing in flight
    pub fn submit_enabled(&self) -> bool {
        matches!(self.phase, UploadPhase::Idle | UploadPhase::FileSelected) && self.intake.has_file()
    }

    pub fn submit_label(&self) -> &'static str {
        self.form.submit_label()
    }

    pub fn genre_selection_visible(&self) -> bool {
        self.form.genre_selection_visible()
    }

    /// Return to the resting phase matching the current selection
    fn settle(&mut self) {
        self.phase = if self.intake.has_file() {
            UploadPhase::FileSelected
        } else {
            UploadPhase::Idle
        };
    }

    /// Keep a resting phase in step with the selection; in-flight phases are untouched
    fn resync_rest_phase(&mut self) {
        if matches!(self.phase, UploadPhase::Idle | UploadPhase::FileSelected) {
            self.settle();
        }
    }

    fn apply(&mut self, event: UploadEvent) -> Vec<UploadEffect> {
        if self.phase == UploadPhase::Succeeded {
            if let UploadEvent::PersistFailed(_) = event {
                self.error = Some(InlineError::new(ErrorKind::Transport, TRANSPORT_MESSAGE));
                self.settle();
            }
            return Vec::new();
        }

        match event {
            UploadEvent::FileChosen { file, source } => {
                match self.intake.select(file, source) {
                    IntakeOutcome::Accepted => self.error = None,
                    IntakeOutcome::Rejected { message } => {
                        self.error = Some(InlineError::new(ErrorKind::Validation, message));
                    }
                }
                self.resync_rest_phase();
                Vec::new()
            }
            UploadEvent::FileCleared => {
                self.intake.clear();
                self.error = None;
                self.resync_rest_phase();
                Vec::new()
            }
            UploadEvent::DragEnter => {
                self.intake.drag_over = true;
                Vec::new()
            }
            UploadEvent::DragLeave => {
                self.intake.drag_over = false;
                Vec::new()
            }
            UploadEvent::GoalToggled { goal, checked } => {
                self.form.set_goal(goal, checked);
                Vec::new()
            }
            UploadEvent::GenreSelected(genre) => {
                self.form.set_target_genre(genre);
                Vec::new()
            }
            UploadEvent::NotesChanged(notes) => {
                self.form.set_additional_notes(notes);
                Vec::new()
            }
            UploadEvent::AutoImproveToggled(enabled) => {
                self.form.set_auto_improve(enabled);
                Vec::new()
            }
            UploadEvent::Submit => self.submit(),
            UploadEvent::AnalysisCompleted(response) => self.complete(response),
            UploadEvent::AnalysisFailed(_) => {
                if !matches!(self.phase, UploadPhase::Submitting { .. }) {
                    return Vec::new();
                }
                self.loading = false;
                self.error = Some(InlineError::new(ErrorKind::Transport, TRANSPORT_MESSAGE));
                self.settle();
                Vec::new()
            }
            // Only meaningful after success, handled above
            UploadEvent::PersistFailed(_) => Vec::new(),
        }
    }

    fn submit(&mut self) -> Vec<UploadEffect> {
        if matches!(self.phase, UploadPhase::Submitting { .. }) {
            return Vec::new();
        }

        let file = match self.intake.selected() {
            Some(file) => file.clone(),
            None => {
                self.error = Some(InlineError::new(ErrorKind::Validation, NO_FILE_MESSAGE));
                return Vec::new();
            }
        };

        self.loading = true;
        self.error = None;
        self.phase = UploadPhase::Submitting { file: file.clone() };

        let preferences = self.include_preferences.then(|| self.form.preferences());
        vec![UploadEffect::StartAnalysis(UploadRequest { file, preferences })]
    }

    fn complete(&mut self, response: AnalysisResponse) -> Vec<UploadEffect> {
        let submitted = match &self.phase {
            UploadPhase::Submitting { file } => file.name.clone(),
            _ => return Vec::new(),
        };

        self.loading = false;

        if response.is_success() {
            let bundle = response.into_bundle(&submitted);
            self.phase = UploadPhase::Succeeded;
            vec![
                UploadEffect::PersistBundle(bundle),
                UploadEffect::NavigateToResults,
            ]
        } else {
            let message = response
                .error
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_SERVICE_MESSAGE.to_string());
            self.error = Some(InlineError::new(ErrorKind::Service, message));
            self.settle();
            Vec::new()
        }
    }
}

/// Pure transition: `(page, event) → (next page, effects)`
pub fn transition(page: &UploadPage, event: UploadEvent) -> (UploadPage, Vec<UploadEffect>) {
    let mut next = page.clone();
    let effects = next.apply(event);
    (next, effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn midi(name: &str) -> CandidateFile {
        CandidateFile::new(name, 2048, format!("/tmp/{}", name))
    }

    fn page_with_file() -> UploadPage {
        let page = UploadPage::new(false);
        let (page, _) = transition(
            &page,
            UploadEvent::FileChosen {
                file: midi("song.mid"),
                source: SelectionSource::Picker,
            },
        );
        page
    }

    fn submitting() -> UploadPage {
        let (page, _) = transition(&page_with_file(), UploadEvent::Submit);
        page
    }

    fn response(value: serde_json::Value) -> AnalysisResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_initial_page() {
        let page = UploadPage::new(false);
        assert_eq!(page.phase, UploadPhase::Idle);
        assert!(!page.submit_enabled());
        assert!(!page.loading);
        assert!(page.error.is_none());
        assert_eq!(page.submit_label(), "Analyze & Get Recommendations");
    }

    #[test]
    fn test_valid_file_enables_submit() {
        let page = page_with_file();
        assert_eq!(page.phase, UploadPhase::FileSelected);
        assert!(page.submit_enabled());
        assert!(page.intake.goals_visible());
    }

    #[test]
    fn test_invalid_file_rejected_without_effects() {
        let (page, effects) = transition(
            &UploadPage::new(false),
            UploadEvent::FileChosen {
                file: midi("notes.txt"),
                source: SelectionSource::Drop,
            },
        );
        assert!(effects.is_empty());
        assert_eq!(page.phase, UploadPhase::Idle);
        assert!(!page.submit_enabled());
        let error = page.error.unwrap();
        assert_eq!(error.kind, ErrorKind::Validation);
        assert_eq!(error.message, "Please select a valid MIDI file (.mid or .midi)");
    }

    #[test]
    fn test_submit_without_file_is_local_error() {
        let (page, effects) = transition(&UploadPage::new(false), UploadEvent::Submit);
        assert!(effects.is_empty());
        assert!(!page.loading);
        assert_eq!(page.error.unwrap().message, "Please select a MIDI file");
    }

    #[test]
    fn test_submit_starts_single_request() {
        let (page, effects) = transition(&page_with_file(), UploadEvent::Submit);
        assert!(page.loading);
        assert!(!page.submit_enabled());
        assert!(page.error.is_none());
        assert_eq!(
            effects,
            vec![UploadEffect::StartAnalysis(UploadRequest {
                file: midi("song.mid"),
                preferences: None,
            })]
        );

        // Second submit while in flight is ignored
        let (again, effects) = transition(&page, UploadEvent::Submit);
        assert!(effects.is_empty());
        assert_eq!(again, page);
    }

    #[test]
    fn test_submit_clears_prior_error() {
        let mut page = page_with_file();
        page.error = Some(InlineError::new(ErrorKind::Service, "old"));
        let (page, _) = transition(&page, UploadEvent::Submit);
        assert!(page.error.is_none());
    }

    #[test]
    fn test_preferences_attached_when_enabled() {
        let page = UploadPage::new(true);
        let (page, _) = transition(
            &page,
            UploadEvent::FileChosen {
                file: midi("song.mid"),
                source: SelectionSource::Picker,
            },
        );
        let (page, _) = transition(&page, UploadEvent::GoalToggled { goal: Goal::Melody, checked: true });
        let (page, _) = transition(&page, UploadEvent::AutoImproveToggled(true));
        let (_, effects) = transition(&page, UploadEvent::Submit);

        match &effects[0] {
            UploadEffect::StartAnalysis(request) => {
                let prefs = request.preferences.as_ref().unwrap();
                assert_eq!(prefs.goals, vec![Goal::Melody]);
                assert!(prefs.auto_improve);
            }
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[test]
    fn test_success_persists_then_navigates() {
        let (page, effects) = transition(
            &submitting(),
            UploadEvent::AnalysisCompleted(response(json!({
                "success": true,
                "analysis": {"tempo_info": {"average_bpm": 95}},
                "recommendations": {},
                "filename": "song.mid"
            }))),
        );

        assert!(!page.loading);
        assert_eq!(page.phase, UploadPhase::Succeeded);
        assert_eq!(effects.len(), 2);
        match &effects[0] {
            UploadEffect::PersistBundle(bundle) => {
                assert_eq!(bundle.filename, "song.mid");
                assert_eq!(
                    bundle.analysis.tempo_info.as_ref().unwrap().average_bpm,
                    Some(95.0)
                );
            }
            other => panic!("unexpected effect {:?}", other),
        }
        assert_eq!(effects[1], UploadEffect::NavigateToResults);
    }

    #[test]
    fn test_service_failure_shows_server_message() {
        let (page, effects) = transition(
            &submitting(),
            UploadEvent::AnalysisCompleted(response(json!({"success": false, "error": "corrupt file"}))),
        );
        assert!(effects.is_empty());
        assert!(!page.loading);
        assert_eq!(page.phase, UploadPhase::FileSelected);
        assert!(page.submit_enabled());
        let error = page.error.unwrap();
        assert_eq!(error.kind, ErrorKind::Service);
        assert_eq!(error.message, "corrupt file");
    }

    #[test]
    fn test_service_failure_without_message_uses_generic() {
        let (page, _) = transition(
            &submitting(),
            UploadEvent::AnalysisCompleted(response(json!({"success": false}))),
        );
        assert_eq!(page.error.unwrap().message, "An error occurred during analysis");
    }

    #[test]
    fn test_transport_failure_shows_retry_message() {
        let (page, effects) = transition(
            &submitting(),
            UploadEvent::AnalysisFailed("connection refused".to_string()),
        );
        assert!(effects.is_empty());
        assert!(!page.loading);
        assert!(page.submit_enabled());
        let error = page.error.unwrap();
        assert_eq!(error.kind, ErrorKind::Transport);
        assert_eq!(error.message, "Failed to analyze file. Please try again.");
    }

    #[test]
    fn test_failure_after_file_removed_keeps_submit_disabled() {
        let (page, _) = transition(&submitting(), UploadEvent::FileCleared);
        assert!(matches!(page.phase, UploadPhase::Submitting { .. }));

        let (page, _) = transition(&page, UploadEvent::AnalysisFailed("timeout".into()));
        assert_eq!(page.phase, UploadPhase::Idle);
        assert!(!page.loading);
        assert!(!page.submit_enabled());
    }

    #[test]
    fn test_success_uses_submitted_name_when_service_omits_it() {
        let (page, _) = transition(&submitting(), UploadEvent::FileCleared);
        let (_, effects) = transition(
            &page,
            UploadEvent::AnalysisCompleted(response(json!({"success": true}))),
        );
        match &effects[0] {
            UploadEffect::PersistBundle(bundle) => assert_eq!(bundle.filename, "song.mid"),
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let page = page_with_file();
        let (next, effects) = transition(
            &page,
            UploadEvent::AnalysisCompleted(response(json!({"success": true}))),
        );
        assert!(effects.is_empty());
        assert_eq!(next, page);
    }

    #[test]
    fn test_persist_failure_returns_to_file_selected() {
        let (page, _) = transition(
            &submitting(),
            UploadEvent::AnalysisCompleted(response(json!({"success": true}))),
        );
        let (page, effects) = transition(&page, UploadEvent::PersistFailed("disk full".into()));
        assert!(effects.is_empty());
        assert_eq!(page.phase, UploadPhase::FileSelected);
        assert!(page.submit_enabled());
        assert_eq!(page.error.unwrap().kind, ErrorKind::Transport);
    }

    #[test]
    fn test_no_exit_path_leaves_loading_visible() {
        let outcomes = vec![
            UploadEvent::AnalysisCompleted(response(json!({"success": true}))),
            UploadEvent::AnalysisCompleted(response(json!({"success": false}))),
            UploadEvent::AnalysisFailed("boom".into()),
        ];
        for outcome in outcomes {
            let (page, _) = transition(&submitting(), outcome);
            assert!(!page.loading);
        }
    }

    #[test]
    fn test_clear_file_returns_to_initial_state() {
        let (page, _) = transition(&page_with_file(), UploadEvent::FileCleared);
        assert_eq!(page, UploadPage::new(false));
    }

    #[test]
    fn test_drag_highlight_cleared_by_drop() {
        let (page, _) = transition(&UploadPage::new(false), UploadEvent::DragEnter);
        assert!(page.intake.drag_over);
        let (page, _) = transition(
            &page,
            UploadEvent::FileChosen {
                file: midi("dropped.midi"),
                source: SelectionSource::Drop,
            },
        );
        assert!(!page.intake.drag_over);
        assert!(page.submit_enabled());
    }

    #[test]
    fn test_events_after_success_are_ignored() {
        let (page, _) = transition(
            &submitting(),
            UploadEvent::AnalysisCompleted(response(json!({"success": true}))),
        );
        let (next, effects) = transition(&page, UploadEvent::Submit);
        assert!(effects.is_empty());
        assert_eq!(next, page);
    }
}
