//! File intake validation
//!
//! Gatekeeps file selection against the MIDI extension policy and owns the
//! UI sections that depend on a file being selected. Picker selection and
//! drag-and-drop both go through [`IntakePanel::select`].

use crate::error::{ClientError, ClientResult, INVALID_FILE_MESSAGE};
use mla_common::human_format::format_file_size;
use std::path::{Path, PathBuf};

const MIDI_EXTENSIONS: [&str; 2] = [".mid", ".midi"];

/// True iff the lowercase name ends with `.mid` or `.midi`
///
/// Only the name is checked; file contents are not inspected.
pub fn is_valid_midi_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    MIDI_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// How the user supplied the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    Picker,
    Drop,
}

/// A file offered for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub size: u64,
    pub path: PathBuf,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, size: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            size,
            path: path.into(),
        }
    }

    /// Build from a filesystem path, reading its size
    pub fn from_path(path: &Path) -> ClientResult<Self> {
        let metadata = std::fs::metadata(path).map_err(mla_common::Error::from)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ClientError::Validation(INVALID_FILE_MESSAGE.to_string()))?;
        Ok(Self::new(name, metadata.len(), path))
    }

    /// `"<name> (<size>)"`
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, format_file_size(self.size))
    }
}

/// Result of offering a file to the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    Accepted,
    Rejected { message: &'static str },
}

/// File selection area and the sections gated on it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakePanel {
    selected: Option<CandidateFile>,
    /// Drop zone highlight while a drag hovers over it
    pub drag_over: bool,
}

impl IntakePanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and, if accepted, select the file
    ///
    /// A rejected file clears any previous selection so submission stays
    /// disabled, whichever way the file arrived.
    pub fn select(&mut self, file: CandidateFile, source: SelectionSource) -> IntakeOutcome {
        if source == SelectionSource::Drop {
            self.drag_over = false;
        }

        if is_valid_midi_file(&file.name) {
            tracing::debug!(file = %file.name, size = file.size, ?source, "File accepted");
            self.accept(file);
            IntakeOutcome::Accepted
        } else {
            tracing::debug!(file = %file.name, ?source, "File rejected");
            self.clear();
            IntakeOutcome::Rejected {
                message: INVALID_FILE_MESSAGE,
            }
        }
    }

    /// Select an already-validated file, revealing the dependent sections
    pub fn accept(&mut self, file: CandidateFile) {
        self.selected = Some(file);
    }

    /// Remove the selection and return to the initial state
    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&CandidateFile> {
        self.selected.as_ref()
    }

    /// Filename and size shown under the drop zone
    pub fn file_info(&self) -> Option<String> {
        self.selected.as_ref().map(CandidateFile::display_label)
    }

    pub fn goals_visible(&self) -> bool {
        self.selected.is_some()
    }

    pub fn auto_improve_visible(&self) -> bool {
        self.selected.is_some()
    }

    /// Whether a selection permits submitting
    pub fn has_file(&self) -> bool {
        self.selected.is_some()
    }
}
