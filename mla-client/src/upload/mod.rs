//! Upload/analyze orchestration

pub mod controller;
pub mod form;
pub mod state;

pub use controller::{Navigation, UploadController};
pub use form::{AnalysisForm, FormPreferences, UploadRequest};
pub use state::{transition, ErrorKind, InlineError, UploadEffect, UploadEvent, UploadPage, UploadPhase};
