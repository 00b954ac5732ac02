//! mla-client library interface
//!
//! Upload → analyze → render workflow for the MIDI analysis service, exposed
//! as a library so the `mla` binary and integration tests share one code path.
//!
//! Flow: [`intake`] validates the file, [`upload`] drives the submission
//! state machine, [`store`] carries the result bundle to the results view,
//! [`render`] turns it into display data, and [`download`] runs the improved
//! artifact lifecycle.

pub mod download;
pub mod error;
pub mod intake;
pub mod render;
pub mod services;
pub mod store;
pub mod upload;

pub use crate::error::{ClientError, ClientResult};
pub use crate::render::{load_results_page, render_results, ResultsPage, ResultsView};
pub use crate::store::{FileSessionStorage, MemorySessionStorage, ResultStore, SessionStorage};
pub use crate::upload::{Navigation, UploadController, UploadEvent, UploadPage};
