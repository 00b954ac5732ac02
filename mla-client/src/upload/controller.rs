//! Upload controller
//!
//! Drives [`UploadPage`] transitions and executes their effects against the
//! Analysis Service and the result store. Service replies are fed back in as
//! events, so all UI decisions stay in the pure transition function.

use super::state::{transition, UploadEffect, UploadEvent, UploadPage};
use crate::services::AnalysisService;
use crate::store::{ResultStore, SessionStorage};
use std::collections::VecDeque;
use tracing::{info, warn};

/// Where the page should go after an event has been fully processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Results,
}

pub struct UploadController<'a, A, S> {
    page: UploadPage,
    service: A,
    store: &'a ResultStore<S>,
}

impl<'a, A, S> UploadController<'a, A, S>
where
    A: AnalysisService,
    S: SessionStorage,
{
    pub fn new(service: A, store: &'a ResultStore<S>, include_preferences: bool) -> Self {
        Self {
            page: UploadPage::new(include_preferences),
            service,
            store,
        }
    }

    pub fn page(&self) -> &UploadPage {
        &self.page
    }

    /// Process one user event, including any service round-trip it triggers
    pub async fn dispatch(&mut self, event: UploadEvent) -> Navigation {
        let mut queue = VecDeque::from([event]);
        let mut navigation = Navigation::Stay;

        while let Some(event) = queue.pop_front() {
            let (next, effects) = transition(&self.page, event);
            self.page = next;

            for effect in effects {
                match effect {
                    UploadEffect::StartAnalysis(request) => {
                        info!(file = %request.file.name, "Submitting file for analysis");
                        match self.service.analyze(&request).await {
                            Ok(response) => queue.push_back(UploadEvent::AnalysisCompleted(response)),
                            Err(e) => {
                                warn!(error = %e, "Analysis request failed");
                                queue.push_back(UploadEvent::AnalysisFailed(e.to_string()));
                            }
                        }
                    }
                    UploadEffect::PersistBundle(bundle) => {
                        if let Err(e) = self.store.put(&bundle) {
                            warn!(error = %e, "Failed to persist analysis results");
                            queue.push_back(UploadEvent::PersistFailed(e.to_string()));
                            // Skip navigation
                            break;
                        }
                    }
                    UploadEffect::NavigateToResults => {
                        info!("Analysis complete, navigating to results");
                        navigation = Navigation::Results;
                    }
                }
            }
        }

        navigation
    }
}
