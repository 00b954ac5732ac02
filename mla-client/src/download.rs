//! Artifact download lifecycle
//!
//! A click on the download control saves the improved artifact through the
//! [`ArtifactService`], then runs two deferred tasks measured from the click:
//! the button is restored after `restore_delay`, and the service is asked to
//! delete its temporary copy after `cleanup_delay`. Neither timer waits for
//! the save to finish.

use crate::error::{ClientError, ClientResult};
use crate::render::ImprovedSection;
use crate::services::ArtifactService;
use mla_common::config::DownloadConfig;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const DOWNLOAD_LABEL: &str = "Download Improved MIDI";
pub const PREPARING_LABEL: &str = "Preparing Download...";

/// Transient link synthesized per click; dropped once the save completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadEvent {
    Clicked,
    RestoreElapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadEffect {
    TriggerDownload,
    ScheduleRestore,
    ScheduleCleanup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Ready,
    Preparing,
}

/// Download control state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadButton {
    state: ButtonState,
}

impl DownloadButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn label(&self) -> &'static str {
        match self.state {
            ButtonState::Ready => DOWNLOAD_LABEL,
            ButtonState::Preparing => PREPARING_LABEL,
        }
    }

    pub fn enabled(&self) -> bool {
        self.state == ButtonState::Ready
    }

    /// Apply an event; a click while preparing is ignored
    pub fn apply(&mut self, event: DownloadEvent) -> Vec<DownloadEffect> {
        match (self.state, event) {
            (ButtonState::Ready, DownloadEvent::Clicked) => {
                self.state = ButtonState::Preparing;
                vec![
                    DownloadEffect::TriggerDownload,
                    DownloadEffect::ScheduleRestore,
                    DownloadEffect::ScheduleCleanup,
                ]
            }
            (ButtonState::Preparing, DownloadEvent::RestoreElapsed) => {
                self.state = ButtonState::Ready;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

/// Restore/cleanup delays, both measured from the click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadTimings {
    pub restore_delay: Duration,
    pub cleanup_delay: Duration,
}

impl Default for DownloadTimings {
    fn default() -> Self {
        Self::from(&DownloadConfig::default())
    }
}

impl From<&DownloadConfig> for DownloadTimings {
    fn from(config: &DownloadConfig) -> Self {
        Self {
            restore_delay: Duration::from_millis(config.restore_delay_ms),
            cleanup_delay: Duration::from_millis(config.cleanup_delay_ms),
        }
    }
}

/// Cancellable deferred task
pub struct ScheduledTask {
    handle: JoinHandle<()>,
    token: CancellationToken,
}

impl ScheduledTask {
    /// Run `work` after `delay` unless `token` is cancelled first
    pub fn spawn<F, Fut>(name: &'static str, delay: Duration, token: CancellationToken, work: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    debug!(task = name, "Scheduled task cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    work().await;
                }
            }
        });
        Self { handle, token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task to fire or be cancelled
    pub async fn wait(self) {
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Scheduled task aborted");
        }
    }
}

/// In-flight work started by one click
pub struct DownloadHandle {
    save: JoinHandle<ClientResult<PathBuf>>,
    restore: ScheduledTask,
    cleanup: ScheduledTask,
}

impl DownloadHandle {
    /// Wait for the save and both deferred tasks; returns the saved path
    pub async fn finish(self) -> ClientResult<PathBuf> {
        let saved = match self.save.await {
            Ok(result) => result,
            Err(e) => Err(ClientError::Common(mla_common::Error::Internal(format!(
                "Download task failed: {}",
                e
            )))),
        };
        self.restore.wait().await;
        self.cleanup.wait().await;
        saved
    }
}

/// Download control bound to one improved artifact
pub struct DownloadLifecycle<A> {
    service: Arc<A>,
    download_id: String,
    filename: String,
    output_dir: PathBuf,
    timings: DownloadTimings,
    button: Arc<Mutex<DownloadButton>>,
    /// Parent of every pending timer; replaced on shutdown
    pending: Mutex<CancellationToken>,
}

fn lock_button(button: &Mutex<DownloadButton>) -> std::sync::MutexGuard<'_, DownloadButton> {
    // The guarded value is Copy data; a poisoned lock still holds a valid state
    button.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<A: ArtifactService + 'static> DownloadLifecycle<A> {
    pub fn new(
        service: Arc<A>,
        artifact: &ImprovedSection,
        output_dir: PathBuf,
        timings: DownloadTimings,
    ) -> Self {
        Self {
            service,
            download_id: artifact.download_id.clone(),
            filename: artifact.filename.clone(),
            output_dir,
            timings,
            button: Arc::new(Mutex::new(DownloadButton::new())),
            pending: Mutex::new(CancellationToken::new()),
        }
    }

    /// Snapshot of the control's current state
    pub fn button(&self) -> DownloadButton {
        *lock_button(&self.button)
    }

    /// Handle a click; `None` when the control is not enabled
    pub fn click(&self) -> Option<DownloadHandle> {
        let effects = lock_button(&self.button).apply(DownloadEvent::Clicked);
        if effects.is_empty() {
            debug!(download_id = %self.download_id, "Download already in progress, click ignored");
            return None;
        }

        let mut save = None;
        let mut restore = None;
        let mut cleanup = None;
        for effect in effects {
            match effect {
                DownloadEffect::TriggerDownload => save = Some(self.spawn_save()),
                DownloadEffect::ScheduleRestore => restore = Some(self.schedule_restore()),
                DownloadEffect::ScheduleCleanup => cleanup = Some(self.schedule_cleanup()),
            }
        }

        match (save, restore, cleanup) {
            (Some(save), Some(restore), Some(cleanup)) => Some(DownloadHandle {
                save,
                restore,
                cleanup,
            }),
            _ => None,
        }
    }

    /// Cancel every pending timer and re-enable the control
    ///
    /// The control stays usable: a later click starts a fresh cycle with its
    /// own timers. A save already in flight is not interrupted.
    pub fn shutdown(&self) {
        {
            let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
            pending.cancel();
            *pending = CancellationToken::new();
        }
        lock_button(&self.button).apply(DownloadEvent::RestoreElapsed);
        debug!(download_id = %self.download_id, "Pending download timers cancelled");
    }

    fn timer_token(&self) -> CancellationToken {
        self.pending
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .child_token()
    }

    fn spawn_save(&self) -> JoinHandle<ClientResult<PathBuf>> {
        let link = DownloadLink {
            url: self.service.download_url(&self.download_id),
            filename: self.filename.clone(),
        };
        let service = Arc::clone(&self.service);
        let output_dir = self.output_dir.clone();
        info!(url = %link.url, filename = %link.filename, "Starting improved MIDI download");

        tokio::spawn(async move {
            let result = service.download(&link, &output_dir).await;
            if let Err(e) = &result {
                warn!(error = %e, "Improved MIDI download failed");
            }
            result
        })
    }

    fn schedule_restore(&self) -> ScheduledTask {
        let button = Arc::clone(&self.button);
        ScheduledTask::spawn(
            "restore",
            self.timings.restore_delay,
            self.timer_token(),
            move || async move {
                lock_button(&button).apply(DownloadEvent::RestoreElapsed);
                debug!("Download button restored");
            },
        )
    }

    fn schedule_cleanup(&self) -> ScheduledTask {
        let service = Arc::clone(&self.service);
        let download_id = self.download_id.clone();
        ScheduledTask::spawn(
            "cleanup",
            self.timings.cleanup_delay,
            self.timer_token(),
            move || async move {
                match service.cleanup(&download_id).await {
                    Ok(()) => debug!(download_id = %download_id, "Artifact cleanup requested"),
                    Err(e) => debug!(download_id = %download_id, error = %e, "Artifact cleanup failed"),
                }
            },
        )
    }
}
