//! Status polling for long-running backend jobs.
//!
//! One [`JobStatusPoller`] watches one project. Each [`JobKind`] has its own
//! timer chain, its own [`Visibility`] flag and its own [`PollState`], which
//! consumers read directly or observe through [`JobStatusPoller::subscribe`].

pub mod schedule;

pub use schedule::{schedule, schedule_after, Schedule, TaskHandle};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;

pub use crate::api::{JobKind, JobStatus};
use crate::api::JobStatusSource;

/// Default interval between status requests for both job kinds.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Delay before the first upload status request.
pub const DEFAULT_UPLOAD_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Snapshot of the polling state for one job kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    pub active: bool,
    pub interval: Duration,
    /// Latest successful answer. Last write wins.
    pub last_result: Option<JobStatus>,
}

/// Timing for one job kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub initial_delay: Duration,
}

impl PollSettings {
    /// Generation polls immediately; upload waits [`DEFAULT_UPLOAD_INITIAL_DELAY`].
    pub fn default_for(kind: JobKind) -> Self {
        let initial_delay = match kind {
            JobKind::Generation => Duration::ZERO,
            JobKind::Upload => DEFAULT_UPLOAD_INITIAL_DELAY,
        };
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            initial_delay,
        }
    }

    fn schedule(&self) -> Schedule {
        Schedule::every(self.interval).with_initial_delay(self.initial_delay)
    }
}

/// Whether the view that displays a job's status is currently shown.
///
/// Ticks that find the view hidden skip the request but keep the chain alive.
#[derive(Debug, Clone)]
pub struct Visibility(Arc<AtomicBool>);

impl Default for Visibility {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Visibility {
    pub fn show(&self) {
        self.set(true);
    }

    pub fn hide(&self) {
        self.set(false);
    }

    pub fn set(&self, visible: bool) {
        self.0.store(visible, Ordering::SeqCst);
    }

    pub fn is_visible(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct PollSlot {
    settings: PollSettings,
    state: Arc<watch::Sender<PollState>>,
    visibility: Visibility,
    task: Mutex<Option<TaskHandle>>,
}

impl PollSlot {
    fn new(settings: PollSettings) -> Self {
        let (state, _) = watch::channel(PollState {
            active: false,
            interval: settings.interval,
            last_result: None,
        });
        Self {
            settings,
            state: Arc::new(state),
            visibility: Visibility::default(),
            task: Mutex::new(None),
        }
    }

    fn task(&self) -> MutexGuard<'_, Option<TaskHandle>> {
        self.task.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Polls job status endpoints for one project.
///
/// Dropping the poller releases every timer chain.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use vogon_client::api::HttpBackend;
/// use vogon_client::poller::{JobKind, JobStatusPoller};
///
/// # async fn example() -> vogon_client::error::Result<()> {
/// let backend = Arc::new(HttpBackend::new("http://localhost:8080")?);
/// let poller = JobStatusPoller::new(backend, "shoes");
/// poller.start(JobKind::Generation);
/// let mut updates = poller.subscribe(JobKind::Generation);
/// while updates.changed().await.is_ok() {
///     if let Some(status) = &updates.borrow().last_result {
///         println!("{}", status.text);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct JobStatusPoller {
    source: Arc<dyn JobStatusSource>,
    project_id: String,
    generation: PollSlot,
    upload: PollSlot,
}

impl JobStatusPoller {
    pub fn new(source: Arc<dyn JobStatusSource>, project_id: impl Into<String>) -> Self {
        Self::with_settings(
            source,
            project_id,
            PollSettings::default_for(JobKind::Generation),
            PollSettings::default_for(JobKind::Upload),
        )
    }

    pub fn with_settings(
        source: Arc<dyn JobStatusSource>,
        project_id: impl Into<String>,
        generation: PollSettings,
        upload: PollSettings,
    ) -> Self {
        Self {
            source,
            project_id: project_id.into(),
            generation: PollSlot::new(generation),
            upload: PollSlot::new(upload),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn slot(&self, kind: JobKind) -> &PollSlot {
        match kind {
            JobKind::Generation => &self.generation,
            JobKind::Upload => &self.upload,
        }
    }

    /// Start polling `kind`. Returns `false` when a chain is already running.
    ///
    /// A chain stopped while its request was in flight is awaited before the
    /// new chain's first request, so at most one request per kind is
    /// outstanding.
    pub fn start(&self, kind: JobKind) -> bool {
        let slot = self.slot(kind);
        let mut task = slot.task();
        if task.as_ref().is_some_and(is_running) {
            return false;
        }

        slot.state.send_modify(|state| {
            state.active = true;
            state.interval = slot.settings.interval;
        });

        let source = self.source.clone();
        let project_id = self.project_id.clone();
        let state = slot.state.clone();
        let visibility = slot.visibility.clone();
        let previous = task.take();
        *task = Some(schedule_after(previous, slot.settings.schedule(), move || {
            poll_once(
                source.clone(),
                project_id.clone(),
                kind,
                state.clone(),
                visibility.clone(),
            )
        }));

        tracing::info!(
            project = %self.project_id,
            job = %kind,
            interval_ms = slot.settings.interval.as_millis() as u64,
            "status polling started"
        );
        true
    }

    /// Stop polling `kind`. A request already in flight still completes and
    /// its answer is still recorded. Returns `false` when nothing was running.
    pub fn stop(&self, kind: JobKind) -> bool {
        let slot = self.slot(kind);
        // The cancelled handle stays in the slot until the next `start`,
        // which chains on its exit.
        let task = slot.task();
        slot.state.send_modify(|state| state.active = false);
        match task.as_ref() {
            Some(handle) if is_running(handle) => {
                handle.cancel();
                tracing::info!(project = %self.project_id, job = %kind, "status polling stopped");
                true
            }
            _ => false,
        }
    }

    /// Stop every job kind.
    pub fn stop_all(&self) {
        for kind in JobKind::ALL {
            self.stop(kind);
        }
    }

    pub fn is_active(&self, kind: JobKind) -> bool {
        self.slot(kind).task().as_ref().is_some_and(is_running)
    }

    pub fn state(&self, kind: JobKind) -> PollState {
        self.slot(kind).state.borrow().clone()
    }

    pub fn last_result(&self, kind: JobKind) -> Option<JobStatus> {
        self.slot(kind).state.borrow().last_result.clone()
    }

    /// Observe state changes for `kind`.
    pub fn subscribe(&self, kind: JobKind) -> watch::Receiver<PollState> {
        self.slot(kind).state.subscribe()
    }

    /// Visibility flag of the view showing `kind`. Visible by default.
    pub fn visibility(&self, kind: JobKind) -> Visibility {
        self.slot(kind).visibility.clone()
    }
}

fn is_running(handle: &TaskHandle) -> bool {
    !handle.is_cancelled() && !handle.is_finished()
}

async fn poll_once(
    source: Arc<dyn JobStatusSource>,
    project_id: String,
    kind: JobKind,
    state: Arc<watch::Sender<PollState>>,
    visibility: Visibility,
) {
    if !visibility.is_visible() {
        tracing::debug!(project = %project_id, job = %kind, "view hidden; skipping status poll");
        return;
    }
    match source.job_status(&project_id, kind).await {
        Ok(status) => {
            tracing::debug!(project = %project_id, job = %kind, status = %status.text, "status polled");
            state.send_modify(|state| state.last_result = Some(status));
        }
        Err(err) => {
            tracing::debug!(
                project = %project_id,
                job = %kind,
                error = %err,
                "status poll failed; retrying next interval"
            );
        }
    }
}
