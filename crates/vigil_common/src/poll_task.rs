//! Poll Task - one recurring fetch-and-distribute unit
//!
//! A task fetches one endpoint, decodes the body into its panel's snapshot
//! type and hands it to the panel. Failures of any kind stay inside the task:
//! the panel is told to show its error markers and the next scheduled tick
//! tries again.
//!
//! At most one fetch per task is in flight. A tick that arrives while the
//! previous one is still outstanding is skipped, which keeps successive
//! `apply` calls for one task strictly ordered.

use crate::client::{ApiRequest, TelemetrySource};
use crate::error::FetchError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Lifecycle of one poll task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    InFlight,
    Success,
    Error,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Idle => "idle",
            TaskState::InFlight => "in-flight",
            TaskState::Success => "ok",
            TaskState::Error => "error",
        }
    }
}

/// Result of a single `tick`
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Snapshot decoded and applied to the panel
    Applied,
    /// A previous fetch was still in flight; nothing was issued
    Skipped,
    /// Fetch or decode failed; the panel shows its error state
    Failed(FetchError),
    /// The panel was torn down before the result arrived
    Discarded,
}

/// Observable status of a task, for the status bar and tests
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStatus {
    pub name: String,
    pub state: TaskState,
    pub last_error: Option<FetchError>,
    pub last_success: Option<Instant>,
    pub successes: u64,
    pub failures: u64,
}

/// The target a poll task writes into
///
/// Implemented by every panel. `apply` and `show_error` are only ever called
/// by the one task that owns the panel.
pub trait PanelBinding: Send + Sync + 'static {
    type Snapshot: DeserializeOwned + Send;

    /// Request to issue on the next tick
    fn request(&self) -> ApiRequest;

    /// Distribute a decoded snapshot. `request` is the request it answers.
    ///
    /// An `Err` means the body decoded but reports a failure of its own; the
    /// task then takes the same path as a failed fetch.
    fn apply(&mut self, snapshot: Self::Snapshot, request: &ApiRequest) -> Result<(), FetchError>;

    /// Replace displayed values with explicit error markers
    fn show_error(&mut self, error: &FetchError);
}

/// Object-safe view of a poll task, owned by the scheduler
#[async_trait]
pub trait Tick: Send + Sync {
    fn name(&self) -> &str;

    fn interval(&self) -> Duration;

    fn status(&self) -> TaskStatus;

    /// Run one fetch/apply cycle unless one is already in flight
    async fn tick(&self) -> TickOutcome;

    /// Ask for one more cycle as soon as the current one finishes
    fn request_refresh(&self);
}

/// Releases the in-flight flag when dropped
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Periodic fetch bound to one panel
pub struct PollTask<P: PanelBinding> {
    name: String,
    interval: Duration,
    timeout: Duration,
    source: Arc<dyn TelemetrySource>,
    target: Weak<RwLock<P>>,
    in_flight: AtomicBool,
    refresh_requested: AtomicBool,
    status: Mutex<TaskStatus>,
}

impl<P: PanelBinding> PollTask<P> {
    pub fn new(
        name: impl Into<String>,
        interval: Duration,
        timeout: Duration,
        source: Arc<dyn TelemetrySource>,
        target: &Arc<RwLock<P>>,
    ) -> Self {
        let name = name.into();
        Self {
            status: Mutex::new(TaskStatus {
                name: name.clone(),
                state: TaskState::Idle,
                last_error: None,
                last_success: None,
                successes: 0,
                failures: 0,
            }),
            name,
            interval,
            timeout,
            source,
            target: Arc::downgrade(target),
            in_flight: AtomicBool::new(false),
            refresh_requested: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> TaskState {
        self.lock_status().state
    }

    /// Whether the bound panel still exists
    pub fn target_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    fn lock_status(&self) -> std::sync::MutexGuard<'_, TaskStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: TaskState) {
        self.lock_status().state = state;
    }

    fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlightGuard {
                flag: &self.in_flight,
            })
    }

    async fn fetch_snapshot(&self, request: &ApiRequest) -> Result<P::Snapshot, FetchError> {
        let raw = match tokio::time::timeout(self.timeout, self.source.fetch(request)).await {
            Ok(result) => result?,
            Err(_) => return Err(FetchError::Timeout(self.timeout)),
        };
        Ok(serde_json::from_value(raw)?)
    }

    async fn tick_once(&self) -> TickOutcome {
        let Some(_guard) = self.try_begin() else {
            debug!(task = %self.name, "previous fetch still in flight, skipping tick");
            return TickOutcome::Skipped;
        };
        // This cycle reads the latest request, so it satisfies any pending refresh
        self.refresh_requested.store(false, Ordering::SeqCst);

        let Some(request) = self.target.upgrade().map(|panel| {
            panel
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .request()
        }) else {
            return TickOutcome::Discarded;
        };

        self.set_state(TaskState::InFlight);
        let result = self.fetch_snapshot(&request).await;

        let Some(panel) = self.target.upgrade() else {
            debug!(task = %self.name, "panel torn down, discarding result");
            self.set_state(TaskState::Idle);
            return TickOutcome::Discarded;
        };
        let mut panel = panel.write().unwrap_or_else(PoisonError::into_inner);

        match result.and_then(|snapshot| panel.apply(snapshot, &request)) {
            Ok(()) => {
                let mut status = self.lock_status();
                status.state = TaskState::Success;
                status.last_error = None;
                status.last_success = Some(Instant::now());
                status.successes += 1;
                TickOutcome::Applied
            }
            Err(error) => {
                warn!(
                    task = %self.name,
                    path = request.path(),
                    kind = error.kind(),
                    "poll failed: {}",
                    error
                );
                panel.show_error(&error);
                let mut status = self.lock_status();
                status.state = TaskState::Error;
                status.last_error = Some(error.clone());
                status.failures += 1;
                TickOutcome::Failed(error)
            }
        }
    }
}

#[async_trait]
impl<P: PanelBinding> Tick for PollTask<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn status(&self) -> TaskStatus {
        self.lock_status().clone()
    }

    async fn tick(&self) -> TickOutcome {
        loop {
            let outcome = self.tick_once().await;
            // Guard is released by now; pick up a refresh that lost the race
            if outcome != TickOutcome::Skipped
                && self.refresh_requested.swap(false, Ordering::SeqCst)
            {
                debug!(task = %self.name, "running deferred refresh");
                continue;
            }
            return outcome;
        }
    }

    fn request_refresh(&self) {
        self.refresh_requested.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{FakeResponse, FakeTelemetrySource};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Reading {
        value: f64,
    }

    #[derive(Default)]
    struct Recorder {
        values: Vec<f64>,
        errors: usize,
        query: u32,
    }

    impl PanelBinding for Recorder {
        type Snapshot = Reading;

        fn request(&self) -> ApiRequest {
            ApiRequest::get("/api/reading").with_query("q", self.query)
        }

        fn apply(&mut self, snapshot: Reading, _request: &ApiRequest) -> Result<(), FetchError> {
            if snapshot.value < 0.0 {
                return Err(FetchError::Rejected(format!("negative reading {}", snapshot.value)));
            }
            self.values.push(snapshot.value);
            Ok(())
        }

        fn show_error(&mut self, _error: &FetchError) {
            self.errors += 1;
        }
    }

    fn task(
        source: Arc<FakeTelemetrySource>,
        panel: &Arc<RwLock<Recorder>>,
        timeout: Duration,
    ) -> Arc<PollTask<Recorder>> {
        Arc::new(PollTask::new("reading", Duration::from_secs(1), timeout, source, panel))
    }

    async fn wait_for_calls(source: &FakeTelemetrySource, n: usize) {
        while source.calls("/api/reading") < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_initial_state_idle() {
        let source = Arc::new(FakeTelemetrySource::new());
        let panel = Arc::new(RwLock::new(Recorder::default()));
        let task = task(source, &panel, Duration::from_secs(10));
        assert_eq!(task.state(), TaskState::Idle);
        assert_eq!(task.status().successes, 0);
    }

    #[tokio::test]
    async fn test_success_applies_snapshot() {
        let source = Arc::new(FakeTelemetrySource::new());
        source.respond_json("/api/reading", json!({"value": 4.5}));
        let panel = Arc::new(RwLock::new(Recorder::default()));
        let task = task(source, &panel, Duration::from_secs(10));

        assert_eq!(task.tick().await, TickOutcome::Applied);
        assert_eq!(task.state(), TaskState::Success);
        assert_eq!(panel.read().unwrap().values, vec![4.5]);
    }

    #[tokio::test]
    async fn test_decode_failure_is_error() {
        let source = Arc::new(FakeTelemetrySource::new());
        source.respond_json("/api/reading", json!({"value": "not a number"}));
        let panel = Arc::new(RwLock::new(Recorder::default()));
        let task = task(source, &panel, Duration::from_secs(10));

        let outcome = task.tick().await;
        assert!(matches!(outcome, TickOutcome::Failed(FetchError::Decode(_))));
        assert_eq!(task.state(), TaskState::Error);
        assert_eq!(panel.read().unwrap().errors, 1);
        assert!(panel.read().unwrap().values.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_snapshot_is_error() {
        let source = Arc::new(FakeTelemetrySource::new());
        source
            .respond_json("/api/reading", json!({"value": -1.0}))
            .respond_json("/api/reading", json!({"value": 2.0}));
        let panel = Arc::new(RwLock::new(Recorder::default()));
        let task = task(source, &panel, Duration::from_secs(10));

        let outcome = task.tick().await;
        assert!(matches!(outcome, TickOutcome::Failed(FetchError::Rejected(_))));
        let status = task.status();
        assert_eq!(status.state, TaskState::Error);
        assert_eq!((status.successes, status.failures), (0, 1));
        assert!(matches!(status.last_error, Some(FetchError::Rejected(_))));
        assert_eq!(panel.read().unwrap().errors, 1);

        assert_eq!(task.tick().await, TickOutcome::Applied);
        assert_eq!(task.state(), TaskState::Success);
        assert_eq!(panel.read().unwrap().values, vec![2.0]);
    }

    #[tokio::test]
    async fn test_error_then_recovery() {
        let source = Arc::new(FakeTelemetrySource::new());
        source
            .respond_error("/api/reading", FetchError::Transport("connection refused".into()))
            .respond_json("/api/reading", json!({"value": 1.0}));
        let panel = Arc::new(RwLock::new(Recorder::default()));
        let task = task(source, &panel, Duration::from_secs(10));

        assert!(matches!(task.tick().await, TickOutcome::Failed(_)));
        assert_eq!(task.state(), TaskState::Error);
        assert!(task.status().last_error.is_some());

        assert_eq!(task.tick().await, TickOutcome::Applied);
        let status = task.status();
        assert_eq!(status.state, TaskState::Success);
        assert_eq!(status.last_error, None);
        assert_eq!((status.successes, status.failures), (1, 1));
    }

    #[tokio::test]
    async fn test_no_overlapping_fetch() {
        let source = Arc::new(FakeTelemetrySource::gated());
        source.respond_json("/api/reading", json!({"value": 2.0}));
        let panel = Arc::new(RwLock::new(Recorder::default()));
        let task = task(source.clone(), &panel, Duration::from_secs(10));

        let first = tokio::spawn({
            let task = task.clone();
            async move { task.tick().await }
        });
        wait_for_calls(&source, 1).await;
        assert_eq!(task.state(), TaskState::InFlight);

        // Back-to-back ticks while the first is outstanding
        for _ in 0..5 {
            assert_eq!(task.tick().await, TickOutcome::Skipped);
        }
        assert_eq!(source.calls("/api/reading"), 1);

        source.release(1);
        assert_eq!(first.await.unwrap(), TickOutcome::Applied);
        assert_eq!(panel.read().unwrap().values, vec![2.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_request_times_out() {
        let source = Arc::new(FakeTelemetrySource::new());
        source
            .respond("/api/reading", FakeResponse::Hang)
            .respond_json("/api/reading", json!({"value": 9.0}));
        let panel = Arc::new(RwLock::new(Recorder::default()));
        let task = task(source, &panel, Duration::from_secs(10));

        let outcome = task.tick().await;
        assert_eq!(
            outcome,
            TickOutcome::Failed(FetchError::Timeout(Duration::from_secs(10)))
        );
        assert_eq!(task.state(), TaskState::Error);

        // Ticking resumes after the forced error
        assert_eq!(task.tick().await, TickOutcome::Applied);
    }

    #[tokio::test]
    async fn test_torn_down_panel_discards_result() {
        let source = Arc::new(FakeTelemetrySource::gated());
        source.respond_json("/api/reading", json!({"value": 3.0}));
        let panel = Arc::new(RwLock::new(Recorder::default()));
        let task = task(source.clone(), &panel, Duration::from_secs(10));

        let pending = tokio::spawn({
            let task = task.clone();
            async move { task.tick().await }
        });
        wait_for_calls(&source, 1).await;

        drop(panel);
        assert!(!task.target_alive());
        source.release(1);
        assert_eq!(pending.await.unwrap(), TickOutcome::Discarded);
        assert_eq!(task.tick().await, TickOutcome::Discarded);
    }

    #[tokio::test]
    async fn test_refresh_during_flight_runs_after() {
        let source = Arc::new(FakeTelemetrySource::gated());
        source.respond_json("/api/reading", json!({"value": 5.0}));
        let panel = Arc::new(RwLock::new(Recorder::default()));
        let task = task(source.clone(), &panel, Duration::from_secs(10));

        let first = tokio::spawn({
            let task = task.clone();
            async move { task.tick().await }
        });
        wait_for_calls(&source, 1).await;

        // Filter changed while the old request is outstanding
        panel.write().unwrap().query = 7;
        task.request_refresh();
        assert_eq!(task.tick().await, TickOutcome::Skipped);

        source.release(2);
        assert_eq!(first.await.unwrap(), TickOutcome::Applied);

        let requests = source.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].param("q"), Some("0"));
        assert_eq!(requests[1].param("q"), Some("7"));
        assert_eq!(panel.read().unwrap().values.len(), 2);
    }
}
