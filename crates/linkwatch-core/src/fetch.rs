// ── Fetch controller ──
//
// One explicit trigger, one request, one rendered outcome. The state
// machine is Idle -> Loading -> Success | Error, re-entrant for the life
// of the session. A trigger while Loading is ignored, so two requests'
// outcomes can never interleave on the surface.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, error, info};

use linkwatch_api::{User, UsersClient};

use crate::error::FetchError;
use crate::surface::{ErrorRegion, ResultsRegion, UserEntry};

/// The only message a failed fetch ever shows.
pub const FETCH_FAILED_MESSAGE: &str =
    "Error: Failed to fetch data. Please check your connection.";

/// Shown in the results region while a request is in flight.
pub const LOADING_PLACEHOLDER: &str = "Loading...";

// ── FetchState ───────────────────────────────────────────────────

/// The fetch controller's state. Replaced wholesale on every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(Arc<Vec<User>>),
    Error(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Users of a successful fetch, or an empty slice.
    pub fn users(&self) -> &[User] {
        match self {
            Self::Success(users) => users,
            Self::Idle | Self::Loading | Self::Error(_) => &[],
        }
    }
}

/// What happened to a call to [`FetchController::trigger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A fetch was already in flight; nothing changed.
    Ignored,
    /// The fetch ran to completion and left the controller in this state.
    Completed(FetchState),
}

// ── UserDirectory ────────────────────────────────────────────────

/// The remote resource: one request that yields the user list or a
/// classified failure.
pub trait UserDirectory: Send + Sync + 'static {
    fn fetch_users(&self) -> impl Future<Output = Result<Vec<User>, FetchError>> + Send;
}

impl UserDirectory for UsersClient {
    async fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
        Ok(self.list_users().await?)
    }
}

// ── FetchController ──────────────────────────────────────────────

/// Owns the [`FetchState`] and the results and error regions.
///
/// Cheaply cloneable; clones share state, so a trigger spawned from one
/// clone is seen as in flight by all of them.
pub struct FetchController<D> {
    inner: Arc<FetchInner<D>>,
}

struct FetchInner<D> {
    directory: D,
    state: watch::Sender<FetchState>,
    in_flight: AtomicBool,
    results: Arc<dyn ResultsRegion>,
    errors: Arc<dyn ErrorRegion>,
}

impl<D> Clone for FetchController<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: UserDirectory> FetchController<D> {
    /// Create an idle controller. Nothing is rendered until the first trigger.
    pub fn new(
        directory: D,
        results: Arc<dyn ResultsRegion>,
        errors: Arc<dyn ErrorRegion>,
    ) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            inner: Arc::new(FetchInner {
                directory,
                state,
                in_flight: AtomicBool::new(false),
                results,
                errors,
            }),
        }
    }

    pub fn directory(&self) -> &D {
        &self.inner.directory
    }

    pub fn state(&self) -> FetchState {
        self.inner.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.inner.state.subscribe()
    }

    /// Handle one "fetch requested" input.
    ///
    /// Enters `Loading` and waits for the request to finish, or returns
    /// [`TriggerOutcome::Ignored`] at once if a request is already in flight.
    /// Failures never escape: they become the `Error` state.
    ///
    /// The request runs on its own task. Dropping the returned future stops
    /// the wait, not the request, which still renders its outcome.
    pub async fn trigger(&self) -> TriggerOutcome {
        if self
            .inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("fetch already in flight, trigger ignored");
            return TriggerOutcome::Ignored;
        }

        debug!("fetch started");
        self.inner.publish(FetchState::Loading);

        let next = match tokio::spawn(Arc::clone(&self.inner).fetch()).await {
            Ok(next) => next,
            Err(e) => {
                error!(error = %e, "fetch task failed");
                let next = FetchState::Error(FETCH_FAILED_MESSAGE.to_owned());
                self.inner.finish(next.clone());
                next
            }
        };
        TriggerOutcome::Completed(next)
    }
}

impl<D: UserDirectory> FetchInner<D> {
    /// Run the request and leave the controller in its outcome state.
    async fn fetch(self: Arc<Self>) -> FetchState {
        let next = match self.directory.fetch_users().await {
            Ok(users) => {
                info!(count = users.len(), "fetch succeeded");
                FetchState::Success(Arc::new(users))
            }
            Err(err) => {
                error!(kind = %err.kind(), error = %err, "fetch failed");
                FetchState::Error(FETCH_FAILED_MESSAGE.to_owned())
            }
        };
        self.finish(next.clone());
        next
    }

    fn finish(&self, next: FetchState) {
        self.publish(next);
        self.in_flight.store(false, Ordering::Release);
    }

    /// Render `state`, then make it the published state.
    fn publish(&self, state: FetchState) {
        self.render(&state);
        self.state.send_replace(state);
    }

    /// Draw both owned regions from `state` alone.
    fn render(&self, state: &FetchState) {
        match state {
            FetchState::Idle => {}
            FetchState::Loading => {
                self.errors.clear();
                self.results.clear();
                self.results.show_placeholder(LOADING_PLACEHOLDER);
            }
            FetchState::Success(users) => {
                self.errors.clear();
                let entries: Vec<UserEntry> = users.iter().map(UserEntry::from).collect();
                self.results.show_entries(&entries);
            }
            FetchState::Error(message) => {
                self.results.clear();
                self.errors.show(message);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tokio::sync::Notify;

    use super::*;
    use crate::surface::{MemorySurface, ResultsView};

    /// Answers from a queue; optionally waits for a permit before answering.
    #[derive(Default)]
    struct Scripted {
        responses: Mutex<VecDeque<Result<Vec<User>, FetchError>>>,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn answering(responses: Vec<Result<Vec<User>, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl UserDirectory for Scripted {
        async fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn controller(directory: Scripted) -> (FetchController<Scripted>, Arc<MemorySurface>) {
        let surface = Arc::new(MemorySurface::new());
        let ctrl = FetchController::new(directory, surface.clone(), surface.clone());
        (ctrl, surface)
    }

    fn users(names: &[&str]) -> Vec<User> {
        names
            .iter()
            .map(|n| User::new(*n, format!("{}@x.com", n.to_lowercase())))
            .collect()
    }

    #[test]
    fn starts_idle_and_untouched() {
        let (ctrl, surface) = controller(Scripted::default());
        assert_eq!(ctrl.state(), FetchState::Idle);
        let snap = surface.snapshot();
        assert_eq!((snap.results_writes, snap.error_writes), (0, 0));
    }

    #[tokio::test]
    async fn success_renders_entries_in_order() {
        let (ctrl, surface) =
            controller(Scripted::answering(vec![Ok(users(&["Ann", "Bob", "Ann"]))]));

        let outcome = ctrl.trigger().await;

        let TriggerOutcome::Completed(FetchState::Success(got)) = &outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(got.len(), 3);

        let snap = surface.snapshot();
        assert_eq!(
            snap.results.lines(),
            vec!["Ann (ann@x.com)", "Bob (bob@x.com)", "Ann (ann@x.com)"]
        );
        assert_eq!(snap.error, None);
    }

    #[tokio::test]
    async fn every_error_kind_shows_the_same_message() {
        let failures = vec![
            Err(FetchError::Transport {
                message: "connection refused".into(),
            }),
            Err(FetchError::Application { status: 503 }),
            Err(FetchError::Parse {
                message: "expected value".into(),
            }),
        ];
        let (ctrl, surface) = controller(Scripted::answering(failures));

        for _ in 0..3 {
            let outcome = ctrl.trigger().await;
            assert_eq!(
                outcome,
                TriggerOutcome::Completed(FetchState::Error(FETCH_FAILED_MESSAGE.into()))
            );
            let snap = surface.snapshot();
            assert_eq!(snap.results, ResultsView::Empty);
            assert_eq!(snap.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
        }
    }

    #[tokio::test]
    async fn retrigger_after_success_drops_stale_entries() {
        let (ctrl, surface) =
            controller(Scripted::answering(vec![Ok(users(&["Ann", "Bob"])), Ok(Vec::new())]));

        ctrl.trigger().await;
        assert_eq!(surface.snapshot().results.entries().len(), 2);

        ctrl.trigger().await;
        let snap = surface.snapshot();
        assert_eq!(snap.results, ResultsView::Entries(Vec::new()));
        assert_eq!(ctrl.state().users(), &[] as &[User]);
    }

    #[tokio::test]
    async fn success_after_error_clears_error_region() {
        let (ctrl, surface) = controller(Scripted::answering(vec![
            Err(FetchError::Application { status: 500 }),
            Ok(users(&["Ann"])),
        ]));

        ctrl.trigger().await;
        ctrl.trigger().await;

        let snap = surface.snapshot();
        assert_eq!(snap.error, None);
        assert_eq!(snap.results.lines(), vec!["Ann (ann@x.com)"]);
    }

    #[tokio::test]
    async fn trigger_while_loading_is_ignored() {
        let gate = Arc::new(Notify::new());
        let directory = Scripted {
            gate: Some(Arc::clone(&gate)),
            ..Scripted::answering(vec![Ok(users(&["Ann"])), Ok(users(&["Zed"]))])
        };
        let (ctrl, surface) = controller(directory);
        let mut states = ctrl.subscribe();

        let first = tokio::spawn({
            let ctrl = ctrl.clone();
            async move { ctrl.trigger().await }
        });

        states.wait_for(FetchState::is_loading).await.unwrap();
        assert_eq!(
            surface.snapshot().results,
            ResultsView::Placeholder(LOADING_PLACEHOLDER.into())
        );

        assert_eq!(ctrl.trigger().await, TriggerOutcome::Ignored);
        assert!(ctrl.is_loading());

        gate.notify_one();
        let outcome = first.await.unwrap();
        assert!(matches!(outcome, TriggerOutcome::Completed(FetchState::Success(_))));

        assert_eq!(ctrl.directory().calls(), 1);
        assert_eq!(surface.snapshot().results.lines(), vec!["Ann (ann@x.com)"]);
    }

    #[tokio::test]
    async fn loading_clears_previous_error() {
        let gate = Arc::new(Notify::new());
        let directory = Scripted {
            gate: Some(Arc::clone(&gate)),
            ..Scripted::answering(vec![Err(FetchError::Application { status: 404 })])
        };
        let (ctrl, surface) = controller(directory);

        gate.notify_one();
        ctrl.trigger().await;
        assert!(surface.snapshot().error.is_some());

        let mut states = ctrl.subscribe();
        let second = tokio::spawn({
            let ctrl = ctrl.clone();
            async move { ctrl.trigger().await }
        });
        states.wait_for(FetchState::is_loading).await.unwrap();

        let snap = surface.snapshot();
        assert_eq!(snap.error, None);
        assert_eq!(snap.results.lines(), vec![LOADING_PLACEHOLDER]);

        gate.notify_one();
        second.await.unwrap();
    }

    #[tokio::test]
    async fn dropped_trigger_still_completes_the_request() {
        let gate = Arc::new(Notify::new());
        let directory = Scripted {
            gate: Some(Arc::clone(&gate)),
            ..Scripted::answering(vec![Ok(users(&["Ann"])), Ok(users(&["Bob"]))])
        };
        let (ctrl, surface) = controller(directory);
        let mut states = ctrl.subscribe();

        let abandoned = tokio::time::timeout(Duration::from_millis(50), ctrl.trigger()).await;
        assert!(abandoned.is_err());
        assert!(ctrl.is_loading());

        gate.notify_one();
        states
            .wait_for(|s| matches!(s, FetchState::Success(_)))
            .await
            .unwrap();
        assert_eq!(surface.snapshot().results.lines(), vec!["Ann (ann@x.com)"]);

        gate.notify_one();
        let outcome = ctrl.trigger().await;
        let TriggerOutcome::Completed(FetchState::Success(got)) = &outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(got.as_slice(), users(&["Bob"]).as_slice());
        assert_eq!(ctrl.directory().calls(), 2);
    }

    /// Regions that record which state was published when they were drawn.
    #[derive(Default)]
    struct RecordingRegions {
        published: Mutex<Option<watch::Receiver<FetchState>>>,
        seen: Mutex<Vec<(&'static str, FetchState)>>,
    }

    impl RecordingRegions {
        fn record(&self, write: &'static str) {
            if let Some(rx) = self.published.lock().unwrap().as_ref() {
                let published = rx.borrow().clone();
                self.seen.lock().unwrap().push((write, published));
            }
        }
    }

    impl ResultsRegion for RecordingRegions {
        fn clear(&self) {}

        fn show_placeholder(&self, _text: &str) {
            self.record("placeholder");
        }

        fn show_entries(&self, _entries: &[UserEntry]) {
            self.record("entries");
        }
    }

    impl ErrorRegion for RecordingRegions {
        fn clear(&self) {}

        fn show(&self, _message: &str) {
            self.record("error");
        }
    }

    #[tokio::test]
    async fn regions_are_drawn_before_state_is_published() {
        let regions = Arc::new(RecordingRegions::default());
        let ctrl = FetchController::new(
            Scripted::answering(vec![
                Ok(users(&["Ann"])),
                Err(FetchError::Application { status: 500 }),
            ]),
            regions.clone(),
            regions.clone(),
        );
        *regions.published.lock().unwrap() = Some(ctrl.subscribe());

        ctrl.trigger().await;
        ctrl.trigger().await;

        let seen = regions.seen.lock().unwrap().clone();
        let success = FetchState::Success(Arc::new(users(&["Ann"])));
        assert_eq!(
            seen,
            vec![
                ("placeholder", FetchState::Idle),
                ("entries", FetchState::Loading),
                ("placeholder", success),
                ("error", FetchState::Loading),
            ]
        );
    }
}
