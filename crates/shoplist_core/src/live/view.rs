//! Replaying, shared, lazily refreshed views.
//!
//! # Responsibility
//! - Hold the last computed value and multicast it to subscribers.
//! - Recompute on upstream change while observed; defer otherwise.
//! - Propagate invalidations to derived views.
//!
//! # Invariants
//! - A new subscriber immediately sees the latest value.
//! - A failed recompute keeps the previous value and leaves the view stale.
//! - A recompute that overlapped an invalidation is discarded and redone;
//!   only values computed after the latest invalidation are published.
//! - Upstream views hold derived views only weakly; no reference cycles.
//! - No view lock is held while `compute` runs.

use log::{debug, warn};
use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Grace period a view keeps refreshing after its last subscriber left.
pub const DEFAULT_GRACE_WINDOW: Duration = Duration::from_secs(5);

/// Error produced by a view's compute function.
pub type ComputeError = Box<dyn Error + Send + Sync>;

type ComputeFn<T> = dyn Fn() -> Result<T, ComputeError> + Send + Sync;

/// Controls when an unobserved view stops eager recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharingPolicy {
    pub grace_window: Duration,
}

impl SharingPolicy {
    pub const fn with_grace_window(grace_window: Duration) -> Self {
        Self { grace_window }
    }
}

impl Default for SharingPolicy {
    fn default() -> Self {
        Self::with_grace_window(DEFAULT_GRACE_WINDOW)
    }
}

#[derive(Debug)]
struct ShareState {
    subscribers: usize,
    idle_since: Option<Instant>,
    stale: bool,
    /// Bumped by every invalidation.
    generation: u64,
    refreshes: u64,
}

trait Invalidate: Send + Sync {
    fn invalidate(&self);
}

struct ViewNode<T> {
    name: &'static str,
    sender: watch::Sender<T>,
    compute: Box<ComputeFn<T>>,
    policy: SharingPolicy,
    state: Mutex<ShareState>,
    dependents: Mutex<Vec<Weak<dyn Invalidate>>>,
}

impl<T> ViewNode<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn state(&self) -> MutexGuard<'_, ShareState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_observed(&self) -> bool {
        let state = self.state();
        if state.subscribers > 0 {
            return true;
        }
        state
            .idle_since
            .is_some_and(|since| since.elapsed() < self.policy.grace_window)
    }

    fn refresh(&self) {
        loop {
            let generation = self.state().generation;
            match (self.compute)() {
                Ok(value) => {
                    let mut state = self.state();
                    if state.generation != generation {
                        debug!(
                            "event=view_refresh module=live status=retry view={}",
                            self.name
                        );
                        continue;
                    }
                    self.sender.send_replace(value);
                    state.stale = false;
                    state.refreshes += 1;
                    return;
                }
                Err(err) => {
                    self.state().stale = true;
                    warn!(
                        "event=view_refresh module=live status=error view={} error={err}",
                        self.name
                    );
                    return;
                }
            }
        }
    }

    fn refresh_if_stale(&self) {
        let stale = self.state().stale;
        if stale {
            self.refresh();
        }
    }

    fn live_dependents(&self) -> Vec<Arc<dyn Invalidate>> {
        let mut dependents = self
            .dependents
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        dependents.retain(|weak| weak.strong_count() > 0);
        dependents.iter().filter_map(Weak::upgrade).collect()
    }
}

impl<T> Invalidate for ViewNode<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn invalidate(&self) {
        {
            let mut state = self.state();
            state.generation += 1;
            state.stale = true;
        }
        if self.is_observed() {
            self.refresh();
        } else {
            debug!(
                "event=view_refresh module=live status=deferred view={}",
                self.name
            );
        }

        for dependent in self.live_dependents() {
            dependent.invalidate();
        }
    }
}

/// Observable value that replays its latest state to every subscriber.
///
/// Cloning a `LiveView` shares the same underlying view.
pub struct LiveView<T> {
    node: Arc<ViewNode<T>>,
}

impl<T> Clone for LiveView<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<T> LiveView<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a root view whose value comes from `compute`.
    ///
    /// `initial` is served until the first successful compute; the view
    /// starts stale so the first read or subscription computes.
    pub fn new<F>(name: &'static str, initial: T, policy: SharingPolicy, compute: F) -> Self
    where
        F: Fn() -> Result<T, ComputeError> + Send + Sync + 'static,
    {
        let (sender, _) = watch::channel(initial);
        Self {
            node: Arc::new(ViewNode {
                name,
                sender,
                compute: Box::new(compute),
                policy,
                state: Mutex::new(ShareState {
                    subscribers: 0,
                    idle_since: None,
                    stale: true,
                    generation: 0,
                    refreshes: 0,
                }),
                dependents: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Creates a view computed from this one with a pure transform.
    ///
    /// The derived view inherits this view's sharing policy and is
    /// invalidated whenever this view is.
    pub fn derive<U, F>(&self, name: &'static str, initial: U, transform: F) -> LiveView<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let upstream = self.clone();
        let derived = LiveView::new(name, initial, self.node.policy, move || {
            Ok(transform(&upstream.current()))
        });

        let node: Arc<dyn Invalidate> = derived.node.clone();
        self.node
            .dependents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::downgrade(&node));
        derived
    }

    /// Signals that the upstream data changed.
    pub fn invalidate(&self) {
        self.node.invalidate();
    }

    /// Returns the latest value, recomputing first if the view is stale.
    pub fn current(&self) -> T {
        self.node.refresh_if_stale();
        self.node.sender.borrow().clone()
    }

    /// Registers a subscriber. The returned handle sees the latest value
    /// immediately and is notified on every later refresh.
    pub fn subscribe(&self) -> Subscription<T> {
        self.node.refresh_if_stale();
        {
            let mut state = self.node.state();
            state.subscribers += 1;
            state.idle_since = None;
        }
        Subscription {
            receiver: self.node.sender.subscribe(),
            node: Arc::clone(&self.node),
        }
    }

    pub fn name(&self) -> &'static str {
        self.node.name
    }

    pub fn subscriber_count(&self) -> usize {
        self.node.state().subscribers
    }

    pub fn is_stale(&self) -> bool {
        self.node.state().stale
    }

    /// Number of successful recomputations so far.
    pub fn refresh_count(&self) -> u64 {
        self.node.state().refreshes
    }
}

/// Active observation of a `LiveView`. Dropping it releases the view.
pub struct Subscription<T> {
    receiver: watch::Receiver<T>,
    node: Arc<ViewNode<T>>,
}

impl<T> Subscription<T>
where
    T: Clone,
{
    /// Latest value delivered to this subscriber; marks it as seen.
    pub fn current(&mut self) -> T {
        self.receiver.borrow_and_update().clone()
    }

    /// Whether a refresh happened since the last `current`/`changed`.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Waits for the next refresh. Returns `false` once the view is gone.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        let mut state = self.node.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.subscribers = state.subscribers.saturating_sub(1);
        if state.subscribers == 0 {
            state.idle_since = Some(Instant::now());
        }
    }
}
