//! Transition scheduler
//!
//! Owns all element state and every pending (delayed) transition request,
//! and drives both from a single logical timeline. Requests are applied on
//! scheduling quanta — calls to [`TransitionScheduler::advance`] (explicit
//! dt, deterministic) or [`TransitionScheduler::tick`] (wall clock) — never
//! reentrant-synchronously from `schedule`, so ordering relative to other
//! work issued in the same step is well defined.
//!
//! Completion callbacks and alongside work run from an explicit FIFO fire
//! queue drained outside the state lock. A callback that schedules or
//! applies further transitions enqueues onto the already-draining queue
//! rather than recursing, so arbitrarily deep chains use constant stack.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::element::{
    discard_now, AlongsideFn, CompletionFn, ElementCell, LiftState, LiftStyle, TransitionOutcome,
    TransitionRequest,
};
use lucite_core::VisualParams;

// ─────────────────────────────────────────────────────────────────────────────
// Global Scheduler State
// ─────────────────────────────────────────────────────────────────────────────

/// Global scheduler handle for access from anywhere in the application
static GLOBAL_SCHEDULER: OnceLock<SchedulerHandle> = OnceLock::new();

/// Set the global scheduler handle
///
/// Call once at startup after creating the [`TransitionScheduler`].
///
/// # Panics
///
/// Panics if called more than once.
pub fn set_global_scheduler(handle: SchedulerHandle) {
    if GLOBAL_SCHEDULER.set(handle).is_err() {
        panic!("set_global_scheduler() called more than once");
    }
}

/// Get the global scheduler handle
///
/// # Panics
///
/// Panics if [`set_global_scheduler`] has not been called.
pub fn get_scheduler() -> SchedulerHandle {
    GLOBAL_SCHEDULER
        .get()
        .expect("transition scheduler not initialized; call set_global_scheduler() at startup")
        .clone()
}

/// Try to get the global scheduler (returns None if not initialized)
pub fn try_get_scheduler() -> Option<SchedulerHandle> {
    GLOBAL_SCHEDULER.get().cloned()
}

/// Check if the global scheduler has been initialized
pub fn is_scheduler_initialized() -> bool {
    GLOBAL_SCHEDULER.get().is_some()
}

new_key_type! {
    /// Handle to a registered element
    pub struct ElementId;
    /// Handle to a pending transition request
    pub struct RequestId;
}

/// Callback type for waking the host's event loop from the drive thread
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

/// A delayed request waiting to fire
struct PendingRequest {
    element: ElementId,
    remaining: Duration,
    request: TransitionRequest,
}

/// Deferred user work: completions and alongside closures
pub(crate) enum FireTask {
    Complete(CompletionFn, TransitionOutcome),
    Alongside(AlongsideFn),
}

/// Internal state of the scheduler
pub(crate) struct SchedulerInner {
    elements: SlotMap<ElementId, ElementCell>,
    pending: SlotMap<RequestId, PendingRequest>,
    fire_queue: VecDeque<FireTask>,
    /// True while a drain loop is running; nested dispatch enqueues instead
    dispatching: bool,
    last_frame: Instant,
}

impl SchedulerInner {
    /// Apply a request to an element right now
    ///
    /// All outcome reporting goes through the fire queue; the caller drains
    /// it after releasing the lock.
    fn apply(&mut self, element: ElementId, request: TransitionRequest) {
        let TransitionRequest {
            target,
            animated,
            alongside,
            on_complete,
        } = request;

        let Some(cell) = self.elements.get_mut(element) else {
            tracing::debug!(target_pose = ?target, "request against removed element discarded");
            if let Some(done) = on_complete {
                self.fire_queue
                    .push_back(FireTask::Complete(done, TransitionOutcome::Discarded));
            }
            return;
        };

        // Any in-flight transition is replaced by the newer request; the new
        // one starts from the current interpolated parameters.
        if let Some(previous) = cell.active.take() {
            if let Some(done) = previous.on_complete {
                self.fire_queue
                    .push_back(FireTask::Complete(done, TransitionOutcome::Superseded));
            }
        } else if cell.settled == target {
            // Already settled at the target: no visual change
            if let Some(work) = alongside {
                self.fire_queue.push_back(FireTask::Alongside(work));
            }
            if let Some(done) = on_complete {
                self.fire_queue
                    .push_back(FireTask::Complete(done, TransitionOutcome::Completed));
            }
            return;
        }

        if let Some(work) = alongside {
            self.fire_queue.push_back(FireTask::Alongside(work));
        }
        if animated {
            cell.active = Some(crate::element::ActiveTransition {
                to: target,
                from: cell.params,
                elapsed: Duration::ZERO,
                on_complete,
            });
        } else {
            cell.settle_to(target);
            if let Some(done) = on_complete {
                self.fire_queue
                    .push_back(FireTask::Complete(done, TransitionOutcome::Completed));
            }
        }
    }

    /// Advance the timeline by `dt`
    ///
    /// In-flight transitions settle first; requests released this step
    /// begin animating on the following step, keeping each step's effects
    /// deterministic.
    fn step(&mut self, dt: Duration) {
        let mut settled: SmallVec<[CompletionFn; 4]> = SmallVec::new();
        for (_, cell) in self.elements.iter_mut() {
            if let Some(done) = cell.step(dt) {
                settled.push(done);
            }
        }
        for done in settled {
            self.fire_queue
                .push_back(FireTask::Complete(done, TransitionOutcome::Completed));
        }

        let mut due: SmallVec<[RequestId; 4]> = SmallVec::new();
        for (id, pending) in self.pending.iter_mut() {
            pending.remaining = pending.remaining.saturating_sub(dt);
            if pending.remaining.is_zero() {
                due.push(id);
            }
        }
        for id in due {
            if let Some(pending) = self.pending.remove(id) {
                self.apply(pending.element, pending.request);
            }
        }
    }

    fn has_active(&self) -> bool {
        !self.pending.is_empty() || self.elements.values().any(|cell| cell.active.is_some())
    }
}

/// Drain the fire queue, running completions and alongside work
///
/// User callbacks run with no lock held. The `dispatching` flag makes
/// nested calls (from inside a callback) enqueue-and-return, leaving the
/// outermost loop to run them.
pub(crate) fn drain_fire_queue(inner: &Arc<Mutex<SchedulerInner>>) {
    {
        let mut guard = inner.lock().unwrap();
        if guard.dispatching || guard.fire_queue.is_empty() {
            return;
        }
        guard.dispatching = true;
    }
    loop {
        let task = inner.lock().unwrap().fire_queue.pop_front();
        let Some(task) = task else { break };
        match task {
            FireTask::Complete(done, outcome) => done(outcome),
            FireTask::Alongside(work) => work(),
        }
    }
    inner.lock().unwrap().dispatching = false;
}

// ─────────────────────────────────────────────────────────────────────────────
// Transition Scheduler
// ─────────────────────────────────────────────────────────────────────────────

/// The scheduler that owns element state and drives all transitions
///
/// Typically held by the host application; components receive a weak
/// [`SchedulerHandle`] via [`handle`](TransitionScheduler::handle).
///
/// # Drive modes
///
/// - [`advance`](Self::advance): explicit dt, deterministic — what tests
///   and stepped simulations use
/// - [`tick`](Self::tick): dt from the wall clock — call from a frame loop
/// - [`start_background`](Self::start_background): a fixed-cadence thread
///   that keeps transitions settling while the host is idle and raises a
///   needs-redraw flag (plus an optional wake callback)
pub struct TransitionScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Stop signal for the drive thread
    stop_flag: Arc<AtomicBool>,
    /// Set by the drive thread while transitions are active; the host
    /// checks and clears it to request redraws
    needs_redraw: Arc<AtomicBool>,
    /// Drive thread handle (if running)
    thread_handle: Option<JoinHandle<()>>,
    /// Optional callback to wake the host's event loop
    wake_callback: Option<WakeCallback>,
}

impl TransitionScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                elements: SlotMap::with_key(),
                pending: SlotMap::with_key(),
                fire_queue: VecDeque::new(),
                dispatching: false,
                last_frame: Instant::now(),
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            needs_redraw: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            wake_callback: None,
        }
    }

    /// Get a weak handle for passing to elements and sessions
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Advance the timeline by an explicit delta
    ///
    /// Settles due transitions, releases due requests, then runs queued
    /// completions. Returns true while transitions or pending requests
    /// remain. `advance(Duration::ZERO)` is a pure pump: it fires
    /// zero-delay requests without moving time.
    pub fn advance(&self, dt: Duration) -> bool {
        self.inner.lock().unwrap().step(dt);
        drain_fire_queue(&self.inner);
        self.inner.lock().unwrap().has_active()
    }

    /// Advance by the wall-clock time since the previous tick
    pub fn tick(&self) -> bool {
        let dt = {
            let mut inner = self.inner.lock().unwrap();
            let now = Instant::now();
            let dt = now - inner.last_frame;
            inner.last_frame = now;
            dt
        };
        self.advance(dt)
    }

    /// Set a callback invoked from the drive thread when transitions are
    /// active, to wake the host's event loop
    pub fn set_wake_callback<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.wake_callback = Some(Arc::new(callback));
    }

    /// Start driving transitions on a background thread
    ///
    /// The thread ticks at 120fps, raising the needs-redraw flag (and
    /// invoking the wake callback) whenever transitions are active.
    pub fn start_background(&mut self) {
        if self.thread_handle.is_some() {
            return; // Already running
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let needs_redraw = Arc::clone(&self.needs_redraw);
        let wake_callback = self.wake_callback.clone();

        self.thread_handle = Some(thread::spawn(move || {
            let frame_duration = Duration::from_micros(1_000_000 / 120);
            tracing::debug!("transition drive thread started");

            while !stop_flag.load(Ordering::Relaxed) {
                let start = Instant::now();

                {
                    let mut guard = inner.lock().unwrap();
                    let now = Instant::now();
                    let dt = now - guard.last_frame;
                    guard.last_frame = now;
                    guard.step(dt);
                }
                drain_fire_queue(&inner);
                let has_active = inner.lock().unwrap().has_active();

                if has_active {
                    needs_redraw.store(true, Ordering::Release);
                    if let Some(ref callback) = wake_callback {
                        callback();
                    }
                }

                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
            tracing::debug!("transition drive thread stopped");
        }));
    }

    /// Stop the drive thread
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    /// Check if the drive thread is running
    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Check and clear the needs-redraw flag in one atomic swap
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    /// Manually raise the needs-redraw flag
    pub fn request_redraw(&self) {
        self.needs_redraw.store(true, Ordering::Release);
    }

    /// Check if any transitions or pending requests remain
    pub fn has_active_transitions(&self) -> bool {
        self.inner.lock().unwrap().has_active()
    }

    /// Number of registered elements
    pub fn element_count(&self) -> usize {
        self.inner.lock().unwrap().elements.len()
    }

    /// Number of pending (not yet fired) requests
    pub fn pending_count(&self) -> usize {
        self.inner.lock().unwrap().pending.len()
    }
}

impl Default for TransitionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TransitionScheduler {
    fn drop(&mut self) {
        // Stop the drive thread when the scheduler is dropped
        self.stop_background();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scheduler Handle
// ─────────────────────────────────────────────────────────────────────────────

/// A weak handle to the scheduler
///
/// Passed to elements, sessions, and widgets. Does not keep the scheduler
/// alive; every operation degrades safely once it is gone.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register an element and return its key
    pub(crate) fn register_element(&self, style: LiftStyle) -> Option<ElementId> {
        self.inner.upgrade().map(|inner| {
            let mut guard = inner.lock().unwrap();
            // Reset the frame clock so a long-idle scheduler doesn't apply
            // a huge first dt to the new element
            guard.last_frame = Instant::now();
            guard.elements.insert(ElementCell::new(style))
        })
    }

    /// Remove an element; its in-flight transition is dropped unfired
    pub(crate) fn remove_element(&self, id: ElementId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().elements.remove(id);
        }
    }

    /// Observable state of an element
    pub fn element_state(&self, id: ElementId) -> Option<LiftState> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().elements.get(id).map(ElementCell::state))
    }

    /// Current visual parameters of an element
    pub fn element_params(&self, id: ElementId) -> Option<VisualParams> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().elements.get(id).map(|cell| cell.params))
    }

    /// Apply a request to an element now, then run queued callbacks
    pub(crate) fn apply_transition(&self, id: ElementId, request: TransitionRequest) {
        let Some(inner) = self.inner.upgrade() else {
            discard_now(request);
            return;
        };
        inner.lock().unwrap().apply(id, request);
        drain_fire_queue(&inner);
    }

    /// Schedule a request against an element after a delay
    ///
    /// The request fires on the first scheduling quantum at which the delay
    /// has elapsed — zero delay fires on the next `advance`/`tick`, never
    /// synchronously. Returns a token that cancels the request while it is
    /// still pending.
    pub fn schedule(
        &self,
        element: &crate::element::LiftElement,
        delay: Duration,
        request: TransitionRequest,
    ) -> CancelToken {
        match element.id() {
            Some(id) => self.schedule_id(id, delay, request),
            None => {
                discard_now(request);
                self.dead_token()
            }
        }
    }

    pub(crate) fn schedule_id(
        &self,
        element: ElementId,
        delay: Duration,
        request: TransitionRequest,
    ) -> CancelToken {
        let Some(inner) = self.inner.upgrade() else {
            discard_now(request);
            return self.dead_token();
        };
        let id = inner.lock().unwrap().pending.insert(PendingRequest {
            element,
            remaining: delay,
            request,
        });
        CancelToken {
            id,
            scheduler: self.clone(),
        }
    }

    /// Queue a `Discarded` outcome for a request that will never run
    ///
    /// Fires on the next scheduling quantum so callers are not left waiting
    /// on a completion; the returned token is inert.
    pub(crate) fn discard(&self, request: TransitionRequest) -> CancelToken {
        match self.inner.upgrade() {
            Some(inner) => {
                tracing::debug!(target_pose = ?request.target, "request discarded");
                if let Some(done) = request.on_complete {
                    inner
                        .lock()
                        .unwrap()
                        .fire_queue
                        .push_back(FireTask::Complete(done, TransitionOutcome::Discarded));
                }
            }
            None => discard_now(request),
        }
        self.dead_token()
    }

    /// Strip the completion callback from an element's in-flight transition
    pub(crate) fn silence_element(&self, id: ElementId) {
        if let Some(inner) = self.inner.upgrade() {
            if let Some(cell) = inner.lock().unwrap().elements.get_mut(id) {
                if let Some(active) = cell.active.as_mut() {
                    active.on_complete = None;
                }
            }
        }
    }

    fn dead_token(&self) -> CancelToken {
        CancelToken {
            id: RequestId::default(),
            scheduler: self.clone(),
        }
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cancel Token
// ─────────────────────────────────────────────────────────────────────────────

/// Token for cancelling a pending transition request
///
/// Cancelling before the request fires guarantees the transition is never
/// applied and its completion never runs. Once the request has fired,
/// cancelling is a no-op — the transition runs out under the usual
/// completion and supersession rules.
#[derive(Clone)]
pub struct CancelToken {
    id: RequestId,
    scheduler: SchedulerHandle,
}

impl CancelToken {
    /// Cancel the pending request
    ///
    /// Returns true if the request was still pending and is now gone.
    /// Idempotent; after firing (or a second cancel) this returns false.
    pub fn cancel(&self) -> bool {
        let Some(inner) = self.scheduler.inner.upgrade() else {
            return false;
        };
        let removed = inner.lock().unwrap().pending.remove(self.id);
        match removed {
            Some(pending) => {
                tracing::trace!(
                    outcome = ?TransitionOutcome::Cancelled,
                    target_pose = ?pending.request.target,
                    "pending request cancelled"
                );
                true
            }
            None => false,
        }
    }

    /// Check if the request has not yet fired or been cancelled
    pub fn is_pending(&self) -> bool {
        self.scheduler
            .inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().pending.contains_key(self.id))
            .unwrap_or(false)
    }
}
