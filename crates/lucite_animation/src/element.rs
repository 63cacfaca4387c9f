//! Liftable elements
//!
//! A liftable element has two declared poses (resting and lifted) and one
//! mutation point: applying a [`TransitionRequest`]. Elements know nothing
//! about wall-clock scheduling; delays live in the scheduler, and the
//! element only animates between poses and reports completion.
//!
//! Element state is owned by the scheduler; [`LiftElement`] is the public
//! handle that registers on construction and cleans up on drop.

use std::time::Duration;

use lucite_core::VisualParams;

use crate::easing::Easing;
use crate::scheduler::{ElementId, SchedulerHandle};

/// The two declared poses of a liftable element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pose {
    Resting,
    Lifted,
}

impl Pose {
    /// The other pose
    pub fn opposite(self) -> Pose {
        match self {
            Pose::Resting => Pose::Lifted,
            Pose::Lifted => Pose::Resting,
        }
    }
}

/// Observable element state
///
/// `Settled` is a committed pose; `Transitioning` carries the pose the
/// element is currently animating towards. Mid-flight reads are therefore
/// always distinguishable from stable ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiftState {
    Settled(Pose),
    Transitioning(Pose),
}

impl LiftState {
    /// The pose this state is at or heading towards
    pub fn target(self) -> Pose {
        match self {
            LiftState::Settled(pose) | LiftState::Transitioning(pose) => pose,
        }
    }

    pub fn is_settled(self) -> bool {
        matches!(self, LiftState::Settled(_))
    }

    pub fn is_transitioning(self) -> bool {
        matches!(self, LiftState::Transitioning(_))
    }
}

/// How a transition request ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The transition ran to completion and the element settled at its target
    Completed,
    /// A newer request on the same element replaced this one mid-flight
    Superseded,
    /// The request was cancelled before it fired; its completion callback
    /// is not invoked
    Cancelled,
    /// The request targeted an element or session that was already torn down
    Discarded,
}

impl TransitionOutcome {
    pub fn is_completed(self) -> bool {
        matches!(self, TransitionOutcome::Completed)
    }
}

pub(crate) type CompletionFn = Box<dyn FnOnce(TransitionOutcome) + Send>;
pub(crate) type AlongsideFn = Box<dyn FnOnce() + Send>;

// ─────────────────────────────────────────────────────────────────────────────
// Lift Style
// ─────────────────────────────────────────────────────────────────────────────

/// Per-element animation style: the two pose parameter sets and the
/// host-defined duration and curve used to travel between them
#[derive(Clone, Copy, Debug)]
pub struct LiftStyle {
    pub duration: Duration,
    pub easing: Easing,
    pub resting: VisualParams,
    pub lifted: VisualParams,
}

impl Default for LiftStyle {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(350),
            easing: Easing::EaseInOut,
            resting: VisualParams::new(1.0, 0.0, 0.2),
            lifted: VisualParams::new(1.08, 8.0, 0.35),
        }
    }
}

impl LiftStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transition duration
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the easing curve
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set both pose parameter sets
    pub fn poses(mut self, resting: VisualParams, lifted: VisualParams) -> Self {
        self.resting = resting;
        self.lifted = lifted;
        self
    }

    /// A quick, responsive lift (good for press feedback)
    pub fn brisk() -> Self {
        Self::new()
            .duration(Duration::from_millis(200))
            .easing(Easing::EaseOut)
    }

    /// A slow, smooth lift (good for ambient choreography)
    pub fn gentle() -> Self {
        Self::new().duration(Duration::from_millis(500))
    }

    /// The resting parameter values for a pose
    pub fn pose_params(&self, pose: Pose) -> VisualParams {
        match pose {
            Pose::Resting => self.resting,
            Pose::Lifted => self.lifted,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transition Request
// ─────────────────────────────────────────────────────────────────────────────

/// A request to move an element to a pose
///
/// Built with a fluent API and handed to [`LiftElement::transition`] for
/// immediate application, or to the scheduler for delayed firing. The
/// request does not own the element.
///
/// ```
/// use lucite_animation::{Pose, TransitionRequest};
///
/// let request = TransitionRequest::to(Pose::Lifted)
///     .on_complete(|outcome| println!("lift: {outcome:?}"));
/// # let _ = request;
/// ```
pub struct TransitionRequest {
    pub(crate) target: Pose,
    pub(crate) animated: bool,
    pub(crate) alongside: Option<AlongsideFn>,
    pub(crate) on_complete: Option<CompletionFn>,
}

impl TransitionRequest {
    /// A new animated request towards a pose
    pub fn to(target: Pose) -> Self {
        Self {
            target,
            animated: true,
            alongside: None,
            on_complete: None,
        }
    }

    /// Whether the change animates (`false` applies synchronously)
    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    /// Work to run when the request is accepted (alongside the animation)
    pub fn alongside<F: FnOnce() + Send + 'static>(mut self, work: F) -> Self {
        self.alongside = Some(Box::new(work));
        self
    }

    /// Callback invoked with the request's outcome
    ///
    /// Fires at most once; never fires for a request cancelled before it
    /// took effect.
    pub fn on_complete<F: FnOnce(TransitionOutcome) + Send + 'static>(mut self, done: F) -> Self {
        self.on_complete = Some(Box::new(done));
        self
    }

    /// The requested pose
    pub fn target(&self) -> Pose {
        self.target
    }
}

/// Run a request's completion with `Discarded`, dropping its alongside work.
///
/// Used when no scheduler exists to queue through; callers are never left
/// waiting on a completion that cannot fire.
pub(crate) fn discard_now(request: TransitionRequest) {
    tracing::debug!(target_pose = ?request.target, "transition request discarded");
    if let Some(done) = request.on_complete {
        done(TransitionOutcome::Discarded);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Element State (scheduler-owned)
// ─────────────────────────────────────────────────────────────────────────────

/// An in-flight transition; at most one exists per element
pub(crate) struct ActiveTransition {
    pub(crate) to: Pose,
    pub(crate) from: VisualParams,
    pub(crate) elapsed: Duration,
    pub(crate) on_complete: Option<CompletionFn>,
}

/// Scheduler-owned element state: a settled pose, current visual
/// parameters, and the single in-flight transition slot
pub(crate) struct ElementCell {
    pub(crate) style: LiftStyle,
    pub(crate) settled: Pose,
    pub(crate) params: VisualParams,
    pub(crate) active: Option<ActiveTransition>,
}

impl ElementCell {
    pub(crate) fn new(style: LiftStyle) -> Self {
        Self {
            style,
            settled: Pose::Resting,
            params: style.resting,
            active: None,
        }
    }

    pub(crate) fn state(&self) -> LiftState {
        match &self.active {
            Some(active) => LiftState::Transitioning(active.to),
            None => LiftState::Settled(self.settled),
        }
    }

    /// Commit a pose without animating
    pub(crate) fn settle_to(&mut self, pose: Pose) {
        self.settled = pose;
        self.params = self.style.pose_params(pose);
        self.active = None;
    }

    /// Advance the in-flight transition, if any
    ///
    /// Returns the completion callback once the transition settles. Visual
    /// parameters interpolate from the captured start values, so a
    /// transition begun mid-flight continues smoothly.
    pub(crate) fn step(&mut self, dt: Duration) -> Option<CompletionFn> {
        let style = self.style;
        let active = self.active.as_mut()?;
        active.elapsed += dt;
        if active.elapsed >= style.duration {
            let finished = self.active.take()?;
            self.settled = finished.to;
            self.params = style.pose_params(finished.to);
            finished.on_complete
        } else {
            let t = active.elapsed.as_secs_f32() / style.duration.as_secs_f32();
            let target = style.pose_params(active.to);
            self.params = VisualParams::lerp(&active.from, &target, style.easing.apply(t));
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lift Element (public handle)
// ─────────────────────────────────────────────────────────────────────────────

/// A liftable element
///
/// Registers its state with the scheduler on construction and removes it on
/// drop; dropping an element cancels its in-flight transition without
/// firing the completion. All mutation goes through [`transition`]
/// (or the [`set_state`] shorthand) — the same entry point the scheduler
/// and direct user input use, so supersession rules apply uniformly.
///
/// [`transition`]: LiftElement::transition
/// [`set_state`]: LiftElement::set_state
pub struct LiftElement {
    handle: SchedulerHandle,
    id: Option<ElementId>,
    style: LiftStyle,
}

impl LiftElement {
    /// Register a new element with the scheduler
    ///
    /// If the scheduler is already gone the element is inert: reads return
    /// resting values and every request is discarded.
    pub fn new(handle: SchedulerHandle, style: LiftStyle) -> Self {
        let id = handle.register_element(style);
        Self { handle, id, style }
    }

    /// The scheduler key for this element, if registration succeeded
    pub fn id(&self) -> Option<ElementId> {
        self.id
    }

    /// The element's animation style
    pub fn style(&self) -> LiftStyle {
        self.style
    }

    /// Current observable state
    pub fn state(&self) -> LiftState {
        self.id
            .and_then(|id| self.handle.element_state(id))
            .unwrap_or(LiftState::Settled(Pose::Resting))
    }

    /// Current visual parameters (interpolated while transitioning)
    pub fn params(&self) -> VisualParams {
        self.id
            .and_then(|id| self.handle.element_params(id))
            .unwrap_or(self.style.resting)
    }

    /// True when settled at the lifted pose
    pub fn is_lifted(&self) -> bool {
        self.state() == LiftState::Settled(Pose::Lifted)
    }

    /// True while a transition is in flight
    pub fn is_transitioning(&self) -> bool {
        self.state().is_transitioning()
    }

    /// Request a pose change; shorthand for a bare [`TransitionRequest`]
    pub fn set_state(&self, pose: Pose, animated: bool) {
        self.transition(TransitionRequest::to(pose).animated(animated));
    }

    /// Apply a transition request now
    ///
    /// - Already settled at the target and not transitioning: no visual
    ///   change; `on_complete` fires with `Completed` synchronously (when
    ///   called from inside another completion callback it is queued onto
    ///   the scheduler's dispatch queue instead, so chains cannot grow the
    ///   call stack).
    /// - Any in-flight transition is superseded: its `on_complete` fires
    ///   with `Superseded` and the new transition starts from the current
    ///   interpolated parameters, never snapping.
    /// - `animated == false` commits the pose and fires `Completed` before
    ///   returning.
    pub fn transition(&self, request: TransitionRequest) {
        match self.id {
            Some(id) => self.handle.apply_transition(id, request),
            None => discard_now(request),
        }
    }

    /// Drop the completion callback of any in-flight transition
    ///
    /// The visual interpolation still settles; the callback never fires.
    /// Used by session teardown.
    pub(crate) fn silence(&self) {
        if let Some(id) = self.id {
            self.handle.silence_element(id);
        }
    }
}

impl Drop for LiftElement {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            self.handle.remove_element(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TransitionScheduler;
    use std::sync::{Arc, Mutex};

    fn probe() -> (
        Arc<Mutex<Vec<TransitionOutcome>>>,
        impl Fn(TransitionOutcome) + Send + Clone,
    ) {
        let outcomes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&outcomes);
        (outcomes, move |outcome| sink.lock().unwrap().push(outcome))
    }

    fn fast_style() -> LiftStyle {
        LiftStyle::default().duration(Duration::from_millis(100))
    }

    #[test]
    fn test_unanimated_set_state_completes_synchronously() {
        let scheduler = TransitionScheduler::new();
        let element = LiftElement::new(scheduler.handle(), fast_style());
        let (outcomes, report) = probe();

        element.transition(
            TransitionRequest::to(Pose::Lifted)
                .animated(false)
                .on_complete(report),
        );

        // State committed and completion fired before any advance
        assert_eq!(element.state(), LiftState::Settled(Pose::Lifted));
        assert_eq!(element.params(), element.style().lifted);
        assert_eq!(&*outcomes.lock().unwrap(), &[TransitionOutcome::Completed]);
    }

    #[test]
    fn test_idempotent_request_fires_immediately() {
        let scheduler = TransitionScheduler::new();
        let element = LiftElement::new(scheduler.handle(), fast_style());
        let (outcomes, report) = probe();

        let before = element.params();
        element.transition(TransitionRequest::to(Pose::Resting).on_complete(report));

        assert_eq!(element.params(), before);
        assert_eq!(element.state(), LiftState::Settled(Pose::Resting));
        assert_eq!(&*outcomes.lock().unwrap(), &[TransitionOutcome::Completed]);

        // Nothing left to run
        assert!(!scheduler.advance(Duration::from_millis(500)));
        assert_eq!(outcomes.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_animated_transition_settles() {
        let scheduler = TransitionScheduler::new();
        let element = LiftElement::new(scheduler.handle(), fast_style());
        let (outcomes, report) = probe();

        element.transition(TransitionRequest::to(Pose::Lifted).on_complete(report));
        assert_eq!(element.state(), LiftState::Transitioning(Pose::Lifted));
        assert!(outcomes.lock().unwrap().is_empty());

        scheduler.advance(Duration::from_millis(50));
        let mid = element.params();
        assert!(mid.scale > element.style().resting.scale);
        assert!(mid.scale < element.style().lifted.scale);
        assert!(element.is_transitioning());

        scheduler.advance(Duration::from_millis(50));
        assert_eq!(element.state(), LiftState::Settled(Pose::Lifted));
        assert_eq!(element.params(), element.style().lifted);
        assert_eq!(&*outcomes.lock().unwrap(), &[TransitionOutcome::Completed]);
    }

    #[test]
    fn test_supersession_reports_and_never_snaps() {
        let scheduler = TransitionScheduler::new();
        let element = LiftElement::new(scheduler.handle(), fast_style());
        let (first, report_first) = probe();
        let (second, report_second) = probe();

        element.transition(TransitionRequest::to(Pose::Lifted).on_complete(report_first));
        scheduler.advance(Duration::from_millis(50));
        let mid = element.params();

        // Replace the in-flight lift with a drop before it settles
        element.transition(TransitionRequest::to(Pose::Resting).on_complete(report_second));
        assert_eq!(&*first.lock().unwrap(), &[TransitionOutcome::Superseded]);
        assert_eq!(element.state(), LiftState::Transitioning(Pose::Resting));
        // New transition starts from the interrupted parameters
        assert_eq!(element.params(), mid);

        scheduler.advance(Duration::from_millis(100));
        assert_eq!(element.state(), LiftState::Settled(Pose::Resting));
        assert_eq!(&*second.lock().unwrap(), &[TransitionOutcome::Completed]);
        // The superseded request never also completes
        assert_eq!(first.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_same_target_request_supersedes_in_flight() {
        let scheduler = TransitionScheduler::new();
        let element = LiftElement::new(scheduler.handle(), fast_style());
        let (first, report_first) = probe();
        let (second, report_second) = probe();

        element.transition(TransitionRequest::to(Pose::Lifted).on_complete(report_first));
        scheduler.advance(Duration::from_millis(50));
        element.transition(TransitionRequest::to(Pose::Lifted).on_complete(report_second));

        assert_eq!(&*first.lock().unwrap(), &[TransitionOutcome::Superseded]);
        scheduler.advance(Duration::from_millis(100));
        assert_eq!(&*second.lock().unwrap(), &[TransitionOutcome::Completed]);
        assert_eq!(element.state(), LiftState::Settled(Pose::Lifted));
    }

    #[test]
    fn test_alongside_runs_once_when_accepted() {
        let scheduler = TransitionScheduler::new();
        let element = LiftElement::new(scheduler.handle(), fast_style());
        let count = Arc::new(Mutex::new(0u32));

        let sink = Arc::clone(&count);
        element.transition(
            TransitionRequest::to(Pose::Lifted).alongside(move || *sink.lock().unwrap() += 1),
        );
        assert_eq!(*count.lock().unwrap(), 1);

        scheduler.advance(Duration::from_millis(200));
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_request_after_scheduler_dropped_discards() {
        let handle = {
            let scheduler = TransitionScheduler::new();
            scheduler.handle()
        };
        let element = LiftElement::new(handle, fast_style());
        let (outcomes, report) = probe();

        element.transition(TransitionRequest::to(Pose::Lifted).on_complete(report));
        assert_eq!(&*outcomes.lock().unwrap(), &[TransitionOutcome::Discarded]);
        assert_eq!(element.state(), LiftState::Settled(Pose::Resting));
    }

    #[test]
    fn test_element_drop_removes_state() {
        let scheduler = TransitionScheduler::new();
        let element = LiftElement::new(scheduler.handle(), fast_style());
        assert_eq!(scheduler.element_count(), 1);
        drop(element);
        assert_eq!(scheduler.element_count(), 0);
    }
}
