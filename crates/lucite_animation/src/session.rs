//! Choreography sessions
//!
//! A session owns a fixed set of elements for one screen lifetime and
//! drives them through a caller-supplied [`Choreography`]: a stagger
//! function mapping element index to an initial delay, and a cue function
//! consulted after each completed transition to chain follow-up steps.
//!
//! Teardown is the hard part. [`ChoreoSession::end`] synchronously cancels
//! every token the session holds and strips the completion callback from
//! any in-flight transition, and every session-owned callback re-checks the
//! session's ended gate before doing anything — so once `end()` returns, no
//! further completion fires, no matter what was mid-flight.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use smallvec::SmallVec;
use thiserror::Error;

use crate::element::{LiftElement, LiftStyle, Pose, TransitionOutcome, TransitionRequest};
use crate::scheduler::{CancelToken, ElementId, SchedulerHandle};

/// Session errors; nothing here is fatal to the process
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChoreoError {
    #[error("choreography session has already ended")]
    SessionEnded,
    #[error("transition scheduler is no longer alive")]
    SchedulerGone,
}

/// A follow-up step chained after a completed transition
#[derive(Clone, Copy, Debug)]
pub struct Cue {
    /// The pose to move to next
    pub target: Pose,
    /// Delay before the follow-up fires
    pub after: Duration,
}

type StaggerFn = dyn Fn(usize) -> Duration + Send + Sync;
type CueFn = dyn Fn(usize, Pose) -> Option<Cue> + Send + Sync;

/// The timing policy a session runs
///
/// `stagger` gives each element's initial lift delay by order index. `cue`
/// is consulted after each transition completes (and only on completion —
/// superseded or discarded steps end their chain) with the element index
/// and the pose just settled; returning a [`Cue`] chains another step.
///
/// ```
/// use std::time::Duration;
/// use lucite_animation::Choreography;
///
/// // Cascading lift, each element dropping back half a second later
/// let choreography = Choreography::lift_then_drop(Duration::from_millis(500))
///     .stagger_each(Duration::from_millis(200));
/// # let _ = choreography;
/// ```
pub struct Choreography {
    pub(crate) stagger: Box<StaggerFn>,
    pub(crate) cue: Box<CueFn>,
}

impl Choreography {
    /// One-shot: every element lifts and stays lifted
    pub fn lift() -> Self {
        Self {
            stagger: Box::new(|_| Duration::ZERO),
            cue: Box::new(|_, _| None),
        }
    }

    /// One cycle: each lift is followed by a drop after `hold`
    pub fn lift_then_drop(hold: Duration) -> Self {
        Self::lift().with_cue(move |_, pose| {
            (pose == Pose::Lifted).then_some(Cue {
                target: Pose::Resting,
                after: hold,
            })
        })
    }

    /// Perpetual: elements keep alternating poses, pausing `hold` between
    /// steps, until the session ends
    pub fn wave(hold: Duration) -> Self {
        Self::lift().with_cue(move |_, pose| {
            Some(Cue {
                target: pose.opposite(),
                after: hold,
            })
        })
    }

    /// Replace the stagger function
    pub fn with_stagger<F>(mut self, stagger: F) -> Self
    where
        F: Fn(usize) -> Duration + Send + Sync + 'static,
    {
        self.stagger = Box::new(stagger);
        self
    }

    /// Linear stagger: element `i` starts at `i * step`
    pub fn stagger_each(self, step: Duration) -> Self {
        self.with_stagger(move |index| step * index as u32)
    }

    /// Replace the cue function
    pub fn with_cue<F>(mut self, cue: F) -> Self
    where
        F: Fn(usize, Pose) -> Option<Cue> + Send + Sync + 'static,
    {
        self.cue = Box::new(cue);
        self
    }
}

struct SessionInner {
    tokens: SmallVec<[CancelToken; 8]>,
    ended: bool,
}

/// Owner and lifetime scope for a set of elements and their transitions
///
/// Create on screen activation, call [`begin`](Self::begin) to start the
/// choreography, and [`end`](Self::end) on deactivation. Dropping the
/// session ends it and removes its elements.
pub struct ChoreoSession {
    handle: SchedulerHandle,
    elements: Vec<LiftElement>,
    inner: Arc<Mutex<SessionInner>>,
}

impl ChoreoSession {
    /// Create a session with one element per style
    pub fn new(handle: SchedulerHandle, styles: impl IntoIterator<Item = LiftStyle>) -> Self {
        let elements = styles
            .into_iter()
            .map(|style| LiftElement::new(handle.clone(), style))
            .collect();
        Self {
            handle,
            elements,
            inner: Arc::new(Mutex::new(SessionInner {
                tokens: SmallVec::new(),
                ended: false,
            })),
        }
    }

    /// Create a session of `count` elements sharing one style
    pub fn uniform(handle: SchedulerHandle, count: usize, style: LiftStyle) -> Self {
        Self::new(handle, std::iter::repeat(style).take(count))
    }

    /// The session's elements, in order
    pub fn elements(&self) -> &[LiftElement] {
        &self.elements
    }

    /// A single element by order index
    pub fn element(&self, index: usize) -> Option<&LiftElement> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// True once [`end`](Self::end) has run
    pub fn has_ended(&self) -> bool {
        self.inner.lock().unwrap().ended
    }

    /// Start the choreography: schedule an initial lift per element at its
    /// stagger delay, chaining follow-ups through the cue function
    pub fn begin(&self, choreography: Choreography) -> Result<(), ChoreoError> {
        if !self.handle.is_alive() {
            return Err(ChoreoError::SchedulerGone);
        }
        if self.inner.lock().unwrap().ended {
            return Err(ChoreoError::SessionEnded);
        }

        let choreography = Arc::new(choreography);
        for (index, element) in self.elements.iter().enumerate() {
            let Some(id) = element.id() else { continue };
            let delay = (choreography.stagger)(index);
            schedule_step(
                Arc::downgrade(&self.inner),
                self.handle.clone(),
                Arc::clone(&choreography),
                index,
                id,
                Pose::Lifted,
                delay,
            );
        }
        tracing::debug!(elements = self.elements.len(), "choreography began");
        Ok(())
    }

    /// Schedule a one-off request against an element, tracked by the session
    ///
    /// The request's completion is checked against the session's ended gate
    /// before it runs. Against an ended session (or a bad index) the request
    /// is discarded — its completion fires with `Discarded` on the next
    /// scheduling quantum rather than leaving the caller waiting.
    pub fn schedule(
        &self,
        index: usize,
        delay: Duration,
        mut request: TransitionRequest,
    ) -> CancelToken {
        {
            let mut inner = self.inner.lock().unwrap();
            if !inner.ended {
                if let Some(id) = self.elements.get(index).and_then(LiftElement::id) {
                    if let Some(done) = request.on_complete.take() {
                        let gate = Arc::downgrade(&self.inner);
                        request.on_complete = Some(Box::new(move |outcome| {
                            let ended = gate
                                .upgrade()
                                .map(|session| session.lock().unwrap().ended)
                                .unwrap_or(true);
                            if !ended {
                                done(outcome);
                            }
                        }));
                    }
                    let token = self.handle.schedule_id(id, delay, request);
                    inner.tokens.retain(|token| token.is_pending());
                    inner.tokens.push(token.clone());
                    return token;
                }
            }
        }
        self.handle.discard(request)
    }

    /// End the session
    ///
    /// Cancels every outstanding token and strips in-flight completions;
    /// after this returns no further completion callback fires. In-flight
    /// visual interpolation still settles naturally (parameters never
    /// snap). Idempotent.
    pub fn end(&self) {
        let tokens = {
            let mut inner = self.inner.lock().unwrap();
            if inner.ended {
                return;
            }
            inner.ended = true;
            std::mem::take(&mut inner.tokens)
        };
        let cancelled = tokens.iter().filter(|token| token.cancel()).count();
        for element in &self.elements {
            element.silence();
        }
        tracing::debug!(
            cancelled,
            elements = self.elements.len(),
            "choreography session ended"
        );
    }
}

impl Drop for ChoreoSession {
    fn drop(&mut self) {
        self.end();
    }
}

/// Schedule one choreography step and arm its follow-up chain
///
/// Called from `begin` and, re-entrantly, from inside completion callbacks
/// when a cue chains the next step. The session lock is only held for
/// bookkeeping; the ended gate is re-checked both here and inside the
/// completion before anything further is scheduled.
fn schedule_step(
    session: Weak<Mutex<SessionInner>>,
    handle: SchedulerHandle,
    choreography: Arc<Choreography>,
    index: usize,
    element: ElementId,
    target: Pose,
    after: Duration,
) {
    let Some(strong) = session.upgrade() else {
        return;
    };
    let mut inner = strong.lock().unwrap();
    if inner.ended {
        return;
    }

    let request = TransitionRequest::to(target).on_complete({
        let session = session.clone();
        let handle = handle.clone();
        let choreography = Arc::clone(&choreography);
        move |outcome| {
            if outcome != TransitionOutcome::Completed {
                // Superseded or discarded: this chain is stale, let it end
                tracing::trace!(?outcome, index, "choreography chain stopped");
                return;
            }
            let ended = match session.upgrade() {
                Some(strong) => strong.lock().unwrap().ended,
                None => return,
            };
            if ended {
                return;
            }
            if let Some(cue) = (choreography.cue)(index, target) {
                schedule_step(
                    session.clone(),
                    handle.clone(),
                    Arc::clone(&choreography),
                    index,
                    element,
                    cue.target,
                    cue.after,
                );
            }
        }
    });

    let token = handle.schedule_id(element, after, request);
    inner.tokens.retain(|token| token.is_pending());
    inner.tokens.push(token);
}
