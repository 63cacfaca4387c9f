//! Lucite Transition Engine
//!
//! Drives populations of liftable elements through timed state transitions.
//!
//! # Features
//!
//! - **Liftable Elements**: two-pose visual state (resting/lifted) with a
//!   distinguishable mid-flight state and interpolated visual parameters
//! - **Scheduled Transitions**: delayed, cancellable transition requests
//!   with exactly-once completion reporting
//! - **Supersession**: a newer request replaces an in-flight transition
//!   without snapping, and the replaced request is told so
//! - **Choreography Sessions**: scoped ownership of a set of elements, a
//!   stagger pattern, chained follow-up cues, and guaranteed-silent teardown
//! - **Drive Modes**: deterministic `advance(dt)`, wall-clock `tick()`, or
//!   a background thread with a wake callback
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use lucite_animation::{Choreography, ChoreoSession, LiftStyle, TransitionScheduler};
//!
//! let scheduler = TransitionScheduler::new();
//! let session = ChoreoSession::uniform(scheduler.handle(), 3, LiftStyle::default());
//!
//! session
//!     .begin(Choreography::lift_then_drop(Duration::from_millis(500))
//!         .stagger_each(Duration::from_millis(200)))
//!     .unwrap();
//!
//! // Drive the timeline (a host would call tick() from its frame loop)
//! for _ in 0..40 {
//!     scheduler.advance(Duration::from_millis(50));
//! }
//! session.end();
//! ```

pub mod easing;
pub mod element;
pub mod scheduler;
pub mod session;

pub use easing::Easing;
pub use element::{
    LiftElement, LiftState, LiftStyle, Pose, TransitionOutcome, TransitionRequest,
};
pub use scheduler::{
    get_scheduler, is_scheduler_initialized, set_global_scheduler, try_get_scheduler, CancelToken,
    ElementId, RequestId, SchedulerHandle, TransitionScheduler, WakeCallback,
};
pub use session::{ChoreoError, ChoreoSession, Choreography, Cue};
