//! Liquid lens widget
//!
//! A circular glass disc that lifts off the backdrop. A tap toggles the
//! lifted state; hosts and choreography can also drive it directly through
//! the same transition API, so a tap landing mid-animation supersedes the
//! in-flight transition instead of fighting it.

use lucite_animation::{LiftElement, LiftStyle, Pose, TransitionRequest};
use lucite_core::{event_types, Event, GlassStyle, StateMachine, VisualParams};

use crate::context::WidgetContext;
use crate::widget::{Widget, WidgetId};

/// Lens states
pub mod states {
    /// Not being pressed
    pub const IDLE: u32 = 0;
    /// Pointer down inside the lens
    pub const PRESSED: u32 = 1;
}

/// Lens configuration
#[derive(Clone)]
pub struct LensConfig {
    /// Disc diameter in points
    pub diameter: f32,
    /// Lens material
    pub glass: GlassStyle,
    /// Lift animation style
    pub lift: LiftStyle,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            diameter: 60.0,
            glass: GlassStyle::clear(),
            lift: LiftStyle::default(),
        }
    }
}

impl LensConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the disc diameter
    pub fn diameter(mut self, diameter: f32) -> Self {
        self.diameter = diameter;
        self
    }

    /// Set the lens material
    pub fn glass(mut self, glass: GlassStyle) -> Self {
        self.glass = glass;
        self
    }

    /// Set the lift animation style
    pub fn lift(mut self, lift: LiftStyle) -> Self {
        self.lift = lift;
        self
    }
}

/// Liquid lens widget
pub struct Lens {
    id: WidgetId,
    config: LensConfig,
    element: LiftElement,
}

impl Lens {
    /// Create a lens with the default config
    pub fn new(ctx: &mut WidgetContext) -> Self {
        Self::with_config(ctx, LensConfig::default())
    }

    /// Create a lens with a custom config
    pub fn with_config(ctx: &mut WidgetContext, config: LensConfig) -> Self {
        let fsm = StateMachine::builder(states::IDLE)
            .on(states::IDLE, event_types::POINTER_DOWN, states::PRESSED)
            .on(states::PRESSED, event_types::POINTER_UP, states::IDLE)
            .on(states::PRESSED, event_types::POINTER_LEAVE, states::IDLE)
            .build();
        let id = ctx.register_widget_with_fsm(fsm);
        let element = LiftElement::new(ctx.scheduler(), config.lift);

        Self {
            id,
            config,
            element,
        }
    }

    /// Request the lifted or resting pose
    pub fn set_lifted(&self, lifted: bool, animated: bool) {
        let pose = if lifted { Pose::Lifted } else { Pose::Resting };
        self.element.set_state(pose, animated);
    }

    /// Apply a full transition request (alongside work, completion)
    pub fn transition(&self, request: TransitionRequest) {
        self.element.transition(request);
    }

    /// True when settled at the lifted pose
    pub fn is_lifted(&self) -> bool {
        self.element.is_lifted()
    }

    /// Current lift parameters (scale/elevation/shadow)
    pub fn params(&self) -> VisualParams {
        self.element.params()
    }

    /// The underlying element, for scheduling against
    pub fn element(&self) -> &LiftElement {
        &self.element
    }

    pub fn config(&self) -> &LensConfig {
        &self.config
    }

    /// Handle a pointer event; a completed tap toggles the lift
    pub fn handle_event(&mut self, ctx: &mut WidgetContext, event: &Event) {
        let was_pressed = ctx.fsm_state(self.id) == Some(states::PRESSED);
        ctx.dispatch_event(self.id, event);

        let released_inside = was_pressed && event.event_type == event_types::POINTER_UP;
        if released_inside {
            // Toggle against where the lens is heading, so a tap during an
            // animation reverses it rather than repeating it
            let lifted_now = self.element.state().target() == Pose::Lifted;
            self.set_lifted(!lifted_now, true);
            ctx.mark_dirty(self.id);
        }
    }
}

impl Widget for Lens {
    fn id(&self) -> WidgetId {
        self.id
    }
}

/// Create a lens
pub fn lens() -> LensBuilder {
    LensBuilder {
        config: LensConfig::default(),
    }
}

/// Builder for creating lenses
pub struct LensBuilder {
    config: LensConfig,
}

impl LensBuilder {
    /// Set the disc diameter
    pub fn diameter(mut self, diameter: f32) -> Self {
        self.config.diameter = diameter;
        self
    }

    /// Set the lens material
    pub fn glass(mut self, glass: GlassStyle) -> Self {
        self.config.glass = glass;
        self
    }

    /// Set the lift animation style
    pub fn lift(mut self, lift: LiftStyle) -> Self {
        self.config.lift = lift;
        self
    }

    /// Build the lens widget
    pub fn build(self, ctx: &mut WidgetContext) -> Lens {
        Lens::with_config(ctx, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucite_animation::{LiftState, TransitionOutcome, TransitionScheduler};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn setup() -> (TransitionScheduler, WidgetContext) {
        let scheduler = TransitionScheduler::new();
        let ctx = WidgetContext::new(scheduler.handle());
        (scheduler, ctx)
    }

    fn tap(lens: &mut Lens, ctx: &mut WidgetContext) {
        lens.handle_event(ctx, &Event::of(event_types::POINTER_DOWN));
        lens.handle_event(ctx, &Event::of(event_types::POINTER_UP));
    }

    #[test]
    fn test_tap_toggles_lift() {
        let (scheduler, mut ctx) = setup();
        let mut lens = Lens::new(&mut ctx);
        assert!(!lens.is_lifted());

        tap(&mut lens, &mut ctx);
        assert_eq!(lens.element.state(), LiftState::Transitioning(Pose::Lifted));
        scheduler.advance(Duration::from_millis(400));
        assert!(lens.is_lifted());

        tap(&mut lens, &mut ctx);
        scheduler.advance(Duration::from_millis(400));
        assert!(!lens.is_lifted());
    }

    #[test]
    fn test_tap_mid_animation_reverses() {
        let (scheduler, mut ctx) = setup();
        let mut lens = Lens::new(&mut ctx);

        tap(&mut lens, &mut ctx);
        scheduler.advance(Duration::from_millis(100));
        assert_eq!(lens.element.state(), LiftState::Transitioning(Pose::Lifted));

        // Second tap lands mid-lift: it heads back down, not up again
        tap(&mut lens, &mut ctx);
        assert_eq!(
            lens.element.state(),
            LiftState::Transitioning(Pose::Resting)
        );
        scheduler.advance(Duration::from_millis(400));
        assert!(!lens.is_lifted());
    }

    #[test]
    fn test_press_cancelled_by_leave_does_not_toggle() {
        let (_scheduler, mut ctx) = setup();
        let mut lens = Lens::new(&mut ctx);

        lens.handle_event(&mut ctx, &Event::of(event_types::POINTER_DOWN));
        lens.handle_event(&mut ctx, &Event::of(event_types::POINTER_LEAVE));
        lens.handle_event(&mut ctx, &Event::of(event_types::POINTER_UP));
        assert_eq!(lens.element.state(), LiftState::Settled(Pose::Resting));
    }

    #[test]
    fn test_transition_passthrough_reports_outcome() {
        let (scheduler, mut ctx) = setup();
        let lens = Lens::new(&mut ctx);
        let outcomes = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&outcomes);
        lens.transition(
            TransitionRequest::to(Pose::Lifted)
                .on_complete(move |outcome| sink.lock().unwrap().push(outcome)),
        );
        scheduler.advance(Duration::from_millis(400));
        assert_eq!(&*outcomes.lock().unwrap(), &[TransitionOutcome::Completed]);
        assert!(lens.is_lifted());
        assert!(lens.params().elevation > 0.0);
    }
}
