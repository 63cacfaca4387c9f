//! Glass switch widget with FSM-driven interactions
//!
//! The switch provides:
//! - Toggle states: on/off, flipped on pointer release
//! - Visual states: idle, hovered, pressed (for each toggle state)
//! - Eased knob travel between the two ends of the track
//! - A knob that lifts off the track while pressed, through the
//!   transition engine
//! - Change callback, enabled/disabled, tint colors

use std::time::Duration;

use lucite_animation::{Easing, LiftElement, LiftStyle, Pose};
use lucite_core::{event_types, Color, Event, GlassStyle, StateId, StateMachine, VisualParams};

use crate::context::WidgetContext;
use crate::widget::{Widget, WidgetId};

/// Switch states (combines toggle state with interaction state)
pub mod states {
    /// Off + idle
    pub const OFF_IDLE: u32 = 0;
    /// Off + hovered
    pub const OFF_HOVERED: u32 = 1;
    /// Off + pressed
    pub const OFF_PRESSED: u32 = 2;
    /// On + idle
    pub const ON_IDLE: u32 = 10;
    /// On + hovered
    pub const ON_HOVERED: u32 = 11;
    /// On + pressed
    pub const ON_PRESSED: u32 = 12;
}

fn is_on_state(state: StateId) -> bool {
    state >= states::ON_IDLE
}

fn is_pressed_state(state: StateId) -> bool {
    matches!(state, states::OFF_PRESSED | states::ON_PRESSED)
}

/// Switch configuration
#[derive(Clone)]
pub struct SwitchConfig {
    /// Track width
    pub width: f32,
    /// Track height
    pub height: f32,
    /// Track tint when on
    pub on_tint: Color,
    /// Track tint when off
    pub off_tint: Color,
    /// Track material
    pub glass: GlassStyle,
    /// Duration of the knob's travel between ends
    pub travel_duration: Duration,
    /// Easing of the knob's travel
    pub travel_easing: Easing,
    /// Lift style of the knob while pressed
    pub knob_lift: LiftStyle,
    /// Whether initially on
    pub initial_on: bool,
    /// Whether the switch reacts to input
    pub enabled: bool,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            width: 51.0,
            height: 31.0,
            on_tint: Color::rgb(0.3, 0.85, 0.4),
            off_tint: Color::rgba(0.5, 0.5, 0.55, 0.4),
            glass: GlassStyle::regular(),
            travel_duration: Duration::from_millis(200),
            travel_easing: Easing::EaseInOut,
            knob_lift: LiftStyle::brisk(),
            initial_on: false,
            enabled: true,
        }
    }
}

impl SwitchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the track tint when on
    pub fn on_tint(mut self, color: Color) -> Self {
        self.on_tint = color;
        self
    }

    /// Set whether initially on
    pub fn on(mut self, on: bool) -> Self {
        self.initial_on = on;
        self
    }

    /// Set whether the switch reacts to input
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set track dimensions
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Switch visual state
pub struct SwitchState {
    /// Knob position along the track (0 = off end, 1 = on end)
    pub knob_progress: f32,
    travel_from: f32,
    travel_target: f32,
    travel_elapsed: Duration,
    travelling: bool,
    /// Whether the value just changed (cleared after reading)
    changed: bool,
}

impl SwitchState {
    fn new(initial_on: bool) -> Self {
        let progress = if initial_on { 1.0 } else { 0.0 };
        Self {
            knob_progress: progress,
            travel_from: progress,
            travel_target: progress,
            travel_elapsed: Duration::ZERO,
            travelling: false,
            changed: false,
        }
    }

    /// Start eased travel towards an end of the track
    fn set_on_target(&mut self, on: bool) {
        let target = if on { 1.0 } else { 0.0 };
        if target == self.knob_progress {
            self.travelling = false;
            return;
        }
        self.travel_from = self.knob_progress;
        self.travel_target = target;
        self.travel_elapsed = Duration::ZERO;
        self.travelling = true;
    }

    /// Advance the travel; returns true while the knob is moving
    fn update(&mut self, config: &SwitchConfig, dt: Duration) -> bool {
        if !self.travelling {
            return false;
        }
        self.travel_elapsed += dt;
        if self.travel_elapsed >= config.travel_duration {
            self.knob_progress = self.travel_target;
            self.travelling = false;
        } else {
            let t = self.travel_elapsed.as_secs_f32() / config.travel_duration.as_secs_f32();
            let eased = config.travel_easing.apply(t);
            self.knob_progress = self.travel_from + (self.travel_target - self.travel_from) * eased;
        }
        true
    }

    /// Check if the value just changed and clear the flag
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

/// Glass switch widget
pub struct GlassSwitch {
    id: WidgetId,
    config: SwitchConfig,
    state: SwitchState,
    /// The knob lifts off the track while pressed
    knob: LiftElement,
    on_change: Option<Box<dyn FnMut(bool) + Send>>,
}

impl GlassSwitch {
    /// Create a switch with the default config
    pub fn new(ctx: &mut WidgetContext) -> Self {
        Self::with_config(ctx, SwitchConfig::default())
    }

    /// Create a switch with a custom config
    pub fn with_config(ctx: &mut WidgetContext, config: SwitchConfig) -> Self {
        let fsm = Self::create_fsm(config.initial_on);
        let id = ctx.register_widget_with_fsm(fsm);
        let state = SwitchState::new(config.initial_on);
        let knob = LiftElement::new(ctx.scheduler(), config.knob_lift);

        Self {
            id,
            config,
            state,
            knob,
            on_change: None,
        }
    }

    /// Create the switch FSM
    fn create_fsm(initial_on: bool) -> StateMachine {
        let initial_state = if initial_on {
            states::ON_IDLE
        } else {
            states::OFF_IDLE
        };

        StateMachine::builder(initial_state)
            // Off-side hover transitions
            .on(
                states::OFF_IDLE,
                event_types::POINTER_ENTER,
                states::OFF_HOVERED,
            )
            .on(
                states::OFF_HOVERED,
                event_types::POINTER_LEAVE,
                states::OFF_IDLE,
            )
            .on(
                states::OFF_HOVERED,
                event_types::POINTER_DOWN,
                states::OFF_PRESSED,
            )
            // Toggle on release: off -> on
            .on(
                states::OFF_PRESSED,
                event_types::POINTER_UP,
                states::ON_HOVERED,
            )
            .on(
                states::OFF_PRESSED,
                event_types::POINTER_LEAVE,
                states::OFF_IDLE,
            )
            // On-side hover transitions
            .on(
                states::ON_IDLE,
                event_types::POINTER_ENTER,
                states::ON_HOVERED,
            )
            .on(
                states::ON_HOVERED,
                event_types::POINTER_LEAVE,
                states::ON_IDLE,
            )
            .on(
                states::ON_HOVERED,
                event_types::POINTER_DOWN,
                states::ON_PRESSED,
            )
            // Toggle on release: on -> off
            .on(
                states::ON_PRESSED,
                event_types::POINTER_UP,
                states::OFF_HOVERED,
            )
            .on(
                states::ON_PRESSED,
                event_types::POINTER_LEAVE,
                states::ON_IDLE,
            )
            .build()
    }

    /// Check if the switch is on
    pub fn is_on(&self, ctx: &WidgetContext) -> bool {
        is_on_state(ctx.fsm_state(self.id).unwrap_or(states::OFF_IDLE))
    }

    /// Set the value programmatically (no change callback)
    pub fn set_on(&mut self, ctx: &mut WidgetContext, on: bool) {
        let state = if on { states::ON_IDLE } else { states::OFF_IDLE };
        ctx.set_fsm_state(self.id, state);
        self.state.set_on_target(on);
    }

    /// Set the change callback
    pub fn on_change<F: FnMut(bool) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Handle a pointer event
    pub fn handle_event(&mut self, ctx: &mut WidgetContext, event: &Event) {
        if !self.config.enabled {
            return;
        }

        let old_state = ctx.fsm_state(self.id).unwrap_or(states::OFF_IDLE);
        ctx.dispatch_event(self.id, event);
        let new_state = ctx.fsm_state(self.id).unwrap_or(states::OFF_IDLE);

        // Knob press feedback through the lift engine; a press interrupted
        // mid-lift supersedes cleanly
        let was_pressed = is_pressed_state(old_state);
        let pressed = is_pressed_state(new_state);
        if was_pressed != pressed {
            let pose = if pressed { Pose::Lifted } else { Pose::Resting };
            self.knob.set_state(pose, true);
        }

        let was_on = is_on_state(old_state);
        let is_on = is_on_state(new_state);
        if was_on != is_on {
            self.state.set_on_target(is_on);
            self.state.changed = true;
            if let Some(ref mut callback) = self.on_change {
                callback(is_on);
            }
            ctx.mark_dirty(self.id);
        }
    }

    /// Knob position along the track (0 = off end, 1 = on end)
    pub fn knob_progress(&self) -> f32 {
        self.state.knob_progress
    }

    /// Knob lift parameters (scale/elevation/shadow)
    pub fn knob_params(&self) -> VisualParams {
        self.knob.params()
    }

    /// Current track tint for the toggle state
    pub fn track_tint(&self, ctx: &WidgetContext) -> Color {
        if self.is_on(ctx) {
            self.config.on_tint
        } else {
            self.config.off_tint
        }
    }

    /// Check if the value just changed (and clear the flag)
    pub fn was_changed(&mut self) -> bool {
        self.state.take_changed()
    }

    pub fn config(&self) -> &SwitchConfig {
        &self.config
    }
}

impl Widget for GlassSwitch {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn update(&mut self, ctx: &mut WidgetContext, dt: Duration) {
        if self.state.update(&self.config, dt) {
            ctx.mark_dirty(self.id);
        }
    }
}

/// Create a switch
pub fn glass_switch() -> SwitchBuilder {
    SwitchBuilder {
        config: SwitchConfig::default(),
        on_change: None,
    }
}

/// Builder for creating switches
pub struct SwitchBuilder {
    config: SwitchConfig,
    on_change: Option<Box<dyn FnMut(bool) + Send>>,
}

impl SwitchBuilder {
    /// Set the track tint when on
    pub fn on_tint(mut self, color: Color) -> Self {
        self.config.on_tint = color;
        self
    }

    /// Set whether initially on
    pub fn on(mut self, on: bool) -> Self {
        self.config.initial_on = on;
        self
    }

    /// Set whether the switch reacts to input
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Set the change callback
    pub fn on_change<F: FnMut(bool) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Build the switch widget
    pub fn build(self, ctx: &mut WidgetContext) -> GlassSwitch {
        let mut switch = GlassSwitch::with_config(ctx, self.config);
        switch.on_change = self.on_change;
        switch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucite_animation::{LiftState, TransitionScheduler};
    use std::sync::{Arc, Mutex};

    fn setup() -> (TransitionScheduler, WidgetContext) {
        let scheduler = TransitionScheduler::new();
        let ctx = WidgetContext::new(scheduler.handle());
        (scheduler, ctx)
    }

    fn tap(switch: &mut GlassSwitch, ctx: &mut WidgetContext) {
        switch.handle_event(ctx, &Event::of(event_types::POINTER_DOWN));
        switch.handle_event(ctx, &Event::of(event_types::POINTER_UP));
    }

    #[test]
    fn test_switch_toggles_on_release() {
        let (_scheduler, mut ctx) = setup();
        let mut switch = GlassSwitch::new(&mut ctx);
        assert!(!switch.is_on(&ctx));

        switch.handle_event(&mut ctx, &Event::of(event_types::POINTER_ENTER));
        assert!(!switch.is_on(&ctx));

        switch.handle_event(&mut ctx, &Event::of(event_types::POINTER_DOWN));
        assert!(!switch.is_on(&ctx));

        // Release flips the value
        switch.handle_event(&mut ctx, &Event::of(event_types::POINTER_UP));
        assert!(switch.is_on(&ctx));
        assert!(switch.was_changed());

        tap(&mut switch, &mut ctx);
        assert!(!switch.is_on(&ctx));
    }

    #[test]
    fn test_switch_initially_on() {
        let (_scheduler, mut ctx) = setup();
        let switch = glass_switch().on(true).build(&mut ctx);
        assert!(switch.is_on(&ctx));
        assert_eq!(switch.knob_progress(), 1.0);
    }

    #[test]
    fn test_disabled_switch_ignores_input() {
        let (_scheduler, mut ctx) = setup();
        let mut switch = glass_switch().enabled(false).build(&mut ctx);

        switch.handle_event(&mut ctx, &Event::of(event_types::POINTER_ENTER));
        tap(&mut switch, &mut ctx);
        assert!(!switch.is_on(&ctx));
        assert!(!switch.was_changed());
    }

    #[test]
    fn test_change_callback_fires_on_toggle() {
        let (_scheduler, mut ctx) = setup();
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&values);
        let mut switch = glass_switch()
            .on_change(move |on| sink.lock().unwrap().push(on))
            .build(&mut ctx);

        switch.handle_event(&mut ctx, &Event::of(event_types::POINTER_ENTER));
        tap(&mut switch, &mut ctx);
        tap(&mut switch, &mut ctx);
        assert_eq!(&*values.lock().unwrap(), &[true, false]);
    }

    #[test]
    fn test_knob_lifts_while_pressed() {
        let (scheduler, mut ctx) = setup();
        let mut switch = GlassSwitch::new(&mut ctx);

        switch.handle_event(&mut ctx, &Event::of(event_types::POINTER_ENTER));
        switch.handle_event(&mut ctx, &Event::of(event_types::POINTER_DOWN));
        assert_eq!(
            switch.knob.state(),
            LiftState::Transitioning(Pose::Lifted)
        );

        scheduler.advance(Duration::from_millis(300));
        assert!(switch.knob.is_lifted());
        assert!(switch.knob_params().elevation > 0.0);

        switch.handle_event(&mut ctx, &Event::of(event_types::POINTER_UP));
        scheduler.advance(Duration::from_millis(300));
        assert_eq!(switch.knob.state(), LiftState::Settled(Pose::Resting));
    }

    #[test]
    fn test_knob_travel_eases_towards_target() {
        let (_scheduler, mut ctx) = setup();
        let mut switch = GlassSwitch::new(&mut ctx);
        assert_eq!(switch.knob_progress(), 0.0);

        switch.handle_event(&mut ctx, &Event::of(event_types::POINTER_ENTER));
        tap(&mut switch, &mut ctx);

        switch.update(&mut ctx, Duration::from_millis(100));
        let midway = switch.knob_progress();
        assert!(midway > 0.0 && midway < 1.0);

        switch.update(&mut ctx, Duration::from_millis(100));
        assert_eq!(switch.knob_progress(), 1.0);
    }

    #[test]
    fn test_programmatic_set_skips_callback() {
        let (_scheduler, mut ctx) = setup();
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&values);
        let mut switch = glass_switch()
            .on_change(move |on| sink.lock().unwrap().push(on))
            .build(&mut ctx);

        switch.set_on(&mut ctx, true);
        assert!(switch.is_on(&ctx));
        assert!(values.lock().unwrap().is_empty());
    }
}
