//! Glass slider widget with FSM-driven interactions
//!
//! The slider provides:
//! - A continuous value over a min/max range, mapped from pointer x
//! - Visual states: idle, hovered, dragging
//! - A thumb that lifts off the track for the duration of a drag,
//!   through the transition engine
//! - Change callback, enabled/disabled, tint color

use lucite_animation::{LiftElement, LiftStyle, Pose};
use lucite_core::{event_types, Color, Event, GlassStyle, StateMachine, VisualParams};

use crate::context::WidgetContext;
use crate::widget::{Widget, WidgetId};

/// Slider states
pub mod states {
    /// Not under the pointer
    pub const IDLE: u32 = 0;
    /// Under the pointer
    pub const HOVERED: u32 = 1;
    /// Tracking a drag; the pointer stays captured until release
    pub const DRAGGING: u32 = 2;
}

/// Slider configuration
#[derive(Clone)]
pub struct SliderConfig {
    /// Minimum value
    pub min: f32,
    /// Maximum value
    pub max: f32,
    /// Initial value
    pub initial: f32,
    /// Track width in points; pointer x maps over this span
    pub track_width: f32,
    /// Tint of the filled (minimum-side) track portion
    pub tint: Color,
    /// Track material
    pub glass: GlassStyle,
    /// Lift style of the thumb while dragging
    pub thumb_lift: LiftStyle,
    /// Whether the slider reacts to input
    pub enabled: bool,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            initial: 0.5,
            track_width: 200.0,
            tint: Color::ACCENT,
            glass: GlassStyle::regular(),
            thumb_lift: LiftStyle::brisk(),
            enabled: true,
        }
    }
}

impl SliderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value range
    pub fn range(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Set the initial value
    pub fn initial(mut self, value: f32) -> Self {
        self.initial = value;
        self
    }

    /// Set the filled-track tint
    pub fn tint(mut self, color: Color) -> Self {
        self.tint = color;
        self
    }

    /// Set the track width
    pub fn track_width(mut self, width: f32) -> Self {
        self.track_width = width;
        self
    }

    /// Set whether the slider reacts to input
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Glass slider widget
pub struct GlassSlider {
    id: WidgetId,
    config: SliderConfig,
    value: f32,
    /// The thumb lifts off the track while dragging
    thumb: LiftElement,
    on_change: Option<Box<dyn FnMut(f32) + Send>>,
}

impl GlassSlider {
    /// Create a slider with the default config
    pub fn new(ctx: &mut WidgetContext) -> Self {
        Self::with_config(ctx, SliderConfig::default())
    }

    /// Create a slider with a custom config
    pub fn with_config(ctx: &mut WidgetContext, config: SliderConfig) -> Self {
        let fsm = StateMachine::builder(states::IDLE)
            .on(states::IDLE, event_types::POINTER_ENTER, states::HOVERED)
            .on(states::HOVERED, event_types::POINTER_LEAVE, states::IDLE)
            .on(states::HOVERED, event_types::POINTER_DOWN, states::DRAGGING)
            // A drag keeps tracking even if the pointer wanders off the
            // control; only release ends it
            .on(states::DRAGGING, event_types::POINTER_UP, states::HOVERED)
            .build();
        let id = ctx.register_widget_with_fsm(fsm);
        let value = config.initial.clamp(config.min, config.max);
        let thumb = LiftElement::new(ctx.scheduler(), config.thumb_lift);

        Self {
            id,
            config,
            value,
            thumb,
            on_change: None,
        }
    }

    /// Current value
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Normalized position of the value within the range (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        let span = self.config.max - self.config.min;
        if span <= 0.0 {
            return 0.0;
        }
        (self.value - self.config.min) / span
    }

    /// Set the value programmatically (clamped; no change callback)
    pub fn set_value(&mut self, ctx: &mut WidgetContext, value: f32) {
        let clamped = value.clamp(self.config.min, self.config.max);
        if clamped != self.value {
            self.value = clamped;
            ctx.mark_dirty(self.id);
        }
    }

    /// Set the change callback
    pub fn on_change<F: FnMut(f32) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self, ctx: &WidgetContext) -> bool {
        ctx.fsm_state(self.id) == Some(states::DRAGGING)
    }

    /// Handle a pointer event
    pub fn handle_event(&mut self, ctx: &mut WidgetContext, event: &Event) {
        if !self.config.enabled {
            return;
        }

        let old_state = ctx.fsm_state(self.id).unwrap_or(states::IDLE);
        ctx.dispatch_event(self.id, event);
        let new_state = ctx.fsm_state(self.id).unwrap_or(states::IDLE);

        let was_dragging = old_state == states::DRAGGING;
        let dragging = new_state == states::DRAGGING;

        // Thumb lift feedback over the drag lifetime
        if dragging != was_dragging {
            let pose = if dragging { Pose::Lifted } else { Pose::Resting };
            self.thumb.set_state(pose, true);
        }

        // Track the pointer while the drag is live (including the press
        // that started it)
        if dragging
            && matches!(
                event.event_type,
                event_types::POINTER_DOWN | event_types::POINTER_MOVE
            )
        {
            self.track_to(ctx, event.x);
        }
    }

    /// Map a pointer x position to a value and apply it
    fn track_to(&mut self, ctx: &mut WidgetContext, x: f32) {
        let t = (x / self.config.track_width).clamp(0.0, 1.0);
        let value = self.config.min + t * (self.config.max - self.config.min);
        if value != self.value {
            self.value = value;
            ctx.mark_dirty(self.id);
            if let Some(ref mut callback) = self.on_change {
                callback(value);
            }
        }
    }

    /// Thumb lift parameters (scale/elevation/shadow)
    pub fn thumb_params(&self) -> VisualParams {
        self.thumb.params()
    }

    pub fn config(&self) -> &SliderConfig {
        &self.config
    }
}

impl Widget for GlassSlider {
    fn id(&self) -> WidgetId {
        self.id
    }
}

/// Create a slider
pub fn glass_slider() -> SliderBuilder {
    SliderBuilder {
        config: SliderConfig::default(),
        on_change: None,
    }
}

/// Builder for creating sliders
pub struct SliderBuilder {
    config: SliderConfig,
    on_change: Option<Box<dyn FnMut(f32) + Send>>,
}

impl SliderBuilder {
    /// Set the value range
    pub fn range(mut self, min: f32, max: f32) -> Self {
        self.config.min = min;
        self.config.max = max;
        self
    }

    /// Set the initial value
    pub fn initial(mut self, value: f32) -> Self {
        self.config.initial = value;
        self
    }

    /// Set the filled-track tint
    pub fn tint(mut self, color: Color) -> Self {
        self.config.tint = color;
        self
    }

    /// Set whether the slider reacts to input
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Set the change callback
    pub fn on_change<F: FnMut(f32) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Build the slider widget
    pub fn build(self, ctx: &mut WidgetContext) -> GlassSlider {
        let mut slider = GlassSlider::with_config(ctx, self.config);
        slider.on_change = self.on_change;
        slider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucite_animation::{LiftState, TransitionScheduler};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn setup() -> (TransitionScheduler, WidgetContext) {
        let scheduler = TransitionScheduler::new();
        let ctx = WidgetContext::new(scheduler.handle());
        (scheduler, ctx)
    }

    #[test]
    fn test_drag_maps_pointer_to_value() {
        let (_scheduler, mut ctx) = setup();
        let mut slider = glass_slider().range(0.0, 100.0).initial(50.0).build(&mut ctx);
        assert_eq!(slider.value(), 50.0);

        slider.handle_event(&mut ctx, &Event::of(event_types::POINTER_ENTER));
        slider.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_DOWN, 150.0, 0.0));
        assert!(slider.is_dragging(&ctx));
        assert_eq!(slider.value(), 75.0);

        slider.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_MOVE, 50.0, 0.0));
        assert_eq!(slider.value(), 25.0);

        slider.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_UP, 50.0, 0.0));
        assert!(!slider.is_dragging(&ctx));
        assert_eq!(slider.value(), 25.0);
    }

    #[test]
    fn test_value_clamps_to_range() {
        let (_scheduler, mut ctx) = setup();
        let mut slider = glass_slider().range(0.0, 100.0).build(&mut ctx);

        slider.handle_event(&mut ctx, &Event::of(event_types::POINTER_ENTER));
        slider.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_DOWN, 500.0, 0.0));
        assert_eq!(slider.value(), 100.0);

        slider.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_MOVE, -40.0, 0.0));
        assert_eq!(slider.value(), 0.0);

        let mut slider2 = glass_slider().range(0.0, 10.0).initial(99.0).build(&mut ctx);
        assert_eq!(slider2.value(), 10.0);
        slider2.set_value(&mut ctx, -5.0);
        assert_eq!(slider2.value(), 0.0);
    }

    #[test]
    fn test_change_callback_reports_drag_values() {
        let (_scheduler, mut ctx) = setup();
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&values);
        let mut slider = glass_slider()
            .range(0.0, 100.0)
            .initial(0.0)
            .on_change(move |value| sink.lock().unwrap().push(value))
            .build(&mut ctx);

        slider.handle_event(&mut ctx, &Event::of(event_types::POINTER_ENTER));
        slider.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_DOWN, 100.0, 0.0));
        slider.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_MOVE, 200.0, 0.0));
        assert_eq!(&*values.lock().unwrap(), &[50.0, 100.0]);
    }

    #[test]
    fn test_disabled_slider_ignores_input() {
        let (_scheduler, mut ctx) = setup();
        let mut slider = glass_slider()
            .range(0.0, 100.0)
            .initial(50.0)
            .enabled(false)
            .build(&mut ctx);

        slider.handle_event(&mut ctx, &Event::of(event_types::POINTER_ENTER));
        slider.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_DOWN, 150.0, 0.0));
        assert!(!slider.is_dragging(&ctx));
        assert_eq!(slider.value(), 50.0);
    }

    #[test]
    fn test_thumb_lifts_for_drag_lifetime() {
        let (scheduler, mut ctx) = setup();
        let mut slider = GlassSlider::new(&mut ctx);

        slider.handle_event(&mut ctx, &Event::of(event_types::POINTER_ENTER));
        slider.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_DOWN, 100.0, 0.0));
        scheduler.advance(Duration::from_millis(300));
        assert!(slider.thumb.is_lifted());

        // Moving does not drop the thumb
        slider.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_MOVE, 120.0, 0.0));
        assert!(slider.thumb.is_lifted());

        slider.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_UP, 120.0, 0.0));
        assert_eq!(
            slider.thumb.state(),
            LiftState::Transitioning(Pose::Resting)
        );
        scheduler.advance(Duration::from_millis(300));
        assert_eq!(slider.thumb.state(), LiftState::Settled(Pose::Resting));
    }
}
