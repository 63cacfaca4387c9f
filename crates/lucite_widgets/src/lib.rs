//! Lucite Widget Library
//!
//! Headless models of the kit's glass controls.
//!
//! # Architecture
//!
//! The widgets are built on three pillars:
//!
//! 1. **FSM-Driven Interactions**: each control has a flat state machine
//!    for its interaction states (idle, hovered, pressed, dragging —
//!    combined with its toggle state where it has one). Pointer events
//!    drive transitions; visual changes and callbacks hang off them.
//!
//! 2. **Engine-Driven Lift Feedback**: the parts of a control that rise
//!    off the surface (a lens, a switch knob, a slider thumb) are
//!    `LiftElement`s, so direct input and session choreography go through
//!    the same transition rules.
//!
//! 3. **Dirty Tracking**: controls are marked dirty when their state
//!    changes so a host only rebuilds what moved.
//!
//! Nothing here draws. A host reads each control's state and visual
//! parameters and renders them with its own glass material support.
//!
//! # Example
//!
//! ```
//! use lucite_animation::TransitionScheduler;
//! use lucite_core::{event_types, Event};
//! use lucite_widgets::prelude::*;
//!
//! let scheduler = TransitionScheduler::new();
//! let mut ctx = WidgetContext::new(scheduler.handle());
//!
//! let mut toggle = glass_switch().on(true).build(&mut ctx);
//! toggle.handle_event(&mut ctx, &Event::of(event_types::POINTER_ENTER));
//! ```

pub mod context;
pub mod lens;
pub mod slider;
pub mod surface;
pub mod switch;
pub mod widget;

pub use context::WidgetContext;
pub use lens::{lens, Lens, LensBuilder, LensConfig};
pub use slider::{glass_slider, GlassSlider, SliderBuilder, SliderConfig};
pub use surface::{glass_surface, GlassSurface};
pub use switch::{glass_switch, GlassSwitch, SwitchBuilder, SwitchConfig, SwitchState};
pub use widget::{Widget, WidgetId};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::context::WidgetContext;
    pub use crate::lens::{lens, Lens, LensConfig};
    pub use crate::slider::{glass_slider, GlassSlider, SliderConfig};
    pub use crate::surface::{glass_surface, GlassSurface};
    pub use crate::switch::{glass_switch, GlassSwitch, SwitchConfig};
    pub use crate::widget::{Widget, WidgetId};
}
