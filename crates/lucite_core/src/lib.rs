//! Lucite Core Primitives
//!
//! This crate provides the foundational types shared across the Lucite
//! control kit:
//!
//! - **Colors**: linear-space RGBA with interpolation
//! - **Glass Materials**: parameter model for translucent glass surfaces
//! - **Visual Parameters**: the scale/elevation/shadow triple that lift
//!   transitions interpolate
//! - **Pointer Events**: the minimal event vocabulary widgets consume
//! - **State Machines**: flat FSMs for widget interaction states
//!
//! Nothing in this crate renders or schedules; it is pure data and small
//! state logic consumed by `lucite_animation` and `lucite_widgets`.

pub mod color;
pub mod events;
pub mod fsm;
pub mod visual;

pub use color::Color;
pub use events::{event_types, Event};
pub use fsm::{StateId, StateMachine, StateMachineBuilder, Transition};
pub use visual::{GlassStyle, Shadow, VisualParams};
