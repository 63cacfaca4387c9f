//! Widget identity and the common widget surface

use std::time::Duration;

use crate::context::WidgetContext;

slotmap::new_key_type! {
    /// Handle to a registered widget
    pub struct WidgetId;
}

/// Common surface of the kit's controls
pub trait Widget {
    /// The widget's registration key
    fn id(&self) -> WidgetId;

    /// Advance time-based visuals (eased travel, etc.)
    ///
    /// Lift feedback is driven by the transition scheduler, not here.
    fn update(&mut self, _ctx: &mut WidgetContext, _dt: Duration) {}
}
