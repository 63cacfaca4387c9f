//! Glass surface widget
//!
//! A translucent panel: a glass material plus a corner radius. Hosts place
//! content over it and render the material themselves; the widget carries
//! the parameters and participates in dirty tracking so style changes get
//! repainted.

use lucite_core::GlassStyle;

use crate::context::WidgetContext;
use crate::widget::{Widget, WidgetId};

/// Glass surface widget
pub struct GlassSurface {
    id: WidgetId,
    style: GlassStyle,
    corner_radius: f32,
}

impl GlassSurface {
    /// Create a regular-glass surface
    pub fn new(ctx: &mut WidgetContext) -> Self {
        Self::with_style(ctx, GlassStyle::regular())
    }

    /// Create a surface with a specific material
    pub fn with_style(ctx: &mut WidgetContext, style: GlassStyle) -> Self {
        Self {
            id: ctx.register_widget(),
            style,
            corner_radius: 16.0,
        }
    }

    /// The surface's material
    pub fn style(&self) -> GlassStyle {
        self.style
    }

    /// Replace the material
    pub fn set_style(&mut self, ctx: &mut WidgetContext, style: GlassStyle) {
        self.style = style;
        ctx.mark_dirty(self.id);
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn set_corner_radius(&mut self, ctx: &mut WidgetContext, radius: f32) {
        self.corner_radius = radius;
        ctx.mark_dirty(self.id);
    }
}

impl Widget for GlassSurface {
    fn id(&self) -> WidgetId {
        self.id
    }
}

/// Create a regular-glass surface
pub fn glass_surface(ctx: &mut WidgetContext) -> GlassSurface {
    GlassSurface::new(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucite_animation::TransitionScheduler;

    #[test]
    fn test_style_change_marks_dirty() {
        let scheduler = TransitionScheduler::new();
        let mut ctx = WidgetContext::new(scheduler.handle());
        let mut surface = glass_surface(&mut ctx);
        assert!(ctx.is_registered(surface.id()));
        assert!(!ctx.is_dirty(surface.id()));

        surface.set_style(&mut ctx, GlassStyle::clear());
        assert!(ctx.is_dirty(surface.id()));
        assert!(surface.style().blur < GlassStyle::regular().blur);
    }
}
