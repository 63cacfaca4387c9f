//! Visual parameter models
//!
//! `GlassStyle` describes the translucent material a host renderer draws;
//! the kit only carries the parameters. `VisualParams` is the small triple
//! (scale, elevation, shadow opacity) that lift transitions interpolate —
//! what the values mean on screen is entirely up to the host.

use crate::color::Color;

/// Shadow configuration
#[derive(Clone, Copy, Debug)]
pub struct Shadow {
    pub offset_y: f32,
    pub blur: f32,
    pub color: Color,
}

impl Shadow {
    pub fn new(offset_y: f32, blur: f32, color: Color) -> Self {
        Self {
            offset_y,
            blur,
            color,
        }
    }

    /// Soft drop shadow used under lifted elements
    pub fn soft(offset_y: f32) -> Self {
        Self::new(offset_y, offset_y * 2.0, Color::BLACK.with_alpha(0.3))
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Self::soft(4.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Glass Material
// ─────────────────────────────────────────────────────────────────────────────

/// Glass material description
///
/// Parameter model for a backdrop-blur glass surface. Rendering the blur
/// and refraction is a host capability; controls only carry these values.
#[derive(Clone, Copy, Debug)]
pub struct GlassStyle {
    /// Backdrop blur intensity (0-50)
    pub blur: f32,
    /// Tint color applied over the blur
    pub tint: Color,
    /// Color saturation (1.0 = normal, 0.0 = grayscale)
    pub saturation: f32,
    /// Brightness multiplier (1.0 = normal)
    pub brightness: f32,
    /// Noise/grain amount for a frosted texture (0.0-0.1)
    pub noise: f32,
    /// Edge highlight thickness
    pub highlight: f32,
    /// Optional drop shadow
    pub shadow: Option<Shadow>,
}

impl Default for GlassStyle {
    fn default() -> Self {
        Self {
            blur: 20.0,
            tint: Color::rgba(1.0, 1.0, 1.0, 0.1),
            saturation: 1.0,
            brightness: 1.0,
            noise: 0.0,
            highlight: 0.8,
            shadow: None,
        }
    }
}

impl GlassStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set blur intensity
    pub fn blur(mut self, blur: f32) -> Self {
        self.blur = blur;
        self
    }

    /// Set tint color
    pub fn tint(mut self, color: Color) -> Self {
        self.tint = color;
        self
    }

    /// Set saturation
    pub fn saturation(mut self, saturation: f32) -> Self {
        self.saturation = saturation;
        self
    }

    /// Set brightness
    pub fn brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness;
        self
    }

    /// Set noise amount
    pub fn noise(mut self, noise: f32) -> Self {
        self.noise = noise;
        self
    }

    /// Set edge highlight thickness
    pub fn highlight(mut self, thickness: f32) -> Self {
        self.highlight = thickness;
        self
    }

    /// Set drop shadow
    pub fn shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    // Presets

    /// Regular glass: visible blur and tint, the default material
    pub fn regular() -> Self {
        Self::new()
    }

    /// Clear glass: minimal blur and tint, content behind stays legible
    pub fn clear() -> Self {
        Self::new()
            .blur(6.0)
            .tint(Color::rgba(1.0, 1.0, 1.0, 0.04))
            .saturation(1.05)
    }

    /// Frosted glass with grain texture
    pub fn frosted() -> Self {
        Self::new().blur(28.0).noise(0.03)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lift Visual Parameters
// ─────────────────────────────────────────────────────────────────────────────

/// The visual parameters a lift transition interpolates
///
/// Opaque to the transition engine: it only ever moves these values between
/// two declared endpoints. Hosts map them to transforms and shadow layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualParams {
    /// Uniform scale factor (1.0 = natural size)
    pub scale: f32,
    /// Elevation above the backdrop, in points
    pub elevation: f32,
    /// Opacity of the drop shadow implied by elevation
    pub shadow_opacity: f32,
}

impl VisualParams {
    pub const fn new(scale: f32, elevation: f32, shadow_opacity: f32) -> Self {
        Self {
            scale,
            elevation,
            shadow_opacity,
        }
    }

    /// Linear interpolation between two parameter sets
    pub fn lerp(a: &VisualParams, b: &VisualParams, t: f32) -> VisualParams {
        let t = t.clamp(0.0, 1.0);
        VisualParams {
            scale: a.scale + (b.scale - a.scale) * t,
            elevation: a.elevation + (b.elevation - a.elevation) * t,
            shadow_opacity: a.shadow_opacity + (b.shadow_opacity - a.shadow_opacity) * t,
        }
    }
}

impl Default for VisualParams {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glass_presets() {
        let regular = GlassStyle::regular();
        let clear = GlassStyle::clear();
        assert!(clear.blur < regular.blur);
        assert!(clear.tint.a < regular.tint.a);

        let frosted = GlassStyle::frosted();
        assert!(frosted.noise > 0.0);
    }

    #[test]
    fn test_params_lerp() {
        let a = VisualParams::new(1.0, 0.0, 0.2);
        let b = VisualParams::new(1.1, 8.0, 0.4);
        let mid = VisualParams::lerp(&a, &b, 0.5);
        assert!((mid.scale - 1.05).abs() < 1e-6);
        assert!((mid.elevation - 4.0).abs() < 1e-6);
        assert_eq!(VisualParams::lerp(&a, &b, 0.0), a);
        assert_eq!(VisualParams::lerp(&a, &b, 1.0), b);
    }
}
