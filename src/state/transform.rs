/// Placement of a design graphic on top of the mockup
///
/// Positions are stored as percentages of the container so the same
/// transform describes the placement no matter how large the mockup is
/// rendered on screen.

/// Smallest allowed design scale
pub const MIN_SCALE: f32 = 0.05;

/// Largest allowed design scale
pub const MAX_SCALE: f32 = 1.5;

/// Where the design sits and how large it is
///
/// `x`/`y` locate the center of the design as a percentage (0-100) of the
/// container width/height. `scale` is a multiplier of the base design size
/// (one fifth of the container width).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementTransform {
    /// Horizontal center, percent from the left edge
    pub x: f32,
    /// Vertical center, percent from the top edge
    pub y: f32,
    /// Size multiplier, kept within [MIN_SCALE, MAX_SCALE]
    pub scale: f32,
}

impl Default for PlacementTransform {
    /// Slightly above center, a quarter of the base size
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 40.0,
            scale: 0.25,
        }
    }
}

impl PlacementTransform {
    /// Build a transform, clamping every component into range
    pub fn new(x: f32, y: f32, scale: f32) -> Self {
        Self {
            x: clamp_percent(x),
            y: clamp_percent(y),
            scale: clamp_scale(scale),
        }
    }

    /// Copy of this transform with a new scale
    pub fn with_scale(self, scale: f32) -> Self {
        Self {
            scale: clamp_scale(scale),
            ..self
        }
    }
}

/// Bound a percentage to [0, 100]
pub fn clamp_percent(v: f32) -> f32 {
    v.clamp(0.0, 100.0)
}

/// Bound a scale multiplier to [MIN_SCALE, MAX_SCALE]
pub fn clamp_scale(v: f32) -> f32 {
    v.clamp(MIN_SCALE, MAX_SCALE)
}
