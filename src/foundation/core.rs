pub use kurbo::{Point, Size, Vec2};

/// Node-local placement on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Top-left position in pixels.
    pub position: Point,
    /// Explicit width; `None` inherits the job canvas width.
    pub width: Option<f64>,
    /// Explicit height; `None` inherits the job canvas height.
    pub height: Option<f64>,
    /// Rotation in degrees.
    pub rotation_deg: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            width: None,
            height: None,
            rotation_deg: 0.0,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}
