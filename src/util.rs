//! Utility functions for color names and ellipse geometry.

use crate::scene::{Color, color::*};

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "white", "black"
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

// ============================================================================
// Geometry Utilities
// ============================================================================

/// Returns true if `(x, y)` lies inside or on the axis-aligned ellipse.
///
/// Tests `(dx/rx)² + (dy/ry)² <= 1`. Degenerate radii contain nothing.
pub fn ellipse_contains(center: (f64, f64), radii: (f64, f64), x: f64, y: f64) -> bool {
    let (rx, ry) = radii;
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let nx = (x - center.0) / rx;
    let ny = (y - center.1) / ry;
    nx * nx + ny * ny <= 1.0
}
