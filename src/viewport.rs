//! Points in client and canvas space, and the mapping between them.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

/// A point in either client (CSS pixel) or canvas bitmap space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Placement of the canvas element on screen versus its bitmap size.
///
/// The bitmap is usually displayed scaled, so a pointer position in client
/// coordinates has to be offset by the element's origin and scaled per axis
/// before it can be compared with flower positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge of the displayed element in client coordinates.
    pub left: f64,
    /// Top edge of the displayed element in client coordinates.
    pub top: f64,
    /// Displayed width in CSS pixels.
    pub display_width: f64,
    /// Displayed height in CSS pixels.
    pub display_height: f64,
    /// Bitmap width in canvas pixels.
    pub bitmap_width: f64,
    /// Bitmap height in canvas pixels.
    pub bitmap_height: f64,
}

impl Viewport {
    /// A viewport displayed at 1:1 with its origin at the client origin.
    #[must_use]
    pub fn unscaled(width: f64, height: f64) -> Self {
        Self { left: 0.0, top: 0.0, display_width: width, display_height: height, bitmap_width: width, bitmap_height: height }
    }

    /// Convert a client-space pointer position to canvas bitmap coordinates.
    ///
    /// A zero-sized display rect maps with scale 1 rather than dividing by zero.
    #[must_use]
    pub fn client_to_canvas(&self, client: Point) -> Point {
        Point {
            x: (client.x - self.left) * scale(self.bitmap_width, self.display_width),
            y: (client.y - self.top) * scale(self.bitmap_height, self.display_height),
        }
    }
}

fn scale(bitmap: f64, display: f64) -> f64 {
    if display > 0.0 { bitmap / display } else { 1.0 }
}
