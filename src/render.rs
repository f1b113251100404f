//! Rendering: draws flowers onto a 2D drawing surface.
//!
//! This module is the only place that knows what a flower looks like. It
//! receives a read-only flower list and the global flower size and produces
//! drawing calls; it never mutates application state. Every pass starts with
//! a clear, so rendering the same inputs twice yields the same output.
//!
//! A flower is a green arc stem, `petals` lens-shaped petal outlines rotated
//! evenly around the center starting at angle 0, and a filled black center
//! dot. Petal count and stroke color come from [`style`].

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::TAU;

use crate::garden::{Flower, FlowerColor};
use crate::viewport::Point;

/// Flower size the sprites are designed for.
pub const DEFAULT_FLOWER_SIZE: f64 = 40.0;

/// Stem arc radius as a multiple of flower size.
const STEM_RADIUS_FACTOR: f64 = 15.0;
/// Stem arc sweep in radians.
const STEM_SWEEP: f64 = 0.2;
const STEM_COLOR: &str = "green";
const STEM_LINE_WIDTH: f64 = 5.0;

/// Petal half-width as a multiple of flower size (petal length = size).
const PETAL_WIDTH_FACTOR: f64 = 0.2;
const PETAL_LINE_WIDTH: f64 = 2.0;

/// Center dot radius as a multiple of flower size.
const CENTER_RADIUS_FACTOR: f64 = 0.15;
const CENTER_COLOR: &str = "black";

// =============================================================
// Style table
// =============================================================

/// Visual parameters derived from a flower's color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowerStyle {
    /// Petal stroke color (CSS color name).
    pub stroke: &'static str,
    /// Number of petals.
    pub petals: u32,
}

/// Fixed color → style table.
#[must_use]
pub fn style(color: FlowerColor) -> FlowerStyle {
    let petals = match color {
        FlowerColor::Blue => 6,
        FlowerColor::Red => 5,
        FlowerColor::Yellow => 10,
        FlowerColor::White => 7,
        FlowerColor::Purple => 8,
    };
    FlowerStyle { stroke: color.as_str(), petals }
}

// =============================================================
// Surface
// =============================================================

/// One step of a path outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

/// A path in surface coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

impl Path {
    fn move_to(&mut self, p: Point) {
        self.segments.push(PathSegment::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.segments.push(PathSegment::LineTo(p));
    }

    fn close(&mut self) {
        self.segments.push(PathSegment::Close);
    }
}

/// The drawing operations the renderer needs from a 2D context.
///
/// Angles are in radians, measured clockwise from +x as on an HTML canvas.
pub trait Surface {
    /// Erase everything drawn so far.
    fn clear(&mut self);
    /// Set the color and width used by subsequent strokes.
    fn set_stroke_style(&mut self, color: &str, line_width: f64);
    /// Set the color used by subsequent fills.
    fn set_fill_style(&mut self, color: &str);
    /// Stroke a circular arc.
    fn stroke_arc(&mut self, center: Point, radius: f64, start: f64, end: f64);
    /// Stroke a path outline.
    fn stroke_path(&mut self, path: &Path);
    /// Fill a full circle.
    fn fill_circle(&mut self, center: Point, radius: f64);
}

// =============================================================
// Drawing
// =============================================================

/// Clear `surface` and draw every flower in list order at the shared `size`.
pub fn render<S: Surface + ?Sized>(surface: &mut S, flowers: &[Flower], size: f64) {
    surface.clear();
    for flower in flowers {
        draw_flower(surface, flower, size);
    }
}

/// Draw a single flower centered at its position.
pub fn draw_flower<S: Surface + ?Sized>(surface: &mut S, flower: &Flower, size: f64) {
    let center = Point::new(flower.x, flower.y);
    let style = style(flower.color);

    // Stem: a long shallow arc whose circle sits left of the flower.
    let stem_radius = size * STEM_RADIUS_FACTOR;
    surface.set_stroke_style(STEM_COLOR, STEM_LINE_WIDTH);
    surface.stroke_arc(Point::new(center.x - stem_radius, center.y), stem_radius, 0.0, STEM_SWEEP);

    surface.set_stroke_style(style.stroke, PETAL_LINE_WIDTH);
    let step = TAU / f64::from(style.petals);
    for i in 0..style.petals {
        let angle = step * f64::from(i);
        surface.stroke_path(&petal_path(center, size, size * PETAL_WIDTH_FACTOR, angle));
    }

    surface.set_fill_style(CENTER_COLOR);
    surface.fill_circle(center, size * CENTER_RADIUS_FACTOR);
}

/// Lens-shaped petal of the given length and half-width, pointing along
/// `angle` from `origin`, with a midrib from base to tip.
#[must_use]
pub fn petal_path(origin: Point, length: f64, width: f64, angle: f64) -> Path {
    let (sin, cos) = angle.sin_cos();
    let at = |lx: f64, ly: f64| Point::new(origin.x + lx * cos - ly * sin, origin.y + lx * sin + ly * cos);

    let mut path = Path::default();
    path.move_to(at(0.0, 0.0));
    path.line_to(at(length * 0.3, -width));
    path.line_to(at(length * 0.8, -width));
    path.line_to(at(length, 0.0));
    path.line_to(at(length * 0.8, width));
    path.line_to(at(length * 0.3, width));
    path.close();
    path.move_to(at(0.0, 0.0));
    path.line_to(at(length, 0.0));
    path
}

// =============================================================
// Display list
// =============================================================

/// A recorded drawing call with the style that was active for it.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    StrokeArc { center: Point, radius: f64, start: f64, end: f64, color: String, line_width: f64 },
    StrokePath { path: Path, color: String, line_width: f64 },
    FillCircle { center: Point, radius: f64, color: String },
}

/// A [`Surface`] that records commands instead of rasterizing them.
///
/// A clear drops everything recorded before it, so the list always holds
/// exactly what is visible after the last pass.
#[derive(Debug, Clone)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    stroke: (String, f64),
    fill: String,
}

impl DisplayList {
    #[must_use]
    pub fn new() -> Self {
        Self { commands: Vec::new(), stroke: ("black".into(), 1.0), fill: "black".into() }
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of filled center dots, i.e. flowers drawn since the last clear.
    #[must_use]
    pub fn flower_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count()
    }
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for DisplayList {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn set_stroke_style(&mut self, color: &str, line_width: f64) {
        self.stroke = (color.to_owned(), line_width);
    }

    fn set_fill_style(&mut self, color: &str) {
        color.clone_into(&mut self.fill);
    }

    fn stroke_arc(&mut self, center: Point, radius: f64, start: f64, end: f64) {
        self.commands.push(DrawCommand::StrokeArc {
            center,
            radius,
            start,
            end,
            color: self.stroke.0.clone(),
            line_width: self.stroke.1,
        });
    }

    fn stroke_path(&mut self, path: &Path) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            color: self.stroke.0.clone(),
            line_width: self.stroke.1,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color: self.fill.clone() });
    }
}

// =============================================================
// Canvas host
// =============================================================

/// Owns a surface and redraws it from scratch whenever asked.
///
/// Callers redraw on every garden state change; nothing here tracks which
/// flowers changed.
pub struct Canvas<S: Surface> {
    surface: S,
    passes: u64,
}

impl<S: Surface> Canvas<S> {
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self { surface, passes: 0 }
    }

    /// Full render pass.
    pub fn redraw(&mut self, flowers: &[Flower], size: f64) {
        render(&mut self.surface, flowers, size);
        self.passes += 1;
    }

    /// Clear without drawing anything, used when no garden is selected.
    pub fn clear(&mut self) {
        self.surface.clear();
        self.passes += 1;
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Number of clears/redraws performed so far.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }
}
