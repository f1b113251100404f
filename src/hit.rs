//! Hit-testing flowers for erase clicks.
//!
//! A flower is hit when the point falls strictly inside the square of side
//! `2 * size` centered on the flower. This is a bounding box, not the petal
//! outline: for large sizes it registers hits in the gaps between petals and
//! past the petal tips along the diagonals.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::garden::Flower;
use crate::viewport::Point;

/// Whether `point` lies inside the hit box of `flower` drawn at `size`.
#[must_use]
pub fn contains(point: Point, flower: &Flower, size: f64) -> bool {
    let half = size.abs();
    point.x > flower.x - half && point.x < flower.x + half && point.y > flower.y - half && point.y < flower.y + half
}
