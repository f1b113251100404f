#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn unscaled_viewport_is_identity() {
    let vp = Viewport::unscaled(800.0, 600.0);
    assert_eq!(vp.client_to_canvas(Point::new(120.0, 45.0)), Point::new(120.0, 45.0));
}

#[test]
fn offset_is_subtracted_before_scaling() {
    let vp = Viewport {
        left: 100.0,
        top: 50.0,
        display_width: 400.0,
        display_height: 300.0,
        bitmap_width: 800.0,
        bitmap_height: 600.0,
    };
    assert_eq!(vp.client_to_canvas(Point::new(300.0, 200.0)), Point::new(400.0, 300.0));
}

#[test]
fn axes_scale_independently() {
    let vp = Viewport {
        left: 0.0,
        top: 0.0,
        display_width: 200.0,
        display_height: 100.0,
        bitmap_width: 100.0,
        bitmap_height: 300.0,
    };
    assert_eq!(vp.client_to_canvas(Point::new(100.0, 10.0)), Point::new(50.0, 30.0));
}

#[test]
fn zero_sized_display_does_not_divide_by_zero() {
    let vp = Viewport {
        left: 10.0,
        top: 10.0,
        display_width: 0.0,
        display_height: 0.0,
        bitmap_width: 800.0,
        bitmap_height: 600.0,
    };
    let p = vp.client_to_canvas(Point::new(15.0, 20.0));
    assert_eq!(p, Point::new(5.0, 10.0));
}
