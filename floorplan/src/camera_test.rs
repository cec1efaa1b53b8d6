#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- conversions ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam, Camera { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 });
    assert!(point_approx_eq(cam.screen_to_world(Point::new(50.0, 75.0)), Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_world_with_pan_and_zoom() {
    let cam = Camera { pan_x: 50.0, pan_y: 30.0, zoom: 2.0 };
    let world = cam.screen_to_world(Point::new(0.0, 0.0));
    assert!(approx_eq(world.x, -25.0));
    assert!(approx_eq(world.y, -15.0));
}

#[test]
fn world_to_screen_with_pan_and_zoom() {
    let cam = Camera { pan_x: 20.0, pan_y: 10.0, zoom: 3.0 };
    let screen = cam.world_to_screen(Point::new(5.0, 5.0));
    assert!(approx_eq(screen.x, 35.0));
    assert!(approx_eq(screen.y, 25.0));
}

#[test]
fn round_trip_fractional_zoom() {
    let cam = Camera { pan_x: 13.7, pan_y: -42.3, zoom: 0.75 };
    let world = Point::new(333.3, -999.9);
    assert!(point_approx_eq(world, cam.screen_to_world(cam.world_to_screen(world))));
}

// --- pan / zoom ---

#[test]
fn pan_by_accumulates() {
    let mut cam = Camera::default();
    cam.pan_by(30.0, 0.0);
    cam.pan_by(0.0, -30.0);
    assert_eq!((cam.pan_x, cam.pan_y), (30.0, -30.0));
}

#[test]
fn zoom_is_clamped() {
    let mut cam = Camera::default();
    cam.set_zoom(50.0);
    assert_eq!(cam.zoom, MAX_ZOOM);
    cam.set_zoom(0.001);
    assert_eq!(cam.zoom, MIN_ZOOM);
    assert_eq!(clamp_zoom(f64::NAN), 1.0);
}

#[test]
fn zoom_at_keeps_anchor_fixed() {
    let mut cam = Camera { pan_x: 10.0, pan_y: 20.0, zoom: 1.0 };
    let anchor = Point::new(200.0, 150.0);
    let before = cam.screen_to_world(anchor);
    cam.zoom_at(anchor, 1.1);
    assert!(approx_eq(cam.zoom, 1.1));
    assert!(point_approx_eq(cam.screen_to_world(anchor), before));
}

#[test]
fn reset_restores_identity() {
    let mut cam = Camera { pan_x: 5.0, pan_y: 6.0, zoom: 3.0 };
    cam.reset();
    assert_eq!(cam, Camera::default());
}

// --- fit_to_bounds ---

#[test]
fn fit_centres_content() {
    let mut cam = Camera::default();
    let bounds = Bounds { min_x: 0.0, min_y: 0.0, max_x: 380.0, max_y: 100.0 };
    cam.fit_to_bounds(bounds, Viewport::new(400.0, 400.0), 10.0);
    assert!(approx_eq(cam.zoom, 1.0));
    let center = cam.world_to_screen(bounds.center());
    assert!(point_approx_eq(center, Point::new(200.0, 200.0)));
}

#[test]
fn fit_uses_tighter_axis() {
    let mut cam = Camera::default();
    let bounds = Bounds { min_x: 100.0, min_y: 100.0, max_x: 300.0, max_y: 500.0 };
    cam.fit_to_bounds(bounds, Viewport::new(840.0, 420.0), 10.0);
    assert!(approx_eq(cam.zoom, 1.0));
    let top_left = cam.world_to_screen(Point::new(100.0, 100.0));
    assert!(approx_eq(top_left.y, 10.0));
}

#[test]
fn fit_clamps_tiny_content() {
    let mut cam = Camera::default();
    let bounds = Bounds { min_x: 0.0, min_y: 0.0, max_x: 1.0, max_y: 1.0 };
    cam.fit_to_bounds(bounds, Viewport::new(800.0, 600.0), 20.0);
    assert_eq!(cam.zoom, MAX_ZOOM);
}

#[test]
fn fit_point_content_keeps_unit_zoom() {
    let mut cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 3.0 };
    let bounds = Bounds { min_x: 50.0, min_y: 50.0, max_x: 50.0, max_y: 50.0 };
    cam.fit_to_bounds(bounds, Viewport::new(100.0, 100.0), 0.0);
    assert_eq!(cam.zoom, 1.0);
    assert_eq!((cam.pan_x, cam.pan_y), (0.0, 0.0));
}
