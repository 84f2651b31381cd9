//! Unit tests for geometry, coordinate mapping and the resize math.

use overlayboard::geometry::{
    CanvasSize, HandleId, Point, Rect, handle_at, handle_rect, point_in_rect, to_canvas_coordinates,
};
use overlayboard::input::{CanvasViewport, resize_rect};

const CANVAS: CanvasSize = CanvasSize::new(600.0, 600.0);

// ============================================================================
// Coordinate mapping
// ============================================================================

#[test]
fn test_unscaled_mapping_is_translation() {
    let bounding_box = Rect::new(40.0, 10.0, 600.0, 600.0);
    let point = to_canvas_coordinates(Point::new(190.0, 40.0), bounding_box, CANVAS);
    assert_eq!(point, Point::new(150.0, 30.0));
}

#[test]
fn test_stretched_canvas_scales_each_axis() {
    // Displayed at half width and a third of the height
    let bounding_box = Rect::new(50.0, 20.0, 300.0, 200.0);
    let point = to_canvas_coordinates(Point::new(125.0, 30.0), bounding_box, CANVAS);
    assert_eq!(point, Point::new(150.0, 30.0));
}

#[test]
fn test_collapsed_bounding_box_does_not_produce_infinities() {
    let bounding_box = Rect::new(10.0, 10.0, 0.0, 0.0);
    let point = to_canvas_coordinates(Point::new(15.0, 20.0), bounding_box, CANVAS);
    assert!(point.x.is_finite() && point.y.is_finite());
    assert_eq!(point, Point::new(5.0, 10.0));
}

#[test]
fn test_viewport_round_trip() {
    let viewport = CanvasViewport::with_bounding_box(CANVAS, Rect::new(100.0, 50.0, 1200.0, 300.0));
    let canvas = Point::new(300.0, 450.0);
    let client = viewport.canvas_to_client(canvas);
    assert_eq!(client, Point::new(700.0, 275.0));
    assert_eq!(viewport.client_to_canvas(client), canvas);
}

// ============================================================================
// Containment and handles
// ============================================================================

#[test]
fn test_containment_includes_edges() {
    let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
    assert!(point_in_rect(Point::new(10.0, 10.0), &rect));
    assert!(point_in_rect(Point::new(30.0, 30.0), &rect));
    assert!(!point_in_rect(Point::new(30.01, 20.0), &rect));
    assert!(!point_in_rect(Point::new(20.0, 9.99), &rect));
}

#[test]
fn test_handle_squares_are_centered_on_corners() {
    let rect = Rect::new(100.0, 100.0, 60.0, 40.0);
    assert_eq!(handle_rect(&rect, HandleId::Nw), Rect::new(96.0, 96.0, 8.0, 8.0));
    assert_eq!(handle_rect(&rect, HandleId::Ne), Rect::new(156.0, 96.0, 8.0, 8.0));
    assert_eq!(handle_rect(&rect, HandleId::Sw), Rect::new(96.0, 136.0, 8.0, 8.0));
    assert_eq!(handle_rect(&rect, HandleId::Se), Rect::new(156.0, 136.0, 8.0, 8.0));
}

#[test]
fn test_handle_hit_extends_outside_layer() {
    let rect = Rect::new(100.0, 100.0, 60.0, 40.0);
    assert_eq!(handle_at(Point::new(97.0, 97.0), &rect), Some(HandleId::Nw));
    assert_eq!(handle_at(Point::new(163.0, 143.0), &rect), Some(HandleId::Se));
    assert_eq!(handle_at(Point::new(164.5, 143.0), &rect), None);
    assert_eq!(handle_at(Point::new(130.0, 120.0), &rect), None);
}

#[test]
fn test_overlapping_handles_resolve_in_priority_order() {
    // 4x4 layer: every handle square covers the center
    let rect = Rect::new(100.0, 100.0, 4.0, 4.0);
    assert_eq!(handle_at(Point::new(102.0, 102.0), &rect), Some(HandleId::Nw));
    // Only the east handles reach this far right
    assert_eq!(handle_at(Point::new(107.0, 102.0), &rect), Some(HandleId::Ne));
    assert_eq!(handle_at(Point::new(107.0, 107.0), &rect), Some(HandleId::Se));
}

// ============================================================================
// Resize math
// ============================================================================

#[test]
fn test_se_grows_right_and_down() {
    let start = Rect::new(100.0, 100.0, 100.0, 100.0);
    let rect = resize_rect(start, HandleId::Se, Point::new(25.0, 40.0), CANVAS);
    assert_eq!(rect, Rect::new(100.0, 100.0, 125.0, 140.0));
}

#[test]
fn test_north_west_collapse_keeps_opposite_corner() {
    let start = Rect::new(100.0, 100.0, 100.0, 100.0);
    let rect = resize_rect(start, HandleId::Nw, Point::new(500.0, 500.0), CANVAS);
    assert_eq!(rect, Rect::new(180.0, 180.0, 20.0, 20.0));
}

#[test]
fn test_ne_overshooting_top_stops_at_canvas_edge() {
    let start = Rect::new(100.0, 50.0, 100.0, 100.0);
    let rect = resize_rect(start, HandleId::Ne, Point::new(0.0, -200.0), CANVAS);
    assert_eq!(rect.top, 0.0);
    assert_eq!(rect.bottom(), start.bottom());
    assert_eq!(rect.left, start.left);
    assert_eq!(rect.width, start.width);
}

#[test]
fn test_sw_overshooting_bottom_stops_at_canvas_edge() {
    let start = Rect::new(100.0, 500.0, 100.0, 50.0);
    let rect = resize_rect(start, HandleId::Sw, Point::new(-10.0, 300.0), CANVAS);
    assert_eq!(rect, Rect::new(90.0, 500.0, 110.0, 100.0));
}

#[test]
fn test_zero_delta_is_identity() {
    let start = Rect::new(12.5, 40.0, 33.0, 21.0);
    for handle in HandleId::ALL {
        assert_eq!(resize_rect(start, handle, Point::new(0.0, 0.0), CANVAS), start);
    }
}
