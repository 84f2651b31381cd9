//! Unit tests for rendering: stacking, decoration and agreement with hit-testing.

use crate::helpers::{BLACK, BLUE, GREEN, RED, TestSceneBuilder, layer_rect, solid_image};
use overlayboard::constants::{HANDLE_STROKE_COLOR, SELECTION_COLOR};
use overlayboard::geometry::{HandleId, Point, handle_at, handle_rect};
use overlayboard::render::Placeholder;

#[test]
fn test_later_layers_paint_over_earlier_ones() {
    let mut editor = TestSceneBuilder::new()
        .with_colored_layer("under", (100, 100), (100.0, 100.0), GREEN)
        .with_colored_layer("over", (100, 100), (150.0, 150.0), BLUE)
        .build();
    editor.clear_selection();

    let pixels = editor.pixels();
    assert_eq!(*pixels.get_pixel(120, 120), GREEN);
    assert_eq!(*pixels.get_pixel(175, 175), BLUE);
    assert_eq!(*pixels.get_pixel(50, 50), BLACK);
}

#[test]
fn test_background_is_stretched_to_canvas() {
    let editor = TestSceneBuilder::new()
        .with_canvas(300.0, 200.0)
        .with_background(solid_image(10, 40, RED))
        .build();

    assert_eq!(editor.pixels().dimensions(), (300, 200));
    assert_eq!(*editor.pixels().get_pixel(0, 0), RED);
    assert_eq!(*editor.pixels().get_pixel(299, 199), RED);
    assert_eq!(editor.target().caption(), None);
}

#[test]
fn test_placeholder_follows_access() {
    let mut editor = TestSceneBuilder::new().without_background().build();
    assert_eq!(
        editor.target().caption(),
        Some(Placeholder::AwaitingBackground.caption().as_str())
    );

    editor.set_access_granted(false);
    assert_eq!(editor.target().caption(), Some(Placeholder::Locked.caption().as_str()));
}

#[test]
fn test_selection_border_sits_outside_layer() {
    let editor = TestSceneBuilder::new().with_layer("cap", (100, 100), (100.0, 100.0)).build();
    let pixels = editor.pixels();

    // Left border covers x in 96.5..99.5, so pixel columns 96..=98
    assert_eq!(*pixels.get_pixel(95, 150), BLACK);
    assert_eq!(*pixels.get_pixel(96, 150), SELECTION_COLOR);
    assert_eq!(*pixels.get_pixel(98, 150), SELECTION_COLOR);
    assert_eq!(*pixels.get_pixel(99, 150), BLACK);
    assert_eq!(*pixels.get_pixel(100, 150), RED);
}

#[test]
fn test_handle_pixels_agree_with_hit_testing() {
    let editor = TestSceneBuilder::new().with_layer("cap", (100, 100), (100.0, 100.0)).build();
    let rect = layer_rect(&editor, "cap");
    let pixels = editor.pixels();

    for handle in HandleId::ALL {
        let square = handle_rect(&rect, handle);
        let (x0, y0, x1, y1) = editor.target().pixel_span(square).unwrap();
        assert_eq!((x1 - x0, y1 - y0), (8, 8));

        for y in y0..y1 {
            for x in x0..x1 {
                let color = *pixels.get_pixel(x, y);
                assert!(
                    color == SELECTION_COLOR || color == HANDLE_STROKE_COLOR,
                    "{:?} pixel ({}, {}) is {:?}",
                    handle,
                    x,
                    y,
                    color
                );
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                assert_eq!(handle_at(center, &rect), Some(handle));
            }
        }
    }

    // Handle outline color appears nowhere a click would miss a handle
    for (x, y, color) in pixels.enumerate_pixels() {
        if *color == HANDLE_STROKE_COLOR {
            let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            assert!(handle_at(center, &rect).is_some(), "stray handle pixel at ({}, {})", x, y);
        }
    }
}

#[test]
fn test_render_is_deterministic() {
    let build = || {
        TestSceneBuilder::new()
            .with_layer("a", (64, 32), (10.5, 20.25))
            .with_colored_layer("b", (33, 47), (300.0, 301.0), BLUE)
            .build()
    };
    let mut first = build();
    let second = build();
    assert_eq!(first.pixels(), second.pixels());

    first.render();
    assert_eq!(first.pixels(), second.pixels());
}
