//! Pointer Interaction Integration Tests
//!
//! Full down/move/up sequences through the editor, in client coordinates.

use crate::helpers::{RED, TestSceneBuilder, count_events, layer_id, layer_rect, solid_image};
use overlayboard::geometry::{HandleId, Point, Rect};
use overlayboard::input::{CursorHint, InteractionState};
use overlayboard::observe::{EditorEvent, GestureKind};
use overlayboard::scene::DefaultPlacement;

#[test]
fn test_add_then_drag_to_corner() {
    let (mut editor, events) = TestSceneBuilder::new().build_recorded();
    editor.add_layer("gugo-cap", "$GUGO Cap", solid_image(200, 200, RED), DefaultPlacement::new(150.0, 30.0, 0.3));
    let rect = layer_rect(&editor, "gugo-cap");
    assert_eq!((rect.left, rect.top), (150.0, 30.0));

    // Grab 10px into the layer and pull well past the top-left corner
    editor.pointer_down(Point::new(160.0, 40.0));
    assert!(editor.input_state().is_dragging());
    assert_eq!(editor.cursor(), CursorHint::Grabbing);

    editor.pointer_move(Point::new(110.0, 40.0));
    assert_eq!(layer_rect(&editor, "gugo-cap").origin(), Point::new(100.0, 30.0));

    editor.pointer_move(Point::new(-40.0, -10.0));
    let rect = layer_rect(&editor, "gugo-cap");
    assert_eq!(rect.origin(), Point::new(0.0, 0.0));
    assert!((rect.width - 60.0).abs() < 1e-9);

    editor.pointer_up(Point::new(-40.0, -10.0));
    assert!(editor.input_state().is_idle());

    let events = events.events();
    assert_eq!(count_events(&events, |e| matches!(e, EditorEvent::LayerMoved { .. })), 2);
    assert_eq!(events.last(), Some(&EditorEvent::GestureEnded));
}

#[test]
fn test_drag_past_origin_clamps_to_zero() {
    let mut editor = TestSceneBuilder::new().with_layer("cap", (100, 100), (0.0, 0.0)).build();

    editor.pointer_down(Point::new(50.0, 50.0));
    editor.pointer_move(Point::new(0.0, 0.0));
    assert_eq!(layer_rect(&editor, "cap"), Rect::new(0.0, 0.0, 100.0, 100.0));
}

#[test]
fn test_se_resize_clamps_to_minimum_height() {
    let mut editor = TestSceneBuilder::new().with_layer("cap", (100, 100), (100.0, 100.0)).build();

    editor.pointer_down(Point::new(200.0, 200.0));
    assert_eq!(editor.input_state().handle(), Some(HandleId::Se));
    assert_eq!(editor.cursor(), CursorHint::Resize(HandleId::Se));

    editor.pointer_move(Point::new(210.0, -300.0));
    assert_eq!(layer_rect(&editor, "cap"), Rect::new(100.0, 100.0, 110.0, 20.0));

    // Deltas are measured from the gesture start, not the previous move
    editor.pointer_move(Point::new(220.0, 230.0));
    assert_eq!(layer_rect(&editor, "cap"), Rect::new(100.0, 100.0, 120.0, 130.0));

    editor.pointer_up(Point::new(220.0, 230.0));
    assert!(editor.input_state().is_idle());
}

#[test]
fn test_nw_resize_through_stretched_viewport() {
    // Canvas shown at half size, offset inside the page
    let mut editor = TestSceneBuilder::new()
        .with_layer("cap", (100, 100), (100.0, 100.0))
        .with_bounding_box(Rect::new(20.0, 40.0, 300.0, 300.0))
        .build();

    // Canvas (100, 100) is client (70, 90)
    editor.pointer_down(Point::new(70.0, 90.0));
    assert_eq!(editor.input_state().handle(), Some(HandleId::Nw));

    // 10 client px = 20 canvas px
    editor.pointer_move(Point::new(80.0, 80.0));
    assert_eq!(layer_rect(&editor, "cap"), Rect::new(120.0, 80.0, 80.0, 120.0));
}

#[test]
fn test_handle_beats_higher_layer_body() {
    let mut editor = TestSceneBuilder::new()
        .with_layer("under", (100, 100), (100.0, 100.0))
        .with_layer("over", (100, 100), (195.0, 195.0))
        .build();
    // The lower layer's se corner lies under "over"
    let under = layer_id(&editor, "under");
    editor.select(Some(under));

    editor.pointer_down(Point::new(199.0, 199.0));
    assert_eq!(
        *editor.input_state(),
        InteractionState::Resizing {
            layer: under,
            handle: HandleId::Se,
            start_rect: Rect::new(100.0, 100.0, 100.0, 100.0),
            start_pointer: Point::new(199.0, 199.0),
        }
    );
}

#[test]
fn test_handles_only_for_selected_layer() {
    let mut editor = TestSceneBuilder::new()
        .with_layer("a", (100, 100), (100.0, 100.0))
        .with_layer("b", (100, 100), (300.0, 300.0))
        .build();

    // a's se handle area outside its body, while b is selected
    editor.pointer_down(Point::new(203.0, 203.0));
    assert!(editor.input_state().is_idle());
    assert_eq!(editor.scene().selected_id(), None);
}

#[test]
fn test_pointer_leave_ends_gesture_without_moving() {
    let (mut editor, events) = TestSceneBuilder::new()
        .with_layer("cap", (100, 100), (100.0, 100.0))
        .build_recorded();

    editor.pointer_down(Point::new(150.0, 150.0));
    editor.pointer_leave();
    assert!(editor.input_state().is_idle());
    assert_eq!(editor.cursor(), CursorHint::Default);

    // Moves after leaving only update the hover cursor
    editor.pointer_move(Point::new(400.0, 400.0));
    assert_eq!(layer_rect(&editor, "cap"), Rect::new(100.0, 100.0, 100.0, 100.0));
    assert_eq!(
        events.events(),
        vec![
            EditorEvent::GestureStarted {
                kind: GestureKind::Dragging,
                asset_id: "cap".to_string(),
                handle: None,
            },
            EditorEvent::GestureEnded,
        ]
    );
}

#[test]
fn test_hover_cursor_tracks_targets() {
    let mut editor = TestSceneBuilder::new().with_layer("cap", (100, 100), (100.0, 100.0)).build();

    editor.pointer_move(Point::new(150.0, 150.0));
    assert_eq!(editor.cursor(), CursorHint::Grab);
    editor.pointer_move(Point::new(101.0, 199.0));
    assert_eq!(editor.cursor(), CursorHint::Resize(HandleId::Sw));
    assert_eq!(editor.cursor().css_name(), "sw-resize");
    editor.pointer_move(Point::new(500.0, 500.0));
    assert_eq!(editor.cursor(), CursorHint::Default);
}

#[test]
fn test_denied_access_ignores_pointer_events() {
    let (mut editor, events) = TestSceneBuilder::new()
        .with_layer("cap", (100, 100), (100.0, 100.0))
        .build_recorded();
    editor.set_access_granted(false);
    let before = editor.pixels().clone();

    editor.pointer_down(Point::new(150.0, 150.0));
    editor.pointer_move(Point::new(300.0, 300.0));
    editor.pointer_up(Point::new(300.0, 300.0));

    assert!(editor.input_state().is_idle());
    assert_eq!(layer_rect(&editor, "cap"), Rect::new(100.0, 100.0, 100.0, 100.0));
    assert_eq!(editor.pixels(), &before);
    assert!(events.is_empty());
}

#[test]
fn test_revoking_access_mid_gesture_ends_it() {
    let (mut editor, events) = TestSceneBuilder::new()
        .with_layer("cap", (100, 100), (100.0, 100.0))
        .build_recorded();

    editor.pointer_down(Point::new(150.0, 150.0));
    editor.set_access_granted(false);
    assert!(editor.input_state().is_idle());
    assert_eq!(events.events().last(), Some(&EditorEvent::GestureEnded));

    editor.set_access_granted(true);
    editor.pointer_move(Point::new(300.0, 300.0));
    assert_eq!(layer_rect(&editor, "cap"), Rect::new(100.0, 100.0, 100.0, 100.0));
}

#[test]
fn test_removing_dragged_layer_ends_gesture() {
    let mut editor = TestSceneBuilder::new()
        .with_layer("cap", (100, 100), (100.0, 100.0))
        .with_layer("chain", (50, 50), (400.0, 400.0))
        .build();

    editor.pointer_down(Point::new(420.0, 420.0));
    assert!(editor.remove_layer("chain"));
    editor.pointer_move(Point::new(10.0, 10.0));

    assert!(editor.input_state().is_idle());
    assert_eq!(layer_rect(&editor, "cap"), Rect::new(100.0, 100.0, 100.0, 100.0));
}
