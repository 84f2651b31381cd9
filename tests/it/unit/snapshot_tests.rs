//! Snapshot tests using the insta crate.
//!
//! Events and notices are what hosts consume, so their JSON shape is pinned
//! here with inline snapshots.
//!
//! To update snapshots after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```
//!
//! Or review changes interactively:
//! ```sh
//! cargo insta review
//! ```

use crate::helpers::TestSceneBuilder;
use overlayboard::Notice;
use overlayboard::geometry::{HandleId, Point};
use overlayboard::input::CursorHint;
use overlayboard::observe::{EditorEvent, GestureKind};
use overlayboard::render::Placeholder;

// ============================================================================
// EditorEvent Serialization Tests
// ============================================================================

#[test]
fn test_gesture_started_snapshot() {
    let event = EditorEvent::GestureStarted {
        kind: GestureKind::Resizing,
        asset_id: "gugo-cap".to_string(),
        handle: Some(HandleId::Se),
    };
    insta::assert_json_snapshot!(event, @r#"
    {
      "event": "gesture_started",
      "kind": "resizing",
      "asset_id": "gugo-cap",
      "handle": "se"
    }
    "#);
}

#[test]
fn test_unit_event_snapshot() {
    insta::assert_json_snapshot!(EditorEvent::GestureEnded, @r#"
    {
      "event": "gesture_ended"
    }
    "#);
}

#[test]
fn test_background_set_snapshot() {
    let event = EditorEvent::BackgroundSet {
        generation: 3,
        width: 1024,
        height: 768,
    };
    insta::assert_json_snapshot!(event, @r#"
    {
      "event": "background_set",
      "generation": 3,
      "width": 1024,
      "height": 768
    }
    "#);
}

#[test]
fn test_click_on_empty_canvas_events_snapshot() {
    let (mut editor, events) = TestSceneBuilder::new()
        .with_layer("gugo-cap", (100, 100), (100.0, 100.0))
        .build_recorded();

    editor.pointer_down(Point::new(400.0, 400.0));
    editor.pointer_up(Point::new(400.0, 400.0));

    insta::assert_json_snapshot!(events.events(), @r#"
    [
      {
        "event": "selection_changed",
        "asset_id": null
      }
    ]
    "#);
}

#[test]
fn test_drag_gesture_bookends_snapshot() {
    let (mut editor, events) = TestSceneBuilder::new()
        .with_layer("gugo-cap", (100, 100), (100.0, 100.0))
        .build_recorded();

    editor.pointer_down(Point::new(150.0, 150.0));
    editor.pointer_up(Point::new(150.0, 150.0));

    insta::assert_json_snapshot!(events.events(), @r#"
    [
      {
        "event": "gesture_started",
        "kind": "dragging",
        "asset_id": "gugo-cap",
        "handle": null
      },
      {
        "event": "gesture_ended"
      }
    ]
    "#);
}

// ============================================================================
// Notice Serialization Tests
// ============================================================================

#[test]
fn test_notice_snapshots() {
    let notices = vec![
        Notice::BackgroundLoaded {
            identifier: Some("1234".to_string()),
            display_name: Some("Bear #1234".to_string()),
        },
        Notice::LayerAdded {
            asset_id: "gugo-cap".to_string(),
        },
        Notice::AlreadyPresent {
            asset_id: "gugo-cap".to_string(),
        },
        Notice::Failed {
            message: "Not found: 9999".to_string(),
        },
    ];
    insta::assert_json_snapshot!(notices, @r#"
    [
      {
        "notice": "background_loaded",
        "identifier": "1234",
        "display_name": "Bear #1234"
      },
      {
        "notice": "layer_added",
        "asset_id": "gugo-cap"
      },
      {
        "notice": "already_present",
        "asset_id": "gugo-cap"
      },
      {
        "notice": "failed",
        "message": "Not found: 9999"
      }
    ]
    "#);
}

// ============================================================================
// Cursor and placeholder text
// ============================================================================

#[test]
fn test_cursor_hint_snapshot() {
    let hints = vec![
        CursorHint::Default,
        CursorHint::Grab,
        CursorHint::Grabbing,
        CursorHint::Resize(HandleId::Nw),
    ];
    insta::assert_json_snapshot!(hints, @r#"
    [
      "default",
      "grab",
      "grabbing",
      {
        "resize": "nw"
      }
    ]
    "#);
}

#[test]
fn test_placeholder_caption_snapshot() {
    insta::assert_snapshot!(Placeholder::Locked.caption(), @r"
    Access Restricted
    Hold the required token balance to start customizing
    ");
    insta::assert_snapshot!(Placeholder::AwaitingBackground.caption(), @r"
    Load Your Background
    Enter an identifier to start customizing
    ");
}
