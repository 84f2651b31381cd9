//! Pointer down - handle grab, layer selection and gesture start.
//!
//! Handles of the selected layer win over layer bodies, so a corner that
//! overlaps a higher layer still resizes. Bodies are hit-tested topmost
//! first through the scene's R-tree.

use crate::editor::Editor;
use crate::geometry::{Point, handle_at};
use crate::input::CursorHint;
use crate::observe::{EditorEvent, GestureKind};
use crate::profile_scope;

impl Editor {
    /// Pointer pressed at `client` (viewport coordinates).
    pub fn pointer_down(&mut self, client: Point) {
        profile_scope!("pointer_down");

        if !self.access_granted {
            return;
        }
        let point = self.viewport.client_to_canvas(client);

        // Resize takes priority when a handle of the current selection is hit
        if let Some(selected) = self.scene.selected_layer() {
            let (id, rect) = (selected.id(), selected.rect());
            if let Some(handle) = handle_at(point, &rect) {
                let asset_id = selected.asset_id().to_string();
                self.input_state.start_resizing(id, handle, rect, point);
                self.cursor = CursorHint::Resize(handle);
                self.emit(EditorEvent::GestureStarted {
                    kind: GestureKind::Resizing,
                    asset_id,
                    handle: Some(handle),
                });
                return;
            }
        }

        let before = self.scene.selected_id();
        let hit = {
            profile_scope!("hit_test_layers");
            self.scene.select_layer_at(point)
        };
        if self.scene.selected_id() != before {
            self.emit_selection();
        }

        match hit.and_then(|id| self.scene.layer(id)) {
            Some(layer) => {
                let (id, origin) = (layer.id(), layer.rect().origin());
                let asset_id = layer.asset_id().to_string();
                self.input_state.start_dragging(id, point - origin);
                self.cursor = CursorHint::Grabbing;
                self.emit(EditorEvent::GestureStarted {
                    kind: GestureKind::Dragging,
                    asset_id,
                    handle: None,
                });
            }
            None => {
                self.input_state.reset();
                self.cursor = CursorHint::Default;
            }
        }

        self.render();
    }
}
