//! Pointer move - layer dragging, corner resizing and idle hover.
//!
//! ## Performance Notes
//!
//! Pointer move fires for every mouse sample. Idle moves only recompute the
//! cursor hint and never re-render; drag and resize moves mutate one layer and
//! repaint once.
//!
//! Enable profiling with `cargo build --features profiling` to see timing.

use crate::constants::MIN_LAYER_SIZE;
use crate::editor::Editor;
use crate::geometry::{CanvasSize, HandleId, Point, Rect};
use crate::input::InteractionState;
use crate::observe::EditorEvent;
use crate::profile_scope;
use crate::scene::LayerId;

/// New rectangle for a corner resize.
///
/// Width and height follow the pointer delta on the grabbed corner and never
/// drop below [`MIN_LAYER_SIZE`]. West and north handles keep the opposite
/// edge fixed by shifting the origin. The result is then fitted into the
/// canvas, still keeping the opposite edge where it was.
pub fn resize_rect(start: Rect, handle: HandleId, delta: Point, canvas: CanvasSize) -> Rect {
    let grow_x = if handle.moves_left_edge() { -delta.x } else { delta.x };
    let grow_y = if handle.moves_top_edge() { -delta.y } else { delta.y };

    let mut width = (start.width + grow_x).max(MIN_LAYER_SIZE);
    let mut height = (start.height + grow_y).max(MIN_LAYER_SIZE);
    let mut left = if handle.moves_left_edge() {
        start.left + (start.width - width)
    } else {
        start.left
    };
    let mut top = if handle.moves_top_edge() {
        start.top + (start.height - height)
    } else {
        start.top
    };

    width = width.min(canvas.width - left);
    height = height.min(canvas.height - top);
    if left < 0.0 {
        width += left;
        left = 0.0;
    }
    if top < 0.0 {
        height += top;
        top = 0.0;
    }

    Rect::new(left, top, width, height)
}

impl Editor {
    /// Pointer moved to `client` (viewport coordinates).
    pub fn pointer_move(&mut self, client: Point) {
        profile_scope!("pointer_move");

        if !self.access_granted {
            return;
        }
        let point = self.viewport.client_to_canvas(client);
        let state = self.input_state;

        match state {
            InteractionState::Idle => {
                self.cursor = self.hover_hint(point);
            }
            InteractionState::Dragging { layer, grab_offset } => {
                profile_scope!("layer_drag");

                let origin = point - grab_offset;
                match self.scene.move_layer(layer, origin.x, origin.y) {
                    Some(rect) => {
                        self.emit_geometry(layer, rect, false);
                        self.render();
                    }
                    // Layer vanished mid-gesture (background reload, removal)
                    None => self.end_gesture(),
                }
            }
            InteractionState::Resizing {
                layer,
                handle,
                start_rect,
                start_pointer,
            } => {
                profile_scope!("layer_resize");

                let rect = resize_rect(start_rect, handle, point - start_pointer, self.scene.canvas());
                match self.scene.resize_layer(layer, rect) {
                    Some(applied) => {
                        self.emit_geometry(layer, applied, true);
                        self.render();
                    }
                    None => self.end_gesture(),
                }
            }
        }
    }

    fn emit_geometry(&self, layer: LayerId, rect: Rect, resized: bool) {
        let Some(asset_id) = self.scene.layer(layer).map(|l| l.asset_id().to_string()) else {
            return;
        };
        let event = if resized {
            EditorEvent::LayerResized { asset_id, rect }
        } else {
            EditorEvent::LayerMoved { asset_id, rect }
        };
        self.emit(event);
    }
}
