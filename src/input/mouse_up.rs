//! Pointer up / leave - end the gesture.
//!
//! Layer geometry is already applied on every move, so finishing a gesture is
//! only a state reset; nothing in the scene changes here.

use crate::editor::Editor;
use crate::geometry::Point;
use crate::observe::EditorEvent;

impl Editor {
    /// Pointer released at `client`.
    pub fn pointer_up(&mut self, client: Point) {
        if !self.access_granted {
            return;
        }
        self.end_gesture();
        let point = self.viewport.client_to_canvas(client);
        self.cursor = self.hover_hint(point);
    }

    /// Pointer left the canvas.
    pub fn pointer_leave(&mut self) {
        if !self.access_granted {
            return;
        }
        self.end_gesture();
        self.cursor = crate::input::CursorHint::Default;
    }

    /// Discard the interaction session, if there is one.
    pub(crate) fn end_gesture(&mut self) {
        if self.input_state.is_idle() {
            return;
        }
        self.input_state.reset();
        self.emit(EditorEvent::GestureEnded);
    }
}
