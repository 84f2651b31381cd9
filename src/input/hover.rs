//! Hover cursor hints while no gesture is active.

use crate::editor::Editor;
use crate::geometry::{HandleId, Point, handle_at};
use serde::Serialize;

/// Cursor the host should show over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorHint {
    #[default]
    Default,
    /// Over a layer body
    Grab,
    /// Dragging a layer
    Grabbing,
    /// Over, or dragging, a resize handle
    Resize(HandleId),
}

impl CursorHint {
    /// CSS cursor name.
    pub fn css_name(self) -> &'static str {
        match self {
            CursorHint::Default => "default",
            CursorHint::Grab => "grab",
            CursorHint::Grabbing => "grabbing",
            CursorHint::Resize(handle) => handle.cursor_name(),
        }
    }
}

impl Editor {
    /// Cursor for an idle pointer at canvas position `point`.
    pub fn hover_hint(&self, point: Point) -> CursorHint {
        if let Some(handle) = self
            .scene
            .selected_layer()
            .and_then(|layer| handle_at(point, &layer.rect()))
        {
            return CursorHint::Resize(handle);
        }
        if self.scene.layer_at(point).is_some() {
            CursorHint::Grab
        } else {
            CursorHint::Default
        }
    }
}
