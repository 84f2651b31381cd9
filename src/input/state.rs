//! Interaction state machine - one explicit state per pointer gesture.
//!
//! A single enum replaces separate "dragging"/"resizing" flags, so a layer can
//! never be dragged and resized at once and every gesture carries exactly the
//! data it needs.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Resizing   (pointer down on a handle of the selected layer)
//! Idle -> Dragging   (pointer down on any layer body)
//! Idle -> Idle       (pointer down on empty canvas - clears the selection)
//!
//! Any -> Idle        (pointer up or pointer leave)
//! ```

use crate::geometry::{HandleId, Point, Rect};
use crate::observe::GestureKind;
use crate::scene::LayerId;

/// The gesture in progress, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    /// No active gesture
    #[default]
    Idle,

    /// Moving a layer with the pointer
    Dragging {
        layer: LayerId,
        /// Pointer position minus the layer origin at gesture start
        grab_offset: Point,
    },

    /// Resizing a layer from one corner
    Resizing {
        layer: LayerId,
        handle: HandleId,
        /// Layer rectangle at gesture start
        start_rect: Rect,
        /// Pointer position at gesture start
        start_pointer: Point,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, Self::Resizing { .. })
    }

    /// Layer being manipulated, if a gesture is active.
    pub fn target(&self) -> Option<LayerId> {
        match self {
            Self::Idle => None,
            Self::Dragging { layer, .. } | Self::Resizing { layer, .. } => Some(*layer),
        }
    }

    /// Corner being dragged, if resizing.
    pub fn handle(&self) -> Option<HandleId> {
        match self {
            Self::Resizing { handle, .. } => Some(*handle),
            _ => None,
        }
    }

    pub fn gesture_kind(&self) -> Option<GestureKind> {
        match self {
            Self::Idle => None,
            Self::Dragging { .. } => Some(GestureKind::Dragging),
            Self::Resizing { .. } => Some(GestureKind::Resizing),
        }
    }

    /// Reset to Idle
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }

    pub fn start_dragging(&mut self, layer: LayerId, grab_offset: Point) {
        *self = Self::Dragging { layer, grab_offset };
    }

    pub fn start_resizing(&mut self, layer: LayerId, handle: HandleId, start_rect: Rect, start_pointer: Point) {
        *self = Self::Resizing {
            layer,
            handle,
            start_rect,
            start_pointer,
        };
    }
}
