//! Pointer input handling for the canvas.
//!
//! This module implements the direct-manipulation gestures: selecting a layer,
//! dragging it and resizing it from a corner handle.
//!
//! ## Architecture
//!
//! The input system uses an explicit state machine (`InteractionState`) to
//! track the current gesture. Handlers are `impl Editor` blocks so each one
//! mutates the scene and re-renders on the same call.
//!
//! ## Modules
//!
//! - `state` - Interaction state enum and helper methods
//! - `coords` - Client to canvas coordinate conversion
//! - `mouse_down` - Pointer down (handle grab, selection, gesture start)
//! - `drag` - Pointer move (drag, resize, hover) and the resize math
//! - `mouse_up` - Pointer up / leave (end gesture)
//! - `hover` - Cursor hints

mod coords;
mod drag;
mod hover;
mod mouse_down;
mod mouse_up;
mod state;

pub use coords::CanvasViewport;
pub use drag::resize_rect;
pub use hover::CursorHint;
pub use state::InteractionState;
