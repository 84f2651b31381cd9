//! Coordinate conversion between the host viewport and the canvas.
//!
//! Pointer handlers receive client (viewport) positions. The canvas element
//! may be displayed at any size, so every handler goes through one converter
//! instead of repeating the scale formula.

use crate::geometry::{CanvasSize, Point, Rect, to_canvas_coordinates};

/// Where the canvas is displayed and how big it is logically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasViewport {
    bounding_box: Rect,
    logical: CanvasSize,
}

impl CanvasViewport {
    /// Displayed at its logical size at the viewport origin.
    pub fn new(logical: CanvasSize) -> Self {
        Self {
            bounding_box: logical.bounds(),
            logical,
        }
    }

    pub fn with_bounding_box(logical: CanvasSize, bounding_box: Rect) -> Self {
        Self { bounding_box, logical }
    }

    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    pub fn logical(&self) -> CanvasSize {
        self.logical
    }

    /// Convert a client position to canvas logical pixels.
    #[inline]
    pub fn client_to_canvas(&self, client: Point) -> Point {
        to_canvas_coordinates(client, self.bounding_box, self.logical)
    }

    /// Convert canvas logical pixels back to a client position.
    #[inline]
    pub fn canvas_to_client(&self, canvas: Point) -> Point {
        let scale_x = if self.logical.width > 0.0 {
            self.bounding_box.width / self.logical.width
        } else {
            1.0
        };
        let scale_y = if self.logical.height > 0.0 {
            self.bounding_box.height / self.logical.height
        } else {
            1.0
        };
        Point::new(
            canvas.x * scale_x + self.bounding_box.left,
            canvas.y * scale_y + self.bounding_box.top,
        )
    }
}
