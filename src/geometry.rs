//! Canvas geometry shared by rendering and input handling.
//!
//! Pointer mapping, rectangle containment and corner-handle placement all live
//! here so the renderer and the hit tester derive handle squares from the same
//! function instead of passing renderer output around.

use crate::constants::HANDLE_SIZE;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A position in either viewport or canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Inclusive containment, see [`point_in_rect`].
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point_in_rect(point, self)
    }

    /// Grow the rectangle by `amount` on every side.
    pub fn outset(&self, amount: f64) -> Rect {
        Rect::new(
            self.left - amount,
            self.top - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }
}

/// Logical pixel dimensions of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Integer pixel dimensions of a buffer covering the canvas.
    pub fn pixel_dimensions(&self) -> (u32, u32) {
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(
            crate::constants::DEFAULT_CANVAS_WIDTH,
            crate::constants::DEFAULT_CANVAS_HEIGHT,
        )
    }
}

/// Map a pointer position in viewport pixels onto the canvas' logical pixels.
///
/// The canvas element may be stretched by layout, so each axis gets its own
/// scale factor (`logical / displayed`). A collapsed bounding box falls back to
/// an unscaled translation rather than producing infinities.
pub fn to_canvas_coordinates(client: Point, bounding_box: Rect, logical: CanvasSize) -> Point {
    let scale_x = if bounding_box.width > 0.0 {
        logical.width / bounding_box.width
    } else {
        1.0
    };
    let scale_y = if bounding_box.height > 0.0 {
        logical.height / bounding_box.height
    } else {
        1.0
    };

    Point::new(
        (client.x - bounding_box.left) * scale_x,
        (client.y - bounding_box.top) * scale_y,
    )
}

/// Inclusive containment: points on any edge count as inside.
#[inline]
pub fn point_in_rect(point: Point, rect: &Rect) -> bool {
    point.x >= rect.left && point.x <= rect.right() && point.y >= rect.top && point.y <= rect.bottom()
}

/// One of the four corner resize affordances of the selected layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleId {
    Nw,
    Ne,
    Sw,
    Se,
}

impl HandleId {
    /// Hit-test priority when handles overlap on tiny layers.
    pub const ALL: [HandleId; 4] = [HandleId::Nw, HandleId::Ne, HandleId::Sw, HandleId::Se];

    /// The corner of `rect` this handle is centered on.
    pub fn corner(self, rect: &Rect) -> Point {
        match self {
            HandleId::Nw => Point::new(rect.left, rect.top),
            HandleId::Ne => Point::new(rect.right(), rect.top),
            HandleId::Sw => Point::new(rect.left, rect.bottom()),
            HandleId::Se => Point::new(rect.right(), rect.bottom()),
        }
    }

    /// CSS-style cursor name shown while hovering or dragging this handle.
    pub fn cursor_name(self) -> &'static str {
        match self {
            HandleId::Nw => "nw-resize",
            HandleId::Ne => "ne-resize",
            HandleId::Sw => "sw-resize",
            HandleId::Se => "se-resize",
        }
    }

    /// Whether dragging this handle moves the left edge.
    pub fn moves_left_edge(self) -> bool {
        matches!(self, HandleId::Nw | HandleId::Sw)
    }

    /// Whether dragging this handle moves the top edge.
    pub fn moves_top_edge(self) -> bool {
        matches!(self, HandleId::Nw | HandleId::Ne)
    }
}

/// The square of side [`HANDLE_SIZE`] centered on `handle`'s corner of `rect`.
pub fn handle_rect(rect: &Rect, handle: HandleId) -> Rect {
    let corner = handle.corner(rect);
    let half = HANDLE_SIZE / 2.0;
    Rect::new(corner.x - half, corner.y - half, HANDLE_SIZE, HANDLE_SIZE)
}

/// All four handle squares in hit-test priority order.
pub fn handle_rects(rect: &Rect) -> [(HandleId, Rect); 4] {
    HandleId::ALL.map(|handle| (handle, handle_rect(rect, handle)))
}

/// First handle (nw, ne, sw, se) whose square contains `point`.
pub fn handle_at(point: Point, rect: &Rect) -> Option<HandleId> {
    handle_rects(rect)
        .into_iter()
        .find(|(_, square)| point_in_rect(point, square))
        .map(|(handle, _)| handle)
}
