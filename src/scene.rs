//! Scene model - background slot, z-ordered layers and the single selection.
//!
//! The scene exclusively owns its layers. Everything outside refers to a layer
//! by [`LayerId`], and every mutation goes through a method that re-clamps the
//! rectangle, so a layer never leaves the canvas or shrinks below
//! [`MIN_LAYER_SIZE`].
//!
//! ## Invariants
//!
//! - `0 <= left`, `0 <= top`, `left + width <= canvas width`, `top + height <= canvas height`
//! - `width >= MIN_LAYER_SIZE`, `height >= MIN_LAYER_SIZE`
//! - at most one layer per asset id
//! - `selected`, when set, names a layer in `layers`

use crate::constants::MIN_LAYER_SIZE;
use crate::geometry::{CanvasSize, Point, Rect, point_in_rect};
use crate::loader::DecodedImage;
use crate::spatial_index::SpatialIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stable handle for a layer within one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u64);

/// Initial position and scale for a newly added asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefaultPlacement {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl DefaultPlacement {
    pub const fn new(x: f64, y: f64, scale: f64) -> Self {
        Self { x, y, scale }
    }
}

/// One placed asset instance.
#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    asset_id: String,
    display_name: String,
    image: DecodedImage,
    rect: Rect,
}

impl Layer {
    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn left(&self) -> f64 {
        self.rect.left
    }

    pub fn top(&self) -> f64 {
        self.rect.top
    }

    pub fn width(&self) -> f64 {
        self.rect.width
    }

    pub fn height(&self) -> f64 {
        self.rect.height
    }
}

/// Result of [`Scene::add_layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddLayerOutcome {
    Added(LayerId),
    /// The asset already had a layer; nothing changed.
    AlreadyPresent(LayerId),
}

impl AddLayerOutcome {
    pub fn layer_id(&self) -> LayerId {
        match self {
            AddLayerOutcome::Added(id) | AddLayerOutcome::AlreadyPresent(id) => *id,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, AddLayerOutcome::Added(_))
    }
}

/// The editable composition.
pub struct Scene {
    canvas: CanvasSize,
    background: Option<DecodedImage>,
    layers: Vec<Layer>,
    selected: Option<LayerId>,
    index: SpatialIndex,
    next_id: u64,
    generation: u64,
}

impl Scene {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            background: None,
            layers: Vec::new(),
            selected: None,
            index: SpatialIndex::new(),
            next_id: 1,
            generation: 0,
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn background(&self) -> Option<&DecodedImage> {
        self.background.as_ref()
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    /// Layers bottom to top.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn layer_for_asset(&self, asset_id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.asset_id == asset_id)
    }

    pub fn contains_asset(&self, asset_id: &str) -> bool {
        self.layer_for_asset(asset_id).is_some()
    }

    pub fn selected_id(&self) -> Option<LayerId> {
        self.selected
    }

    pub fn selected_layer(&self) -> Option<&Layer> {
        self.selected.and_then(|id| self.layer(id))
    }

    /// Bumped every time the background is (re)loaded. Async results captured
    /// under an older generation must not be applied.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the background and start a fresh composition in one step.
    pub fn set_background(&mut self, image: DecodedImage) {
        self.background = Some(image);
        self.layers.clear();
        self.index.clear();
        self.selected = None;
        self.generation += 1;
    }

    /// Place `image` for `asset_id` on top of the stack and select it.
    ///
    /// A second call for the same asset leaves the scene untouched.
    pub fn add_layer(
        &mut self,
        asset_id: &str,
        display_name: &str,
        image: DecodedImage,
        placement: DefaultPlacement,
    ) -> AddLayerOutcome {
        if let Some(existing) = self.layer_for_asset(asset_id) {
            return AddLayerOutcome::AlreadyPresent(existing.id);
        }

        let (natural_width, natural_height) = image.natural_size();
        let width = (natural_width * placement.scale).max(MIN_LAYER_SIZE).min(self.canvas.width);
        let height = (natural_height * placement.scale).max(MIN_LAYER_SIZE).min(self.canvas.height);
        let rect = Rect::new(
            placement.x.min(self.canvas.width - width).max(0.0),
            placement.y.min(self.canvas.height - height).max(0.0),
            width,
            height,
        );

        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.push(Layer {
            id,
            asset_id: asset_id.to_string(),
            display_name: display_name.to_string(),
            image,
            rect,
        });
        self.index.upsert(id, rect);
        self.selected = Some(id);
        AddLayerOutcome::Added(id)
    }

    /// Remove the layer for `asset_id`, clearing the selection if it pointed there.
    pub fn remove_layer(&mut self, asset_id: &str) -> Option<Layer> {
        let position = self.layers.iter().position(|layer| layer.asset_id == asset_id)?;
        let removed = self.layers.remove(position);
        self.index.remove(removed.id);
        if self.selected == Some(removed.id) {
            self.selected = None;
        }
        Some(removed)
    }

    /// Topmost layer containing `point`, without touching the selection.
    pub fn layer_at(&self, point: Point) -> Option<LayerId> {
        let candidates: HashSet<LayerId> = self.index.query_point(point).into_iter().collect();
        if candidates.is_empty() {
            return None;
        }

        // Front to back so overlapping layers resolve to the visible one
        self.layers
            .iter()
            .rev()
            .filter(|layer| candidates.contains(&layer.id))
            .find(|layer| point_in_rect(point, &layer.rect))
            .map(|layer| layer.id)
    }

    /// Select the topmost layer under `point`, or nothing on a miss.
    pub fn select_layer_at(&mut self, point: Point) -> Option<LayerId> {
        self.selected = self.layer_at(point);
        self.selected
    }

    /// Select `id`; unknown ids clear the selection instead of dangling.
    pub fn set_selected(&mut self, id: Option<LayerId>) {
        self.selected = id.filter(|id| self.layer(*id).is_some());
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Move a layer so its origin is as close to `(new_left, new_top)` as the
    /// canvas allows. Returns the applied rectangle.
    pub fn move_layer(&mut self, id: LayerId, new_left: f64, new_top: f64) -> Option<Rect> {
        let canvas = self.canvas;
        let layer = self.layers.iter_mut().find(|layer| layer.id == id)?;

        layer.rect.left = new_left.min(canvas.width - layer.rect.width).max(0.0);
        layer.rect.top = new_top.min(canvas.height - layer.rect.height).max(0.0);
        let rect = layer.rect;
        self.index.upsert(id, rect);
        Some(rect)
    }

    /// Give a layer a new rectangle, clamped to the minimum size and the canvas.
    pub fn resize_layer(&mut self, id: LayerId, new_rect: Rect) -> Option<Rect> {
        let rect = self.clamp_rect(new_rect);
        let layer = self.layers.iter_mut().find(|layer| layer.id == id)?;

        layer.rect = rect;
        self.index.upsert(id, rect);
        Some(rect)
    }

    /// Drop every layer and the selection; the background stays.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.index.clear();
        self.selected = None;
    }

    /// Source of the first drawn raster that forbids pixel readback.
    pub fn readback_blocker(&self) -> Option<&str> {
        self.background
            .iter()
            .chain(self.layers.iter().map(|layer| &layer.image))
            .find(|image| !image.is_readable())
            .map(|image| image.source())
    }

    fn clamp_rect(&self, rect: Rect) -> Rect {
        let left = rect.left.min(self.canvas.width - MIN_LAYER_SIZE).max(0.0);
        let top = rect.top.min(self.canvas.height - MIN_LAYER_SIZE).max(0.0);
        Rect::new(
            left,
            top,
            rect.width.max(MIN_LAYER_SIZE).min(self.canvas.width - left),
            rect.height.max(MIN_LAYER_SIZE).min(self.canvas.height - top),
        )
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(CanvasSize::default())
    }
}
