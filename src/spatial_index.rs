//! Spatial Index Module
//!
//! R-tree over layer rectangles. The scene asks it for the candidate layers
//! under a point and then resolves z-order itself, so the index never has to
//! know which layer is in front.

use crate::geometry::{Point, Rect, point_in_rect};
use crate::scene::LayerId;
use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// A layer's bounding box as stored in the tree.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub layer_id: LayerId,
    pub rect: Rect,
}

impl SpatialEntry {
    pub fn new(layer_id: LayerId, rect: Rect) -> Self {
        Self { layer_id, rect }
    }

    #[inline]
    pub fn contains_point(&self, point: Point) -> bool {
        point_in_rect(point, &self.rect)
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.rect.left, self.rect.top],
            [self.rect.right(), self.rect.bottom()],
        )
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.layer_id == other.layer_id
    }
}

/// Point queries over the scene's layers.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    entries: HashMap<LayerId, SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            entries: HashMap::new(),
        }
    }

    /// Insert or replace the entry for `layer_id`.
    pub fn upsert(&mut self, layer_id: LayerId, rect: Rect) {
        if let Some(old_entry) = self.entries.remove(&layer_id) {
            self.tree.remove(&old_entry);
        }

        let entry = SpatialEntry::new(layer_id, rect);
        self.tree.insert(entry);
        self.entries.insert(layer_id, entry);
    }

    pub fn remove(&mut self, layer_id: LayerId) -> bool {
        if let Some(entry) = self.entries.remove(&layer_id) {
            self.tree.remove(&entry);
            true
        } else {
            false
        }
    }

    /// Layers whose rectangle contains `point`, in no particular order.
    pub fn query_point(&self, point: Point) -> Vec<LayerId> {
        let point_envelope = AABB::from_point([point.x, point.y]);

        self.tree
            .locate_in_envelope_intersecting(&point_envelope)
            .filter(|entry| entry.contains_point(point))
            .map(|entry| entry.layer_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.entries.clear();
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
