//! Structured observability hook.
//!
//! The editor reports each state transition as an [`EditorEvent`] to an
//! injected [`SceneObserver`] rather than printing internal state. Hosts pick
//! the sink: tracing, an in-memory recorder, or nothing.

use crate::geometry::{HandleId, Rect};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// What kind of gesture an interaction session is performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Dragging,
    Resizing,
}

/// One state transition in the editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    BackgroundSet {
        generation: u64,
        width: u32,
        height: u32,
    },
    LayerAdded {
        asset_id: String,
        rect: Rect,
    },
    LayerAlreadyPresent {
        asset_id: String,
    },
    LayerRemoved {
        asset_id: String,
    },
    SelectionChanged {
        asset_id: Option<String>,
    },
    GestureStarted {
        kind: GestureKind,
        asset_id: String,
        handle: Option<HandleId>,
    },
    LayerMoved {
        asset_id: String,
        rect: Rect,
    },
    LayerResized {
        asset_id: String,
        rect: Rect,
    },
    GestureEnded,
    SceneCleared,
    StaleLoadDiscarded {
        task: String,
    },
    Exported {
        bytes: usize,
    },
}

/// Receives editor events. Called on the thread that owns the scene.
pub trait SceneObserver: Send + Sync {
    fn emit(&self, event: &EditorEvent);
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SceneObserver for TracingObserver {
    fn emit(&self, event: &EditorEvent) {
        match event {
            EditorEvent::LayerMoved { asset_id, rect } | EditorEvent::LayerResized { asset_id, rect } => {
                tracing::trace!(
                    asset = %asset_id,
                    left = rect.left,
                    top = rect.top,
                    width = rect.width,
                    height = rect.height,
                    "Layer geometry"
                );
            }
            EditorEvent::StaleLoadDiscarded { task } => {
                tracing::debug!(task = %task, "Discarded result for a superseded scene");
            }
            other => tracing::debug!(event = ?other, "Editor event"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SceneObserver for NullObserver {
    fn emit(&self, _event: &EditorEvent) {}
}

/// Keeps every event in memory; clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<EditorEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.lock().clone()
    }

    pub fn take(&self) -> Vec<EditorEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl SceneObserver for RecordingObserver {
    fn emit(&self, event: &EditorEvent) {
        self.events.lock().push(event.clone());
    }
}
