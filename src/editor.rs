//! Editor - the scene, its render target and the gesture in progress.
//!
//! The editor is the single owner of mutable canvas state. Pointer handlers
//! live in [`crate::input`] as further `impl Editor` blocks; this file holds
//! construction, the scene-level mutations and the shared render/emit helpers.
//! Every mutation re-renders before returning, so the pixels never lag the
//! model.

use crate::geometry::{CanvasSize, Rect};
use crate::input::{CanvasViewport, CursorHint, InteractionState};
use crate::loader::DecodedImage;
use crate::observe::{EditorEvent, NullObserver, SceneObserver};
use crate::render::{RenderOptions, RenderTarget, render_scene};
use crate::scene::{AddLayerOutcome, DefaultPlacement, LayerId, Scene};
use image::RgbaImage;
use std::sync::Arc;
use tracing::debug;

pub struct Editor {
    pub(crate) scene: Scene,
    pub(crate) target: RenderTarget,
    pub(crate) input_state: InteractionState,
    pub(crate) viewport: CanvasViewport,
    pub(crate) cursor: CursorHint,
    pub(crate) access_granted: bool,
    observer: Arc<dyn SceneObserver>,
}

impl Editor {
    pub fn new(canvas: CanvasSize, observer: Arc<dyn SceneObserver>) -> Self {
        let mut editor = Self {
            scene: Scene::new(canvas),
            target: RenderTarget::new(canvas),
            input_state: InteractionState::Idle,
            viewport: CanvasViewport::new(canvas),
            cursor: CursorHint::Default,
            access_granted: true,
            observer,
        };
        editor.render();
        editor
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn pixels(&self) -> &RgbaImage {
        self.target.pixels()
    }

    pub fn input_state(&self) -> &InteractionState {
        &self.input_state
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    pub fn viewport(&self) -> CanvasViewport {
        self.viewport
    }

    /// Where the canvas is currently displayed in client coordinates.
    pub fn set_bounding_box(&mut self, bounding_box: Rect) {
        self.viewport = CanvasViewport::with_bounding_box(self.scene.canvas(), bounding_box);
    }

    pub fn access_granted(&self) -> bool {
        self.access_granted
    }

    /// Apply the external access signal. Revoking access ends any gesture.
    pub fn set_access_granted(&mut self, granted: bool) {
        if self.access_granted == granted {
            return;
        }
        self.access_granted = granted;
        if !granted {
            self.end_gesture();
        }
        self.render();
    }

    /// Replace the background, starting a fresh composition.
    pub fn set_background(&mut self, image: DecodedImage) {
        let (width, height) = (image.natural_width(), image.natural_height());
        let selected = self.scene.selected_id();
        self.input_state.reset();
        self.cursor = CursorHint::Default;
        self.scene.set_background(image);
        self.emit(EditorEvent::BackgroundSet {
            generation: self.scene.generation(),
            width,
            height,
        });
        self.emit_selection_if_changed(selected);
        self.render();
    }

    pub fn add_layer(
        &mut self,
        asset_id: &str,
        display_name: &str,
        image: DecodedImage,
        placement: DefaultPlacement,
    ) -> AddLayerOutcome {
        let outcome = self.scene.add_layer(asset_id, display_name, image, placement);
        match outcome {
            AddLayerOutcome::Added(id) => {
                if let Some(layer) = self.scene.layer(id) {
                    self.emit(EditorEvent::LayerAdded {
                        asset_id: asset_id.to_string(),
                        rect: layer.rect(),
                    });
                }
                self.emit_selection();
                self.render();
            }
            AddLayerOutcome::AlreadyPresent(_) => {
                debug!(asset = %asset_id, "Asset already on canvas");
                self.emit(EditorEvent::LayerAlreadyPresent {
                    asset_id: asset_id.to_string(),
                });
            }
        }
        outcome
    }

    /// Remove the layer for `asset_id`. Returns false when it was not present.
    pub fn remove_layer(&mut self, asset_id: &str) -> bool {
        let selected = self.scene.selected_id();
        let Some(removed) = self.scene.remove_layer(asset_id) else {
            return false;
        };
        if self.input_state.target() == Some(removed.id()) {
            self.input_state.reset();
        }
        self.emit(EditorEvent::LayerRemoved {
            asset_id: asset_id.to_string(),
        });
        self.emit_selection_if_changed(selected);
        self.render();
        true
    }

    /// Drop every layer; the background stays.
    pub fn clear(&mut self) {
        let selected = self.scene.selected_id();
        self.input_state.reset();
        self.scene.clear();
        self.emit(EditorEvent::SceneCleared);
        self.emit_selection_if_changed(selected);
        self.render();
    }

    pub fn clear_selection(&mut self) {
        if self.scene.selected_id().is_none() {
            return;
        }
        self.scene.clear_selection();
        self.emit_selection();
        self.render();
    }

    /// Select a layer directly, e.g. from a layer list.
    pub fn select(&mut self, id: Option<LayerId>) {
        let before = self.scene.selected_id();
        self.scene.set_selected(id);
        if self.scene.selected_id() != before {
            self.emit_selection();
            self.render();
        }
    }

    /// Repaint the target from the scene.
    pub fn render(&mut self) {
        let options = RenderOptions {
            decorate_selection: true,
            access_granted: self.access_granted,
        };
        render_scene(&self.scene, &mut self.target, options);
    }

    pub(crate) fn emit(&self, event: EditorEvent) {
        self.observer.emit(&event);
    }

    pub(crate) fn emit_selection(&self) {
        let asset_id = self.scene.selected_layer().map(|layer| layer.asset_id().to_string());
        self.emit(EditorEvent::SelectionChanged { asset_id });
    }

    /// Report the selection when a mutation moved it away from `before`.
    fn emit_selection_if_changed(&self, before: Option<LayerId>) {
        if self.scene.selected_id() != before {
            self.emit_selection();
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(CanvasSize::default(), Arc::new(NullObserver))
    }
}
