//! Scene rendering - paints background, layers and selection affordances.
//!
//! [`render_scene`] is a pure function of the scene and the options: the same
//! scene always yields the same pixels. Handle squares come from
//! [`handle_rects`], the function hit-testing also uses.

use super::target::RenderTarget;
use crate::constants::{HANDLE_STROKE_COLOR, PLACEHOLDER_GRADIENT, SELECTION_BORDER_WIDTH, SELECTION_COLOR, SELECTION_OUTSET};
use crate::geometry::{Rect, handle_rects};
use crate::profile_scope;
use crate::scene::Scene;

/// Knobs for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Draw the border and handles of the selected layer.
    pub decorate_selection: bool,
    /// Whether the external access signal is granted; picks the placeholder.
    pub access_granted: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            decorate_selection: true,
            access_granted: true,
        }
    }
}

/// What the placeholder tells the user when no background is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Locked,
    AwaitingBackground,
}

impl Placeholder {
    pub fn for_access(access_granted: bool) -> Self {
        if access_granted {
            Placeholder::AwaitingBackground
        } else {
            Placeholder::Locked
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Placeholder::Locked => "Access Restricted",
            Placeholder::AwaitingBackground => "Load Your Background",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Placeholder::Locked => "Hold the required token balance to start customizing",
            Placeholder::AwaitingBackground => "Enter an identifier to start customizing",
        }
    }

    pub fn caption(self) -> String {
        format!("{}\n{}", self.title(), self.subtitle())
    }
}

/// Repaint `target` from `scene`.
pub fn render_scene(scene: &Scene, target: &mut RenderTarget, options: RenderOptions) {
    profile_scope!("render_scene");

    target.clear();
    match scene.background() {
        None => {
            target.fill_linear_gradient(&PLACEHOLDER_GRADIENT);
            target.set_caption(Some(Placeholder::for_access(options.access_granted).caption()));
        }
        Some(background) => {
            target.set_caption(None);
            target.draw_background(background);
        }
    }

    let selected = if options.decorate_selection {
        scene.selected_id()
    } else {
        None
    };

    for layer in scene.layers() {
        target.draw_image(layer.image(), layer.rect());
        if selected == Some(layer.id()) {
            draw_selection(target, layer.rect());
        }
    }
}

/// Border just outside `rect` plus a handle square on each corner.
pub fn draw_selection(target: &mut RenderTarget, rect: Rect) {
    target.stroke_rect(rect.outset(SELECTION_OUTSET), SELECTION_BORDER_WIDTH, SELECTION_COLOR);

    for (_, square) in handle_rects(&rect) {
        target.fill_rect(square, SELECTION_COLOR);
        target.outline_rect(square, 1.0, HANDLE_STROKE_COLOR);
    }
}
