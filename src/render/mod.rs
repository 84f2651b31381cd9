//! Render pass.
//!
//! - `target` - owned RGBA surface and drawing primitives
//! - `canvas` - paints a [`Scene`](crate::scene::Scene) onto a target

mod canvas;
mod target;

pub use canvas::{Placeholder, RenderOptions, draw_selection, render_scene};
pub use target::RenderTarget;
