//! Layered image-overlay canvas.
//!
//! A [`scene::Scene`] holds a background and z-ordered layers; an
//! [`editor::Editor`] drives it from pointer events and keeps an owned
//! [`render::RenderTarget`] in sync; a [`customizer::Customizer`] wires in
//! access gating, background resolution, async loading and export.

pub mod access;
pub mod background;
pub mod catalog;
pub mod constants;
pub mod customizer;
pub mod editor;
pub mod error;
pub mod export;
pub mod geometry;
pub mod input;
pub mod loader;
pub mod observe;
pub mod perf;
pub mod relay;
pub mod render;
pub mod resolver;
pub mod scene;
pub mod settings;
pub mod spatial_index;

pub use customizer::{Customizer, Exported, Notice};
pub use editor::Editor;
pub use error::{Error, ExportError, Result};
