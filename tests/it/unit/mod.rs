//! Unit tests for overlayboard.

mod geometry_tests;
mod render_tests;
mod snapshot_tests;
