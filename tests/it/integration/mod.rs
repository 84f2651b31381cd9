//! Integration tests for overlayboard.
//!
//! These tests verify the interaction between multiple components
//! and test complete workflows end-to-end.

mod interaction_tests;
mod relay_tests;
