//! Single test binary entry point.
//!
//! This consolidates all tests into a single binary following matklad's best practices,
//! so the crate links once for the whole suite.
//!
//! Structure:
//! - helpers: builders, fixtures and fake fetchers
//! - integration: pointer scenarios, async loading and the relay over real sockets
//! - unit: single-component tests

mod integration;
mod unit;
