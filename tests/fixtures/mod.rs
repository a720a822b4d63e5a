//! Test fixtures for route-editor.
//!
//! Provides realistic test data including:
//! - Real Las Vegas locations (from OpenStreetMap) arranged into routes
//! - In-memory directions, lookup, persistence and renderer collaborators

#![allow(dead_code)]

pub mod las_vegas_locations;
pub mod mocks;

pub use las_vegas_locations::*;
pub use mocks::*;
