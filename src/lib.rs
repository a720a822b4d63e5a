//! route-editor core
//!
//! Stop ordering with pickup-before-delivery rules, incremental path
//! stitching between adjacent stops, and polyline simplification for
//! delivery-route editing.

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod haversine;
pub mod order_service;
pub mod osrm;
pub mod polyline;
pub mod precedence;
pub mod segment;
pub mod session;
pub mod simplify;
pub mod stop;
pub mod traits;
