//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod draws;

pub use draws::{guarded_routes as guarded_draw_routes, routes as draw_routes};
