//! Middleware layers for the storefront gate
//!
//! Provides the axum entry point for the route access gate. The decision
//! logic itself lives in [`crate::gate`]; this layer only extracts the
//! credential cookie, resolves the session, and turns the outcome into a
//! response.

pub mod gate;

pub use gate::RouteGate;
