//! Error types
//!
//! Request-time failures never surface from the gate: the middleware absorbs
//! session-service errors into an allow/redirect outcome per the configured
//! failure mode. [`GateError`] only covers construction-time problems.

use thiserror::Error;

/// Errors constructing the gate or its session client.
#[derive(Debug, Error)]
pub enum GateError {
    /// Configuration error
    #[error("gate configuration error: {0}")]
    Config(String),

    /// The HTTP client for the Session Service could not be built
    #[error("failed to build session client: {0}")]
    Client(#[from] reqwest::Error),
}
