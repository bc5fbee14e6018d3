//! Role-based route access gate for the pharmacy storefront
//!
//! This crate consolidates the storefront's route gatekeeping into a single
//! axum middleware layer. Every navigation to a gated path is resolved to
//! exactly one outcome:
//!
//! - **Allow** — the request passes through unmodified
//! - **Redirect** — the caller is sent to the login page or to the home
//!   dashboard for their role
//!
//! The session itself is owned by an external Session Service; this crate
//! forwards the caller's credential cookie to that service, interprets the
//! response, and applies a static path-prefix → role table. All of the
//! branching lives in one pure function, [`gate::decide`], so the decision
//! table is unit-testable without any HTTP transport.
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use pharmacy_gate::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), pharmacy_gate::GateError> {
//! let config = GateConfig::new("https://auth.internal/api/session");
//! let sessions = Arc::new(HttpSessionService::new(&config)?);
//! let gate = RouteGate::new(RouteTable::storefront(), config, sessions);
//!
//! let app: Router = Router::new()
//!     .route("/admin-dashboard", get(|| async { "admin home" }))
//!     .route("/seller-dashboard", get(|| async { "seller home" }))
//!     .route("/login", get(|| async { "login" }))
//!     .layer(middleware::from_fn_with_state(gate, RouteGate::middleware));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod testing;

pub use error::GateError;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::config::{FailureMode, GateConfig};
    pub use crate::error::GateError;
    pub use crate::gate::{decide, Outcome};
    pub use crate::middleware::RouteGate;
    pub use crate::routes::{Role, RouteClass, RouteTable};
    pub use crate::session::{
        HttpSessionService, SessionCache, SessionError, SessionService, SessionState,
    };
}
