//! Testing utilities for gate consumers
//!
//! Test doubles for the Session Service seam plus small response assertions:
//!
//! - [`StaticSessionService`] - fixed credential → session map
//! - [`FailingSessionService`] - every lookup fails, for failure-mode tests
//! - [`assert_redirect`] / [`assert_allowed`] - response assertions
//!
//! # Example
//!
//! ```rust
//! use pharmacy_gate::routes::Role;
//! use pharmacy_gate::session::SessionState;
//! use pharmacy_gate::testing::StaticSessionService;
//!
//! let sessions = StaticSessionService::new()
//!     .with("admin-token", SessionState::authenticated(Role::Admin));
//! ```

use async_trait::async_trait;
use axum::http::{header, StatusCode};
use axum::response::Response;
use std::collections::HashMap;

use crate::session::{SessionError, SessionService, SessionState};

/// Session service double backed by a fixed credential → state map.
///
/// Unmapped credentials resolve to [`SessionState::Anonymous`], matching a
/// backend that does not recognize the cookie.
#[derive(Debug, Default)]
pub struct StaticSessionService {
    sessions: HashMap<String, SessionState>,
}

impl StaticSessionService {
    /// Create an empty double; every lookup resolves anonymous.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a credential to a session state.
    #[must_use]
    pub fn with(mut self, credential: impl Into<String>, state: SessionState) -> Self {
        self.sessions.insert(credential.into(), state);
        self
    }
}

#[async_trait]
impl SessionService for StaticSessionService {
    async fn lookup(&self, credential: &str) -> Result<SessionState, SessionError> {
        Ok(self
            .sessions
            .get(credential)
            .cloned()
            .unwrap_or(SessionState::Anonymous))
    }
}

/// Session service double whose every lookup fails with a 503.
///
/// Drives the fail-open/fail-closed paths without a real outage.
#[derive(Debug, Default)]
pub struct FailingSessionService;

#[async_trait]
impl SessionService for FailingSessionService {
    async fn lookup(&self, _credential: &str) -> Result<SessionState, SessionError> {
        Err(SessionError::Status(StatusCode::SERVICE_UNAVAILABLE))
    }
}

/// Assert that a response is a redirect to `target`.
///
/// # Panics
///
/// Panics if the response is not a redirect or points elsewhere.
pub fn assert_redirect(response: &Response, target: &str) {
    assert!(
        response.status().is_redirection(),
        "expected redirect, got {}",
        response.status()
    );
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, target, "redirect target mismatch");
}

/// Assert that a response passed through the gate (no redirect).
///
/// # Panics
///
/// Panics if the response is a redirect.
pub fn assert_allowed(response: &Response) {
    assert!(
        !response.status().is_redirection(),
        "expected pass-through, got redirect to {:?}",
        response.headers().get(header::LOCATION)
    );
}
