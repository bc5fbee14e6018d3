//! Route access gate middleware
//!
//! Attached with `axum::middleware::from_fn_with_state`, this middleware:
//! 1. Skips public paths and the anonymous login page without touching the
//!    Session Service
//! 2. Extracts the credential from the configured cookie
//! 3. Resolves the session (cache first, then the service)
//! 4. Applies [`decide`] and converts the outcome into a pass-through or an
//!    HTTP 303 redirect
//!
//! Session-service failures never escape: they are absorbed per the
//! configured [`FailureMode`].
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, Router};
//! use pharmacy_gate::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), GateError> {
//! let config = GateConfig::new("https://auth.internal/api/session");
//! let sessions = Arc::new(HttpSessionService::new(&config)?);
//! let gate = RouteGate::new(RouteTable::storefront(), config, sessions);
//!
//! let app: Router = Router::new()
//!     .layer(middleware::from_fn_with_state(gate, RouteGate::middleware));
//! # Ok(())
//! # }
//! ```

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::config::{FailureMode, GateConfig};
use crate::gate::{decide, Outcome};
use crate::routes::{RouteClass, RouteTable};
use crate::session::{SessionCache, SessionError, SessionService, SessionState};

/// Route access gate middleware state.
///
/// Cheap to clone; all fields are shared.
#[derive(Clone)]
pub struct RouteGate {
    /// Static path → role table.
    table: Arc<RouteTable>,

    /// Gate configuration.
    config: Arc<GateConfig>,

    /// Session Service seam.
    sessions: Arc<dyn SessionService>,

    /// Time-bounded cache of resolved sessions, when configured.
    cache: Option<Arc<SessionCache>>,
}

impl RouteGate {
    /// Assemble the gate from its parts.
    ///
    /// A [`SessionCache`] is created when [`GateConfig::cache_ttl`] is set.
    #[must_use]
    pub fn new(table: RouteTable, config: GateConfig, sessions: Arc<dyn SessionService>) -> Self {
        let cache = config
            .cache_ttl
            .map(|ttl| Arc::new(SessionCache::new(ttl)));

        Self {
            table: Arc::new(table),
            config: Arc::new(config),
            sessions,
            cache,
        }
    }

    /// Drop any cached session for a credential.
    ///
    /// Call from the logout handler so the gate stops honoring a session the
    /// backend has already revoked. No-op when caching is disabled.
    pub async fn invalidate(&self, credential: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(credential).await;
        }
    }

    /// Middleware function applying the gate to one request.
    pub async fn middleware(State(gate): State<Self>, request: Request, next: Next) -> Response {
        let path = request.uri().path();
        let credential = credential_from_headers(request.headers(), &gate.config.cookie_name);

        let outcome = gate.outcome_for(path, credential.as_deref()).await;

        match outcome {
            Outcome::Allow => next.run(request).await,
            Outcome::Redirect(target) => {
                tracing::warn!(
                    path = %request.uri().path(),
                    target = %target,
                    "gate redirecting request"
                );
                Redirect::to(&target).into_response()
            }
        }
    }

    /// Produce the single outcome for a request.
    async fn outcome_for(&self, path: &str, credential: Option<&str>) -> Outcome {
        match (self.table.classify(path), credential) {
            // Public pages bypass the gate entirely; the anonymous login
            // page needs no session either.
            (RouteClass::Public, _) => Outcome::Allow,
            (RouteClass::Login, None) => Outcome::Allow,
            (_, None) => decide(&self.table, path, &SessionState::Anonymous),
            (_, Some(credential)) => match self.resolve(credential).await {
                Ok(session) => decide(&self.table, path, &session),
                Err(err) => self.absorb_failure(path, &err),
            },
        }
    }

    /// Resolve a credential to a session, consulting the cache first.
    async fn resolve(&self, credential: &str) -> Result<SessionState, SessionError> {
        if let Some(cache) = &self.cache {
            if let Some(state) = cache.get(credential).await {
                return Ok(state);
            }
        }

        let state = self.sessions.lookup(credential).await?;

        if let Some(cache) = &self.cache {
            cache.insert(credential, state.clone()).await;
        }

        Ok(state)
    }

    /// Convert a session-service failure into an outcome per the configured
    /// failure mode.
    fn absorb_failure(&self, path: &str, err: &SessionError) -> Outcome {
        match self.config.failure_mode {
            FailureMode::Open => {
                tracing::error!(
                    error = %err,
                    path,
                    "session service failure, failing open"
                );
                Outcome::Allow
            }
            FailureMode::Closed => {
                tracing::error!(
                    error = %err,
                    path,
                    "session service failure, treating caller as unauthenticated"
                );
                // Anonymous semantics keep the login page reachable instead
                // of redirecting it to itself.
                decide(&self.table, path, &SessionState::Anonymous)
            }
        }
    }
}

/// Extract the credential from the request's cookie headers.
///
/// Clients may split cookies across several `Cookie` headers, so every one
/// is inspected. Returns `None` when the named cookie is absent or its value
/// is empty. Absence is the normal unauthenticated state, not an error.
fn credential_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|raw| raw.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .map(str::trim)
        .find_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            (name == cookie_name && !value.is_empty()).then(|| value.to_string())
        })
}
