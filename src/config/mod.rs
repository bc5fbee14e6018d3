//! Gate configuration
//!
//! Static configuration for the route access gate: where the Session Service
//! lives, which cookie carries the credential, how long to wait for the
//! service, and what to do when it cannot be reached.

use std::time::Duration;

/// What the gate does when the Session Service cannot produce a session.
///
/// The storefront's original entry points disagreed on this: some allowed the
/// request through on a session-service error, others bounced the caller to
/// login. The policy is surfaced here so a deployment picks one and gets it
/// everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Allow the request through, logging the error.
    Open,
    /// Treat the caller as unauthenticated: protected paths redirect to
    /// login, the login page itself stays reachable.
    Closed,
}

/// Configuration for the route access gate.
///
/// Supplied once at startup; not runtime-mutable.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Session Service endpoint, e.g. `https://auth.internal/api/session`.
    pub session_endpoint: String,

    /// Name of the cookie carrying the caller's credential.
    pub cookie_name: String,

    /// Bounded timeout for the session lookup. Expiry is treated as a
    /// session-service failure and follows [`GateConfig::failure_mode`].
    pub timeout: Duration,

    /// Policy when the Session Service is unreachable or returns garbage.
    pub failure_mode: FailureMode,

    /// Time-to-live for cached session lookups. `None` disables caching and
    /// every gated request hits the Session Service.
    pub cache_ttl: Option<Duration>,
}

impl GateConfig {
    /// Default credential cookie name.
    pub const DEFAULT_COOKIE_NAME: &'static str = "token";

    /// Default session lookup timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

    /// Create a configuration for the given Session Service endpoint with
    /// defaults: `token` cookie, 3 second timeout, fail-closed, no cache.
    #[must_use]
    pub fn new(session_endpoint: impl Into<String>) -> Self {
        Self {
            session_endpoint: session_endpoint.into(),
            cookie_name: Self::DEFAULT_COOKIE_NAME.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            failure_mode: FailureMode::Closed,
            cache_ttl: None,
        }
    }

    /// Override the credential cookie name.
    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Override the session lookup timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the failure policy.
    #[must_use]
    pub const fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Enable time-bounded caching of successful session lookups.
    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }
}
