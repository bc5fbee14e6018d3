//! Session resolution
//!
//! Sessions are owned by an external Session Service; the gate never mints or
//! stores one. This module covers the service's wire format, the resolved
//! [`SessionState`] the decision function consumes, the [`SessionService`]
//! seam, and the reqwest-backed [`HttpSessionService`] used in production.
//!
//! A missing credential is not an error: it resolves to
//! [`SessionState::Anonymous`] without contacting the service at all.

pub mod cache;

pub use cache::SessionCache;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::GateConfig;
use crate::error::GateError;
use crate::routes::Role;

/// The caller's authentication state, as resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No credential, or the service reported no authenticated user.
    Anonymous,
    /// The service vouched for a user with the given role.
    Authenticated {
        /// The role the Session Service reported.
        role: Role,
    },
}

impl SessionState {
    /// Shorthand for an authenticated state.
    #[must_use]
    pub const fn authenticated(role: Role) -> Self {
        Self::Authenticated { role }
    }
}

/// Session Service failures.
///
/// These never reach the end user; the middleware absorbs them according to
/// the configured [`FailureMode`](crate::config::FailureMode).
#[derive(Debug, Error)]
pub enum SessionError {
    /// Network error, timeout expiry, or an unparseable response body.
    #[error("session service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("session service returned status {0}")]
    Status(StatusCode),
}

/// Seam between the gate and the Session Service.
///
/// Production uses [`HttpSessionService`]; tests substitute the doubles in
/// [`crate::testing`].
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Resolve the session behind a forwarded credential.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the service cannot be reached, times out,
    /// answers with a non-success status, or returns a malformed body.
    async fn lookup(&self, credential: &str) -> Result<SessionState, SessionError>;
}

/// Success-response body from the Session Service.
///
/// `{ "user": { "role": "ADMIN" } }` for an authenticated caller,
/// `{ "user": null }` otherwise. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct SessionPayload {
    user: Option<SessionUser>,
}

#[derive(Debug, Deserialize)]
struct SessionUser {
    role: String,
}

impl SessionPayload {
    fn into_state(self) -> SessionState {
        match self.user {
            Some(user) => SessionState::authenticated(Role::parse(&user.role)),
            None => SessionState::Anonymous,
        }
    }
}

/// HTTP client for the Session Service.
///
/// Performs one `GET` per lookup with the credential forwarded as a cookie
/// header, under the bounded timeout from [`GateConfig`]. No retries: a
/// single failure is reported as-is and the middleware's failure policy
/// takes over.
pub struct HttpSessionService {
    client: reqwest::Client,
    endpoint: String,
    cookie_name: String,
}

impl HttpSessionService {
    /// Build the client from gate configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &GateConfig) -> Result<Self, GateError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.session_endpoint.clone(),
            cookie_name: config.cookie_name.clone(),
        })
    }
}

#[async_trait]
impl SessionService for HttpSessionService {
    async fn lookup(&self, credential: &str) -> Result<SessionState, SessionError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(
                header::COOKIE,
                format!("{}={}", self.cookie_name, credential),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Status(status));
        }

        let payload: SessionPayload = response.json().await?;
        Ok(payload.into_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::time::Duration;

    #[test]
    fn test_payload_with_user_resolves_role() {
        let payload: SessionPayload =
            serde_json::from_value(json!({ "user": { "role": "SELLER" } })).unwrap();
        assert_eq!(
            payload.into_state(),
            SessionState::authenticated(Role::Seller)
        );
    }

    #[test]
    fn test_payload_with_null_user_is_anonymous() {
        let payload: SessionPayload = serde_json::from_value(json!({ "user": null })).unwrap();
        assert_eq!(payload.into_state(), SessionState::Anonymous);
    }

    #[test]
    fn test_payload_ignores_extra_fields_and_odd_roles() {
        let payload: SessionPayload = serde_json::from_value(json!({
            "user": { "role": "WAREHOUSE", "name": "pat", "id": 7 },
            "issuedAt": 1_700_000_000
        }))
        .unwrap();
        assert_eq!(
            payload.into_state(),
            SessionState::authenticated(Role::Unknown)
        );
    }

    async fn spawn_service(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        format!("http://{addr}/api/session")
    }

    fn config_for(endpoint: String) -> GateConfig {
        GateConfig::new(endpoint).with_timeout(Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_lookup_forwards_credential_cookie() {
        let app = Router::new().route(
            "/api/session",
            get(|headers: HeaderMap| async move {
                let cookie = headers
                    .get(header::COOKIE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let user: Value = if cookie == "token=alice" {
                    json!({ "role": "ADMIN" })
                } else {
                    Value::Null
                };
                Json(json!({ "user": user }))
            }),
        );
        let endpoint = spawn_service(app).await;
        let service = HttpSessionService::new(&config_for(endpoint)).unwrap();

        assert_eq!(
            service.lookup("alice").await.unwrap(),
            SessionState::authenticated(Role::Admin)
        );
        assert_eq!(
            service.lookup("mallory").await.unwrap(),
            SessionState::Anonymous
        );
    }

    #[tokio::test]
    async fn test_lookup_reports_non_success_status() {
        let app = Router::new().route(
            "/api/session",
            get(|| async { axum::http::StatusCode::UNAUTHORIZED }),
        );
        let endpoint = spawn_service(app).await;
        let service = HttpSessionService::new(&config_for(endpoint)).unwrap();

        let err = service.lookup("alice").await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Status(StatusCode::UNAUTHORIZED)
        ));
    }

    #[tokio::test]
    async fn test_lookup_reports_malformed_body() {
        let app = Router::new().route("/api/session", get(|| async { "not json" }));
        let endpoint = spawn_service(app).await;
        let service = HttpSessionService::new(&config_for(endpoint)).unwrap();

        let err = service.lookup("alice").await.unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
    }

    #[tokio::test]
    async fn test_lookup_reports_unreachable_service() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service =
            HttpSessionService::new(&config_for(format!("http://{addr}/api/session"))).unwrap();

        let err = service.lookup("alice").await.unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
    }
}
