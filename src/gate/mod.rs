//! The gate decision function
//!
//! The storefront originally spread this logic across an edge middleware, a
//! proxy handler, and a client-side dashboard wrapper, each with its own copy
//! of the branching. Here the whole decision table is one pure function,
//! [`decide`], with no transport in sight; the axum adapter in
//! [`crate::middleware`] is a thin shell around it.

use crate::routes::{RouteClass, RouteTable};
use crate::session::SessionState;

/// The gate's verdict for a single request.
///
/// Exactly one outcome is produced per request; the gate never partially
/// applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Pass the request through unmodified.
    Allow,
    /// Respond with a redirect to the contained target instead.
    Redirect(String),
}

impl Outcome {
    /// Shorthand for a redirect outcome.
    #[must_use]
    pub fn redirect(target: impl Into<String>) -> Self {
        Self::Redirect(target.into())
    }
}

/// Map a request path and resolved session to an [`Outcome`].
///
/// The full decision table:
///
/// | path      | session            | outcome                      |
/// |-----------|--------------------|------------------------------|
/// | public    | any                | allow                        |
/// | login     | anonymous          | allow                        |
/// | login     | authenticated as R | redirect to R's home         |
/// | protected | anonymous          | redirect to login            |
/// | protected | R in allowed set   | allow                        |
/// | protected | R not in set       | redirect to R's home         |
///
/// A mismatched privileged role lands on its own dashboard; customers and
/// unrecognized roles land on `/` (see [`crate::routes::Role::home_path`]).
#[must_use]
pub fn decide(table: &RouteTable, path: &str, session: &SessionState) -> Outcome {
    match table.classify(path) {
        RouteClass::Public => Outcome::Allow,
        RouteClass::Login => match session {
            SessionState::Anonymous => Outcome::Allow,
            SessionState::Authenticated { role } => Outcome::redirect(role.home_path()),
        },
        RouteClass::Protected(allowed) => match session {
            SessionState::Anonymous => Outcome::redirect(table.login_path()),
            SessionState::Authenticated { role } => {
                if allowed.contains(role) {
                    Outcome::Allow
                } else {
                    Outcome::redirect(role.home_path())
                }
            }
        },
    }
}
