//! Route classification and roles
//!
//! The static half of the gate: which roles exist, where each role's home
//! dashboard lives, and which path prefixes require which roles. The table is
//! compiled in at startup and never mutated at runtime.

/// A storefront role, as reported by the Session Service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Store administrator; home is `/admin-dashboard`.
    Admin,
    /// Seller account; home is `/seller-dashboard`.
    Seller,
    /// Regular shopper; home is the storefront root.
    Customer,
    /// Authenticated, but the service reported a role this build does not
    /// recognize. Treated as unprivileged.
    Unknown,
}

impl Role {
    /// Parse the Session Service's role string.
    ///
    /// Anything other than the three known role names maps to
    /// [`Role::Unknown`] rather than failing the request.
    #[must_use]
    pub fn parse(role: &str) -> Self {
        match role {
            "ADMIN" => Self::Admin,
            "SELLER" => Self::Seller,
            "CUSTOMER" => Self::Customer,
            _ => Self::Unknown,
        }
    }

    /// Home path for a role.
    ///
    /// This is the single source for role-based redirect targets: the page an
    /// already-authenticated caller lands on when visiting `/login`, and the
    /// fallback when a caller's role does not grant the requested path.
    #[must_use]
    pub const fn home_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin-dashboard",
            Self::Seller => "/seller-dashboard",
            Self::Customer | Self::Unknown => "/",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Admin => "ADMIN",
            Self::Seller => "SELLER",
            Self::Customer => "CUSTOMER",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{name}")
    }
}

/// How a request path relates to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass<'a> {
    /// The login page: reachable anonymously, redirected when authenticated.
    Login,
    /// Not matched by any protected prefix; the gate stays out of the way.
    Public,
    /// Under a protected prefix; only the listed roles may pass.
    Protected(&'a [Role]),
}

/// A protected path prefix and the roles allowed under it.
#[derive(Debug, Clone)]
struct ProtectedPrefix {
    prefix: String,
    allowed: Vec<Role>,
}

/// Static path-prefix → required-role table.
///
/// Built once at startup via [`RouteTable::builder`] or
/// [`RouteTable::storefront`] and shared by every gate entry point.
#[derive(Debug, Clone)]
pub struct RouteTable {
    login_path: String,
    protected: Vec<ProtectedPrefix>,
}

impl RouteTable {
    /// Start building a table with the given login path.
    #[must_use]
    pub fn builder(login_path: impl Into<String>) -> RouteTableBuilder {
        RouteTableBuilder {
            login_path: login_path.into(),
            protected: Vec::new(),
        }
    }

    /// The storefront's table: `/admin-dashboard` for admins,
    /// `/seller-dashboard` for sellers, login at `/login`.
    #[must_use]
    pub fn storefront() -> Self {
        Self::builder("/login")
            .protect("/admin-dashboard", &[Role::Admin])
            .protect("/seller-dashboard", &[Role::Seller])
            .build()
    }

    /// The configured login path.
    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Classify a request path against the table.
    #[must_use]
    pub fn classify(&self, path: &str) -> RouteClass<'_> {
        if path == self.login_path {
            return RouteClass::Login;
        }
        for entry in &self.protected {
            if prefix_matches(&entry.prefix, path) {
                return RouteClass::Protected(&entry.allowed);
            }
        }
        RouteClass::Public
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::storefront()
    }
}

/// Builder for [`RouteTable`].
#[derive(Debug)]
pub struct RouteTableBuilder {
    login_path: String,
    protected: Vec<ProtectedPrefix>,
}

impl RouteTableBuilder {
    /// Require one of `roles` for every path under `prefix`.
    #[must_use]
    pub fn protect(mut self, prefix: impl Into<String>, roles: &[Role]) -> Self {
        self.protected.push(ProtectedPrefix {
            prefix: prefix.into(),
            allowed: roles.to_vec(),
        });
        self
    }

    /// Finish building the table.
    #[must_use]
    pub fn build(self) -> RouteTable {
        RouteTable {
            login_path: self.login_path,
            protected: self.protected,
        }
    }
}

/// Segment-aware prefix match: `/admin-dashboard` matches itself and
/// `/admin-dashboard/users`, but not `/admin-dashboardx`.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_known_and_unknown() {
        assert_eq!(Role::parse("ADMIN"), Role::Admin);
        assert_eq!(Role::parse("SELLER"), Role::Seller);
        assert_eq!(Role::parse("CUSTOMER"), Role::Customer);
        assert_eq!(Role::parse("SUPERUSER"), Role::Unknown);
        assert_eq!(Role::parse(""), Role::Unknown);
        // Role names are case-sensitive on the wire
        assert_eq!(Role::parse("admin"), Role::Unknown);
    }

    #[test]
    fn test_home_paths() {
        assert_eq!(Role::Admin.home_path(), "/admin-dashboard");
        assert_eq!(Role::Seller.home_path(), "/seller-dashboard");
        assert_eq!(Role::Customer.home_path(), "/");
        assert_eq!(Role::Unknown.home_path(), "/");
    }

    #[test]
    fn test_classify_login_and_public() {
        let table = RouteTable::storefront();
        assert_eq!(table.classify("/login"), RouteClass::Login);
        assert_eq!(table.classify("/"), RouteClass::Public);
        assert_eq!(table.classify("/medicines/aspirin"), RouteClass::Public);
        assert_eq!(table.classify("/cart"), RouteClass::Public);
    }

    #[test]
    fn test_classify_protected_prefixes() {
        let table = RouteTable::storefront();
        assert_eq!(
            table.classify("/admin-dashboard"),
            RouteClass::Protected(&[Role::Admin])
        );
        assert_eq!(
            table.classify("/admin-dashboard/users"),
            RouteClass::Protected(&[Role::Admin])
        );
        assert_eq!(
            table.classify("/seller-dashboard/products"),
            RouteClass::Protected(&[Role::Seller])
        );
    }

    #[test]
    fn test_prefix_match_is_segment_aware() {
        let table = RouteTable::storefront();
        assert_eq!(table.classify("/admin-dashboardx"), RouteClass::Public);
        assert_eq!(table.classify("/seller-dashboard2/x"), RouteClass::Public);
    }

    #[test]
    fn test_custom_table_with_shared_roles() {
        let table = RouteTable::builder("/signin")
            .protect("/reports", &[Role::Admin, Role::Seller])
            .build();

        assert_eq!(table.login_path(), "/signin");
        assert_eq!(
            table.classify("/reports/monthly"),
            RouteClass::Protected(&[Role::Admin, Role::Seller])
        );
        assert_eq!(table.classify("/login"), RouteClass::Public);
    }
}
