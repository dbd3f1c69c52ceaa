//! `dashgate-auth` — pure authorization boundary for the dashboard.
//!
//! This crate is intentionally decoupled from HTTP and storage: the guard and
//! the resolver are total functions with safe defaults, so nothing here fails
//! per request. Only misconfiguration (see [`RouteConfigError`]) fails, at
//! construction time.

pub mod authorize;
pub mod claims;
pub mod credential;
pub mod guard;
pub mod permissions;
pub mod principal;
pub mod registry;
pub mod resolver;
pub mod roles;
pub mod route;

pub use authorize::{PermissionQuery, SessionState, has_capability, has_permission, permissions_for};
pub use claims::{Hs256IdentitySource, IdentityError, IdentitySource, SessionClaims, validate_claims};
pub use credential::{ACCESS_TOKEN_COOKIE, SessionCredential, has_credential};
pub use guard::{AuthorizationGuard, DEFAULT_LOGIN_PATH, GuardDecision, RETURN_PATH_PARAM};
pub use permissions::{CAPABILITY_SCHEMA_VERSION, Capability, PermissionSet};
pub use principal::{Identity, UserId};
pub use registry::RbacRegistry;
pub use resolver::{resolve, resolve_str, role_permissions};
pub use roles::{Role, RoleId};
pub use route::{ProtectedPrefix, RouteClass, RouteClassifier, RouteConfigError};
