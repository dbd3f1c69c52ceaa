//! HTTP application wiring (Axum router + guard middleware).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;

use dashgate_auth::{AuthorizationGuard, Hs256IdentitySource, IdentitySource, RouteConfigError};

use crate::config::ServerConfig;
use crate::middleware;

pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ServerConfig) -> Result<Router, RouteConfigError> {
    let guard = config.build_guard()?;
    let identity = Arc::new(Hs256IdentitySource::new(config.jwt_secret.as_bytes()));
    Ok(build_app_with(guard, identity, &config.session_cookie))
}

/// Build the router around an explicit guard and identity source.
pub fn build_app_with(
    guard: AuthorizationGuard,
    identity: Arc<dyn IdentitySource>,
    session_cookie: &str,
) -> Router {
    let state = middleware::GuardState {
        guard: Arc::new(guard),
        identity,
        session_cookie: Arc::from(session_cookie),
    };

    // The guard wraps every route, including the fallback: classification,
    // not routing, decides what is protected.
    routes::router().layer(
        ServiceBuilder::new().layer(axum::middleware::from_fn_with_state(
            state,
            middleware::guard_middleware,
        )),
    )
}
