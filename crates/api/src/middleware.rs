use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use dashgate_auth::{AuthorizationGuard, IdentitySource, SessionCredential};

use crate::context::SessionContext;

#[derive(Clone)]
pub struct GuardState {
    pub guard: Arc<AuthorizationGuard>,
    pub identity: Arc<dyn IdentitySource>,
    pub session_cookie: Arc<str>,
}

/// Request-time authorization guard.
///
/// Protected paths without a session cookie are redirected to the login
/// flow. Everything else proceeds with a [`SessionContext`] attached; a
/// credential the identity source rejects degrades to an anonymous session.
pub async fn guard_middleware(
    State(state): State<GuardState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let credential = session_credential(req.headers(), &state.session_cookie);

    let decision = state
        .guard
        .evaluate(req.uri().path(), credential.as_ref().map(SessionCredential::expose));

    if let Some(location) = state.guard.redirect_location(&decision) {
        tracing::info!(path = req.uri().path(), "unauthenticated request redirected to login");
        return Redirect::temporary(&location).into_response();
    }

    let identity = credential.and_then(|credential| {
        match state.identity.identify(&credential, Utc::now()) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(error = %e, "session credential rejected; continuing anonymously");
                None
            }
        }
    });

    req.extensions_mut().insert(SessionContext::new(identity));

    next.run(req).await
}

/// First non-empty session cookie across all `Cookie` headers.
fn session_credential(headers: &HeaderMap, cookie_name: &str) -> Option<SessionCredential> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| SessionCredential::from_cookie_header(value, cookie_name))
}
