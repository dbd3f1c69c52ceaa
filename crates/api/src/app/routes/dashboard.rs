//! Dashboard routes (protected by the guard middleware).

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use dashgate_auth::CAPABILITY_SCHEMA_VERSION;

use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(overview))
        .route("/dashboard/permissions", get(permissions))
        .route("/dashboard/permissions/:capability", get(check_capability))
}

/// GET /dashboard - the session's identity and capability matrix.
pub async fn overview(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    Json(json!({
        "authenticated": session.is_authenticated(),
        "user_id": session.identity().map(|i| i.user_id.to_string()),
        "role": session.identity().map(|i| i.role.to_string()),
        "permissions": session.permissions(),
    }))
}

/// GET /dashboard/permissions - capability name -> granted.
pub async fn permissions(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    Json(json!({
        "schema_version": CAPABILITY_SCHEMA_VERSION,
        "permissions": session.permissions(),
    }))
}

/// GET /dashboard/permissions/:capability - unknown names answer `false`.
pub async fn check_capability(
    Extension(session): Extension<SessionContext>,
    Path(capability): Path<String>,
) -> impl IntoResponse {
    let granted = session.has_permission(&capability);
    Json(json!({
        "capability": capability,
        "granted": granted,
    }))
}
