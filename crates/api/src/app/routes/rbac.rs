//! RBAC audit endpoints.
//!
//! Visibility into the declared roles and their capability matrix, for
//! answering "why can't this user see that button?".

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use dashgate_auth::{Capability, RbacRegistry};

use crate::app::errors;
use crate::app::routes::common::require;
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/dashboard/rbac/roles", get(list_roles))
        .route("/dashboard/rbac/capabilities/:name", get(get_capability))
}

/// GET /dashboard/rbac/roles - every declared role and its capabilities.
pub async fn list_roles(Extension(session): Extension<SessionContext>) -> axum::response::Response {
    if let Err(denied) = require(&session, Capability::ManageUsers) {
        return denied;
    }

    let registry = RbacRegistry::build();
    (StatusCode::OK, Json(serde_json::json!({
        "schema_version": registry.schema_version,
        "roles": registry.roles,
    })))
        .into_response()
}

/// GET /dashboard/rbac/capabilities/:name - a capability and the roles granting it.
pub async fn get_capability(
    Extension(session): Extension<SessionContext>,
    Path(name): Path<String>,
) -> axum::response::Response {
    if let Err(denied) = require(&session, Capability::ManageUsers) {
        return denied;
    }

    let Some(capability) = Capability::parse(&name) else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "capability not found");
    };

    let registry = RbacRegistry::build();
    (StatusCode::OK, Json(serde_json::json!({
        "capability": registry.capabilities.get(capability.as_str()),
        "granted_by": registry.roles_granting(capability),
    })))
        .into_response()
}
