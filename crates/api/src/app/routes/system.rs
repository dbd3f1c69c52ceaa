use axum::{
    extract::Extension,
    http::{StatusCode, Uri},
    response::IntoResponse,
};

use crate::app::errors;
use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found(uri: Uri) -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", format!("no route for {}", uri.path()))
}

/// Who the guard thinks the caller is (public; anonymous callers get `null`s).
pub async fn whoami(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "authenticated": session.is_authenticated(),
        "user_id": session.identity().map(|i| i.user_id.to_string()),
        "role": session.identity().map(|i| i.role.to_string()),
    }))
}
