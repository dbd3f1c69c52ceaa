use axum::http::StatusCode;
use axum::response::Response;

use dashgate_auth::Capability;

use crate::app::errors;
use crate::context::SessionContext;

/// Reject the request with `403` unless the session holds `capability`.
pub fn require(session: &SessionContext, capability: Capability) -> Result<(), Response> {
    if session.has_capability(capability) {
        return Ok(());
    }

    tracing::debug!(capability = capability.as_str(), "capability check denied");
    Err(errors::json_error(
        StatusCode::FORBIDDEN,
        "forbidden",
        format!("missing capability '{capability}'"),
    ))
}
