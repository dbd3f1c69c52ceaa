use axum::{routing::get, Router};

pub mod common;
pub mod dashboard;
pub mod rbac;
pub mod system;

/// Every route the server knows; the guard decides which ones need a session.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/whoami", get(system::whoami))
        .merge(dashboard::router())
        .merge(rbac::router())
        .fallback(system::not_found)
}
