//! HTTP API: hosts the authorization guard in front of the dashboard routes.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
