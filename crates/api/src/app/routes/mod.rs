use axum::{routing::get, Router};

pub mod auth;
pub mod common;
pub mod invoices;
pub mod system;

/// Router for all session-protected dashboard endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(invoices::dashboard))
        .route("/dashboard/whoami", get(system::whoami))
        .nest("/dashboard/invoices", invoices::router())
}
