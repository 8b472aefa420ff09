//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store wiring (in-memory or Postgres)
//! - `actions.rs`: the form actions, independent of HTTP
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;

use crate::middleware;

pub mod actions;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let session_state = middleware::SessionState {
        sessions: services.sessions().clone(),
    };

    // Protected routes: require a live session cookie.
    let protected = routes::router().route_layer(axum::middleware::from_fn_with_state(
        session_state,
        middleware::session_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
