use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "user_id": session.user_id().to_string(),
        "email": session.email(),
    }))
}
