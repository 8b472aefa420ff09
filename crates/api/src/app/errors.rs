use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use invoicedesk_infra::StoreError;

/// Read-side store failure. The cause is logged, never returned.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "store read failed");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "store_error",
        "failed to read invoices",
    )
}

/// Unclassified failure surfaced by an action.
pub fn internal_error(err: anyhow::Error) -> axum::response::Response {
    tracing::error!(error = ?err, "unhandled error");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal server error",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
