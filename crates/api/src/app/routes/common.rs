use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;

use invoicedesk_invoicing::FormState;

use crate::app::actions::ActionOutcome;

/// `303 See Other` to `location`.
pub fn see_other(location: &str) -> Response {
    (StatusCode::SEE_OTHER, [(header::LOCATION, location.to_string())]).into_response()
}

/// 422 when the state carries field errors, 200 otherwise.
pub fn form_state_response(state: FormState) -> Response {
    let status = if state.has_errors() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    };
    (status, Json(state)).into_response()
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self {
            ActionOutcome::Redirect(path) => see_other(path),
            ActionOutcome::State(state) => form_state_response(state),
        }
    }
}
