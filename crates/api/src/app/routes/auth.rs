use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    Form, Json,
};

use invoicedesk_core::FormData;

use crate::app::actions::{self, AuthenticateOutcome};
use crate::app::errors;
use crate::app::routes::common::see_other;
use crate::app::services::AppServices;
use crate::middleware::{LOGIN_PATH, clear_session_cookie, session_cookie, set_session_cookie};

const AFTER_LOGIN_PATH: &str = "/dashboard";

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<FormData>,
) -> Response {
    match actions::authenticate(&services, None, &form).await {
        Ok(AuthenticateOutcome::SignedIn(session)) => {
            let mut res = see_other(AFTER_LOGIN_PATH);
            match set_session_cookie(&session, services.secure_cookies).parse::<HeaderValue>() {
                Ok(cookie) => {
                    res.headers_mut().insert(header::SET_COOKIE, cookie);
                }
                Err(e) => {
                    return errors::internal_error(anyhow::Error::new(e).context("invalid session cookie"));
                }
            }
            res
        }
        Ok(AuthenticateOutcome::Failed(message)) => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "message": message })),
        )
            .into_response(),
        Err(e) => errors::internal_error(e),
    }
}

/// Drop the session (if any) and return to the login page.
pub async fn logout(Extension(services): Extension<Arc<AppServices>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_cookie(&headers) {
        if let Err(e) = services.sessions().remove(&token).await {
            tracing::warn!(error = %e, "failed to remove session");
        }
    }

    let mut res = see_other(LOGIN_PATH);
    if let Ok(cookie) = clear_session_cookie(services.secure_cookies).parse::<HeaderValue>() {
        res.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    res
}
