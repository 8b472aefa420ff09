use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use invoicedesk_auth::{Session, SessionStore, SessionToken};

use crate::app::errors::json_error;
use crate::app::routes::common::see_other;
use crate::context::SessionContext;

pub const SESSION_COOKIE: &str = "session";
pub const LOGIN_PATH: &str = "/login";

#[derive(Clone)]
pub struct SessionState {
    pub sessions: Arc<dyn SessionStore>,
}

/// Require a live session; otherwise send the browser to the login page.
pub async fn session_middleware(
    State(state): State<SessionState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(token) = session_cookie(req.headers()) else {
        return see_other(LOGIN_PATH);
    };

    match state.sessions.get(&token, Utc::now()).await {
        Ok(Some(session)) => {
            req.extensions_mut().insert(SessionContext::from(session));
            next.run(req).await
        }
        Ok(None) => see_other(LOGIN_PATH),
        Err(e) => {
            tracing::error!(error = %e, "session lookup failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "session_error",
                "failed to load session",
            )
        }
    }
}

/// Value of the `session` cookie, if the request carries a non-empty one.
pub fn session_cookie(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then(|| SessionToken::from_string(value))
        })
}

/// `Set-Cookie` value for `session`. `secure` adds the `Secure` attribute.
pub fn set_session_cookie(session: &Session, secure: bool) -> String {
    let max_age = (session.expires_at - session.issued_at).num_seconds().max(0);
    format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}{}",
        session.token,
        secure_attr(secure)
    )
}

pub fn clear_session_cookie(secure: bool) -> String {
    format!(
        "{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{}",
        secure_attr(secure)
    )
}

fn secure_attr(secure: bool) -> &'static str {
    if secure { "; Secure" } else { "" }
}
