//! Authentication-domain errors.

use thiserror::Error;

/// Failure raised by the sign-in flow itself.
///
/// Anything that is *not* an `AuthError` (a dropped connection, a broken
/// session store) is an infrastructure fault and must not be presented to the
/// user as a sign-in problem.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The submitted credentials were rejected.
    #[error("credentials sign-in failed")]
    CredentialsSignin,

    /// A provider failed while verifying the submission (e.g. user lookup).
    #[error("sign-in callback failed: {0}")]
    CallbackRoute(String),

    /// The sign-in flow is misconfigured (e.g. unknown provider key).
    #[error("auth configuration error: {0}")]
    Configuration(String),
}

/// Category of an [`AuthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    CredentialsSignin,
    CallbackRouteError,
    Configuration,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::CredentialsSignin => AuthErrorKind::CredentialsSignin,
            AuthError::CallbackRoute(_) => AuthErrorKind::CallbackRouteError,
            AuthError::Configuration(_) => AuthErrorKind::Configuration,
        }
    }
}

/// Category of `err` if it is an authentication-domain error, `None` otherwise.
pub fn auth_error_kind(err: &anyhow::Error) -> Option<AuthErrorKind> {
    err.downcast_ref::<AuthError>().map(AuthError::kind)
}
